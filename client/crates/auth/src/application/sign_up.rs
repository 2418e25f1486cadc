//! Sign Up Use Case
//!
//! Registration mirror of the login orchestrator: special-case addresses go
//! to the direct-registration endpoint, everything else creates a provider
//! account first and links it to the backend. Provider creation failure
//! falls back to direct backend registration; a failed *link* after a
//! successful creation is a hard error - falling back there would strand a
//! provider account with no backend record.

use std::sync::Arc;

use crate::domain::entity::user::User;
use crate::domain::policy::{RouteOverride, SpecialCasePolicy};
use crate::domain::provider::{
    FirebaseLink, IdentityBackend, IdentityProvider, Registration,
};
use crate::domain::response::AuthResponse;
use crate::domain::value_object::email::Email;
use crate::domain::value_object::user_role::UserRole;
use crate::error::AuthError;

const SPECIAL_REGISTER_BACKSTOP: &str =
    "Special case registration failed. Please contact support.";

/// Registration input
#[derive(Debug, Clone)]
pub struct RegisterData {
    pub username: String,
    pub password: String,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub academy_id: Option<i64>,
}

/// Sign up use case
pub struct SignUpUseCase<B, P>
where
    B: IdentityBackend,
    P: IdentityProvider,
{
    backend: Arc<B>,
    provider: Arc<P>,
    policy: Arc<SpecialCasePolicy>,
}

impl<B, P> SignUpUseCase<B, P>
where
    B: IdentityBackend,
    P: IdentityProvider,
{
    pub fn new(backend: Arc<B>, provider: Arc<P>, policy: Arc<SpecialCasePolicy>) -> Self {
        Self {
            backend,
            provider,
            policy,
        }
    }

    pub async fn execute(&self, data: RegisterData) -> AuthResponse<User> {
        if let Err(error) = validate(&data) {
            return AuthResponse::failure(error);
        }

        let email = match Email::new(&data.email) {
            Ok(email) => email,
            Err(_) => return AuthResponse::failure(AuthError::InvalidEmail),
        };

        if self.policy.route_for(&email) == RouteOverride::Direct {
            return self.special_register(&data).await;
        }

        self.provider_register(&data, &email).await
    }

    /// Standard flow: provider account first, then the backend link
    async fn provider_register(&self, data: &RegisterData, email: &Email) -> AuthResponse<User> {
        let session = match self.provider.sign_up(email.as_str(), &data.password).await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "Provider registration failed, registering directly");
                return self.backend_register(data).await;
            }
        };

        // Display name is cosmetic; a failed update must not sink the flow
        if let Err(e) = self
            .provider
            .update_profile(&session.id_token, &data.full_name)
            .await
        {
            tracing::warn!(error = %e, "Display name update failed");
        }

        let link = FirebaseLink {
            id_token: session.id_token.clone(),
            firebase_uid: session.uid.clone(),
            username: data.username.clone(),
            email: email.as_str().to_string(),
            full_name: data.full_name.clone(),
            role: data.role,
            phone: data.phone.clone(),
            academy_id: data.academy_id,
        };

        match self.backend.register_with_token(&link).await {
            Ok(user) => {
                tracing::info!(user_id = user.id, role = %user.role, "Registered via identity provider");
                AuthResponse::ok(user, "Successfully registered")
            }
            Err(e) => {
                e.log();
                AuthResponse::failure(e)
            }
        }
    }

    async fn backend_register(&self, data: &RegisterData) -> AuthResponse<User> {
        match self.backend.register(&registration(data)).await {
            Ok(user) => {
                tracing::info!(user_id = user.id, role = %user.role, "Registered");
                AuthResponse::ok(user, "Successfully registered")
            }
            Err(e) => {
                e.log();
                AuthResponse::failure(e)
            }
        }
    }

    async fn special_register(&self, data: &RegisterData) -> AuthResponse<User> {
        tracing::info!("Using direct registration for special-case email");

        match self.backend.direct_register(&registration(data)).await {
            Ok(user) => {
                tracing::info!(user_id = user.id, "Registered through special flow");
                AuthResponse::ok(user, "Successfully registered through special flow")
            }
            Err(e) => {
                let error = match e {
                    AuthError::Http { status, .. } => AuthError::Special {
                        code: format!("special/register-failed-{status}"),
                        message: SPECIAL_REGISTER_BACKSTOP.to_string(),
                    },
                    _ => AuthError::Special {
                        code: "special/register-exception".to_string(),
                        message: SPECIAL_REGISTER_BACKSTOP.to_string(),
                    },
                };
                error.log();
                AuthResponse::failure(error)
            }
        }
    }
}

fn registration(data: &RegisterData) -> Registration {
    Registration {
        username: data.username.clone(),
        password: data.password.clone(),
        email: data.email.trim().to_lowercase(),
        full_name: data.full_name.clone(),
        phone: data.phone.clone(),
        role: data.role,
        academy_id: data.academy_id,
    }
}

fn validate(data: &RegisterData) -> Result<(), AuthError> {
    if data.username.trim().is_empty() {
        return Err(AuthError::MissingUsername);
    }
    if data.password.trim().is_empty() {
        return Err(AuthError::MissingPassword);
    }
    if data.email.trim().is_empty() {
        return Err(AuthError::MissingEmail);
    }
    if data.full_name.trim().is_empty() {
        return Err(AuthError::MissingFullName);
    }
    Ok(())
}
