//! Sign In Use Case
//!
//! The login orchestrator. Identity sources are tried in a fixed precedence
//! order with silent fallback: special-case addresses go straight to the
//! backend-only flow, username logins skip the provider, and email logins
//! attempt the provider first but surface only the final backstop's outcome.

use std::sync::Arc;

use crate::domain::entity::user::User;
use crate::domain::policy::{RouteOverride, SpecialCasePolicy};
use crate::domain::provider::{BackendCredentials, IdentityBackend, IdentityProvider};
use crate::domain::response::AuthResponse;
use crate::domain::value_object::email::Email;
use crate::error::AuthError;

const SPECIAL_BACKSTOP: &str = "Special case login failed. Please contact support.";

/// Login input
#[derive(Debug, Clone, Default)]
pub struct LoginData {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: String,
}

/// Sign in use case
pub struct SignInUseCase<B, P>
where
    B: IdentityBackend,
    P: IdentityProvider,
{
    backend: Arc<B>,
    provider: Arc<P>,
    policy: Arc<SpecialCasePolicy>,
}

impl<B, P> SignInUseCase<B, P>
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

    pub async fn execute(&self, data: LoginData) -> AuthResponse<User> {
        if data.password.trim().is_empty() {
            return AuthResponse::failure(AuthError::MissingPassword);
        }

        // Policy table consulted once, before any backend is chosen
        if let Some(raw_email) = normalized(&data.email) {
            let email = match Email::new(raw_email) {
                Ok(email) => email,
                Err(_) => return AuthResponse::failure(AuthError::InvalidEmail),
            };

            if self.policy.route_for(&email) == RouteOverride::Direct {
                return self.special_login(&data, &email).await;
            }

            return self.email_login(&data, &email).await;
        }

        if normalized(&data.username).is_some() {
            return self.backend_login(&data).await;
        }

        AuthResponse::failure(AuthError::MissingIdentifier)
    }

    /// Provider-first email flow
    ///
    /// Any failure after the provider attempt - sign-in rejection, a non-OK
    /// linking response, a transport error - falls through to the backend
    /// login. Nothing from the provider attempt reaches the caller.
    async fn email_login(&self, data: &LoginData, email: &Email) -> AuthResponse<User> {
        match self.provider.sign_in(email.as_str(), &data.password).await {
            Ok(session) => match self.backend.login_with_token(&session.id_token).await {
                Ok(user) => {
                    tracing::info!(user_id = user.id, "Signed in via identity provider");
                    AuthResponse::ok(user, "Successfully authenticated via identity provider")
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Token link failed, falling back to backend login");
                    self.backend_login(data).await
                }
            },
            Err(e) => {
                tracing::debug!(error = %e, "Provider sign-in failed, falling back to backend login");
                self.backend_login(data).await
            }
        }
    }

    async fn backend_login(&self, data: &LoginData) -> AuthResponse<User> {
        let credentials = BackendCredentials {
            username: normalized(&data.username),
            email: normalized(&data.email),
            password: data.password.clone(),
        };

        match self.backend.login(&credentials).await {
            Ok(user) => {
                tracing::info!(user_id = user.id, "Signed in");
                AuthResponse::ok(user, "Successfully logged in")
            }
            Err(e) => {
                e.log();
                AuthResponse::failure(e)
            }
        }
    }

    /// Backend-only flow for policy matches
    ///
    /// The special reset installs a known-good password first; reset
    /// failures are swallowed and the login is attempted regardless.
    async fn special_login(&self, data: &LoginData, email: &Email) -> AuthResponse<User> {
        tracing::info!(domain = email.domain(), "Using special login flow");

        if let Err(e) = self.backend.reset_special_password(email.as_str()).await {
            tracing::warn!(error = %e, "Special password reset failed, attempting login anyway");
        }

        let username = normalized(&data.username).unwrap_or_else(|| email.local_part().to_string());
        let credentials = BackendCredentials {
            username: Some(username),
            email: Some(email.as_str().to_string()),
            password: self.policy.substitute_password().to_string(),
        };

        match self.backend.login(&credentials).await {
            Ok(user) => {
                tracing::info!(user_id = user.id, "Signed in through special flow");
                AuthResponse::ok(user, "Successfully logged in through special flow")
            }
            Err(e) => {
                let error = match e {
                    AuthError::Http { status, .. } => AuthError::Special {
                        code: format!("special/login-failed-{status}"),
                        message: SPECIAL_BACKSTOP.to_string(),
                    },
                    _ => AuthError::Special {
                        code: "special/login-exception".to_string(),
                        message: SPECIAL_BACKSTOP.to_string(),
                    },
                };
                error.log();
                AuthResponse::failure(error)
            }
        }
    }
}

fn normalized(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::{MemoryBackend, MemoryProvider};
    use crate::test_support::parent;

    fn use_case(
        backend: Arc<MemoryBackend>,
        provider: Arc<MemoryProvider>,
    ) -> SignInUseCase<MemoryBackend, MemoryProvider> {
        SignInUseCase::new(backend, provider, Arc::new(SpecialCasePolicy::default()))
    }

    #[tokio::test]
    async fn test_missing_password_rejected_before_any_call() {
        let backend = Arc::new(MemoryBackend::new());
        let provider = Arc::new(MemoryProvider::new());
        let use_case = use_case(backend.clone(), provider.clone());

        let response = use_case
            .execute(LoginData {
                username: Some("parent1".to_string()),
                ..Default::default()
            })
            .await;

        assert!(!response.is_success());
        assert_eq!(response.code.as_deref(), Some("validation/missing-password"));
        assert!(backend.log.calls().is_empty());
        assert!(provider.log.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_identifier_rejected() {
        let use_case = use_case(
            Arc::new(MemoryBackend::new()),
            Arc::new(MemoryProvider::new()),
        );

        let response = use_case
            .execute(LoginData {
                password: "secret".to_string(),
                ..Default::default()
            })
            .await;

        assert_eq!(
            response.code.as_deref(),
            Some("validation/missing-identifier")
        );
    }

    #[tokio::test]
    async fn test_username_login_skips_provider() {
        let backend = Arc::new(
            MemoryBackend::new().with_account(parent(1, "parent1", "parent1@example.com"), "pw1"),
        );
        let provider = Arc::new(MemoryProvider::new());
        let use_case = use_case(backend.clone(), provider.clone());

        let response = use_case
            .execute(LoginData {
                username: Some("parent1".to_string()),
                password: "pw1".to_string(),
                ..Default::default()
            })
            .await;

        assert!(response.is_success());
        assert_eq!(response.data.unwrap().id, 1);
        assert!(provider.log.calls().is_empty());
    }

    #[tokio::test]
    async fn test_email_login_links_provider_session() {
        let backend = Arc::new(
            MemoryBackend::new().with_account(parent(2, "parent2", "parent2@example.com"), "pw2"),
        );
        let provider =
            Arc::new(MemoryProvider::new().with_account("parent2@example.com", "pw2"));
        let use_case = use_case(backend.clone(), provider.clone());

        let response = use_case
            .execute(LoginData {
                email: Some("parent2@example.com".to_string()),
                password: "pw2".to_string(),
                ..Default::default()
            })
            .await;

        assert!(response.is_success());
        assert_eq!(provider.log.count("sign_in"), 1);
        assert_eq!(backend.log.count("login_with_token"), 1);
        assert_eq!(backend.log.count("login"), 0);
    }

    #[tokio::test]
    async fn test_provider_failure_falls_back_to_backend() {
        // Provider rejects the password, backend accepts it
        let backend = Arc::new(
            MemoryBackend::new().with_account(parent(3, "parent3", "parent3@example.com"), "pw3"),
        );
        let provider = Arc::new(MemoryProvider::new().failing_with("INVALID_PASSWORD"));
        let use_case = use_case(backend.clone(), provider.clone());

        let response = use_case
            .execute(LoginData {
                email: Some("parent3@example.com".to_string()),
                password: "pw3".to_string(),
                ..Default::default()
            })
            .await;

        assert!(response.is_success());
        assert_eq!(backend.log.count("login"), 1);
    }

    #[tokio::test]
    async fn test_fallback_surfaces_backend_message_not_provider() {
        // Both reject: the final message must be the backend's
        let backend = Arc::new(MemoryBackend::new());
        let provider = Arc::new(MemoryProvider::new().failing_with("INVALID_PASSWORD"));
        let use_case = use_case(backend, provider);

        let response = use_case
            .execute(LoginData {
                email: Some("parent@test.com".to_string()),
                password: "wrong".to_string(),
                ..Default::default()
            })
            .await;

        assert!(!response.is_success());
        assert_eq!(response.code.as_deref(), Some("http/401"));
        assert_eq!(
            response.message,
            "The username or password you entered is incorrect. Please try again."
        );
    }

    #[tokio::test]
    async fn test_special_email_never_touches_provider() {
        let backend = Arc::new(MemoryBackend::new().with_account(
            parent(4, "haumankind", "haumankind@chapsmail.com"),
            "Forgotten1!",
        ));
        let provider = Arc::new(MemoryProvider::new());
        let use_case = use_case(backend.clone(), provider.clone());

        let response = use_case
            .execute(LoginData {
                username: Some("haumankind".to_string()),
                email: Some("haumankind@chapsmail.com".to_string()),
                password: "wrong".to_string(),
                ..Default::default()
            })
            .await;

        // Reset installs the substitute password, then login succeeds with it
        assert!(response.is_success());
        assert_eq!(backend.log.count("reset_special_password"), 1);
        assert_eq!(backend.log.count("login"), 1);
        assert!(provider.log.calls().is_empty());
    }

    #[tokio::test]
    async fn test_special_domain_failure_gets_backstop() {
        let backend = Arc::new(MemoryBackend::new());
        let provider = Arc::new(MemoryProvider::new());
        let use_case = use_case(backend.clone(), provider.clone());

        let response = use_case
            .execute(LoginData {
                email: Some("unknown@clowmail.com".to_string()),
                password: "whatever".to_string(),
                ..Default::default()
            })
            .await;

        assert!(!response.is_success());
        assert_eq!(response.code.as_deref(), Some("special/login-failed-401"));
        assert_eq!(response.message, SPECIAL_BACKSTOP);
        assert!(provider.log.calls().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_email_rejected() {
        let use_case = use_case(
            Arc::new(MemoryBackend::new()),
            Arc::new(MemoryProvider::new()),
        );

        let response = use_case
            .execute(LoginData {
                email: Some("not-an-email".to_string()),
                password: "secret".to_string(),
                ..Default::default()
            })
            .await;

        assert_eq!(response.code.as_deref(), Some("validation/invalid-email"));
    }
}
