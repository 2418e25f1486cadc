//! Reset Password Use Case
//!
//! Special-case addresses use the dedicated backend reset endpoint; every
//! other address tries the identity provider's reset email first and falls
//! back to the backend reset.

use std::sync::Arc;

use crate::domain::policy::{RouteOverride, SpecialCasePolicy};
use crate::domain::provider::{IdentityBackend, IdentityProvider};
use crate::domain::response::AuthResponse;
use crate::domain::value_object::email::Email;
use crate::error::AuthError;

const RESET_SENT: &str = "Password reset email sent. Please check your inbox.";
const SPECIAL_RESET_DONE: &str =
    "Password has been reset. You can now login with the new password.";
const SPECIAL_RESET_BACKSTOP: &str = "Failed to reset password. Please contact support.";

/// Reset password use case
pub struct ResetPasswordUseCase<B, P>
where
    B: IdentityBackend,
    P: IdentityProvider,
{
    backend: Arc<B>,
    provider: Arc<P>,
    policy: Arc<SpecialCasePolicy>,
}

impl<B, P> ResetPasswordUseCase<B, P>
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

    pub async fn execute(&self, raw_email: &str) -> AuthResponse<()> {
        let email = match Email::new(raw_email) {
            Ok(email) => email,
            Err(_) => return AuthResponse::failure(AuthError::InvalidEmail),
        };

        if self.policy.route_for(&email) == RouteOverride::Direct {
            return self.special_reset(&email).await;
        }

        match self.provider.send_reset_email(email.as_str()).await {
            Ok(()) => AuthResponse::ok((), RESET_SENT),
            Err(e) => {
                tracing::warn!(error = %e, "Provider reset failed, falling back to backend");
                match self.backend.reset_password(email.as_str()).await {
                    Ok(()) => AuthResponse::ok((), RESET_SENT),
                    Err(e) => {
                        e.log();
                        AuthResponse::failure(e)
                    }
                }
            }
        }
    }

    async fn special_reset(&self, email: &Email) -> AuthResponse<()> {
        match self.backend.reset_special_password(email.as_str()).await {
            Ok(()) => AuthResponse::ok((), SPECIAL_RESET_DONE),
            Err(e) => {
                let error = match e {
                    AuthError::Http { status, .. } => AuthError::Special {
                        code: format!("special/reset-failed-{status}"),
                        message: SPECIAL_RESET_BACKSTOP.to_string(),
                    },
                    _ => AuthError::Special {
                        code: "special/reset-exception".to_string(),
                        message: SPECIAL_RESET_BACKSTOP.to_string(),
                    },
                };
                error.log();
                AuthResponse::failure(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::{MemoryBackend, MemoryProvider};
    use crate::test_support::parent;

    fn use_case(
        backend: Arc<MemoryBackend>,
        provider: Arc<MemoryProvider>,
    ) -> ResetPasswordUseCase<MemoryBackend, MemoryProvider> {
        ResetPasswordUseCase::new(backend, provider, Arc::new(SpecialCasePolicy::default()))
    }

    #[tokio::test]
    async fn test_standard_reset_uses_provider() {
        let backend = Arc::new(MemoryBackend::new());
        let provider =
            Arc::new(MemoryProvider::new().with_account("parent@example.com", "pw"));
        let use_case = use_case(backend.clone(), provider.clone());

        let response = use_case.execute("parent@example.com").await;

        assert!(response.is_success());
        assert_eq!(provider.log.count("send_reset_email"), 1);
        assert_eq!(backend.log.count("reset_password"), 0);
    }

    #[tokio::test]
    async fn test_provider_failure_falls_back_to_backend() {
        let backend = Arc::new(MemoryBackend::new());
        let provider = Arc::new(MemoryProvider::new().failing_with("EMAIL_NOT_FOUND"));
        let use_case = use_case(backend.clone(), provider.clone());

        let response = use_case.execute("parent@example.com").await;

        assert!(response.is_success());
        assert_eq!(backend.log.count("reset_password"), 1);
    }

    #[tokio::test]
    async fn test_special_email_uses_dedicated_endpoint() {
        let backend = Arc::new(MemoryBackend::new().with_account(
            parent(1, "haumankind", "haumankind@chapsmail.com"),
            "old-pw",
        ));
        let provider = Arc::new(MemoryProvider::new());
        let use_case = use_case(backend.clone(), provider.clone());

        let response = use_case.execute("haumankind@chapsmail.com").await;

        assert!(response.is_success());
        assert_eq!(response.message, SPECIAL_RESET_DONE);
        assert_eq!(backend.log.count("reset_special_password"), 1);
        assert!(provider.log.calls().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_email_rejected() {
        let use_case = use_case(
            Arc::new(MemoryBackend::new()),
            Arc::new(MemoryProvider::new()),
        );
        let response = use_case.execute("nope").await;
        assert_eq!(response.code.as_deref(), Some("validation/invalid-email"));
    }
}
