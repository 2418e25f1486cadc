//! In-Memory Identity Source
//!
//! The mock/local auth store: a full implementation of both identity
//! traits over an in-memory account table. Backs development logins when
//! no real backend is reachable, and doubles as the call-logged test
//! double for the orchestrator tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use chrono::Utc;
use kernel::error::kind::ErrorKind;

use crate::domain::entity::user::User;
use crate::domain::provider::{
    BackendCredentials, FirebaseLink, IdentityBackend, IdentityProvider, ProviderProfile,
    ProviderSession, Registration,
};
use crate::domain::value_object::email::Email;
use crate::domain::value_object::invitation::InvitationToken;
use crate::domain::value_object::user_status::UserStatus;
use crate::error::{AuthError, AuthResult};
use crate::infra::firebase::provider_error;

const WRONG_CREDENTIALS: &str =
    "The username or password you entered is incorrect. Please try again.";
const USERNAME_TAKEN: &str = "This username is already taken. Please choose a different username.";
const EMAIL_TAKEN: &str =
    "An account with this email already exists. Please use a different email or try logging in.";

/// Ordered record of trait calls, for asserting interaction properties
#[derive(Default)]
pub struct CallLog {
    calls: Mutex<Vec<String>>,
}

impl CallLog {
    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, name: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == name).count()
    }
}

struct MemoryAccount {
    user: User,
    password: String,
}

/// In-memory first-party backend
pub struct MemoryBackend {
    accounts: Mutex<Vec<MemoryAccount>>,
    current: Mutex<Option<User>>,
    special_password: String,
    next_id: AtomicI64,
    fail_logout: AtomicBool,
    pub log: CallLog,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            accounts: Mutex::new(Vec::new()),
            current: Mutex::new(None),
            special_password: "Cricket2025!".to_string(),
            next_id: AtomicI64::new(1),
            fail_logout: AtomicBool::new(false),
            log: CallLog::default(),
        }
    }

    /// Builder-style account seeding
    pub fn with_account(self, user: User, password: &str) -> Self {
        self.seed(user, password);
        self
    }

    /// Seed an account
    pub fn seed(&self, user: User, password: &str) {
        self.next_id
            .fetch_max(user.id + 1, Ordering::SeqCst);
        self.accounts.lock().unwrap().push(MemoryAccount {
            user,
            password: password.to_string(),
        });
    }

    /// Make the session-restore probe return this user
    pub fn set_current(&self, user: Option<User>) {
        *self.current.lock().unwrap() = user;
    }

    /// Make the next logout call fail (server refusal)
    pub fn fail_next_logout(&self) {
        self.fail_logout.store(true, Ordering::SeqCst);
    }

    fn find(&self, username: Option<&str>, email: Option<&str>) -> Option<MemoryAccountView> {
        let email = email.map(str::to_lowercase);
        let accounts = self.accounts.lock().unwrap();
        accounts
            .iter()
            .find(|account| {
                let by_username =
                    username.is_some_and(|u| account.user.username.as_deref() == Some(u));
                let by_email = email.as_deref().is_some_and(|e| {
                    account.user.email.as_ref().map(Email::as_str) == Some(e)
                });
                by_username || by_email
            })
            .map(|account| MemoryAccountView {
                user: account.user.clone(),
                password: account.password.clone(),
            })
    }

    fn username_taken(&self, username: &str) -> bool {
        self.accounts
            .lock()
            .unwrap()
            .iter()
            .any(|account| account.user.username.as_deref() == Some(username))
    }

    fn email_taken(&self, email: &str) -> bool {
        let email = email.to_lowercase();
        self.accounts
            .lock()
            .unwrap()
            .iter()
            .any(|account| account.user.email.as_ref().map(Email::as_str) == Some(email.as_str()))
    }

    fn insert_user(
        &self,
        username: &str,
        email: &str,
        full_name: &str,
        phone: Option<String>,
        role: crate::domain::value_object::user_role::UserRole,
        academy_id: Option<i64>,
        password: &str,
    ) -> AuthResult<User> {
        if self.username_taken(username) {
            return Err(AuthError::Http {
                status: 400,
                message: USERNAME_TAKEN.to_string(),
            });
        }
        if self.email_taken(email) {
            return Err(AuthError::Http {
                status: 400,
                message: EMAIL_TAKEN.to_string(),
            });
        }

        let user = User {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            username: Some(username.to_string()),
            email: Some(Email::from_backend(email)),
            full_name: full_name.to_string(),
            phone,
            role,
            // Staff accounts queue for administrator review
            status: if role.is_staff() {
                UserStatus::Pending
            } else {
                UserStatus::Active
            },
            is_active: true,
            academy_id,
        };

        self.accounts.lock().unwrap().push(MemoryAccount {
            user: user.clone(),
            password: password.to_string(),
        });

        Ok(user)
    }
}

struct MemoryAccountView {
    user: User,
    password: String,
}

impl IdentityBackend for MemoryBackend {
    async fn login(&self, credentials: &BackendCredentials) -> AuthResult<User> {
        self.log.record("login");

        let account = self
            .find(credentials.username.as_deref(), credentials.email.as_deref())
            .ok_or(AuthError::Http {
                status: 401,
                message: WRONG_CREDENTIALS.to_string(),
            })?;

        if account.password != credentials.password {
            return Err(AuthError::Http {
                status: 401,
                message: WRONG_CREDENTIALS.to_string(),
            });
        }

        Ok(account.user)
    }

    async fn register(&self, registration: &Registration) -> AuthResult<User> {
        self.log.record("register");
        self.insert_user(
            &registration.username,
            &registration.email,
            &registration.full_name,
            registration.phone.clone(),
            registration.role,
            registration.academy_id,
            &registration.password,
        )
    }

    async fn direct_register(&self, registration: &Registration) -> AuthResult<User> {
        self.log.record("direct_register");
        self.insert_user(
            &registration.username,
            &registration.email,
            &registration.full_name,
            registration.phone.clone(),
            registration.role,
            registration.academy_id,
            &registration.password,
        )
    }

    async fn login_with_token(&self, id_token: &str) -> AuthResult<User> {
        self.log.record("login_with_token");

        id_token
            .strip_prefix("idtoken-")
            .and_then(|email| self.find(None, Some(email)))
            .map(|account| account.user)
            .ok_or(AuthError::Http {
                status: 401,
                message: "Failed to link identity provider account with server. Please try again."
                    .to_string(),
            })
    }

    async fn register_with_token(&self, link: &FirebaseLink) -> AuthResult<User> {
        self.log.record("register_with_token");
        self.insert_user(
            &link.username,
            &link.email,
            &link.full_name,
            link.phone.clone(),
            link.role,
            link.academy_id,
            // Provider-linked accounts have no backend password
            "",
        )
    }

    async fn reset_password(&self, _email: &str) -> AuthResult<()> {
        self.log.record("reset_password");
        Ok(())
    }

    async fn reset_special_password(&self, email: &str) -> AuthResult<()> {
        self.log.record("reset_special_password");

        let email = email.to_lowercase();
        let mut accounts = self.accounts.lock().unwrap();
        for account in accounts.iter_mut() {
            if account.user.email.as_ref().map(Email::as_str) == Some(email.as_str()) {
                account.password = self.special_password.clone();
            }
        }

        Ok(())
    }

    async fn current_user(&self) -> AuthResult<Option<User>> {
        self.log.record("current_user");
        Ok(self.current.lock().unwrap().clone())
    }

    async fn verify_invitation(&self, token: &str) -> AuthResult<InvitationToken> {
        self.log.record("verify_invitation");

        InvitationToken::decode(token, Utc::now().timestamp_millis()).map_err(|e| {
            if e.kind() == ErrorKind::Gone {
                AuthError::InvitationExpired
            } else {
                AuthError::InvitationInvalid
            }
        })
    }

    async fn logout(&self) -> AuthResult<()> {
        self.log.record("logout");

        if self.fail_logout.swap(false, Ordering::SeqCst) {
            return Err(AuthError::Http {
                status: 500,
                message: "Logout failed".to_string(),
            });
        }

        Ok(())
    }
}

// ============================================================================
// MemoryProvider
// ============================================================================

/// In-memory identity provider
pub struct MemoryProvider {
    accounts: Mutex<Vec<(String, String)>>,
    forced_failure: Option<String>,
    pub log: CallLog,
}

impl Default for MemoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self {
            accounts: Mutex::new(Vec::new()),
            forced_failure: None,
            log: CallLog::default(),
        }
    }

    /// Builder-style account seeding
    pub fn with_account(self, email: &str, password: &str) -> Self {
        self.accounts
            .lock()
            .unwrap()
            .push((email.to_lowercase(), password.to_string()));
        self
    }

    /// Fail every operation with the given Identity Toolkit code
    pub fn failing_with(mut self, rest_code: &str) -> Self {
        self.forced_failure = Some(rest_code.to_string());
        self
    }

    fn forced(&self) -> Option<AuthError> {
        self.forced_failure.as_deref().map(provider_error)
    }

    fn session_for(email: &str) -> ProviderSession {
        ProviderSession {
            uid: format!("uid-{email}"),
            email: email.to_string(),
            id_token: format!("idtoken-{email}"),
            refresh_token: format!("refresh-{email}"),
            display_name: None,
        }
    }
}

impl IdentityProvider for MemoryProvider {
    async fn sign_in(&self, email: &str, password: &str) -> AuthResult<ProviderSession> {
        self.log.record("sign_in");

        if let Some(error) = self.forced() {
            return Err(error);
        }

        let email = email.to_lowercase();
        let accounts = self.accounts.lock().unwrap();
        match accounts.iter().find(|(e, _)| *e == email) {
            Some((_, stored)) if *stored == password => Ok(Self::session_for(&email)),
            Some(_) => Err(provider_error("INVALID_PASSWORD")),
            None => Err(provider_error("EMAIL_NOT_FOUND")),
        }
    }

    async fn sign_up(&self, email: &str, password: &str) -> AuthResult<ProviderSession> {
        self.log.record("sign_up");

        if let Some(error) = self.forced() {
            return Err(error);
        }

        let email = email.to_lowercase();
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.iter().any(|(e, _)| *e == email) {
            return Err(provider_error("EMAIL_EXISTS"));
        }

        accounts.push((email.clone(), password.to_string()));
        Ok(Self::session_for(&email))
    }

    async fn update_profile(&self, _id_token: &str, _display_name: &str) -> AuthResult<()> {
        self.log.record("update_profile");

        if let Some(error) = self.forced() {
            return Err(error);
        }

        Ok(())
    }

    async fn lookup(&self, id_token: &str) -> AuthResult<ProviderProfile> {
        self.log.record("lookup");

        if let Some(error) = self.forced() {
            return Err(error);
        }

        let email = id_token
            .strip_prefix("idtoken-")
            .ok_or_else(|| provider_error("INVALID_ID_TOKEN"))?;

        Ok(ProviderProfile {
            uid: format!("uid-{email}"),
            email: email.to_string(),
            email_verified: false,
            display_name: None,
        })
    }

    async fn send_reset_email(&self, email: &str) -> AuthResult<()> {
        self.log.record("send_reset_email");

        if let Some(error) = self.forced() {
            return Err(error);
        }

        let email = email.to_lowercase();
        let accounts = self.accounts.lock().unwrap();
        if accounts.iter().any(|(e, _)| *e == email) {
            Ok(())
        } else {
            Err(provider_error("EMAIL_NOT_FOUND"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::parent;

    #[tokio::test]
    async fn test_login_checks_password() {
        let backend =
            MemoryBackend::new().with_account(parent(1, "parent1", "p1@example.com"), "pw");

        let ok = backend
            .login(&BackendCredentials {
                username: Some("parent1".to_string()),
                email: None,
                password: "pw".to_string(),
            })
            .await;
        assert!(ok.is_ok());

        let err = backend
            .login(&BackendCredentials {
                username: Some("parent1".to_string()),
                email: None,
                password: "nope".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Http { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_special_reset_installs_substitute_password() {
        let backend =
            MemoryBackend::new().with_account(parent(1, "h", "h@chapsmail.com"), "forgotten");

        backend.reset_special_password("h@chapsmail.com").await.unwrap();

        let ok = backend
            .login(&BackendCredentials {
                username: None,
                email: Some("h@chapsmail.com".to_string()),
                password: "Cricket2025!".to_string(),
            })
            .await;
        assert!(ok.is_ok());
    }

    #[tokio::test]
    async fn test_provider_roundtrip() {
        let provider = MemoryProvider::new();

        let session = provider.sign_up("p1@example.com", "pw").await.unwrap();
        assert_eq!(session.id_token, "idtoken-p1@example.com");

        let session = provider.sign_in("p1@example.com", "pw").await.unwrap();
        let profile = provider.lookup(&session.id_token).await.unwrap();
        assert_eq!(profile.email, "p1@example.com");

        let err = provider.sign_up("p1@example.com", "pw").await.unwrap_err();
        assert_eq!(err.code(), "auth/email-already-in-use");
    }

    #[tokio::test]
    async fn test_forced_failure() {
        let provider = MemoryProvider::new().failing_with("TOO_MANY_ATTEMPTS_TRY_LATER");
        let err = provider.sign_in("p1@example.com", "pw").await.unwrap_err();
        assert_eq!(err.code(), "auth/too-many-requests");
    }
}
