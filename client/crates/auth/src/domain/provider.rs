//! Identity Source Traits
//!
//! Interfaces for the overlapping identity sources the orchestrator
//! reconciles. Implementations live in the infrastructure layer: the
//! first-party REST backend, the Firebase Identity Toolkit client, and the
//! in-memory mock source.

use serde::Serialize;

use crate::domain::entity::user::User;
use crate::domain::value_object::invitation::InvitationToken;
use crate::domain::value_object::user_role::UserRole;
use crate::error::AuthResult;

/// Credentials posted to the first-party login endpoint
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendCredentials {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub password: String,
}

/// Registration payload for the first-party endpoints
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub email: String,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub academy_id: Option<i64>,
}

/// Payload linking a freshly created provider account to the backend
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FirebaseLink {
    pub id_token: String,
    pub firebase_uid: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub academy_id: Option<i64>,
}

/// Session minted by the identity provider
#[derive(Debug, Clone)]
pub struct ProviderSession {
    pub uid: String,
    pub email: String,
    pub id_token: String,
    pub refresh_token: String,
    pub display_name: Option<String>,
}

/// Profile returned by a provider lookup
#[derive(Debug, Clone)]
pub struct ProviderProfile {
    pub uid: String,
    pub email: String,
    pub email_verified: bool,
    pub display_name: Option<String>,
}

/// First-party backend trait
#[trait_variant::make(IdentityBackend: Send)]
pub trait LocalIdentityBackend {
    /// POST /api/login
    async fn login(&self, credentials: &BackendCredentials) -> AuthResult<User>;

    /// POST /api/register
    async fn register(&self, registration: &Registration) -> AuthResult<User>;

    /// POST /api/auth/direct-register (special-case flow)
    async fn direct_register(&self, registration: &Registration) -> AuthResult<User>;

    /// POST /api/auth/login-firebase - exchange a provider ID token for a session
    async fn login_with_token(&self, id_token: &str) -> AuthResult<User>;

    /// POST /api/auth/register-firebase - link a new provider account
    async fn register_with_token(&self, link: &FirebaseLink) -> AuthResult<User>;

    /// POST /api/auth/reset-password
    async fn reset_password(&self, email: &str) -> AuthResult<()>;

    /// POST /api/auth/reset-special-password (special-case flow)
    async fn reset_special_password(&self, email: &str) -> AuthResult<()>;

    /// GET /api/user - the session-restore probe; 401 is `None`, not an error
    async fn current_user(&self) -> AuthResult<Option<User>>;

    /// Verify a server-issued invitation token
    async fn verify_invitation(&self, token: &str) -> AuthResult<InvitationToken>;

    /// POST /api/logout - best-effort server notification
    async fn logout(&self) -> AuthResult<()>;
}

/// Identity provider (Firebase) trait
#[trait_variant::make(IdentityProvider: Send)]
pub trait LocalIdentityProvider {
    /// accounts:signInWithPassword
    async fn sign_in(&self, email: &str, password: &str) -> AuthResult<ProviderSession>;

    /// accounts:signUp
    async fn sign_up(&self, email: &str, password: &str) -> AuthResult<ProviderSession>;

    /// accounts:update - set the display name on a fresh account
    async fn update_profile(&self, id_token: &str, display_name: &str) -> AuthResult<()>;

    /// accounts:lookup
    async fn lookup(&self, id_token: &str) -> AuthResult<ProviderProfile>;

    /// accounts:sendOobCode - password-reset email
    async fn send_reset_email(&self, email: &str) -> AuthResult<()>;
}
