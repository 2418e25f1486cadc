//! Firebase Identity Toolkit Implementation
//!
//! REST client for the identity provider, keyed by the public API key. The
//! original SDK-vs-raw-REST split collapses here: both paths hit the same
//! Identity Toolkit endpoints, so one implementation serves the trait.
//! Provider error codes go through a fixed lookup table that yields the
//! SDK-style `auth/*` code and the user-readable message.

use std::time::Duration;

use kernel::error::app_error::AppResult;
use platform::http::ApiClient;
use serde_json::{Value, json};

use crate::domain::provider::{IdentityProvider, ProviderProfile, ProviderSession};
use crate::error::{AuthError, AuthResult};

/// Identity Toolkit accounts endpoint
pub const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1/accounts";

/// REST implementation of the identity provider
#[derive(Clone)]
pub struct FirebaseRest {
    http: ApiClient,
    api_key: String,
}

impl FirebaseRest {
    /// Create a client against the public Identity Toolkit endpoint
    ///
    /// No cookie jar here: provider calls are keyed, not cookied.
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        Ok(Self {
            http: ApiClient::new(IDENTITY_TOOLKIT_URL, timeout)?,
            api_key: api_key.into(),
        })
    }

    async fn call(&self, operation: &str, body: Value) -> AuthResult<Value> {
        let path = format!(":{}?key={}", operation, self.api_key);
        let reply = self.http.post_json(&path, &body).await?;

        if reply.is_ok() {
            return Ok(reply.body);
        }

        // Toolkit errors arrive as {"error": {"message": "CODE : detail"}}
        let rest_code = reply
            .body
            .pointer("/error/message")
            .and_then(Value::as_str)
            .and_then(|m| m.split_whitespace().next())
            .unwrap_or("UNKNOWN_ERROR");

        tracing::debug!(operation, code = rest_code, "Identity provider call failed");
        Err(provider_error(rest_code))
    }
}

/// Fixed lookup table: Identity Toolkit code -> (SDK-style code, message)
pub fn provider_error(rest_code: &str) -> AuthError {
    let (code, message) = match rest_code {
        "EMAIL_EXISTS" => (
            "auth/email-already-in-use",
            "This email is already registered. Please log in or use a different email.",
        ),
        "EMAIL_NOT_FOUND" => (
            "auth/user-not-found",
            "No account found with this email. Please check your email or register.",
        ),
        "INVALID_PASSWORD" => (
            "auth/wrong-password",
            "Incorrect password. Please try again or reset your password.",
        ),
        "INVALID_LOGIN_CREDENTIALS" => (
            "auth/invalid-credential",
            "Authentication failed. Please check your information and try again.",
        ),
        "USER_DISABLED" => (
            "auth/user-disabled",
            "This account has been disabled. Please contact support.",
        ),
        "INVALID_EMAIL" => ("auth/invalid-email", "Please enter a valid email address."),
        "WEAK_PASSWORD" => (
            "auth/weak-password",
            "Password is too weak. Please use a stronger password.",
        ),
        "OPERATION_NOT_ALLOWED" => (
            "auth/operation-not-allowed",
            "This operation is not allowed. Please contact support.",
        ),
        "TOO_MANY_ATTEMPTS_TRY_LATER" => (
            "auth/too-many-requests",
            "Too many failed attempts. Please try again later or reset your password.",
        ),
        "INVALID_ID_TOKEN" => (
            "auth/invalid-user-token",
            "This action requires you to re-login. Please log out and log back in.",
        ),
        "EXPIRED_OOB_CODE" | "INVALID_OOB_CODE" => (
            "auth/invalid-action-code",
            "The verification link is invalid or expired. Please request a new one.",
        ),
        _ => ("auth/unknown", "An error occurred. Please try again."),
    };

    AuthError::Provider {
        code: code.to_string(),
        message: message.to_string(),
    }
}

fn session_from(value: &Value) -> AuthResult<ProviderSession> {
    let field = |name: &str| {
        value
            .get(name)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                AuthError::Internal(format!("Identity provider response missing `{name}`"))
            })
    };

    Ok(ProviderSession {
        uid: field("localId")?,
        email: field("email")?,
        id_token: field("idToken")?,
        refresh_token: field("refreshToken")?,
        display_name: value
            .get("displayName")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

impl IdentityProvider for FirebaseRest {
    async fn sign_in(&self, email: &str, password: &str) -> AuthResult<ProviderSession> {
        let body = self
            .call(
                "signInWithPassword",
                json!({ "email": email, "password": password, "returnSecureToken": true }),
            )
            .await?;
        session_from(&body)
    }

    async fn sign_up(&self, email: &str, password: &str) -> AuthResult<ProviderSession> {
        let body = self
            .call(
                "signUp",
                json!({ "email": email, "password": password, "returnSecureToken": true }),
            )
            .await?;
        session_from(&body)
    }

    async fn update_profile(&self, id_token: &str, display_name: &str) -> AuthResult<()> {
        self.call(
            "update",
            json!({
                "idToken": id_token,
                "displayName": display_name,
                "returnSecureToken": false
            }),
        )
        .await?;
        Ok(())
    }

    async fn lookup(&self, id_token: &str) -> AuthResult<ProviderProfile> {
        let body = self.call("lookup", json!({ "idToken": id_token })).await?;

        let account = body
            .pointer("/users/0")
            .ok_or_else(|| AuthError::Internal("Identity provider lookup returned no users".to_string()))?;

        Ok(ProviderProfile {
            uid: account
                .get("localId")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            email: account
                .get("email")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            email_verified: account
                .get("emailVerified")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            display_name: account
                .get("displayName")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }

    async fn send_reset_email(&self, email: &str) -> AuthResult<()> {
        self.call(
            "sendOobCode",
            json!({ "requestType": "PASSWORD_RESET", "email": email }),
        )
        .await?;
        Ok(())
    }
}
