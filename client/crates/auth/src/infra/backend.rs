//! First-Party Backend Implementation
//!
//! REST client for the academy backend plus the response normalizer. The
//! backend answers in two known dialects - the standardized
//! `{success, message, data}` envelope and a legacy bare (or `{user}`-
//! wrapped) object - parsed as a tagged union. A body matching neither
//! dialect is an internal error, never a guess.

use chrono::Utc;
use platform::http::{ApiClient, HttpReply};
use serde::Deserialize;
use serde_json::json;

use crate::domain::entity::user::User;
use crate::domain::provider::{BackendCredentials, FirebaseLink, IdentityBackend, Registration};
use crate::domain::value_object::{
    email::Email, invitation::InvitationToken, user_role::UserRole, user_status::UserStatus,
};
use crate::error::{AuthError, AuthResult};

/// REST implementation of the first-party backend
#[derive(Clone)]
pub struct RestBackend {
    http: ApiClient,
}

impl RestBackend {
    pub fn new(http: ApiClient) -> Self {
        Self { http }
    }
}

// ============================================================================
// Wire DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserDto {
    id: i64,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    role: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    is_active: Option<bool>,
    #[serde(default)]
    academy_id: Option<i64>,
}

impl UserDto {
    fn into_user(self) -> AuthResult<User> {
        if self.username.is_none() && self.email.is_none() {
            return Err(AuthError::Internal(
                "Backend user payload has no identifier".to_string(),
            ));
        }

        let role = UserRole::from_code(&self.role).ok_or_else(|| {
            AuthError::Internal(format!("Unknown role in backend payload: {}", self.role))
        })?;

        let status = match &self.status {
            Some(raw) => UserStatus::from_code(raw).ok_or_else(|| {
                AuthError::Internal(format!("Unknown status in backend payload: {raw}"))
            })?,
            None => UserStatus::default(),
        };

        Ok(User {
            id: self.id,
            username: self.username,
            email: self.email.map(Email::from_backend),
            full_name: self.full_name.unwrap_or_default(),
            phone: self.phone,
            role,
            status,
            is_active: self.is_active.unwrap_or(true),
            academy_id: self.academy_id,
        })
    }
}

/// Tagged union of the known backend body dialects
///
/// Tried in order: envelope, wrapped, bare legacy object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BackendBody {
    Envelope {
        success: bool,
        #[serde(default)]
        message: Option<String>,
        #[serde(default)]
        data: Option<UserDto>,
        #[serde(default)]
        code: Option<String>,
        #[serde(default)]
        status: Option<u16>,
    },
    Wrapped {
        user: UserDto,
    },
    Legacy(UserDto),
}

// ============================================================================
// Normalization
// ============================================================================

fn parse_user(reply: &HttpReply) -> AuthResult<User> {
    let body: BackendBody = serde_json::from_value(reply.body.clone()).map_err(|e| {
        AuthError::Internal(format!("Unrecognized backend response shape: {e}"))
    })?;

    match body {
        BackendBody::Envelope {
            success: true,
            data: Some(dto),
            ..
        } => dto.into_user(),
        BackendBody::Envelope {
            success: true,
            data: None,
            ..
        } => Err(AuthError::Internal(
            "Backend envelope marked success without data".to_string(),
        )),
        BackendBody::Envelope {
            success: false,
            message,
            code,
            status,
            ..
        } => {
            let message = message.unwrap_or_else(|| "Request failed".to_string());
            match code {
                // Standardized envelopes carry their own code; pass it through
                Some(code) => Err(AuthError::Provider { code, message }),
                None => Err(AuthError::Http {
                    status: status.unwrap_or(reply.status),
                    message,
                }),
            }
        }
        BackendBody::Wrapped { user } | BackendBody::Legacy(user) => user.into_user(),
    }
}

fn login_error(reply: &HttpReply) -> AuthError {
    let message = match reply.status {
        401 => "The username or password you entered is incorrect. Please try again.".to_string(),
        403 => "Your account has been locked or deactivated. Please contact support.".to_string(),
        429 => "Too many login attempts. Please try again later.".to_string(),
        _ => reply
            .message()
            .map(str::to_string)
            .unwrap_or_else(|| "Unable to log in at this time. Please try again later.".to_string()),
    };

    AuthError::Http {
        status: reply.status,
        message,
    }
}

fn register_error(reply: &HttpReply) -> AuthError {
    let backend_message = reply.message().unwrap_or("");

    let message = if reply.status == 400 && backend_message.contains("Username already exists") {
        "This username is already taken. Please choose a different username.".to_string()
    } else if reply.status == 400
        && (backend_message.contains("Email already in use")
            || backend_message.contains("Email already exists"))
    {
        "An account with this email already exists. Please use a different email or try logging in."
            .to_string()
    } else if reply.status == 429 {
        "Too many registration attempts. Please try again later.".to_string()
    } else if !backend_message.is_empty() {
        backend_message.to_string()
    } else {
        "Registration failed. Please try again.".to_string()
    };

    AuthError::Http {
        status: reply.status,
        message,
    }
}

fn generic_error(reply: &HttpReply, default: &str) -> AuthError {
    AuthError::Http {
        status: reply.status,
        message: reply
            .message()
            .map(str::to_string)
            .unwrap_or_else(|| default.to_string()),
    }
}

/// Percent-encode the characters base64 shares with URL syntax
fn encode_token(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '+' => out.push_str("%2B"),
            '/' => out.push_str("%2F"),
            '=' => out.push_str("%3D"),
            c => out.push(c),
        }
    }
    out
}

// ============================================================================
// IdentityBackend Implementation
// ============================================================================

impl IdentityBackend for RestBackend {
    async fn login(&self, credentials: &BackendCredentials) -> AuthResult<User> {
        let reply = self.http.post_json("/api/login", credentials).await?;
        if !reply.is_ok() {
            return Err(login_error(&reply));
        }
        parse_user(&reply)
    }

    async fn register(&self, registration: &Registration) -> AuthResult<User> {
        let reply = self.http.post_json("/api/register", registration).await?;
        if !reply.is_ok() {
            return Err(register_error(&reply));
        }
        parse_user(&reply)
    }

    async fn direct_register(&self, registration: &Registration) -> AuthResult<User> {
        let reply = self
            .http
            .post_json("/api/auth/direct-register", registration)
            .await?;
        if !reply.is_ok() {
            return Err(register_error(&reply));
        }
        parse_user(&reply)
    }

    async fn login_with_token(&self, id_token: &str) -> AuthResult<User> {
        let reply = self
            .http
            .post_json("/api/auth/login-firebase", &json!({ "idToken": id_token }))
            .await?;
        if !reply.is_ok() {
            return Err(generic_error(
                &reply,
                "Failed to link identity provider account with server. Please try again.",
            ));
        }
        parse_user(&reply)
    }

    async fn register_with_token(&self, link: &FirebaseLink) -> AuthResult<User> {
        let reply = self
            .http
            .post_json("/api/auth/register-firebase", link)
            .await?;
        if !reply.is_ok() {
            return Err(generic_error(
                &reply,
                "Failed to create account. Please try again.",
            ));
        }
        parse_user(&reply)
    }

    async fn reset_password(&self, email: &str) -> AuthResult<()> {
        let reply = self
            .http
            .post_json("/api/auth/reset-password", &json!({ "email": email }))
            .await?;
        if !reply.is_ok() {
            return Err(generic_error(
                &reply,
                "Failed to send password reset email. Please try again.",
            ));
        }
        Ok(())
    }

    async fn reset_special_password(&self, email: &str) -> AuthResult<()> {
        let reply = self
            .http
            .post_json("/api/auth/reset-special-password", &json!({ "email": email }))
            .await?;
        if !reply.is_ok() {
            return Err(generic_error(&reply, "Failed to reset password."));
        }
        Ok(())
    }

    async fn current_user(&self) -> AuthResult<Option<User>> {
        let reply = self.http.get("/api/user").await?;

        // Not logged in is an answer, not an error
        if reply.status == 401 {
            return Ok(None);
        }
        if !reply.is_ok() {
            return Err(generic_error(&reply, "Failed to fetch current user"));
        }

        parse_user(&reply).map(Some)
    }

    async fn verify_invitation(&self, token: &str) -> AuthResult<InvitationToken> {
        let reply = self
            .http
            .get(&format!(
                "/api/invitations/verify?token={}",
                encode_token(token)
            ))
            .await?;

        if !reply.is_ok() {
            return Err(AuthError::InvitationInvalid);
        }

        let payload = reply.body.get("data").unwrap_or(&reply.body).clone();
        let invitation: InvitationToken = serde_json::from_value(payload)
            .map_err(|_| AuthError::InvitationInvalid)?;

        if invitation.is_expired(Utc::now().timestamp_millis()) {
            return Err(AuthError::InvitationExpired);
        }

        Ok(invitation)
    }

    async fn logout(&self) -> AuthResult<()> {
        let reply = self.http.post("/api/logout").await?;
        if !reply.is_ok() {
            return Err(generic_error(&reply, "Logout failed"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn reply(status: u16, body: Value) -> HttpReply {
        HttpReply { status, body }
    }

    #[test]
    fn test_parse_envelope_success() {
        let user = parse_user(&reply(
            200,
            json!({
                "success": true,
                "message": "Successfully authenticated",
                "data": { "id": 1, "username": "coach1", "role": "coach", "status": "active" }
            }),
        ))
        .unwrap();

        assert_eq!(user.id, 1);
        assert_eq!(user.role, UserRole::Coach);
        assert_eq!(user.status, UserStatus::Active);
    }

    #[test]
    fn test_parse_envelope_failure_keeps_message() {
        let err = parse_user(&reply(
            200,
            json!({ "success": false, "message": "Account not linked", "status": 409 }),
        ))
        .unwrap_err();

        assert!(matches!(err, AuthError::Http { status: 409, .. }));
        assert_eq!(err.to_string(), "Account not linked");
    }

    #[test]
    fn test_parse_envelope_failure_passes_code_through() {
        let err = parse_user(&reply(
            200,
            json!({ "success": false, "message": "Link expired", "code": "auth/session-expired" }),
        ))
        .unwrap_err();

        assert_eq!(err.code(), "auth/session-expired");
    }

    #[test]
    fn test_parse_wrapped_and_legacy() {
        let wrapped = parse_user(&reply(
            200,
            json!({ "user": { "id": 2, "username": "p1", "role": "parent" } }),
        ))
        .unwrap();
        assert_eq!(wrapped.id, 2);

        let legacy = parse_user(&reply(
            200,
            json!({ "id": 3, "email": "p2@example.com", "role": "parent", "isActive": true }),
        ))
        .unwrap();
        assert_eq!(legacy.id, 3);
        assert_eq!(legacy.email.unwrap().as_str(), "p2@example.com");
    }

    #[test]
    fn test_parse_unknown_shape_fails_loudly() {
        let err = parse_user(&reply(200, json!({ "something": "else" }))).unwrap_err();
        assert!(matches!(err, AuthError::Internal(_)));

        let err = parse_user(&reply(200, json!(null))).unwrap_err();
        assert!(matches!(err, AuthError::Internal(_)));
    }

    #[test]
    fn test_parse_envelope_success_without_data_fails() {
        let err =
            parse_user(&reply(200, json!({ "success": true, "message": "ok" }))).unwrap_err();
        assert!(matches!(err, AuthError::Internal(_)));
    }

    #[test]
    fn test_unknown_role_rejected() {
        let err = parse_user(&reply(
            200,
            json!({ "id": 4, "username": "x", "role": "superadmin" }),
        ))
        .unwrap_err();
        assert!(matches!(err, AuthError::Internal(_)));
    }

    #[test]
    fn test_payload_without_identifier_rejected() {
        let err = parse_user(&reply(200, json!({ "id": 4, "role": "parent" }))).unwrap_err();
        assert!(matches!(err, AuthError::Internal(_)));
    }

    #[test]
    fn test_login_error_friendly_messages() {
        let err = login_error(&reply(401, Value::Null));
        assert!(err.to_string().contains("incorrect"));

        let err = login_error(&reply(403, Value::Null));
        assert!(err.to_string().contains("locked or deactivated"));

        let err = login_error(&reply(429, Value::Null));
        assert!(err.to_string().contains("Too many login attempts"));

        let err = login_error(&reply(500, json!({ "message": "boom" })));
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn test_register_error_duplicate_mapping() {
        let err = register_error(&reply(
            400,
            json!({ "message": "Username already exists" }),
        ));
        assert!(err.to_string().contains("already taken"));

        let err = register_error(&reply(400, json!({ "message": "Email already in use" })));
        assert!(err.to_string().contains("already exists"));

        let err = register_error(&reply(429, Value::Null));
        assert!(err.to_string().contains("Too many registration attempts"));
    }

    #[test]
    fn test_encode_token() {
        assert_eq!(encode_token("abc+/="), "abc%2B%2F%3D");
        assert_eq!(encode_token("plain"), "plain");
    }
}
