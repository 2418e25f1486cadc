//! Form DTOs
//!
//! serde-facing shapes for the auth forms, converted into use-case inputs.
//! Invitation prefill happens here: the token is decoded and expiry-checked
//! before a single field is written, so an expired invitation can never
//! leave residue in a form.

use kernel::error::app_error::AppResult;
use serde::{Deserialize, Serialize};

use crate::application::sign_in::LoginData;
use crate::application::sign_up::RegisterData;
use crate::domain::value_object::invitation::InvitationToken;
use crate::domain::value_object::user_role::UserRole;

// ============================================================================
// Login
// ============================================================================

/// Login form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginForm {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub password: String,
}

impl LoginForm {
    pub fn into_login_data(self) -> LoginData {
        LoginData {
            username: self.username,
            email: self.email,
            password: self.password,
        }
    }
}

/// Pull an invitation token out of a URL query (`?token=` or `?invite=`)
pub fn invitation_param(url_query: &str) -> Option<String> {
    platform::query::param(url_query, "token")
        .or_else(|| platform::query::param(url_query, "invite"))
        .filter(|t| !t.is_empty())
}

// ============================================================================
// Registration
// ============================================================================

/// Registration form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub email: String,
    pub full_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub academy_id: Option<i64>,
}

impl RegisterForm {
    /// Prefill from a client-encoded invitation token
    ///
    /// Decoding rejects expired or malformed tokens before any field is
    /// touched; the form is untouched on error.
    pub fn apply_invitation(&mut self, raw_token: &str, now_ms: i64) -> AppResult<()> {
        let token = InvitationToken::decode(raw_token, now_ms)?;

        self.email = token.email;
        if let Some(role) = token.role {
            self.role = role;
        }
        if let Some(academy_id) = token.academy_id {
            self.academy_id = Some(academy_id);
        }

        Ok(())
    }

    pub fn into_register_data(self) -> RegisterData {
        RegisterData {
            username: self.username,
            password: self.password,
            email: self.email,
            full_name: self.full_name,
            phone: self.phone,
            role: self.role,
            academy_id: self.academy_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use kernel::error::kind::ErrorKind;

    #[test]
    fn test_login_form_deserializes_camel_case() {
        let form: LoginForm =
            serde_json::from_str(r#"{"email": "p1@example.com", "password": "pw"}"#).unwrap();
        assert_eq!(form.email.as_deref(), Some("p1@example.com"));
        assert!(form.username.is_none());
    }

    #[test]
    fn test_register_form_deserializes_camel_case() {
        let form: RegisterForm = serde_json::from_str(
            r#"{
                "username": "coach1",
                "password": "pw",
                "email": "c1@academy.example",
                "fullName": "Coach One",
                "role": "coach",
                "academyId": 4
            }"#,
        )
        .unwrap();
        assert_eq!(form.full_name, "Coach One");
        assert_eq!(form.role, UserRole::Coach);
        assert_eq!(form.academy_id, Some(4));
    }

    #[test]
    fn test_invitation_param_accepts_both_names() {
        assert_eq!(invitation_param("?token=abc").as_deref(), Some("abc"));
        assert_eq!(invitation_param("?invite=xyz").as_deref(), Some("xyz"));
        assert_eq!(invitation_param("?token="), None);
        assert_eq!(invitation_param("?view=parent"), None);
    }

    #[test]
    fn test_apply_invitation_prefills() {
        let token = InvitationToken::new("invited@example.com", Duration::days(7))
            .with_role(UserRole::Parent)
            .with_academy(2);
        let encoded = token.encode().unwrap();

        let mut form = RegisterForm::default();
        form.apply_invitation(&encoded, Utc::now().timestamp_millis())
            .unwrap();

        assert_eq!(form.email, "invited@example.com");
        assert_eq!(form.role, UserRole::Parent);
        assert_eq!(form.academy_id, Some(2));
    }

    #[test]
    fn test_expired_invitation_leaves_form_untouched() {
        let token = InvitationToken {
            email: "invited@example.com".to_string(),
            player_id: None,
            role: Some(UserRole::Parent),
            academy_id: Some(2),
            expires: 1_000,
        };
        let encoded = token.encode().unwrap();

        let mut form = RegisterForm {
            email: "typed@example.com".to_string(),
            ..Default::default()
        };

        let err = form.apply_invitation(&encoded, 2_000).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Gone);
        assert_eq!(form.email, "typed@example.com");
        assert_eq!(form.academy_id, None);
    }
}
