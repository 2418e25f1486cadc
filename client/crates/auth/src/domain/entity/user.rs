//! User Entity
//!
//! The identity record the backends hand back on successful login or
//! registration. Replaced wholesale on every auth state change; persisted
//! verbatim to client storage for restart survival.

use serde::{Deserialize, Serialize};

use crate::domain::value_object::{
    email::Email, user_role::UserRole, user_status::UserStatus,
};

/// User entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Backend-issued identifier
    pub id: i64,
    /// Login name (at least one of username/email is present)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
    #[serde(default)]
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Role (admin, coach, parent)
    pub role: UserRole,
    /// Approval-pipeline status
    #[serde(default)]
    pub status: UserStatus,
    /// Administrative active flag; gates staff access alongside `status`
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub academy_id: Option<i64>,
}

fn default_true() -> bool {
    true
}

impl User {
    /// Display identifier: username, falling back to email
    pub fn identifier(&self) -> &str {
        if let Some(username) = &self.username {
            return username;
        }
        self.email.as_ref().map(Email::as_str).unwrap_or("")
    }

    /// Whether this is an approval-gated staff account
    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }

    /// Whether the account is cleared for access
    pub fn is_approved(&self) -> bool {
        self.status.can_access() && self.is_active
    }

    /// Staff account still waiting on (or denied) administrator review
    pub fn needs_approval(&self) -> bool {
        self.is_staff() && !self.is_approved()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coach(status: UserStatus, is_active: bool) -> User {
        User {
            id: 1,
            username: Some("coach1".to_string()),
            email: Some(Email::new("coach1@academy.example").unwrap()),
            full_name: "Coach One".to_string(),
            phone: None,
            role: UserRole::Coach,
            status,
            is_active,
            academy_id: Some(1),
        }
    }

    #[test]
    fn test_identifier_fallback() {
        let mut user = coach(UserStatus::Active, true);
        assert_eq!(user.identifier(), "coach1");

        user.username = None;
        assert_eq!(user.identifier(), "coach1@academy.example");
    }

    #[test]
    fn test_approval_gating() {
        assert!(coach(UserStatus::Active, true).is_approved());
        assert!(!coach(UserStatus::Pending, true).is_approved());
        assert!(!coach(UserStatus::Active, false).is_approved());

        assert!(coach(UserStatus::Pending, true).needs_approval());
        assert!(coach(UserStatus::Active, false).needs_approval());
        assert!(!coach(UserStatus::Active, true).needs_approval());
    }

    #[test]
    fn test_parent_never_needs_approval() {
        let parent = User {
            role: UserRole::Parent,
            status: UserStatus::Pending,
            ..coach(UserStatus::Pending, true)
        };
        assert!(!parent.needs_approval());
    }

    #[test]
    fn test_serde_defaults() {
        // Legacy payloads omit status/isActive
        let user: User = serde_json::from_str(
            r#"{"id": 9, "username": "p1", "role": "parent", "fullName": "P One"}"#,
        )
        .unwrap();
        assert_eq!(user.status, UserStatus::Active);
        assert!(user.is_active);
        assert_eq!(user.full_name, "P One");
    }
}
