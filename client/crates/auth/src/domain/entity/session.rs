//! Session Snapshot
//!
//! The reactive session state consumers read. `role` is derived from
//! `user` at construction, so the two can never disagree.

use crate::domain::entity::user::User;
use crate::domain::value_object::user_role::UserRole;

/// Point-in-time copy of the session state
///
/// Always a defensive copy: mutating a snapshot never touches the store.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub user: Option<User>,
    /// True once the first restoration attempt has completed
    pub ready: bool,
    /// Derived: `None` iff `user` is `None`
    pub role: Option<UserRole>,
}

impl SessionSnapshot {
    /// Build a snapshot, deriving `role` from `user`
    pub fn from_parts(user: Option<User>, ready: bool) -> Self {
        let role = user.as_ref().map(|u| u.role);
        Self { user, ready, role }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::user_status::UserStatus;

    #[test]
    fn test_role_derivation() {
        let snapshot = SessionSnapshot::from_parts(None, true);
        assert_eq!(snapshot.role, None);
        assert!(!snapshot.is_authenticated());

        let user = User {
            id: 1,
            username: Some("admin1".to_string()),
            email: None,
            full_name: String::new(),
            phone: None,
            role: UserRole::Admin,
            status: UserStatus::Active,
            is_active: true,
            academy_id: None,
        };
        let snapshot = SessionSnapshot::from_parts(Some(user), true);
        assert_eq!(snapshot.role, Some(UserRole::Admin));
        assert!(snapshot.is_authenticated());
    }
}
