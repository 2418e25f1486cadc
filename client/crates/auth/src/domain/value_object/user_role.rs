use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Coach,
    #[default]
    Parent,
}

impl UserRole {
    #[inline]
    pub const fn code(&self) -> &'static str {
        use UserRole::*;
        match self {
            Admin => "admin",
            Coach => "coach",
            Parent => "parent",
        }
    }

    /// Staff roles go through the admin approval pipeline before activation
    #[inline]
    pub const fn is_staff(&self) -> bool {
        use UserRole::*;
        matches!(self, Admin | Coach)
    }

    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    /// Parse a role code coming from a backend or a URL parameter
    ///
    /// Backend payloads are untrusted, so unknown codes return `None`
    /// instead of panicking.
    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        use UserRole::*;
        match code.to_ascii_lowercase().as_str() {
            "admin" => Some(Admin),
            "coach" => Some(Coach),
            "parent" => Some(Parent),
            _ => None,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_from_code() {
        assert_eq!(UserRole::from_code("admin"), Some(UserRole::Admin));
        assert_eq!(UserRole::from_code("coach"), Some(UserRole::Coach));
        assert_eq!(UserRole::from_code("parent"), Some(UserRole::Parent));
        assert_eq!(UserRole::from_code("Parent"), Some(UserRole::Parent));
        assert_eq!(UserRole::from_code("superadmin"), None);
        assert_eq!(UserRole::from_code(""), None);
    }

    #[test]
    fn test_user_role_display() {
        assert_eq!(UserRole::Admin.to_string(), "admin");
        assert_eq!(UserRole::Coach.to_string(), "coach");
        assert_eq!(UserRole::Parent.to_string(), "parent");
    }

    #[test]
    fn test_user_role_checks() {
        assert!(UserRole::Admin.is_staff());
        assert!(UserRole::Coach.is_staff());
        assert!(!UserRole::Parent.is_staff());
        assert!(UserRole::Admin.is_admin());
        assert!(!UserRole::Coach.is_admin());
    }

    #[test]
    fn test_user_role_serde() {
        assert_eq!(serde_json::to_string(&UserRole::Coach).unwrap(), "\"coach\"");
        let role: UserRole = serde_json::from_str("\"parent\"").unwrap();
        assert_eq!(role, UserRole::Parent);
    }
}
