//! User Status Value Object
//!
//! Approval-pipeline statuses for academy accounts. Staff accounts (coach,
//! admin) start in `Pending` until an administrator reviews them; the other
//! non-active statuses each carry their own blocking screen text.

use serde::{Deserialize, Serialize};
use std::fmt;

/// User account status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    /// Normal active account - full access
    #[default]
    Active,

    /// Awaiting administrator approval
    Pending,

    /// Registration reviewed and declined
    Rejected,

    /// Temporarily suspended by an administrator
    Suspended,

    /// Email address not yet verified
    PendingVerification,
}

impl UserStatus {
    /// Get string code for serialization/API
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Pending => "pending",
            Self::Rejected => "rejected",
            Self::Suspended => "suspended",
            Self::PendingVerification => "pending_verification",
        }
    }

    /// Whether the account may use the application
    #[inline]
    pub const fn can_access(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Create from string code
    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "active" => Some(Self::Active),
            "pending" => Some(Self::Pending),
            "rejected" => Some(Self::Rejected),
            "suspended" => Some(Self::Suspended),
            "pending_verification" => Some(Self::PendingVerification),
            _ => None,
        }
    }

    /// Title of the blocking screen shown instead of a protected page
    ///
    /// `Active` falls back to the pending text: it is only consulted for
    /// the approved-flag-off edge case, which reads as "still pending".
    #[inline]
    pub const fn block_title(&self) -> &'static str {
        match self {
            Self::Rejected => "Account Not Approved",
            Self::Suspended => "Account Suspended",
            Self::PendingVerification => "Email Verification Required",
            Self::Active | Self::Pending => "Account Pending Approval",
        }
    }

    /// Body of the blocking screen
    #[inline]
    pub const fn block_message(&self) -> &'static str {
        match self {
            Self::Rejected => {
                "Your account registration was not approved. Please contact the system administrator for more information."
            }
            Self::Suspended => {
                "Your account has been temporarily suspended. Please contact the system administrator for assistance."
            }
            Self::PendingVerification => {
                "Please verify your email address to activate your account. Check your inbox for a verification email."
            }
            Self::Active | Self::Pending => {
                "Your account is pending approval by an administrator. You'll receive an email once your account has been approved."
            }
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code() {
        assert_eq!(UserStatus::from_code("active"), Some(UserStatus::Active));
        assert_eq!(UserStatus::from_code("pending"), Some(UserStatus::Pending));
        assert_eq!(UserStatus::from_code("rejected"), Some(UserStatus::Rejected));
        assert_eq!(
            UserStatus::from_code("suspended"),
            Some(UserStatus::Suspended)
        );
        assert_eq!(
            UserStatus::from_code("pending_verification"),
            Some(UserStatus::PendingVerification)
        );
        assert_eq!(UserStatus::from_code("invalid"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(UserStatus::Active.to_string(), "active");
        assert_eq!(
            UserStatus::PendingVerification.to_string(),
            "pending_verification"
        );
    }

    #[test]
    fn test_can_access() {
        assert!(UserStatus::Active.can_access());
        assert!(!UserStatus::Pending.can_access());
        assert!(!UserStatus::Rejected.can_access());
        assert!(!UserStatus::Suspended.can_access());
        assert!(!UserStatus::PendingVerification.can_access());
    }

    #[test]
    fn test_block_texts_are_distinct() {
        let statuses = [
            UserStatus::Pending,
            UserStatus::Rejected,
            UserStatus::Suspended,
            UserStatus::PendingVerification,
        ];

        for (i, a) in statuses.iter().enumerate() {
            for b in statuses.iter().skip(i + 1) {
                assert_ne!(a.block_title(), b.block_title());
                assert_ne!(a.block_message(), b.block_message());
            }
        }
    }

    #[test]
    fn test_serde_codes() {
        assert_eq!(
            serde_json::to_string(&UserStatus::PendingVerification).unwrap(),
            "\"pending_verification\""
        );
        let status: UserStatus = serde_json::from_str("\"suspended\"").unwrap();
        assert_eq!(status, UserStatus::Suspended);
    }

    #[test]
    fn test_default() {
        assert_eq!(UserStatus::default(), UserStatus::Active);
    }
}
