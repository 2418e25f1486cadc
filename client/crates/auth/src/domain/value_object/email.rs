//! Email Value Object
//!
//! Represents a validated email address. Basic validation only - real
//! verification happens via the email-confirmation flow.
//! The special-case policy matches on the `domain()` accessor, so the
//! address is always stored lowercased.

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Maximum email length (per RFC 5321)
const EMAIL_MAX_LENGTH: usize = 254;

/// Email address value object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    /// Create a new email with validation
    pub fn new(email: impl Into<String>) -> AppResult<Self> {
        let email = email.into().trim().to_lowercase();

        if email.is_empty() {
            return Err(AppError::validation("Email cannot be empty"));
        }

        if email.len() > EMAIL_MAX_LENGTH {
            return Err(AppError::validation(format!(
                "Email must be at most {} characters",
                EMAIL_MAX_LENGTH
            )));
        }

        if !Self::is_valid_format(&email) {
            return Err(AppError::validation("Invalid email format"));
        }

        Ok(Self(email))
    }

    /// Basic email format validation
    fn is_valid_format(email: &str) -> bool {
        let Some((local, domain)) = email.split_once('@') else {
            return false;
        };

        if local.is_empty() || local.len() > 64 || local.contains('@') {
            return false;
        }
        if domain.is_empty() || domain.contains('@') || !domain.contains('.') {
            return false;
        }

        if !domain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        {
            return false;
        }

        !(domain.starts_with('.')
            || domain.ends_with('.')
            || domain.starts_with('-')
            || domain.ends_with('-'))
    }

    /// Create from a backend payload (assumed already validated)
    pub fn from_backend(email: impl Into<String>) -> Self {
        Self(email.into().trim().to_lowercase())
    }

    /// Get the email as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get the domain part of the email
    pub fn domain(&self) -> &str {
        self.0.split('@').nth(1).unwrap_or("")
    }

    /// Get the local part of the email
    pub fn local_part(&self) -> &str {
        self.0.split('@').next().unwrap_or("")
    }

    /// Whether the email belongs to the given domain (case-insensitive)
    pub fn matches_domain(&self, domain: &str) -> bool {
        self.domain() == domain.to_lowercase()
    }
}

impl FromStr for Email {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        Email::new(s)
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_valid() {
        assert!(Email::new("parent@example.com").is_ok());
        assert!(Email::new("Parent@Example.COM").is_ok()); // Should lowercase
        assert!(Email::new("coach.name@academy.co.in").is_ok());
        assert!(Email::new("parent+tag@example.com").is_ok());
    }

    #[test]
    fn test_email_invalid() {
        assert!(Email::new("").is_err());
        assert!(Email::new("parentexample.com").is_err());
        assert!(Email::new("parent@").is_err());
        assert!(Email::new("@example.com").is_err());
        assert!(Email::new("parent@@example.com").is_err());
        assert!(Email::new("parent@example").is_err());
        assert!(Email::new("parent@.example.com").is_err());
    }

    #[test]
    fn test_email_parts() {
        let email = Email::new("haumankind@chapsmail.com").unwrap();
        assert_eq!(email.domain(), "chapsmail.com");
        assert_eq!(email.local_part(), "haumankind");
        assert!(email.matches_domain("chapsmail.com"));
        assert!(email.matches_domain("Chapsmail.com"));
        assert!(!email.matches_domain("clowmail.com"));
    }

    #[test]
    fn test_email_case_normalization() {
        let email = Email::new("Parent@Example.COM").unwrap();
        assert_eq!(email.as_str(), "parent@example.com");
    }
}
