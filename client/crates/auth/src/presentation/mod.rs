//! Presentation Layer
//!
//! UI-facing surface: route-guard decisions and form DTOs. No rendering
//! happens here - callers act on the returned decisions.

pub mod dto;
pub mod guards;

pub use dto::{LoginForm, RegisterForm};
pub use guards::{GuardDecision, RoleGuard, StatusBlock, protected_route};

/// Whether the post-email-verification banner should show (`?verified=true`)
pub fn show_verified_banner(url_query: &str) -> bool {
    platform::query::param(url_query, "verified").as_deref() == Some("true")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_verified_banner() {
        assert!(show_verified_banner("?verified=true"));
        assert!(!show_verified_banner("?verified=false"));
        assert!(!show_verified_banner("?view=parent"));
        assert!(!show_verified_banner(""));
    }
}
