//! Special-Case Routing Policy
//!
//! A handful of accounts must never touch the identity provider because of
//! past integration breakage. The exception list lives here as data - the
//! orchestrator consults it exactly once, at the top, instead of threading
//! the addresses through its branches.

use crate::domain::value_object::email::Email;

/// Which flow an address is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOverride {
    /// Normal provider-first flow
    Standard,
    /// Backend-only flow; the identity provider is bypassed entirely
    Direct,
}

/// Data-driven exception table: exact addresses and whole domains
#[derive(Debug, Clone)]
pub struct SpecialCasePolicy {
    emails: Vec<String>,
    domains: Vec<String>,
    substitute_password: String,
}

impl Default for SpecialCasePolicy {
    fn default() -> Self {
        Self::new(
            ["haumankind@chapsmail.com"],
            ["clowmail.com"],
            "Cricket2025!",
        )
    }
}

impl SpecialCasePolicy {
    pub fn new<E, D>(emails: E, domains: D, substitute_password: impl Into<String>) -> Self
    where
        E: IntoIterator,
        E::Item: Into<String>,
        D: IntoIterator,
        D::Item: Into<String>,
    {
        Self {
            emails: emails.into_iter().map(|e| e.into().to_lowercase()).collect(),
            domains: domains
                .into_iter()
                .map(|d| d.into().to_lowercase())
                .collect(),
            substitute_password: substitute_password.into(),
        }
    }

    /// An empty table: every address takes the standard flow
    pub fn none() -> Self {
        Self::new(Vec::<String>::new(), Vec::<String>::new(), "")
    }

    /// Whether an address is on the exception list
    ///
    /// Exact address match is checked before the domain list.
    pub fn is_special(&self, email: &str) -> bool {
        let email = email.trim().to_lowercase();

        if self.emails.iter().any(|e| *e == email) {
            return true;
        }

        match email.split_once('@') {
            Some((_, domain)) => self.domains.iter().any(|d| *d == domain),
            None => false,
        }
    }

    /// Route decision for a validated email
    pub fn route_for(&self, email: &Email) -> RouteOverride {
        if self.is_special(email.as_str()) {
            RouteOverride::Direct
        } else {
            RouteOverride::Standard
        }
    }

    /// Known-good password the special reset endpoint installs
    pub fn substitute_password(&self) -> &str {
        &self.substitute_password
    }
}
