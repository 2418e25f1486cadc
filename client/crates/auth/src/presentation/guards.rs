//! Route Guard Decisions
//!
//! The render-prop guards reduced to pure decision functions over the
//! session snapshot: the UI asks what to do with a route and gets back
//! `Loading`, a redirect, a blocking screen, or `Allow`.

use platform::query;

use crate::domain::entity::session::SessionSnapshot;
use crate::domain::value_object::user_role::UserRole;

/// What the caller should render for a guarded route
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session still restoring: show the spinner
    Loading,
    /// Not authenticated: redirect to the auth page
    RedirectToAuth,
    /// Authenticated but not allowed here: redirect to the given path
    Redirect(String),
    /// Account exists but is gated: render the blocking screen with logout
    Blocked(StatusBlock),
    /// Render the target component
    Allow,
}

/// Status-specific blocking screen content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBlock {
    pub title: &'static str,
    pub message: &'static str,
}

impl StatusBlock {
    fn for_user(user: &crate::domain::entity::user::User) -> Self {
        Self {
            title: user.status.block_title(),
            message: user.status.block_message(),
        }
    }
}

/// Protected-only guard: any authenticated, approved user may pass
pub fn protected_route(snapshot: &SessionSnapshot) -> GuardDecision {
    if !snapshot.ready {
        return GuardDecision::Loading;
    }

    let Some(user) = &snapshot.user else {
        return GuardDecision::RedirectToAuth;
    };

    if user.needs_approval() {
        return GuardDecision::Blocked(StatusBlock::for_user(user));
    }

    GuardDecision::Allow
}

/// Role-based guard with an allow-list and a redirect fallback
#[derive(Debug, Clone)]
pub struct RoleGuard {
    allowed: Vec<UserRole>,
    fallback: String,
    view_override: bool,
}

impl RoleGuard {
    pub fn new(allowed: impl Into<Vec<UserRole>>, fallback: impl Into<String>) -> Self {
        Self {
            allowed: allowed.into(),
            fallback: fallback.into(),
            view_override: false,
        }
    }

    /// Honor the `?view=<role>` QA override
    ///
    /// Wire this to `AuthConfig::allow_view_override`; it stays off unless
    /// the deployment opts in.
    pub fn with_view_override(mut self, enabled: bool) -> Self {
        self.view_override = enabled;
        self
    }

    /// Decide what to render, given the snapshot and the current URL query
    pub fn decide(&self, snapshot: &SessionSnapshot, url_query: &str) -> GuardDecision {
        if !snapshot.ready {
            return GuardDecision::Loading;
        }

        let Some(user) = &snapshot.user else {
            return GuardDecision::RedirectToAuth;
        };

        // Approval gate runs before the role check: a pending coach sees the
        // pending screen, not a redirect loop between dashboards.
        if user.needs_approval() {
            return GuardDecision::Blocked(StatusBlock::for_user(user));
        }

        if !self.allowed.contains(&user.role) && !self.view_overridden(url_query) {
            return GuardDecision::Redirect(self.fallback.clone());
        }

        // The override bypasses only the role check, never the status gate
        if !user.status.can_access() || !user.is_active {
            return GuardDecision::Blocked(StatusBlock::for_user(user));
        }

        GuardDecision::Allow
    }

    fn view_overridden(&self, url_query: &str) -> bool {
        if !self.view_override {
            return false;
        }

        query::param(url_query, "view")
            .and_then(|v| UserRole::from_code(&v))
            .is_some_and(|role| self.allowed.contains(&role))
    }
}
