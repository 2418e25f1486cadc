//! Sign Out Sweep
//!
//! Logout is deliberately aggressive: stale auth state has repeatedly
//! outlived a single cleanup layer, so the sweep clears every layer it can
//! reach - session store, both storages, the cookie jar (three domain
//! variants per name), the query cache - and then tells the server, whose
//! answer is ignored.

use std::sync::Arc;

use chrono::Utc;
use derive_more::Display;
use platform::cache::QueryCache;
use platform::cookie::CookieJar;
use platform::storage::KeyStore;

use crate::application::config::{AuthConfig, LOGOUT_FLAG_KEYS};
use crate::application::session_store::SessionStore;
use crate::domain::provider::IdentityBackend;

/// What set off the sweep
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum LogoutTrigger {
    /// A logout flag key found in persistent storage
    #[display("storage:{_0}")]
    StorageFlag(String),
    /// A `?logout=` URL parameter
    #[display("query")]
    QueryParam,
    /// An explicit logout action
    #[display("manual")]
    Manual,
}

/// Outcome of the sweep, for the caller's UI to act on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepReport {
    pub cookies_expired: usize,
    /// Suppressed when the trigger was the URL parameter
    pub show_toast: bool,
    /// Cache-busting redirect target, unless already on the auth path
    pub redirect: Option<String>,
}

/// Detect a pending logout signal (checked once, at provider mount)
pub fn detect_trigger(local: &dyn KeyStore, query: &str) -> Option<LogoutTrigger> {
    for flag in LOGOUT_FLAG_KEYS {
        if local.contains(flag) {
            return Some(LogoutTrigger::StorageFlag(flag.to_string()));
        }
    }

    if platform::query::has_param(query, "logout") {
        return Some(LogoutTrigger::QueryParam);
    }

    None
}

/// Sign out use case
pub struct SignOutUseCase<B>
where
    B: IdentityBackend,
{
    backend: Arc<B>,
    session: Arc<SessionStore>,
    local: Arc<dyn KeyStore>,
    ephemeral: Arc<dyn KeyStore>,
    cookies: Arc<CookieJar>,
    cache: Arc<QueryCache>,
    config: Arc<AuthConfig>,
}

impl<B> SignOutUseCase<B>
where
    B: IdentityBackend,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        backend: Arc<B>,
        session: Arc<SessionStore>,
        local: Arc<dyn KeyStore>,
        ephemeral: Arc<dyn KeyStore>,
        cookies: Arc<CookieJar>,
        cache: Arc<QueryCache>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            backend,
            session,
            local,
            ephemeral,
            cookies,
            cache,
            config,
        }
    }

    /// Run the full sweep
    ///
    /// `current_path` and `host` describe where the client currently is,
    /// for the redirect decision and the cookie expiry variants.
    pub async fn sweep(
        &self,
        trigger: &LogoutTrigger,
        current_path: &str,
        host: &str,
    ) -> SweepReport {
        tracing::info!(trigger = %trigger, "Running logout sweep");

        self.session.sign_out();

        self.local.clear();
        self.ephemeral.clear();

        let cookies_expired = self.cookies.expire_all_for_host(host, "/");

        self.cache.clear();

        // Best-effort server notification; the answer does not matter
        if let Err(e) = self.backend.logout().await {
            tracing::debug!(error = %e, "Backend logout failed");
        }

        let show_toast = !matches!(trigger, LogoutTrigger::QueryParam);

        let redirect = if current_path == self.config.auth_path {
            None
        } else {
            Some(format!(
                "{}?t={}",
                self.config.auth_path,
                Utc::now().timestamp_millis()
            ))
        };

        tracing::info!(cookies_expired, show_toast, "Logout sweep complete");

        SweepReport {
            cookies_expired,
            show_toast,
            redirect,
        }
    }
}
