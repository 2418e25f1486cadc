//! Application Configuration
//!
//! Configuration for the auth application layer.

use std::time::Duration;

/// Storage key holding the serialized user between restarts
pub const USER_STORAGE_KEY: &str = "auth:user";

/// Storage keys whose mere presence triggers the logout sweep
pub const LOGOUT_FLAG_KEYS: [&str; 3] = ["force_logout", "logged_out", "emergency_logout"];

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// First-party backend base URL
    pub api_base_url: String,
    /// Public API key for the identity provider
    pub firebase_api_key: String,
    /// Request timeout (the aborting window on every call)
    pub request_timeout: Duration,
    /// Storage key for the persisted user
    pub user_storage_key: String,
    /// Route the guards redirect unauthenticated visitors to
    pub auth_path: String,
    /// Honor the `?view=` role override in guards (QA backdoor)
    pub allow_view_override: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".to_string(),
            firebase_api_key: String::new(),
            request_timeout: Duration::from_secs(30),
            user_storage_key: USER_STORAGE_KEY.to_string(),
            auth_path: "/auth".to_string(),
            allow_view_override: false,
        }
    }
}

impl AuthConfig {
    /// Create config for development (view override enabled)
    pub fn development() -> Self {
        Self {
            allow_view_override: true,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AuthConfig::default();
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.user_storage_key, "auth:user");
        assert_eq!(config.auth_path, "/auth");
        assert!(!config.allow_view_override);
    }

    #[test]
    fn test_development_enables_override() {
        assert!(AuthConfig::development().allow_view_override);
    }
}
