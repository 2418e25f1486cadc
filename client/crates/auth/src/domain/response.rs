//! Unified Auth Operation Contract
//!
//! Every authentication operation - whichever backend ends up serving it -
//! resolves to this one shape before reaching calling code. `success: true`
//! always comes with `data` (the `ok` constructor is the only way to build
//! it), and `success: false` always carries a human-readable message from
//! the error taxonomy.

use serde::Serialize;

use crate::error::AuthError;

/// The single response shape for auth operations
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Debug rendering of the underlying failure; never shown to users
    #[serde(skip)]
    pub error: Option<String>,
}

impl<T> AuthResponse<T> {
    /// Successful outcome; `data` is always present
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            code: None,
            status: None,
            error: None,
        }
    }

    /// Failed outcome built from a normalized error
    pub fn failure(error: AuthError) -> Self {
        Self {
            success: false,
            message: error.to_string(),
            data: None,
            code: Some(error.code()),
            status: error.status(),
            error: Some(format!("{error:?}")),
        }
    }

    /// Build from a use-case result with a success message
    pub fn from_result(result: Result<T, AuthError>, success_message: impl Into<String>) -> Self {
        match result {
            Ok(data) => Self::ok(data, success_message),
            Err(error) => Self::failure(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Map the payload type, keeping everything else
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> AuthResponse<U> {
        AuthResponse {
            success: self.success,
            message: self.message,
            data: self.data.map(f),
            code: self.code,
            status: self.status,
            error: self.error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_always_has_data() {
        let response = AuthResponse::ok(42, "Done");
        assert!(response.is_success());
        assert_eq!(response.data, Some(42));
        assert!(response.code.is_none());
    }

    #[test]
    fn test_failure_carries_taxonomy() {
        let response: AuthResponse<()> = AuthResponse::failure(AuthError::Http {
            status: 401,
            message: "The username or password you entered is incorrect. Please try again."
                .to_string(),
        });
        assert!(!response.is_success());
        assert!(response.data.is_none());
        assert_eq!(response.code.as_deref(), Some("http/401"));
        assert_eq!(response.status, Some(401));
        assert!(response.message.contains("incorrect"));
    }

    #[test]
    fn test_failure_message_is_human_readable() {
        let response: AuthResponse<()> = AuthResponse::failure(AuthError::Timeout);
        assert!(!response.message.is_empty());
        assert_eq!(response.code.as_deref(), Some("network/timeout"));
    }

    #[test]
    fn test_map() {
        let response = AuthResponse::ok(2, "ok").map(|n| n * 10);
        assert_eq!(response.data, Some(20));
    }

    #[test]
    fn test_serialization_shape() {
        let response = AuthResponse::ok(serde_json::json!({"id": 1}), "ok");
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["success"], true);
        assert!(value.get("code").is_none());
        assert!(value.get("error").is_none());
    }
}
