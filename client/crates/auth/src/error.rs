//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system. Every variant maps
//! to one of the client error-code families (`validation/*`, `auth/*`,
//! `http/*`, `special/*`, `network/*`).

use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Username missing from a registration
    #[error("Username is required")]
    MissingUsername,

    /// Email missing where required
    #[error("Email is required")]
    MissingEmail,

    /// Password missing
    #[error("Password is required")]
    MissingPassword,

    /// Full name missing from a registration
    #[error("Full name is required")]
    MissingFullName,

    /// Neither username nor email supplied to login
    #[error("A username or email is required")]
    MissingIdentifier,

    /// Email failed validation before any network call
    #[error("Please enter a valid email address")]
    InvalidEmail,

    /// Identity-provider failure, code already in SDK form (`auth/...`)
    #[error("{message}")]
    Provider { code: String, message: String },

    /// Backend HTTP failure with a user-readable message
    #[error("{message}")]
    Http { status: u16, message: String },

    /// Special-case flow failure (`special/...`)
    #[error("{message}")]
    Special { code: String, message: String },

    /// Transport failure
    #[error("Network error. Please check your internet connection and try again.")]
    Network,

    /// Aborting timeout fired
    #[error("Connection timed out. Please try again.")]
    Timeout,

    /// Invitation token could not be decoded or verified
    #[error("The invitation link is invalid")]
    InvitationInvalid,

    /// Invitation token past its expiry
    #[error("This invitation has expired")]
    InvitationExpired,

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the client error code for this error (e.g. `validation/missing-email`)
    pub fn code(&self) -> String {
        match self {
            AuthError::MissingUsername => "validation/missing-username".to_string(),
            AuthError::MissingEmail => "validation/missing-email".to_string(),
            AuthError::MissingPassword => "validation/missing-password".to_string(),
            AuthError::MissingFullName => "validation/missing-full-name".to_string(),
            AuthError::MissingIdentifier => "validation/missing-identifier".to_string(),
            AuthError::InvalidEmail => "validation/invalid-email".to_string(),
            AuthError::Provider { code, .. } => code.clone(),
            AuthError::Http { status, .. } => format!("http/{status}"),
            AuthError::Special { code, .. } => code.clone(),
            AuthError::Network => "network/error".to_string(),
            AuthError::Timeout => "network/timeout".to_string(),
            AuthError::InvitationInvalid => "validation/invitation-invalid".to_string(),
            AuthError::InvitationExpired => "validation/invitation-expired".to_string(),
            AuthError::Internal(_) => "internal/error".to_string(),
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::MissingUsername
            | AuthError::MissingEmail
            | AuthError::MissingPassword
            | AuthError::MissingFullName
            | AuthError::MissingIdentifier
            | AuthError::InvalidEmail
            | AuthError::InvitationInvalid => ErrorKind::Validation,
            AuthError::Provider { .. } => ErrorKind::Provider,
            AuthError::Http { status, .. } => ErrorKind::from_status(*status),
            AuthError::Special { .. } => ErrorKind::SpecialCase,
            AuthError::Network => ErrorKind::NetworkError,
            AuthError::Timeout => ErrorKind::Timeout,
            AuthError::InvitationExpired => ErrorKind::Gone,
            AuthError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// HTTP status carried by backend failures
    pub fn status(&self) -> Option<u16> {
        match self {
            AuthError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether orchestrator fallback applies to this error
    pub fn is_recoverable(&self) -> bool {
        self.kind().is_recoverable()
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::Http { status: 401, .. } => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::Network | AuthError::Timeout => {
                tracing::warn!(error = %self, "Auth transport error");
            }
            AuthError::Special { code, .. } => {
                tracing::warn!(code = %code, "Special-case flow error");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::Timeout => AuthError::Timeout,
            ErrorKind::NetworkError => AuthError::Network,
            _ => AuthError::Internal(err.to_string()),
        }
    }
}
