//! Auth (Authentication) Client Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, policy table, identity traits
//! - `application/` - Use cases and the reactive session store
//! - `infra/` - REST backend, Identity Toolkit client, in-memory source
//! - `presentation/` - Route-guard decisions and form DTOs
//!
//! ## Features
//! - Unified login/registration across three identity sources (first-party
//!   backend, Firebase Identity Toolkit, in-memory mock)
//! - Response normalization into a single `AuthResponse<T>` contract
//! - Data-driven special-case routing for known-problematic addresses
//! - Reactive session store with persistent restore and memoized init
//! - Role/status route-guard decisions
//! - Multi-layer logout sweep
//!
//! ## Reconciliation Model
//! - Fallback chains are sequential; only the final attempt's outcome
//!   surfaces to callers
//! - Every backend's response shape is normalized before leaving `infra/`
//! - Session state is owned by the store; consumers read copies and write
//!   through `set_user`/`set_ready` only

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
pub mod test_support;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::session_store::SessionStore;
pub use error::{AuthError, AuthResult};
pub use infra::backend::RestBackend;
pub use infra::firebase::FirebaseRest;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::session::SessionSnapshot;
    pub use crate::domain::entity::user::User;
    pub use crate::domain::response::AuthResponse;
    pub use crate::domain::value_object::email::Email;
    pub use crate::domain::value_object::invitation::InvitationToken;
    pub use crate::domain::value_object::user_role::UserRole;
    pub use crate::domain::value_object::user_status::UserStatus;
    pub use crate::presentation::dto::*;
}

pub mod use_cases {
    pub use crate::application::reset_password::ResetPasswordUseCase;
    pub use crate::application::sign_in::{LoginData, SignInUseCase};
    pub use crate::application::sign_out::{
        LogoutTrigger, SignOutUseCase, SweepReport, detect_trigger,
    };
    pub use crate::application::sign_up::{RegisterData, SignUpUseCase};
}

pub mod guards {
    pub use crate::presentation::guards::*;
}

pub mod store {
    pub use crate::application::session_store::SessionStore;
}
