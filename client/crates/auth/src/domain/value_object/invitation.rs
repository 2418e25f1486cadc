//! Invitation Token Value Object
//!
//! Client-encoded invitations are a base64-wrapped JSON structure carried in
//! a URL parameter. They are only valid while `expires` is in the future -
//! decoding enforces this so an expired token can never prefill a form.
//! Server-issued opaque tokens are verified through a backend endpoint
//! instead and never decoded locally.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{Duration, Utc};
use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::domain::value_object::user_role::UserRole;

/// Decoded invitation payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationToken {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub academy_id: Option<i64>,
    /// Expiry as Unix milliseconds
    pub expires: i64,
}

impl InvitationToken {
    /// Create a token expiring `valid_for` from now
    pub fn new(email: impl Into<String>, valid_for: Duration) -> Self {
        Self {
            email: email.into(),
            player_id: None,
            role: None,
            academy_id: None,
            expires: (Utc::now() + valid_for).timestamp_millis(),
        }
    }

    pub fn with_player(mut self, player_id: i64) -> Self {
        self.player_id = Some(player_id);
        self
    }

    pub fn with_role(mut self, role: UserRole) -> Self {
        self.role = Some(role);
        self
    }

    pub fn with_academy(mut self, academy_id: i64) -> Self {
        self.academy_id = Some(academy_id);
        self
    }

    /// Encode to the base64 URL-parameter form
    pub fn encode(&self) -> AppResult<String> {
        let json = serde_json::to_vec(self).map_err(AppError::from)?;
        Ok(STANDARD.encode(json))
    }

    /// Decode a URL-parameter token, rejecting expired ones
    ///
    /// `now_ms` is passed in rather than read from the clock so expiry
    /// decisions are reproducible.
    pub fn decode(raw: &str, now_ms: i64) -> AppResult<Self> {
        let bytes = STANDARD
            .decode(raw.trim())
            .map_err(|e| AppError::validation("Invalid invitation token").with_source(e))?;

        let token: Self = serde_json::from_slice(&bytes)
            .map_err(|e| AppError::validation("Invalid invitation token").with_source(e))?;

        if token.is_expired(now_ms) {
            return Err(AppError::gone("This invitation has expired")
                .with_action("Please ask for a new invitation"));
        }

        Ok(token)
    }

    /// Whether the token is past its expiry at `now_ms`
    pub fn is_expired(&self, now_ms: i64) -> bool {
        self.expires <= now_ms
    }
}
