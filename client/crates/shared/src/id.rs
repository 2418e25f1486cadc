//! Common ID Types
//!
//! Type-safe ID wrappers for client-generated identifiers.

use std::fmt;
use std::marker::PhantomData;
use uuid::Uuid;

/// Generic typed ID wrapper
///
/// Usage:
/// ```
/// use kernel::id::{Id, markers};
/// type SubscriptionId = Id<markers::Subscription>;
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id<T> {
    value: uuid::Uuid,
    _marker: PhantomData<T>,
}

impl<T> Id<T> {
    /// Create a new random ID (UUID v4)
    pub fn new() -> Self {
        Self {
            value: Uuid::new_v4(),
            _marker: PhantomData,
        }
    }

    /// Create from an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self {
            value: uuid,
            _marker: PhantomData,
        }
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.value
    }

    /// Convert to UUID
    pub fn into_uuid(self) -> Uuid {
        self.value
    }
}

impl<T> Default for Id<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.value)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> From<Uuid> for Id<T> {
    fn from(uuid: Uuid) -> Self {
        Self::from_uuid(uuid)
    }
}

impl<T> From<Id<T>> for Uuid {
    fn from(id: Id<T>) -> Self {
        id.value
    }
}

/// Marker types for different entity IDs
pub mod markers {
    /// Marker for session-store subscription handles
    #[derive(Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Subscription;

    /// Marker for client-issued invitation nonces
    #[derive(Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Invitation;
}

/// Type aliases for common IDs
pub type SubscriptionId = Id<markers::Subscription>;
pub type InvitationId = Id<markers::Invitation>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_type_safety() {
        let subscription_id: SubscriptionId = Id::new();
        let invitation_id: InvitationId = Id::new();

        // These are different types, cannot be mixed
        let _s: Uuid = subscription_id.into_uuid();
        let _i: Uuid = invitation_id.into_uuid();
    }

    #[test]
    fn test_id_from_uuid() {
        let uuid = Uuid::new_v4();
        let id: SubscriptionId = Id::from_uuid(uuid);
        assert_eq!(id.as_uuid(), &uuid);
    }
}
