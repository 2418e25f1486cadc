//! Infrastructure Layer
//!
//! Identity source implementations: the first-party REST backend, the
//! Firebase Identity Toolkit client, and the in-memory mock source.

pub mod backend;
pub mod firebase;
pub mod memory;

pub use backend::RestBackend;
pub use firebase::FirebaseRest;
pub use memory::{MemoryBackend, MemoryProvider};
