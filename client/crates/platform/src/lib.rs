//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations for the client:
//! - Standardized JSON HTTP transport with an aborting timeout
//! - Persistent and ephemeral key-value stores (web-storage analogs)
//! - Client-side cookie jar with multi-domain expiry
//! - Query cache for the data-fetching layer
//! - URL query-string helpers

pub mod cache;
pub mod cookie;
pub mod http;
pub mod query;
pub mod storage;
