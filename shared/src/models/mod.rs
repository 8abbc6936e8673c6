//! Data models
//!
//! Shared between the API client and the console. All IDs are `i64`
//! (server-assigned). Wire payloads serialize with the camelCase
//! convention; translation to the server's snake_case happens in the
//! client crate, not here.

pub mod product;

// Re-exports
pub use product::*;
