//! Pestle Client - HTTP client for the remote inventory API
//!
//! Typed endpoint surface over the pharmacy inventory service, plus the
//! cached product store and its write-invalidation contract. All wire
//! payloads cross the [`wire`] translation layer at the API boundary.

pub mod api;
pub mod config;
pub mod error;
pub mod filter;
pub mod http;
pub mod store;
pub mod wire;

pub use api::{HttpInventoryApi, InventoryApi};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use filter::FilterEvaluator;
pub use store::{CollectionKey, ProductStore};
