//! Typed inventory API surface
//!
//! [`InventoryApi`] is the seam between the store and the network; tests
//! swap in an in-memory implementation. [`HttpInventoryApi`] is the real
//! one, routing every payload through the [`crate::wire`] translator.

use async_trait::async_trait;
use serde_json::Value;
use shared::{Product, ProductCreate, ProductUpdate};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::http::HttpTransport;
use crate::wire;

/// Remote inventory API contract
#[async_trait]
pub trait InventoryApi: Send + Sync {
    async fn list_products(&self) -> ClientResult<Vec<Product>>;
    async fn get_product(&self, id: i64) -> ClientResult<Product>;
    async fn create_product(&self, payload: &ProductCreate) -> ClientResult<Product>;
    async fn update_product(&self, id: i64, payload: &ProductUpdate) -> ClientResult<Product>;
    async fn delete_product(&self, id: i64) -> ClientResult<()>;
    /// Server-side pre-filtered collection: quantity at or below threshold
    async fn low_stock_products(&self) -> ClientResult<Vec<Product>>;
    /// Server-side pre-filtered collection: expiring within the window
    async fn expiring_products(&self) -> ClientResult<Vec<Product>>;
    async fn list_categories(&self) -> ClientResult<Vec<String>>;
}

/// HTTP-backed inventory API
#[derive(Debug, Clone)]
pub struct HttpInventoryApi {
    transport: HttpTransport,
}

impl HttpInventoryApi {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        Ok(Self {
            transport: HttpTransport::new(config)?,
        })
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }
}

#[async_trait]
impl InventoryApi for HttpInventoryApi {
    async fn list_products(&self) -> ClientResult<Vec<Product>> {
        let raw = self.transport.get("products").await?;
        wire::decode_products(raw)
    }

    async fn get_product(&self, id: i64) -> ClientResult<Product> {
        let raw = self.transport.get(&format!("products/{id}")).await?;
        wire::decode_product(raw)
    }

    async fn create_product(&self, payload: &ProductCreate) -> ClientResult<Product> {
        let body = wire::encode_create(payload)?;
        let raw = self.transport.post("products", &body).await?;
        wire::decode_product(raw)
    }

    async fn update_product(&self, id: i64, payload: &ProductUpdate) -> ClientResult<Product> {
        let body = wire::encode_update(payload)?;
        let raw = self.transport.put(&format!("products/{id}"), &body).await?;
        wire::decode_product(raw)
    }

    async fn delete_product(&self, id: i64) -> ClientResult<()> {
        self.transport.delete(&format!("products/{id}")).await
    }

    async fn low_stock_products(&self) -> ClientResult<Vec<Product>> {
        let raw = self.transport.get("products/low-stock").await?;
        wire::decode_products(raw)
    }

    async fn expiring_products(&self) -> ClientResult<Vec<Product>> {
        let raw = self.transport.get("products/expiring").await?;
        wire::decode_products(raw)
    }

    async fn list_categories(&self) -> ClientResult<Vec<String>> {
        let raw = self.transport.get("categories").await?;
        match raw {
            Value::Array(items) => items
                .into_iter()
                .map(|v| match v {
                    Value::String(s) => Ok(s),
                    other => Err(ClientError::InvalidResponse(format!(
                        "category is not a string: {other}"
                    ))),
                })
                .collect(),
            _ => Err(ClientError::InvalidResponse(
                "category collection is not an array".to_string(),
            )),
        }
    }
}
