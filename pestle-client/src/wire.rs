//! Wire format translation
//!
//! The inventory API speaks snake_case and may transmit numeric fields
//! as strings; domain types serialize with the camelCase convention.
//! Every payload crosses this module at the API boundary: ingress
//! records are key-translated, coerced, then strictly decoded (malformed
//! records are rejected, never defaulted); egress payloads are
//! key-translated back. Only top-level keys are touched; values pass
//! through unchanged apart from the declared coercions.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Map, Value};
use shared::{Product, ProductCreate, ProductUpdate};

use crate::error::{ClientError, ClientResult};

/// Known product fields: (client key, server key). Unknown keys pass
/// through untranslated.
const FIELD_TABLE: &[(&str, &str)] = &[
    ("id", "id"),
    ("name", "name"),
    ("description", "description"),
    ("price", "price"),
    ("stockQuantity", "stock_quantity"),
    ("category", "category"),
    ("supplier", "supplier"),
    ("expiryDate", "expiry_date"),
    ("minimumStockThreshold", "minimum_stock_threshold"),
    ("createdAt", "created_at"),
    ("updatedAt", "updated_at"),
];

fn to_client_key(server: &str) -> &str {
    FIELD_TABLE
        .iter()
        .find(|(_, s)| *s == server)
        .map(|(c, _)| *c)
        .unwrap_or(server)
}

fn to_server_key(client: &str) -> &str {
    FIELD_TABLE
        .iter()
        .find(|(c, _)| *c == client)
        .map(|(_, s)| *s)
        .unwrap_or(client)
}

fn translate_keys(value: Value, rename: fn(&str) -> &str) -> Value {
    match value {
        Value::Object(map) => {
            let translated: Map<String, Value> = map
                .into_iter()
                .map(|(k, v)| (rename(&k).to_string(), v))
                .collect();
            Value::Object(translated)
        }
        other => other,
    }
}

/// Translate a flat server payload's keys to the client convention.
pub fn to_client_keys(value: Value) -> Value {
    translate_keys(value, to_client_key)
}

/// Translate a flat client payload's keys to the server convention.
pub fn to_server_keys(value: Value) -> Value {
    translate_keys(value, to_server_key)
}

/// The server sometimes transmits `price` as a string; parse it to a
/// number. A malformed price is an invalid response, not a default.
fn coerce_price(map: &mut Map<String, Value>) -> ClientResult<()> {
    if let Some(Value::String(raw)) = map.get("price") {
        let parsed = Decimal::from_str(raw).map_err(|_| {
            ClientError::InvalidResponse(format!("unparseable price {raw:?}"))
        })?;
        let numeric = serde_json::to_value(parsed)?;
        map.insert("price".to_string(), numeric);
    }
    Ok(())
}

/// Decode one product record from the server representation.
pub fn decode_product(raw: Value) -> ClientResult<Product> {
    let mut value = to_client_keys(raw);
    let map = value.as_object_mut().ok_or_else(|| {
        ClientError::InvalidResponse("product record is not an object".to_string())
    })?;
    coerce_price(map)?;
    serde_json::from_value(value)
        .map_err(|e| ClientError::InvalidResponse(format!("malformed product record: {e}")))
}

/// Decode a product collection, preserving the server's ordering.
pub fn decode_products(raw: Value) -> ClientResult<Vec<Product>> {
    let items = match raw {
        Value::Array(items) => items,
        _ => {
            return Err(ClientError::InvalidResponse(
                "product collection is not an array".to_string(),
            ));
        }
    };
    items.into_iter().map(decode_product).collect()
}

/// Encode a create payload for the server. `id` and timestamps are never
/// part of the body.
pub fn encode_create(payload: &ProductCreate) -> ClientResult<Value> {
    Ok(to_server_keys(serde_json::to_value(payload)?))
}

/// Encode a partial update payload; absent fields are omitted entirely.
pub fn encode_update(payload: &ProductUpdate) -> ClientResult<Value> {
    Ok(to_server_keys(serde_json::to_value(payload)?))
}
