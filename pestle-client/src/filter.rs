//! Filter evaluation over the remote product source
//!
//! Routes the fetch to the right server endpoint (the shortcut flags
//! delegate to dedicated pre-filtered endpoints), then applies the
//! remaining predicates client-side via [`FilterSpec::matches`]. A fetch
//! failure propagates as an error — never an empty collection.

use chrono::NaiveDate;

use shared::{FilterSpec, Product};

use crate::error::ClientResult;
use crate::store::{CollectionKey, ProductStore};

/// Evaluates a [`FilterSpec`] against the cached product store.
pub struct FilterEvaluator<'a> {
    store: &'a ProductStore,
}

impl<'a> FilterEvaluator<'a> {
    pub fn new(store: &'a ProductStore) -> Self {
        Self { store }
    }

    /// The server-side fetch route for a spec. The low-stock shortcut
    /// wins over the expiring shortcut when both are set.
    pub fn route(spec: &FilterSpec) -> CollectionKey {
        if spec.low_stock {
            CollectionKey::LowStock
        } else if spec.expiring_soon {
            CollectionKey::Expiring
        } else {
            CollectionKey::All
        }
    }

    /// Produce the collection the console should render: fetch by route,
    /// then filter locally. Ordering is whatever the upstream returned.
    pub async fn evaluate(
        &self,
        spec: &FilterSpec,
        today: NaiveDate,
    ) -> ClientResult<Vec<Product>> {
        let products = self.store.products(Self::route(spec)).await?;
        Ok(products
            .into_iter()
            .filter(|p| spec.matches(p, today))
            .collect())
    }
}
