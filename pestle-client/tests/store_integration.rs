// pestle-client/tests/store_integration.rs
// Store and evaluator behavior against an in-memory inventory API.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use tokio::sync::Mutex;

use pestle_client::{
    ClientError, ClientResult, CollectionKey, FilterEvaluator, InventoryApi, ProductStore,
};
use shared::status;
use shared::{ExpiryStatus, FilterSpec, Product, ProductCreate, ProductUpdate, StockFilter};

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn product(id: i64, name: &str, category: &str, supplier: &str, quantity: u32) -> Product {
    Product {
        id,
        name: name.to_string(),
        description: None,
        price: Decimal::new(999, 2),
        stock_quantity: quantity,
        category: category.to_string(),
        supplier: supplier.to_string(),
        expiry_date: today() + Days::new(365),
        minimum_stock_threshold: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn create_payload(name: &str) -> ProductCreate {
    ProductCreate {
        name: name.to_string(),
        description: None,
        price: Decimal::new(450, 2),
        stock_quantity: 30,
        category: "Antibiotics".to_string(),
        supplier: "Acme Pharma".to_string(),
        expiry_date: today() + Days::new(180),
        minimum_stock_threshold: None,
    }
}

/// In-memory stand-in for the remote API, with call counters and
/// failure injection.
#[derive(Default)]
struct MockApi {
    products: Mutex<Vec<Product>>,
    next_id: AtomicI64,
    list_calls: AtomicU32,
    get_calls: AtomicU32,
    low_stock_calls: AtomicU32,
    expiring_calls: AtomicU32,
    category_calls: AtomicU32,
    create_calls: AtomicU32,
    fail_reads: AtomicBool,
    fail_mutations: AtomicBool,
}

impl MockApi {
    fn with_products(products: Vec<Product>) -> Self {
        let next = products.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        let api = Self::default();
        api.next_id.store(next, Ordering::SeqCst);
        *api.products.try_lock().unwrap() = products;
        api
    }

    fn check_read(&self) -> ClientResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ClientError::Internal("injected read failure".to_string()));
        }
        Ok(())
    }

    fn check_mutation(&self) -> ClientResult<()> {
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(ClientError::Internal(
                "injected mutation failure".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl InventoryApi for MockApi {
    async fn list_products(&self) -> ClientResult<Vec<Product>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.check_read()?;
        Ok(self.products.lock().await.clone())
    }

    async fn get_product(&self, id: i64) -> ClientResult<Product> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.check_read()?;
        self.products
            .lock()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("product {id}")))
    }

    async fn create_product(&self, payload: &ProductCreate) -> ClientResult<Product> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.check_mutation()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let created = Product {
            id,
            name: payload.name.clone(),
            description: payload.description.clone(),
            price: payload.price,
            stock_quantity: payload.stock_quantity,
            category: payload.category.clone(),
            supplier: payload.supplier.clone(),
            expiry_date: payload.expiry_date,
            minimum_stock_threshold: payload.minimum_stock_threshold,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.products.lock().await.push(created.clone());
        Ok(created)
    }

    async fn update_product(&self, id: i64, payload: &ProductUpdate) -> ClientResult<Product> {
        self.check_mutation()?;
        let mut products = self.products.lock().await;
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ClientError::NotFound(format!("product {id}")))?;
        if let Some(name) = &payload.name {
            product.name = name.clone();
        }
        if let Some(quantity) = payload.stock_quantity {
            product.stock_quantity = quantity;
        }
        if let Some(price) = payload.price {
            product.price = price;
        }
        product.updated_at = Utc::now();
        Ok(product.clone())
    }

    async fn delete_product(&self, id: i64) -> ClientResult<()> {
        self.check_mutation()?;
        let mut products = self.products.lock().await;
        let before = products.len();
        products.retain(|p| p.id != id);
        if products.len() == before {
            return Err(ClientError::NotFound(format!("product {id}")));
        }
        Ok(())
    }

    async fn low_stock_products(&self) -> ClientResult<Vec<Product>> {
        self.low_stock_calls.fetch_add(1, Ordering::SeqCst);
        self.check_read()?;
        Ok(self
            .products
            .lock()
            .await
            .iter()
            .filter(|p| {
                p.stock_quantity
                    <= p.minimum_stock_threshold
                        .unwrap_or(status::DEFAULT_MINIMUM_STOCK_THRESHOLD)
            })
            .cloned()
            .collect())
    }

    async fn expiring_products(&self) -> ClientResult<Vec<Product>> {
        self.expiring_calls.fetch_add(1, Ordering::SeqCst);
        self.check_read()?;
        Ok(self
            .products
            .lock()
            .await
            .iter()
            .filter(|p| p.expiry_status(today()) == ExpiryStatus::ExpiringSoon)
            .cloned()
            .collect())
    }

    async fn list_categories(&self) -> ClientResult<Vec<String>> {
        self.category_calls.fetch_add(1, Ordering::SeqCst);
        self.check_read()?;
        let mut categories: Vec<String> = self
            .products
            .lock()
            .await
            .iter()
            .map(|p| p.category.clone())
            .collect();
        categories.dedup();
        Ok(categories)
    }
}

fn store_with(products: Vec<Product>) -> (Arc<MockApi>, ProductStore) {
    let api = Arc::new(MockApi::with_products(products));
    let store = ProductStore::new(api.clone());
    (api, store)
}

#[tokio::test]
async fn collection_is_cached_until_invalidated() {
    let (api, store) = store_with(vec![product(1, "Aspirin", "Analgesics", "Acme", 40)]);

    let first = store.products(CollectionKey::All).await.unwrap();
    let second = store.products(CollectionKey::All).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(api.list_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn create_invalidates_collections_and_next_read_sees_the_item() {
    let (api, store) = store_with(vec![product(1, "Aspirin", "Analgesics", "Acme", 40)]);

    assert_eq!(store.products(CollectionKey::All).await.unwrap().len(), 1);

    store.create(&create_payload("Amoxicillin")).await.unwrap();

    let after = store.products(CollectionKey::All).await.unwrap();
    assert_eq!(after.len(), 2);
    assert!(after.iter().any(|p| p.name == "Amoxicillin"));
    // one fetch before the mutation, one after invalidation
    assert_eq!(api.list_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn invalid_payload_never_reaches_the_network() {
    let (api, store) = store_with(vec![]);

    let mut payload = create_payload("Free Sample");
    payload.price = Decimal::ZERO;

    let err = store.create(&payload).await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
    assert_eq!(api.create_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn update_invalidates_the_entity_entry() {
    let (api, store) = store_with(vec![product(5, "Ibuprofen", "Analgesics", "Acme", 40)]);

    store.product(5).await.unwrap();
    store.product(5).await.unwrap();
    assert_eq!(api.get_calls.load(Ordering::SeqCst), 1);

    let payload = ProductUpdate {
        stock_quantity: Some(2),
        ..Default::default()
    };
    store.update(5, &payload).await.unwrap();

    // the cached entry was dropped, not patched from the response
    let refreshed = store.product(5).await.unwrap();
    assert_eq!(refreshed.stock_quantity, 2);
    assert_eq!(api.get_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn delete_then_read_reflects_the_removal() {
    let (api, store) = store_with(vec![
        product(1, "Aspirin", "Analgesics", "Acme", 40),
        product(2, "Vitamin C", "Vitamins", "Globex", 40),
    ]);

    store.products(CollectionKey::All).await.unwrap();
    store.delete(1).await.unwrap();

    let after = store.products(CollectionKey::All).await.unwrap();
    assert_eq!(after.len(), 1);
    assert_eq!(after[0].id, 2);
    assert_eq!(api.list_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn failed_delete_leaves_the_cache_intact() {
    let (api, store) = store_with(vec![product(1, "Aspirin", "Analgesics", "Acme", 40)]);

    store.products(CollectionKey::All).await.unwrap();
    api.fail_mutations.store(true, Ordering::SeqCst);

    let err = store.delete(1).await.unwrap_err();
    assert!(matches!(err, ClientError::Internal(_)));

    // still served from cache, and still contains the product
    let after = store.products(CollectionKey::All).await.unwrap();
    assert_eq!(after.len(), 1);
    assert_eq!(api.list_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn every_collection_entry_is_invalidated_by_a_mutation() {
    let (api, store) = store_with(vec![product(1, "Aspirin", "Analgesics", "Acme", 3)]);

    store.products(CollectionKey::All).await.unwrap();
    store.products(CollectionKey::LowStock).await.unwrap();

    store.create(&create_payload("Amoxicillin")).await.unwrap();

    store.products(CollectionKey::All).await.unwrap();
    store.products(CollectionKey::LowStock).await.unwrap();

    assert_eq!(api.list_calls.load(Ordering::SeqCst), 2);
    assert_eq!(api.low_stock_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn categories_are_served_from_cache_within_the_ttl() {
    let (api, store) = store_with(vec![product(1, "Aspirin", "Analgesics", "Acme", 40)]);

    store.categories().await.unwrap();
    store.categories().await.unwrap();
    assert_eq!(api.category_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn expired_category_cache_is_refetched() {
    let api = Arc::new(MockApi::with_products(vec![product(
        1, "Aspirin", "Analgesics", "Acme", 40,
    )]));
    let store = ProductStore::new(api.clone()).with_category_ttl(Duration::ZERO);

    store.categories().await.unwrap();
    store.categories().await.unwrap();
    assert_eq!(api.category_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn low_stock_shortcut_fetches_the_dedicated_endpoint() {
    let (api, store) = store_with(vec![
        product(1, "Aspirin", "Analgesics", "Acme", 3),
        product(2, "Vitamin C", "Vitamins", "Globex", 200),
    ]);

    let spec = FilterSpec {
        low_stock: true,
        ..Default::default()
    };
    let rows = FilterEvaluator::new(&store)
        .evaluate(&spec, today())
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, 1);
    assert_eq!(api.low_stock_calls.load(Ordering::SeqCst), 1);
    assert_eq!(api.list_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn client_predicates_still_apply_on_top_of_a_shortcut() {
    let (_api, store) = store_with(vec![
        product(1, "Aspirin", "Analgesics", "Acme", 3),
        product(2, "Amoxicillin", "Antibiotics", "Globex", 3),
    ]);

    let spec = FilterSpec {
        low_stock: true,
        category: Some("anti".to_string()),
        ..Default::default()
    };
    let rows = FilterEvaluator::new(&store)
        .evaluate(&spec, today())
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Amoxicillin");
}

#[tokio::test]
async fn stock_bucket_filters_via_the_classifier() {
    let (_api, store) = store_with(vec![
        product(1, "Aspirin", "Analgesics", "Acme", 0),
        product(2, "Vitamin C", "Vitamins", "Globex", 10),
        product(3, "Amoxicillin", "Antibiotics", "Acme", 50),
    ]);

    let spec = FilterSpec {
        stock_status: StockFilter::LowStock,
        ..Default::default()
    };
    let rows = FilterEvaluator::new(&store)
        .evaluate(&spec, today())
        .await
        .unwrap();

    // quantity 10 sits exactly at the default threshold: low stock
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, 2);
}

#[tokio::test]
async fn fetch_failure_propagates_instead_of_an_empty_result() {
    let (api, store) = store_with(vec![product(1, "Aspirin", "Analgesics", "Acme", 40)]);
    api.fail_reads.store(true, Ordering::SeqCst);

    let result = FilterEvaluator::new(&store)
        .evaluate(&FilterSpec::default(), today())
        .await;

    assert!(matches!(result, Err(ClientError::Internal(_))));
}

#[tokio::test]
async fn upstream_ordering_is_preserved() {
    let (_api, store) = store_with(vec![
        product(9, "Zinc", "Vitamins", "Acme", 40),
        product(2, "Aspirin", "Analgesics", "Acme", 40),
        product(5, "Vitamin C", "Vitamins", "Globex", 40),
    ]);

    let rows = FilterEvaluator::new(&store)
        .evaluate(&FilterSpec::default(), today())
        .await
        .unwrap();

    let ids: Vec<i64> = rows.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![9, 2, 5]);
}
