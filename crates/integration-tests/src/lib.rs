//! Integration tests for the Bazaar storefront client.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bazaar-integration-tests
//! ```
//!
//! Every test runs against a local `wiremock` server standing in for the
//! catalog API, so no network access or running backend is needed.
//!
//! # Test Categories
//!
//! - `catalog` - listing URLs, paging, and stale-result handling
//! - `session` - login, logout, and persistence across restarts
//! - `cart` - cart persistence and product-page stock
//! - `admin` - authorization failures and product CRUD

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::Path;

use serde_json::{Value, json};
use url::Url;
use wiremock::MockServer;

use bazaar_storefront::AppState;
use bazaar_storefront::config::StorefrontConfig;
use bazaar_storefront::store::{FileStore, PersistedStore};

/// A product as the catalog API returns it.
#[must_use]
pub fn product_json(id: &str, price: u32, stock: u32) -> Value {
    json!({
        "_id": id,
        "name": format!("Product {id}"),
        "brand": "Acme",
        "price": price,
        "discount": 0,
        "stock": stock,
        "images": [format!("https://img.example/{id}.jpg")],
        "variants": [],
        "description": "",
        "category": "misc"
    })
}

/// A paged listing body.
#[must_use]
pub fn listing_json(ids: &[&str], page: u32, pages: u32) -> Value {
    let products: Vec<Value> = ids.iter().map(|id| product_json(id, 10, 5)).collect();
    json!({ "products": products, "page": page, "pages": pages })
}

/// Config pointing at `server`.
///
/// # Panics
///
/// Panics if the mock server's URI is not a valid URL.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn config_for(server: &MockServer) -> StorefrontConfig {
    StorefrontConfig::new(Url::parse(&server.uri()).unwrap())
}

/// App state against `server` with nothing persisted.
#[must_use]
pub fn memory_state(server: &MockServer) -> AppState {
    AppState::with_store(config_for(server), PersistedStore::in_memory())
}

/// App state against `server`, persisted to the file at `path`.
///
/// Building a second state on the same path simulates a restart.
#[must_use]
pub fn file_state(server: &MockServer, path: &Path) -> AppState {
    let store = PersistedStore::new(FileStore::new(path));
    AppState::with_store(config_for(server), store)
}
