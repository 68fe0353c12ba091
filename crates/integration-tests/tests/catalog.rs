//! Catalog listing against a mock API: shared links, paging, and results
//! that arrive out of order.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bazaar_integration_tests::{listing_json, memory_state};
use bazaar_storefront::NoticeLevel;
use bazaar_storefront::models::{Listing, ListingState};

#[tokio::test]
async fn test_shared_link_reloads_same_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("search", "phone"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing_json(&["p7", "p8"], 2, 3)))
        .expect(1)
        .mount(&server)
        .await;

    let state = memory_state(&server);
    let catalog = state.catalog();
    let link = Url::parse("https://shop.example/?search=phone&page=2").unwrap();

    assert!(catalog.open(&link).await);

    let listing = catalog.snapshot();
    let ids: Vec<_> = listing.items().iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["p7", "p8"]);
    assert_eq!(catalog.href(), "/?search=phone&page=2");

    let pager = listing.pagination().unwrap();
    assert_eq!((pager.prev(), pager.next()), (1, 3));
}

#[tokio::test]
async fn test_new_search_starts_at_page_one() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing_json(&["a"], 3, 4)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("search", "tv"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing_json(&["tv1"], 1, 1)))
        .expect(1)
        .mount(&server)
        .await;

    let state = memory_state(&server);
    let catalog = state.catalog();
    catalog.go_to_page(3).await;
    assert!(catalog.search("tv").await);

    assert_eq!(catalog.href(), "/?search=tv&page=1");
    assert_eq!(catalog.snapshot().items()[0].id.as_str(), "tv1");
}

#[tokio::test]
async fn test_slow_first_page_does_not_overwrite_second() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(listing_json(&["p1"], 1, 2))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing_json(&["p2"], 2, 2)))
        .mount(&server)
        .await;

    let state = memory_state(&server);
    let catalog = Arc::new(state.catalog());
    let mut updates = catalog.subscribe();

    // The page-1 request starts first but answers last.
    let slow = tokio::spawn({
        let catalog = Arc::clone(&catalog);
        async move { catalog.go_to_page(1).await }
    });
    updates.wait_for(Listing::is_loading).await.unwrap();
    assert!(catalog.go_to_page(2).await);
    assert!(!slow.await.unwrap());

    let listing = catalog.snapshot();
    assert_eq!(listing.query().unwrap().page(), 2);
    let ids: Vec<_> = listing.items().iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["p2"]);
}

#[tokio::test]
async fn test_failed_fetch_shows_error_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let state = memory_state(&server);
    let mut notices = state.notifier().subscribe();
    let catalog = state.catalog();

    catalog.reload().await;
    assert_eq!(catalog.snapshot().state(), &ListingState::Failed);
    assert!(catalog.snapshot().items().is_empty());

    let notice = notices.try_recv().unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert_eq!(notice.message, "Failed to fetch products");
}

#[tokio::test]
async fn test_out_of_range_document_does_not_fail_the_page() {
    let server = MockServer::start().await;
    let mut body = listing_json(&["ok", "odd"], 1, 1);
    body["products"][1]["stock"] = serde_json::json!(-1);
    body["products"][1]["discount"] = serde_json::json!(150);
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let state = memory_state(&server);
    let catalog = state.catalog();
    catalog.reload().await;

    let listing = catalog.snapshot();
    assert!(matches!(listing.state(), ListingState::Loaded(_)));
    let stock: Vec<_> = listing.items().iter().map(|p| p.stock).collect();
    assert_eq!(stock, [5, 0]);
}
