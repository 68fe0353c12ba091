//! Admin console against a mock API: authorization failures and CRUD.

#![allow(clippy::unwrap_used)]

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bazaar_core::ProductId;
use bazaar_integration_tests::{listing_json, memory_state, product_json};
use bazaar_storefront::services::ProductDraft;
use bazaar_storefront::{NoticeLevel, StorefrontError};

#[tokio::test]
async fn test_forbidden_dashboard_asks_for_login() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({ "message": "Not authorized as admin" })))
        .mount(&server)
        .await;

    let state = memory_state(&server);
    // The local flag says admin; the server disagrees and wins.
    state.session().login("tok", true).unwrap();
    let mut notices = state.notifier().subscribe();

    let err = state.admin().dashboard().await.unwrap_err();

    assert!(err.needs_login());
    let notice = notices.try_recv().unwrap();
    assert_eq!(notice.level, NoticeLevel::Blocking);
    assert_eq!(notice.message, "Not authorized as admin. Please log in again.");
}

#[tokio::test]
async fn test_admin_listing_uses_admin_page_size() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "16"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing_json(&["a", "b"], 2, 2)))
        .expect(1)
        .mount(&server)
        .await;

    let state = memory_state(&server);
    let page = state.admin().list(2).await.unwrap();

    assert_eq!(page.products.len(), 2);
    assert_eq!((page.page, page.pages), (2, 2));
}

#[tokio::test]
async fn test_edit_then_update_keeps_untouched_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/lamp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(product_json("lamp", 30, 4)))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/products/lamp"))
        .and(header("authorization", "Bearer tok"))
        .and(body_partial_json(json!({
            "name": "Product lamp",
            "brand": "Acme",
            "stock": 9
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(product_json("lamp", 30, 9)))
        .expect(1)
        .mount(&server)
        .await;

    let state = memory_state(&server);
    state.session().login("tok", true).unwrap();
    let admin = state.admin();
    let id = ProductId::new("lamp");

    let mut draft = admin.edit_draft(&id).await.unwrap();
    draft.stock = "9".to_string();
    let product = admin.update(&id, &draft).await.unwrap();

    assert_eq!(product.stock, 9);
}

#[tokio::test]
async fn test_create_without_login_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let state = memory_state(&server);
    let mut notices = state.notifier().subscribe();
    let draft = ProductDraft {
        name: "Phone".to_string(),
        price: "499".to_string(),
        ..ProductDraft::default()
    };

    let err = state.admin().create(&draft).await.unwrap_err();

    assert!(matches!(err, StorefrontError::LoginRequired));
    assert_eq!(notices.try_recv().unwrap().level, NoticeLevel::Blocking);
}

#[tokio::test]
async fn test_delete_confirms() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/products/lamp"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "Product removed" })))
        .expect(1)
        .mount(&server)
        .await;

    let state = memory_state(&server);
    state.session().login("tok", true).unwrap();
    let mut notices = state.notifier().subscribe();

    state.admin().delete(&ProductId::new("lamp")).await.unwrap();

    assert_eq!(notices.try_recv().unwrap().message, "Product deleted!");
}
