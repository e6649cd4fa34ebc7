//! Product pages integration tests.
//!
//! Tests for the HTML resource: index, new, edit, create, update, destroy.

use axum::http::StatusCode;
use catalog::handlers::ProductSubmission;
use catalog::store::ProductStore;

use crate::common::{
    create_test_product, invalid_submission, location, test_server, valid_submission,
};

#[tokio::test]
async fn test_index_lists_products() {
    let (server, store) = test_server();
    let product = create_test_product(&*store, "A1", "Widget");

    let response = server.get("/products").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let html = response.text();
    assert!(html.contains("<!DOCTYPE html>"));
    assert!(html.contains("data-template=\"index\""));
    assert!(html.contains(&format!("product-{}", product.id.unwrap())));
    assert!(html.contains("Widget"));
}

#[tokio::test]
async fn test_index_without_products() {
    let (server, _store) = test_server();

    let response = server.get("/products").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains("No products yet."));
}

#[tokio::test]
async fn test_new_form() {
    let (server, _store) = test_server();

    let response = server.get("/products/new").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let html = response.text();
    assert!(html.contains("data-template=\"new\""));
    assert!(html.contains("name=\"product[code]\""));
    assert!(html.contains("Create Product"));
    // a new product has no member URL to tunnel to
    assert!(!html.contains("name=\"_method\""));
}

#[tokio::test]
async fn test_edit_form_shows_product() {
    let (server, store) = test_server();
    let product = create_test_product(&*store, "A1", "Widget");
    let id = product.id.unwrap();

    let response = server.get(&format!("/products/{}/edit", id)).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let html = response.text();
    assert!(html.contains("data-template=\"edit\""));
    assert!(html.contains("value=\"A1\""));
    assert!(html.contains("value=\"Widget\""));
    assert!(html.contains("value=\"put\""));
}

#[tokio::test]
async fn test_edit_not_found() {
    let (server, _store) = test_server();

    let response = server.get("/products/12345/edit").await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(response.text(), "Product not found: 12345");
}

#[tokio::test]
async fn test_edit_with_non_numeric_id_is_rejected() {
    let (server, _store) = test_server();

    let response = server.get("/products/abc/edit").await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_with_valid_params() {
    let (server, store) = test_server();

    let response = server.post("/products").form(&valid_submission()).await;

    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/products");
    assert_eq!(store.count().unwrap(), 1);
    let saved = store.find_by_code("A1").unwrap().unwrap();
    assert!(saved.is_persisted());
}

#[tokio::test]
async fn test_created_product_appears_in_index() {
    let (server, _store) = test_server();

    server.post("/products").form(&valid_submission()).await;
    let html = server.get("/products").await.text();

    assert!(html.contains("Widget"));
    assert!(html.contains("Standard"));
    assert!(html.contains("Active"));
}

#[tokio::test]
async fn test_create_with_invalid_params_rerenders_new() {
    let (server, store) = test_server();

    let response = server.post("/products").form(&invalid_submission()).await;

    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = response.text();
    assert!(html.contains("data-template=\"new\""));
    assert!(html.contains("error(s) prohibited this product from being saved"));
    assert!(html.contains("be blank"));
    assert_eq!(store.count().unwrap(), 0);
}

#[tokio::test]
async fn test_create_keeps_rejected_input() {
    let (server, _store) = test_server();
    let submission = ProductSubmission {
        kind: Some("gadget".to_string()),
        ..valid_submission()
    };

    let response = server.post("/products").form(&submission).await;

    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = response.text();
    assert!(html.contains("value=\"A1\""));
    assert!(html.contains("value=\"gadget\" selected"));
    assert!(html.contains("is not included in the list"));
}

#[tokio::test]
async fn test_create_with_taken_code() {
    let (server, store) = test_server();
    create_test_product(&*store, "A1", "Existing");

    let response = server.post("/products").form(&valid_submission()).await;

    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.text().contains("has already been taken"));
    assert_eq!(store.count().unwrap(), 1);
}

#[tokio::test]
async fn test_update_with_valid_params() {
    let (server, store) = test_server();
    let product = create_test_product(&*store, "A1", "Widget");
    let id = product.id.unwrap();

    let submission = ProductSubmission {
        code: Some("A2".to_string()),
        name: Some("Widget Pro".to_string()),
        kind: Some("kit".to_string()),
        status: Some("discontinued".to_string()),
        method: None,
    };
    let response = server
        .put(&format!("/products/{}", id))
        .form(&submission)
        .await;

    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/products");

    let reloaded = store.find(id).unwrap();
    assert_eq!(reloaded.code, "A2");
    assert_eq!(reloaded.name, "Widget Pro");
    assert_eq!(reloaded.kind, "kit");
    assert_eq!(reloaded.status, "discontinued");
}

#[tokio::test]
async fn test_update_via_patch() {
    let (server, store) = test_server();
    let product = create_test_product(&*store, "A1", "Widget");
    let id = product.id.unwrap();

    let submission = ProductSubmission {
        name: Some("Renamed".to_string()),
        ..Default::default()
    };
    let response = server
        .patch(&format!("/products/{}", id))
        .form(&submission)
        .await;

    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    let reloaded = store.find(id).unwrap();
    assert_eq!(reloaded.name, "Renamed");
    assert_eq!(reloaded.code, "A1");
}

#[tokio::test]
async fn test_update_through_tunneled_form() {
    let (server, store) = test_server();
    let product = create_test_product(&*store, "A1", "Widget");
    let id = product.id.unwrap();

    let submission = ProductSubmission {
        code: Some("A2".to_string()),
        method: Some("put".to_string()),
        ..valid_submission()
    };
    let response = server
        .post(&format!("/products/{}", id))
        .form(&submission)
        .await;

    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(store.find(id).unwrap().code, "A2");
}

#[tokio::test]
async fn test_update_with_invalid_params_rerenders_edit() {
    let (server, store) = test_server();
    let product = create_test_product(&*store, "A1", "Widget");
    let id = product.id.unwrap();

    let response = server
        .put(&format!("/products/{}", id))
        .form(&invalid_submission())
        .await;

    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = response.text();
    assert!(html.contains("data-template=\"edit\""));
    assert!(html.contains(&format!("/products/{}", id)));
    assert_eq!(store.find(id).unwrap(), product);
}

#[tokio::test]
async fn test_update_not_found() {
    let (server, store) = test_server();

    let response = server
        .put("/products/12345")
        .form(&valid_submission())
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(store.count().unwrap(), 0);
}

#[tokio::test]
async fn test_destroy() {
    let (server, store) = test_server();
    let product = create_test_product(&*store, "A1", "Widget");
    create_test_product(&*store, "B1", "Bolt");

    let response = server
        .delete(&format!("/products/{}", product.id.unwrap()))
        .await;

    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/products");
    assert_eq!(store.count().unwrap(), 1);
}

#[tokio::test]
async fn test_destroy_through_tunneled_form() {
    let (server, store) = test_server();
    let product = create_test_product(&*store, "A1", "Widget");

    let submission = ProductSubmission {
        method: Some("delete".to_string()),
        ..Default::default()
    };
    let response = server
        .post(&format!("/products/{}", product.id.unwrap()))
        .form(&submission)
        .await;

    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(store.count().unwrap(), 0);
}

#[tokio::test]
async fn test_destroy_not_found() {
    let (server, store) = test_server();
    create_test_product(&*store, "A1", "Widget");

    let response = server.delete("/products/12345").await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(store.count().unwrap(), 1);
}
