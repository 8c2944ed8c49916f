//! Integration tests for catalog and cart routes.
//!
//! Run with: cargo test -p sweet-bites-integration-tests

use axum::http::StatusCode;
use serde_json::json;
use sweet_bites_integration_tests::TestApp;

#[tokio::test]
async fn home_lists_catalog_with_empty_cart() {
    let mut app = TestApp::new();
    let response = app.get("/").await;

    assert_eq!(response.status, StatusCode::OK);
    for name in [
        "Strawberry Dream",
        "Chocolate Heaven",
        "Vanilla Delight",
        "Pink Velvet",
    ] {
        assert!(response.body.contains(name), "missing {name}");
    }
    assert!(response.body.contains("$25.99"));
    assert!(response.body.contains(r#"<span id="cart-count">0</span>"#));
}

#[tokio::test]
async fn add_item_returns_running_count() {
    let mut app = TestApp::new();

    let response = app.post("/cart/add/1").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!({"success": true, "cart_count": 1}));

    let response = app.post("/cart/add/1").await;
    assert_eq!(response.json()["cart_count"], 2);

    let response = app.post("/cart/add/2").await;
    assert_eq!(response.json()["cart_count"], 3);

    assert_eq!(app.cart_count().await, 3);

    let home = app.get("/").await;
    assert!(home.body.contains(r#"<span id="cart-count">3</span>"#));
}

#[tokio::test]
async fn add_unknown_product_is_not_found() {
    let mut app = TestApp::new();
    app.post("/cart/add/2").await;

    let response = app.post("/cart/add/99").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(
        response.json(),
        json!({"success": false, "message": "Product not found"})
    );
    assert_eq!(app.cart_count().await, 1);
}

#[tokio::test]
async fn add_malformed_id_is_not_found() {
    let mut app = TestApp::new();
    app.post("/cart/add/3").await;

    for id in ["cake", "99999999999", "-1"] {
        let response = app.post(&format!("/cart/add/{id}")).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "id {id}");
        assert_eq!(
            response.json(),
            json!({"success": false, "message": "Product not found"})
        );
    }
    assert_eq!(app.cart_count().await, 1);
}

#[tokio::test]
async fn cart_page_shows_lines_and_total() {
    let mut app = TestApp::new();
    app.post("/cart/add/1").await;
    app.post("/cart/add/1").await;
    app.post("/cart/add/2").await;

    let response = app.get("/cart").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Strawberry Dream"));
    assert!(response.body.contains("Chocolate Heaven"));
    assert!(!response.body.contains("Vanilla Delight"));
    assert!(response.body.contains("$51.98"));
    assert!(response.body.contains("$81.97"));
}

#[tokio::test]
async fn empty_cart_page() {
    let mut app = TestApp::new();
    let response = app.get("/cart").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Your cart is empty."));
}

#[tokio::test]
async fn update_sets_and_removes_quantities() {
    let mut app = TestApp::new();
    app.post("/cart/add/1").await;
    app.post("/cart/add/2").await;
    app.post("/cart/add/3").await;

    let response = app
        .post_form("/cart/update", "qty_1=4&qty_2=0&qty_3=abc")
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), Some("/cart"));

    assert_eq!(app.cart_count().await, 4);
    let cart = app.get("/cart").await;
    assert!(cart.body.contains("Strawberry Dream"));
    assert!(!cart.body.contains("Chocolate Heaven"));
    assert!(!cart.body.contains("Vanilla Delight"));
}

#[tokio::test]
async fn update_later_field_wins() {
    let mut app = TestApp::new();
    app.post("/cart/add/1").await;

    // Quantity input followed by the line's remove button.
    app.post_form("/cart/update", "qty_1=3&qty_1=0").await;
    assert_eq!(app.cart_count().await, 0);
}

#[tokio::test]
async fn update_removing_last_line_empties_cart() {
    let mut app = TestApp::new();
    app.post("/cart/add/4").await;

    app.post_form("/cart/update", "qty_4=-1").await;
    assert_eq!(app.cart_count().await, 0);

    let cart = app.get("/cart").await;
    assert!(cart.body.contains("Your cart is empty."));
}

#[tokio::test]
async fn update_ignores_unknown_fields_and_ids() {
    let mut app = TestApp::new();
    app.post("/cart/add/1").await;

    app.post_form("/cart/update", "qty_42=5&note=hello&qty_x=2")
        .await;
    assert_eq!(app.cart_count().await, 1);
}

#[tokio::test]
async fn carts_are_per_visitor() {
    let mut app = TestApp::new();
    app.post("/cart/add/1").await;
    assert_eq!(app.cart_count().await, 1);

    app.clear_cookies();
    assert_eq!(app.cart_count().await, 0);
}
