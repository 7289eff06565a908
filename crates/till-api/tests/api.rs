//! Router-level tests against the in-memory store.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use till_api::{router, AppState};
use till_memory::InMemoryStore;
use tower::ServiceExt;

struct TestApp {
    app: Router,
    store: Arc<InMemoryStore>,
    token: String,
}

fn test_app() -> TestApp {
    let store = Arc::new(InMemoryStore::new());
    let user = store.seed_user();
    let token = store.issue_token(user);
    let app = router(AppState::new(store.clone()));
    TestApp { app, store, token }
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("request");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

fn get(token: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

fn send_json(token: &str, method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn requests_without_a_token_are_unauthorized() {
    let t = test_app();
    let (status, body) = send(&t.app, Request::builder().uri("/cart").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn unknown_tokens_are_unauthorized() {
    let t = test_app();
    let (status, _) = send(&t.app, get("not-a-token", "/cart")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn product_reads_are_public() {
    let t = test_app();
    t.store.seed_product("Widget", 1000, 5);
    let (status, body) = send(
        &t.app,
        Request::builder().uri("/products").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["name"], "Widget");
    assert_eq!(body[0]["price"], json!(10.0));
}

#[tokio::test]
async fn repeat_adds_merge_into_one_line() {
    let t = test_app();
    let product = t.store.seed_product("Widget", 1000, 50);

    let (status, body) = send(
        &t.app,
        send_json(
            &t.token,
            "POST",
            "/cart/add",
            json!({"product_id": product.as_i64(), "quantity": 3}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["msg"], "Added to cart");

    let (status, _) = send(
        &t.app,
        send_json(
            &t.token,
            "POST",
            "/cart/add",
            json!({"product_id": product.as_i64(), "quantity": 2}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&t.app, get(&t.token, "/cart")).await;
    assert_eq!(status, StatusCode::OK);
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantity"], 5);
    assert_eq!(items[0]["total_price"], json!(50.0));
    assert_eq!(body["cart_total"], json!(50.0));
}

#[tokio::test]
async fn add_without_quantity_defaults_to_one() {
    let t = test_app();
    let product = t.store.seed_product("Widget", 1000, 50);
    send(
        &t.app,
        send_json(
            &t.token,
            "POST",
            "/cart/add",
            json!({"product_id": product.as_i64()}),
        ),
    )
    .await;
    let (_, body) = send(&t.app, get(&t.token, "/cart")).await;
    assert_eq!(body["items"][0]["quantity"], 1);
}

#[tokio::test]
async fn add_unknown_product_is_unprocessable() {
    let t = test_app();
    let (status, _) = send(
        &t.app,
        send_json(&t.token, "POST", "/cart/add", json!({"product_id": 999})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn update_to_zero_is_rejected_and_leaves_quantity() {
    let t = test_app();
    let product = t.store.seed_product("Widget", 1000, 50);
    send(
        &t.app,
        send_json(
            &t.token,
            "POST",
            "/cart/add",
            json!({"product_id": product.as_i64(), "quantity": 4}),
        ),
    )
    .await;
    let (_, body) = send(&t.app, get(&t.token, "/cart")).await;
    let cart_id = body["items"][0]["cart_id"].as_i64().unwrap();

    let (status, _) = send(
        &t.app,
        send_json(
            &t.token,
            "PUT",
            &format!("/cart/update/{cart_id}"),
            json!({"quantity": 0}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, body) = send(&t.app, get(&t.token, "/cart")).await;
    assert_eq!(body["items"][0]["quantity"], 4);
}

#[tokio::test]
async fn removing_a_missing_line_is_not_found() {
    let t = test_app();
    let (status, _) = send(
        &t.app,
        Request::builder()
            .method("DELETE")
            .uri("/cart/remove/404")
            .header(header::AUTHORIZATION, format!("Bearer {}", t.token))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn shipping_with_missing_fields_is_bad_request() {
    let t = test_app();
    let (status, body) = send(
        &t.app,
        send_json(
            &t.token,
            "POST",
            "/checkout/shipping",
            json!({"full_name": "Ada Lovelace", "address": ""}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("address"));
}

#[tokio::test]
async fn shipping_and_payment_steps_succeed() {
    let t = test_app();
    let (status, body) = send(
        &t.app,
        send_json(
            &t.token,
            "POST",
            "/checkout/shipping",
            json!({
                "full_name": "Ada Lovelace",
                "address": "12 Analytical Way",
                "contact_number": "0123456789"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Shipping info saved");

    let (status, body) = send(
        &t.app,
        send_json(&t.token, "POST", "/checkout/payment", json!({"card": "ignored"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Payment set to COD by default");
}

#[tokio::test]
async fn full_checkout_flow_reviews_places_and_clears() {
    // Cart of 2 x 10.00 + 1 x 5.50 reviews and places at 25.50.
    let t = test_app();
    let a = t.store.seed_product("Widget A", 1000, 10);
    let b = t.store.seed_product("Widget B", 550, 10);
    send(
        &t.app,
        send_json(
            &t.token,
            "POST",
            "/cart/add",
            json!({"product_id": a.as_i64(), "quantity": 2}),
        ),
    )
    .await;
    send(
        &t.app,
        send_json(
            &t.token,
            "POST",
            "/cart/add",
            json!({"product_id": b.as_i64(), "quantity": 1}),
        ),
    )
    .await;
    send(
        &t.app,
        send_json(
            &t.token,
            "POST",
            "/checkout/shipping",
            json!({
                "full_name": "Ada Lovelace",
                "address": "12 Analytical Way",
                "contact_number": "0123456789"
            }),
        ),
    )
    .await;

    let (status, review) = send(&t.app, get(&t.token, "/checkout/review")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(review["total_amount"], json!(25.5));
    assert_eq!(review["user_info"]["full_name"], "Ada Lovelace");
    assert_eq!(review["user_info"]["payment_method"], "COD");
    assert_eq!(review["items"].as_array().unwrap().len(), 2);

    let (status, placed) = send(
        &t.app,
        send_json(&t.token, "POST", "/checkout/place_order", json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(placed["total_amount"], json!(25.5));
    assert_eq!(placed["payment_method"], "COD");
    assert_eq!(placed["message"], "Order placed successfully");
    let order_id = placed["Order_ID"].as_i64().unwrap();

    let (_, cart) = send(&t.app, get(&t.token, "/cart")).await;
    assert!(cart["items"].as_array().unwrap().is_empty());
    assert_eq!(cart["cart_total"], json!(0.0));

    let (status, order) = send(&t.app, get(&t.token, &format!("/orders/{order_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["total_amount"], json!(25.5));
    assert_eq!(order["details"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn placing_with_an_empty_cart_changes_nothing() {
    let t = test_app();

    let (_, before) = send(&t.app, get(&t.token, "/orders")).await;
    let count_before = before["orders"].as_array().unwrap().len();

    let (status, body) = send(
        &t.app,
        send_json(&t.token, "POST", "/checkout/place_order", json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Cart is empty");

    let (_, after) = send(&t.app, get(&t.token, "/orders")).await;
    assert_eq!(after["orders"].as_array().unwrap().len(), count_before);
}

#[tokio::test]
async fn review_with_an_empty_cart_is_bad_request() {
    let t = test_app();
    let (status, _) = send(&t.app, get(&t.token, "/checkout/review")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn order_status_transitions_are_guarded() {
    let t = test_app();
    let product = t.store.seed_product("Widget", 1000, 10);
    send(
        &t.app,
        send_json(
            &t.token,
            "POST",
            "/cart/add",
            json!({"product_id": product.as_i64(), "quantity": 1}),
        ),
    )
    .await;
    let (_, placed) = send(
        &t.app,
        send_json(&t.token, "POST", "/checkout/place_order", json!({})),
    )
    .await;
    let order_id = placed["Order_ID"].as_i64().unwrap();

    let (status, _) = send(
        &t.app,
        send_json(
            &t.token,
            "PUT",
            &format!("/orders/{order_id}/status"),
            json!({"status": "Processing"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &t.app,
        send_json(
            &t.token,
            "PUT",
            &format!("/orders/{order_id}/status"),
            json!({"status": "Completed"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn stock_adjustments_append_to_the_ledger() {
    let t = test_app();
    let product = t.store.seed_product("Widget", 1000, 5);

    let (status, entry) = send(
        &t.app,
        send_json(
            &t.token,
            "POST",
            "/inventory/adjustments",
            json!({
                "product_id": product.as_i64(),
                "change_type": "ADD",
                "quantity": 10,
                "remarks": "restock"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(entry["change_type"], "ADD");
    assert_eq!(entry["quantity_changed"], 10);

    let (status, removal) = send(
        &t.app,
        send_json(
            &t.token,
            "POST",
            "/inventory/adjustments",
            json!({
                "product_id": product.as_i64(),
                "change_type": "REMOVE",
                "quantity": 99
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(removal["error"].as_str().unwrap().contains("Insufficient"));

    let (status, logs) = send(&t.app, get(&t.token, "/inventory/logs")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(logs.as_array().unwrap().len(), 1);

    let log_id = logs[0]["log_id"].as_i64().unwrap();
    let (status, entry) = send(&t.app, get(&t.token, &format!("/inventory/logs/{log_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(entry["product_id"], product.as_i64());
}
