//! End-to-end API flows over the in-memory gateway
//!
//! Each test builds the full router, mints tokens for the seeded demo
//! accounts and drives requests through `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use slloze_server::auth::JwtConfig;
use slloze_server::{Config, MemoryGateway, ServerState, build_router};

fn test_state() -> (ServerState, Arc<MemoryGateway>) {
    let gateway = Arc::new(MemoryGateway::seeded());
    let mut config = Config::with_overrides(0, "http://gateway.invalid");
    config.jwt = JwtConfig {
        secret: "integration-test-secret-32-bytes-long!".to_string(),
        expiration_minutes: 60,
        issuer: "slloze-server".to_string(),
        audience: "slloze-web".to_string(),
    };
    let state = ServerState::with_gateway(config, gateway.clone()).expect("state init");
    (state, gateway)
}

fn token_for(state: &ServerState, email: &str) -> String {
    let record = state
        .directory()
        .find_by_email(email)
        .expect("seeded account");
    state
        .jwt_service
        .generate_token(
            &record.id,
            &record.name,
            &record.email,
            record.role,
            record.region.as_deref(),
        )
        .expect("token")
}

async fn send(
    router: &Router,
    method: Method,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };

    let response = router.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

fn data(body: &Value) -> &Value {
    &body["data"]
}

#[tokio::test]
async fn health_is_public() {
    let (state, _) = test_state();
    let router = build_router(state);

    let (status, body) = send(&router, Method::GET, "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let (state, _) = test_state();
    let router = build_router(state);

    let (status, body) = send(&router, Method::GET, "/api/orders", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1001);
}

#[tokio::test]
async fn login_issues_a_working_token() {
    let (state, _) = test_state();
    let router = build_router(state);

    let (status, body) = send(
        &router,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"email": "member.north@slloze.com", "password": "slloze123!"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let token = data(&body)["token"].as_str().expect("token").to_string();
    assert_eq!(data(&body)["user"]["role"], "MEMBER");
    assert_eq!(data(&body)["user"]["region"], "North");

    let (status, body) = send(&router, Method::GET, "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data(&body)["id"], "user-member-north");
}

#[tokio::test]
async fn login_failures_are_uniform() {
    let (state, _) = test_state();
    let router = build_router(state);

    let (status, wrong_password) = send(
        &router,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"email": "member.north@slloze.com", "password": "nope"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, unknown_email) = send(
        &router,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"email": "ghost@slloze.com", "password": "nope"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Same code, same message: no account enumeration
    assert_eq!(wrong_password["code"], unknown_email["code"]);
    assert_eq!(wrong_password["message"], unknown_email["message"]);
}

#[tokio::test]
async fn expired_tokens_are_rejected() {
    let (state, _) = test_state();

    let expired_service = slloze_server::JwtService::with_config(JwtConfig {
        expiration_minutes: -5,
        ..state.jwt_service.config.clone()
    });
    let token = expired_service
        .generate_token("user-admin", "Admin User", "admin@slloze.com", shared::models::Role::Admin, None)
        .expect("token");

    let router = build_router(state);
    let (status, body) = send(&router, Method::GET, "/api/orders", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1003);
}

#[tokio::test]
async fn restaurant_lists_are_region_scoped() {
    let (state, _) = test_state();
    let admin = token_for(&state, "admin@slloze.com");
    let manager_north = token_for(&state, "manager.north@slloze.com");
    let member_south = token_for(&state, "member.south@slloze.com");
    let router = build_router(state);

    let (_, body) = send(&router, Method::GET, "/api/restaurants", Some(&admin), None).await;
    assert_eq!(data(&body).as_array().unwrap().len(), 4);

    let (_, body) = send(&router, Method::GET, "/api/restaurants", Some(&manager_north), None).await;
    let ids: Vec<&str> = data(&body)
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["rest-1", "rest-3"]);

    let (_, body) = send(&router, Method::GET, "/api/restaurants", Some(&member_south), None).await;
    let ids: Vec<&str> = data(&body)
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["rest-2"]);
}

#[tokio::test]
async fn out_of_region_reads_deny_generically() {
    let (state, _) = test_state();
    let manager_north = token_for(&state, "manager.north@slloze.com");
    let router = build_router(state);

    let (status, body) = send(
        &router,
        Method::GET,
        "/api/restaurants/rest-4",
        Some(&manager_north),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Access denied");

    // The menu route is scoped the same way
    let (status, _) = send(
        &router,
        Method::GET,
        "/api/restaurants/rest-4/menu",
        Some(&manager_north),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn order_lists_follow_role_scope() {
    let (state, _) = test_state();
    let admin = token_for(&state, "admin@slloze.com");
    let manager_north = token_for(&state, "manager.north@slloze.com");
    let member_north = token_for(&state, "member.north@slloze.com");
    let router = build_router(state);

    let (_, body) = send(&router, Method::GET, "/api/orders", Some(&admin), None).await;
    assert_eq!(data(&body).as_array().unwrap().len(), 3);

    let (_, body) = send(&router, Method::GET, "/api/orders", Some(&manager_north), None).await;
    let ids: Vec<&str> = data(&body)
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["order-1"]);

    let (_, body) = send(&router, Method::GET, "/api/orders", Some(&member_north), None).await;
    let ids: Vec<&str> = data(&body)
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["order-1"]);
}

#[tokio::test]
async fn members_cannot_read_each_others_orders() {
    let (state, _) = test_state();
    let member_north = token_for(&state, "member.north@slloze.com");
    let router = build_router(state);

    let (status, body) = send(
        &router,
        Method::GET,
        "/api/orders/order-2",
        Some(&member_north),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Access denied");
}

#[tokio::test]
async fn full_order_flow_create_checkout_cancel() {
    let (state, _) = test_state();
    let member_north = token_for(&state, "member.north@slloze.com");
    let manager_north = token_for(&state, "manager.north@slloze.com");
    let router = build_router(state);

    let payload = json!({
        "restaurantId": "rest-1",
        "items": [
            {"menuItemId": "item-1", "name": "Margherita Pizza", "quantity": 2, "price": 12.99}
        ],
        "deliveryAddress": "10 North Pole, Northtown"
    });

    let (status, body) = send(
        &router,
        Method::POST,
        "/api/orders",
        Some(&member_north),
        Some(payload),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let order = data(&body);
    assert_eq!(order["status"], "PENDING_CONFIRMATION");
    assert_eq!(order["region"], "North");
    assert!((order["totalAmount"].as_f64().unwrap() - 25.98).abs() < 1e-9);
    let order_id = order["id"].as_str().unwrap().to_string();

    // Owner can run checkout validation while pending
    let (status, _) = send(
        &router,
        Method::POST,
        &format!("/api/orders/{}/checkout", order_id),
        Some(&member_north),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // The member cannot cancel their own order
    let (status, body) = send(
        &router,
        Method::POST,
        &format!("/api/orders/{}/cancel", order_id),
        Some(&member_north),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Access denied");

    // The region's manager can
    let (status, body) = send(
        &router,
        Method::POST,
        &format!("/api/orders/{}/cancel", order_id),
        Some(&manager_north),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data(&body)["status"], "CANCELLED");
}

#[tokio::test]
async fn ordering_out_of_region_is_denied() {
    let (state, _) = test_state();
    let member_north = token_for(&state, "member.north@slloze.com");
    let router = build_router(state);

    let payload = json!({
        "restaurantId": "rest-2",
        "items": [
            {"menuItemId": "item-3", "name": "Spaghetti Carbonara", "quantity": 1, "price": 15.00}
        ],
        "deliveryAddress": "10 North Pole, Northtown"
    });

    let (status, _) = send(
        &router,
        Method::POST,
        "/api/orders",
        Some(&member_north),
        Some(payload),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn cancel_terminal_order_conflicts() {
    let (state, _) = test_state();
    let manager_north = token_for(&state, "manager.north@slloze.com");
    let router = build_router(state);

    // order-1 is DELIVERED
    let (status, body) = send(
        &router,
        Method::POST,
        "/api/orders/order-1/cancel",
        Some(&manager_north),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 4002);
}

#[tokio::test]
async fn cancel_is_region_scoped_for_managers() {
    let (state, _) = test_state();
    let manager_north = token_for(&state, "manager.north@slloze.com");
    let manager_south = token_for(&state, "manager.south@slloze.com");
    let router = build_router(state);

    // order-2 belongs to the South region
    let (status, _) = send(
        &router,
        Method::POST,
        "/api/orders/order-2/cancel",
        Some(&manager_north),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &router,
        Method::POST,
        "/api/orders/order-2/cancel",
        Some(&manager_south),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data(&body)["status"], "CANCELLED");
}

#[tokio::test]
async fn checkout_rejected_once_preparing() {
    let (state, _) = test_state();
    let member_south = token_for(&state, "member.south@slloze.com");
    let router = build_router(state);

    // order-2 is PREPARING and belongs to member south
    let (status, body) = send(
        &router,
        Method::POST,
        "/api/orders/order-2/checkout",
        Some(&member_south),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 4004);
}

#[tokio::test]
async fn wallet_batch_reconcile_roundtrip() {
    let (state, _) = test_state();
    let member_north = token_for(&state, "member.north@slloze.com");
    let router = build_router(state);

    let batch = json!([
        {"type": "Credit Card", "last4": "9999", "isPrimary": true},
        {"type": "PayPal", "email": "member.north@slloze.com", "isPrimary": false}
    ]);

    let (status, body) = send(
        &router,
        Method::PUT,
        "/api/me/payment-methods",
        Some(&member_north),
        Some(batch),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data(&body)["report"]["created"], 2);
    let methods = data(&body)["methods"].as_array().unwrap().clone();
    assert_eq!(methods.len(), 2);
    assert_eq!(
        methods.iter().filter(|m| m["isPrimary"] == true).count(),
        1
    );

    // Resubmitting the resulting set changes nothing
    let resubmission = Value::Array(methods);
    let (status, body) = send(
        &router,
        Method::PUT,
        "/api/me/payment-methods",
        Some(&member_north),
        Some(resubmission),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data(&body)["report"]["created"], 0);
    assert_eq!(data(&body)["report"]["updated"], 0);
    assert_eq!(data(&body)["report"]["deleted"], 0);
}

#[tokio::test]
async fn deleting_the_sole_primary_is_rejected() {
    let (state, _) = test_state();
    let admin = token_for(&state, "admin@slloze.com");
    let router = build_router(state);

    // The admin wallet is seeded with pm-1 (primary) and pm-2. A batch
    // that drops pm-1 without designating a successor must fail whole.
    let batch = json!([
        {"id": "pm-2", "type": "PayPal", "email": "admin@slloze.com", "isPrimary": false}
    ]);

    let (status, body) = send(
        &router,
        Method::PUT,
        "/api/me/payment-methods",
        Some(&admin),
        Some(batch),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 5002);

    // With a successor designated, the same deletion goes through
    let batch = json!([
        {"id": "pm-2", "type": "PayPal", "email": "admin@slloze.com", "isPrimary": true}
    ]);
    let (status, body) = send(
        &router,
        Method::PUT,
        "/api/me/payment-methods",
        Some(&admin),
        Some(batch),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data(&body)["report"]["deleted"], 1);
    let methods = data(&body)["methods"].as_array().unwrap();
    assert_eq!(methods.len(), 1);
    assert_eq!(methods[0]["isPrimary"], true);
}

#[tokio::test]
async fn single_delete_of_primary_is_rejected() {
    let (state, _) = test_state();
    let admin = token_for(&state, "admin@slloze.com");
    let router = build_router(state);

    let (status, body) = send(
        &router,
        Method::DELETE,
        "/api/me/payment-methods/pm-1",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 5002);

    // Non-primary entries delete fine
    let (status, _) = send(
        &router,
        Method::DELETE,
        "/api/me/payment-methods/pm-2",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn global_set_is_admin_only() {
    let (state, _) = test_state();
    let admin = token_for(&state, "admin@slloze.com");
    let manager_north = token_for(&state, "manager.north@slloze.com");
    let router = build_router(state);

    let (status, body) = send(
        &router,
        Method::GET,
        "/api/payment-methods",
        Some(&manager_north),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2002);

    let (status, body) = send(&router, Method::GET, "/api/payment-methods", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data(&body).as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn unimplemented_gateway_endpoints_surface_as_501() {
    let (state, _) = test_state();
    let admin = token_for(&state, "admin@slloze.com");
    let router = build_router(state);

    // The upstream has no org-wide create endpoint yet
    let (status, body) = send(
        &router,
        Method::POST,
        "/api/payment-methods",
        Some(&admin),
        Some(json!({"type": "Credit Card", "last4": "1111", "isPrimary": false})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
    assert_eq!(body["code"], 6001);
}

#[tokio::test]
async fn batch_treats_not_implemented_per_entry() {
    let (state, gateway) = test_state();
    let admin = token_for(&state, "admin@slloze.com");
    let router = build_router(state);

    // A batch against the global set: delete is unimplemented upstream,
    // updates work. The batch still succeeds and reports the gap.
    let batch = json!([
        {"id": "pm-2", "type": "PayPal", "email": "admin@slloze.com", "isPrimary": true}
    ]);

    let (status, body) = send(
        &router,
        Method::PUT,
        "/api/payment-methods",
        Some(&admin),
        Some(batch),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let report = &data(&body)["report"];
    assert_eq!(report["updated"], 1);
    assert_eq!(report["notImplemented"], 1);
    assert_eq!(report["deleted"], 0);

    // pm-1 survived upstream because its delete never ran
    let methods = data(&body)["methods"].as_array().unwrap();
    assert!(methods.iter().any(|m| m["id"] == "pm-1"));

    // Once the upstream implements deletes, the same edit completes
    gateway.allow("payments.delete.global");
    let batch = json!([
        {"id": "pm-2", "type": "PayPal", "email": "admin@slloze.com", "isPrimary": true}
    ]);
    let (status, body) = send(
        &router,
        Method::PUT,
        "/api/payment-methods",
        Some(&admin),
        Some(batch),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data(&body)["report"]["deleted"], 1);
    assert_eq!(data(&body)["methods"].as_array().unwrap().len(), 1);
}
