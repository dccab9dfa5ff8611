//! Order handlers
//!
//! Orders live behind the resource gateway; every operation here fetches
//! the current order, runs the policy and lifecycle guards, and pushes
//! the change back out. No status is cached between requests.

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use shared::models::{Order, OrderCreate, OrderStatus};
use shared::{ApiResponse, AppResult, ErrorCode};

use crate::auth::Principal;
use crate::core::ServerState;
use crate::orders::{self, lifecycle};
use crate::policy::{self, AccessDecision, DenyReason};
use crate::security_log;

/// List orders visible to the caller
///
/// Admins see everything, managers their region, members their own.
pub async fn list(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
) -> AppResult<ApiResponse<Vec<Order>>> {
    let orders = state.gateway().list_orders().await?;

    let visible = orders
        .into_iter()
        .filter(|o| policy::view_order(&principal, o).is_allowed())
        .collect();

    Ok(ApiResponse::success(visible))
}

/// Get one order
pub async fn get_by_id(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Order>> {
    let order = fetch_order(&state, &id).await?;

    policy::authorize(
        policy::view_order(&principal, &order),
        &principal,
        "orders.view",
    )?;

    Ok(ApiResponse::success(order))
}

/// Create an order
///
/// The restaurant must be visible to the caller; the order's region is
/// copied from it and the total is frozen from the submitted items.
pub async fn create(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<ApiResponse<Order>> {
    let restaurant = state
        .gateway()
        .get_restaurant(&payload.restaurant_id)
        .await
        .map_err(|e| e.not_found_as(ErrorCode::RestaurantNotFound))?;

    policy::authorize(
        policy::place_order(&principal, &restaurant.region),
        &principal,
        "orders.create",
    )?;

    let order = orders::new_order(&principal, &restaurant, payload)?;
    let created = state.gateway().create_order(order).await?;

    tracing::info!(
        order_id = %created.id,
        user_id = %principal.id,
        restaurant_id = %created.restaurant_id,
        "Order created"
    );

    Ok(ApiResponse::success(created))
}

/// Cancel an order
///
/// Role and region are checked first so probing callers learn nothing
/// about the order's status; only authorized callers get the specific
/// terminal-state error.
pub async fn cancel(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Order>> {
    let order = fetch_order(&state, &id).await?;

    match policy::cancel_order(&principal, &order) {
        AccessDecision::Deny(DenyReason::InvalidState) => {
            lifecycle::guard_cancel(order.status)?;
        }
        decision => policy::authorize(decision, &principal, "orders.cancel")?,
    }

    let updated = state
        .gateway()
        .set_order_status(&id, OrderStatus::Cancelled)
        .await
        .map_err(|e| e.not_found_as(ErrorCode::OrderNotFound))?;

    security_log!(
        "INFO",
        "order_cancelled",
        order_id = id.clone(),
        user_id = principal.id.clone(),
        previous_status = format!("{:?}", order.status)
    );

    Ok(ApiResponse::success(updated))
}

/// Checkout validation
///
/// Confirms the order is still in a checkout-eligible status. Nothing is
/// mutated; payment capture belongs to the upstream service.
pub async fn checkout(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Order>> {
    let order = fetch_order(&state, &id).await?;

    match policy::checkout_order(&principal, &order) {
        AccessDecision::Deny(DenyReason::InvalidState) => {
            lifecycle::guard_checkout(order.status)?;
        }
        decision => policy::authorize(decision, &principal, "orders.checkout")?,
    }

    Ok(ApiResponse::success(order))
}

async fn fetch_order(state: &ServerState, id: &str) -> AppResult<Order> {
    state
        .gateway()
        .get_order(id)
        .await
        .map_err(|e| e.not_found_as(ErrorCode::OrderNotFound))
}
