//! Order domain logic
//!
//! Order construction plus the lifecycle guards. Persistence belongs to
//! the resource gateway; this module only decides what a valid order and
//! a valid operation look like.

pub mod lifecycle;

use chrono::Utc;
use uuid::Uuid;

use shared::models::{Order, OrderCreate, OrderStatus, Restaurant, items_total};
use shared::{AppError, AppResult, ErrorCode};

use crate::auth::Principal;

/// Build a new order from a creation payload
///
/// Validates the payload, freezes the total from the submitted items and
/// copies the restaurant's region onto the order. New orders always start
/// in `PENDING_CONFIRMATION`.
pub fn new_order(
    principal: &Principal,
    restaurant: &Restaurant,
    payload: OrderCreate,
) -> AppResult<Order> {
    validate_items(&payload)?;

    if payload.delivery_address.trim().is_empty() {
        return Err(AppError::with_message(
            ErrorCode::RequiredField,
            "Delivery address is required",
        ));
    }

    let total_amount = items_total(&payload.items);

    Ok(Order {
        id: format!("order-{}", Uuid::new_v4()),
        user_id: principal.id.clone(),
        user_name: Some(principal.name.clone()),
        restaurant_id: restaurant.id.clone(),
        restaurant_name: Some(restaurant.name.clone()),
        region: restaurant.region.clone(),
        items: payload.items,
        total_amount,
        status: OrderStatus::PendingConfirmation,
        order_date: Utc::now(),
        delivery_address: payload.delivery_address,
        notes: payload.notes,
    })
}

fn validate_items(payload: &OrderCreate) -> AppResult<()> {
    if payload.items.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty));
    }
    for item in &payload.items {
        if item.quantity == 0 {
            return Err(
                AppError::validation("Item quantity must be at least 1")
                    .with_detail("menuItemId", item.menu_item_id.clone()),
            );
        }
        if !item.price.is_finite() || item.price < 0.0 {
            return Err(
                AppError::validation("Item price must be a non-negative number")
                    .with_detail("menuItemId", item.menu_item_id.clone()),
            );
        }
    }
    Ok(())
}
