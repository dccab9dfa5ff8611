//! Order models and the order status graph

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Order status
///
/// The forward path is linear up to `Confirmed`/`Preparing`, then branches
/// into two alternative in-transit states which both lead to `Delivered`:
///
/// ```text
/// PENDING_CONFIRMATION -> CONFIRMED -> PREPARING -> READY_FOR_PICKUP ---> DELIVERED
///                                               \-> OUT_FOR_DELIVERY --/
/// ```
///
/// `Cancelled` is reachable from every non-terminal state. Unknown wire
/// values fail deserialization; they are never treated as non-terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    PendingConfirmation,
    Confirmed,
    Preparing,
    ReadyForPickup,
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Terminal states admit no further transition
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Whether the fulfilment flow may advance directly from `self` to `next`
    ///
    /// Cancellation is not a forward transition; it is guarded separately.
    /// `ReadyForPickup` and `OutForDelivery` are alternative branches and do
    /// not transition into each other, and no state is re-enterable.
    pub fn can_advance_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::PendingConfirmation, Self::Confirmed)
                | (Self::Confirmed, Self::Preparing)
                | (Self::Preparing, Self::ReadyForPickup)
                | (Self::Preparing, Self::OutForDelivery)
                | (Self::ReadyForPickup, Self::Delivered)
                | (Self::OutForDelivery, Self::Delivered)
        )
    }
}

/// Order line item
///
/// `name` and `price` are copied from the menu item at order time and stay
/// frozen as a historical record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub menu_item_id: String,
    pub name: String,
    pub quantity: u32,
    /// Price per unit at time of order
    pub price: f64,
}

/// Sum of `price * quantity` over all items
pub fn items_total(items: &[OrderItem]) -> f64 {
    items
        .iter()
        .map(|item| item.price * f64::from(item.quantity))
        .sum()
}

/// Order entity
///
/// `region` is copied from the restaurant at creation and drives
/// manager-scope access checks. `total_amount` is a frozen historical fact,
/// never recomputed after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    pub restaurant_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant_name: Option<String>,
    pub region: String,
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    pub status: OrderStatus,
    pub order_date: DateTime<Utc>,
    pub delivery_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    pub restaurant_id: String,
    pub items: Vec<OrderItem>,
    pub delivery_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
