//! Access control policy
//!
//! Pure decision functions over a verified [`Principal`] and resource
//! attributes. Nothing here performs IO or mutates state; handlers ask
//! for a decision, log the deny reason, and return a generic error to
//! the client.
//!
//! Role scoping:
//! - ADMIN is org-wide and may see and manage everything
//! - MANAGER sees the restaurants and orders of their own region and may
//!   cancel orders in it
//! - MEMBER sees their region's restaurants and only their own orders,
//!   and never cancels

use serde::Serialize;

use shared::models::{Order, OrderStatus, Role};
use shared::{AppError, AppResult, ErrorCode};

use crate::auth::Principal;
use crate::security_log;

/// Why a request was denied
///
/// Reasons are logged but never put on the wire; clients get a generic
/// denial message regardless of the reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DenyReason {
    NotAuthenticated,
    WrongRole,
    WrongRegion,
    NotOwner,
    InvalidState,
}

impl DenyReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotAuthenticated => "NOT_AUTHENTICATED",
            Self::WrongRole => "WRONG_ROLE",
            Self::WrongRegion => "WRONG_REGION",
            Self::NotOwner => "NOT_OWNER",
            Self::InvalidState => "INVALID_STATE",
        }
    }

    /// Error code this reason maps to on the wire
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::NotAuthenticated => ErrorCode::NotAuthenticated,
            Self::WrongRole => ErrorCode::PermissionDenied,
            Self::WrongRegion => ErrorCode::WrongRegion,
            Self::NotOwner => ErrorCode::NotOwner,
            Self::InvalidState => ErrorCode::InvalidStateTransition,
        }
    }
}

/// Outcome of a policy check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Deny(DenyReason),
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Whether the caller may view a restaurant (and its menu) in `region`
pub fn view_restaurant(principal: &Principal, region: &str) -> AccessDecision {
    if principal.covers_region(region) {
        AccessDecision::Allow
    } else {
        AccessDecision::Deny(DenyReason::WrongRegion)
    }
}

/// Whether the caller may place an order at a restaurant in `region`
///
/// Same scope as viewing: you can only order from restaurants you can see.
pub fn place_order(principal: &Principal, region: &str) -> AccessDecision {
    view_restaurant(principal, region)
}

/// Whether the caller may view an order
pub fn view_order(principal: &Principal, order: &Order) -> AccessDecision {
    if principal.is_admin() || order.user_id == principal.id {
        return AccessDecision::Allow;
    }
    match principal.role {
        Role::Manager => {
            if principal.covers_region(&order.region) {
                AccessDecision::Allow
            } else {
                AccessDecision::Deny(DenyReason::WrongRegion)
            }
        }
        Role::Member => AccessDecision::Deny(DenyReason::NotOwner),
        Role::Admin => AccessDecision::Allow,
    }
}

/// Whether the caller may cancel an order
///
/// Cancellation is a management action: admins anywhere, managers within
/// their region, members never. The terminal-state guard runs after the
/// role checks so a member probing a delivered order still sees a role
/// denial, not a state hint.
pub fn cancel_order(principal: &Principal, order: &Order) -> AccessDecision {
    match principal.role {
        Role::Admin => {}
        Role::Manager => {
            if !principal.covers_region(&order.region) {
                return AccessDecision::Deny(DenyReason::WrongRegion);
            }
        }
        Role::Member => return AccessDecision::Deny(DenyReason::WrongRole),
    }

    if order.status.is_terminal() {
        return AccessDecision::Deny(DenyReason::InvalidState);
    }

    AccessDecision::Allow
}

/// Whether the caller may run checkout validation for an order
///
/// Checkout is read-like: it validates preconditions without changing
/// status, so visibility is the only access requirement. The status gate
/// itself rejects anything past `Confirmed`.
pub fn checkout_order(principal: &Principal, order: &Order) -> AccessDecision {
    match view_order(principal, order) {
        AccessDecision::Allow => {}
        deny => return deny,
    }

    match order.status {
        OrderStatus::PendingConfirmation | OrderStatus::Confirmed => AccessDecision::Allow,
        _ => AccessDecision::Deny(DenyReason::InvalidState),
    }
}

/// Whether the caller may manage the org-wide payment method set
pub fn manage_global_payment_methods(principal: &Principal) -> AccessDecision {
    if principal.is_admin() {
        AccessDecision::Allow
    } else {
        AccessDecision::Deny(DenyReason::WrongRole)
    }
}

/// Enforce a decision
///
/// Logs the concrete deny reason under the security target and maps it
/// to the generic wire error for the client.
pub fn authorize(decision: AccessDecision, principal: &Principal, action: &str) -> AppResult<()> {
    match decision {
        AccessDecision::Allow => Ok(()),
        AccessDecision::Deny(reason) => {
            security_log!(
                "WARN",
                "access_denied",
                user_id = principal.id.clone(),
                role = principal.role.name(),
                action = action,
                reason = reason.as_str()
            );
            Err(AppError::new(reason.error_code()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn principal(id: &str, role: Role, region: Option<&str>) -> Principal {
        Principal {
            id: id.to_string(),
            name: "Test".to_string(),
            email: "test@slloze.com".to_string(),
            role,
            region: region.map(|r| r.to_string()),
        }
    }

    fn order(user_id: &str, region: &str, status: OrderStatus) -> Order {
        Order {
            id: "order-x".to_string(),
            user_id: user_id.to_string(),
            user_name: None,
            restaurant_id: "rest-1".to_string(),
            restaurant_name: None,
            region: region.to_string(),
            items: vec![],
            total_amount: 0.0,
            status,
            order_date: Utc::now(),
            delivery_address: "somewhere".to_string(),
            notes: None,
        }
    }

    #[test]
    fn test_restaurant_visibility() {
        let admin = principal("a", Role::Admin, None);
        let manager = principal("m", Role::Manager, Some("North"));
        let member = principal("u", Role::Member, Some("South"));

        assert!(view_restaurant(&admin, "West").is_allowed());
        assert!(view_restaurant(&manager, "North").is_allowed());
        assert_eq!(
            view_restaurant(&manager, "South"),
            AccessDecision::Deny(DenyReason::WrongRegion)
        );
        assert!(view_restaurant(&member, "South").is_allowed());
        assert_eq!(
            view_restaurant(&member, "North"),
            AccessDecision::Deny(DenyReason::WrongRegion)
        );
    }

    #[test]
    fn test_order_visibility() {
        let admin = principal("a", Role::Admin, None);
        let manager_north = principal("m", Role::Manager, Some("North"));
        let member_north = principal("u1", Role::Member, Some("North"));
        let other_member = principal("u2", Role::Member, Some("North"));

        let o = order("u1", "North", OrderStatus::Preparing);

        assert!(view_order(&admin, &o).is_allowed());
        assert!(view_order(&manager_north, &o).is_allowed());
        assert!(view_order(&member_north, &o).is_allowed());

        // Same region is not enough for a member
        assert_eq!(
            view_order(&other_member, &o),
            AccessDecision::Deny(DenyReason::NotOwner)
        );

        let south_order = order("u9", "South", OrderStatus::Preparing);
        assert_eq!(
            view_order(&manager_north, &south_order),
            AccessDecision::Deny(DenyReason::WrongRegion)
        );
    }

    #[test]
    fn test_cancel_role_matrix() {
        let admin = principal("a", Role::Admin, None);
        let manager_north = principal("m", Role::Manager, Some("North"));
        let member = principal("u1", Role::Member, Some("North"));

        let o = order("u1", "North", OrderStatus::Confirmed);

        assert!(cancel_order(&admin, &o).is_allowed());
        assert!(cancel_order(&manager_north, &o).is_allowed());

        // Members never cancel, not even their own orders
        assert_eq!(
            cancel_order(&member, &o),
            AccessDecision::Deny(DenyReason::WrongRole)
        );

        let south_order = order("u9", "South", OrderStatus::Confirmed);
        assert_eq!(
            cancel_order(&manager_north, &south_order),
            AccessDecision::Deny(DenyReason::WrongRegion)
        );
    }

    #[test]
    fn test_cancel_terminal_states() {
        let admin = principal("a", Role::Admin, None);

        for status in [OrderStatus::Delivered, OrderStatus::Cancelled] {
            let o = order("u1", "North", status);
            assert_eq!(
                cancel_order(&admin, &o),
                AccessDecision::Deny(DenyReason::InvalidState)
            );
        }

        // Every non-terminal state is cancellable for an admin
        for status in [
            OrderStatus::PendingConfirmation,
            OrderStatus::Confirmed,
            OrderStatus::Preparing,
            OrderStatus::ReadyForPickup,
            OrderStatus::OutForDelivery,
        ] {
            let o = order("u1", "North", status);
            assert!(cancel_order(&admin, &o).is_allowed());
        }
    }

    #[test]
    fn test_member_probing_delivered_order_sees_role_denial() {
        let member = principal("u1", Role::Member, Some("North"));
        let o = order("u1", "North", OrderStatus::Delivered);
        assert_eq!(
            cancel_order(&member, &o),
            AccessDecision::Deny(DenyReason::WrongRole)
        );
    }

    #[test]
    fn test_checkout_gate() {
        let member = principal("u1", Role::Member, Some("North"));

        for status in [OrderStatus::PendingConfirmation, OrderStatus::Confirmed] {
            let o = order("u1", "North", status);
            assert!(checkout_order(&member, &o).is_allowed());
        }

        for status in [
            OrderStatus::Preparing,
            OrderStatus::ReadyForPickup,
            OrderStatus::OutForDelivery,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            let o = order("u1", "North", status);
            assert_eq!(
                checkout_order(&member, &o),
                AccessDecision::Deny(DenyReason::InvalidState)
            );
        }

        // Non-owner cannot even probe checkout
        let other = principal("u2", Role::Member, Some("North"));
        let o = order("u1", "North", OrderStatus::Confirmed);
        assert_eq!(
            checkout_order(&other, &o),
            AccessDecision::Deny(DenyReason::NotOwner)
        );
    }

    #[test]
    fn test_global_payment_method_management() {
        assert!(manage_global_payment_methods(&principal("a", Role::Admin, None)).is_allowed());
        assert_eq!(
            manage_global_payment_methods(&principal("m", Role::Manager, Some("North"))),
            AccessDecision::Deny(DenyReason::WrongRole)
        );
        assert_eq!(
            manage_global_payment_methods(&principal("u", Role::Member, Some("North"))),
            AccessDecision::Deny(DenyReason::WrongRole)
        );
    }

    #[test]
    fn test_authorize_maps_reasons_to_generic_errors() {
        let member = principal("u", Role::Member, Some("North"));
        let o = order("u9", "North", OrderStatus::Confirmed);

        let err = authorize(view_order(&member, &o), &member, "orders.view").unwrap_err();
        assert_eq!(err.code, ErrorCode::NotOwner);
        assert_eq!(err.message, "Access denied");
    }
}
