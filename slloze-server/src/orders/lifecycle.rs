//! Order lifecycle guards
//!
//! Status-based preconditions for the mutating order operations. Role and
//! region checks live in [`crate::policy`]; these guards only ask whether
//! the current status admits the operation, and answer with the specific
//! order error codes.

use shared::models::OrderStatus;
use shared::{AppError, AppResult, ErrorCode};

/// Guard cancellation
///
/// Terminal orders cannot be cancelled; the error says which terminal
/// state blocked it. Everything non-terminal may move to `Cancelled`.
pub fn guard_cancel(status: OrderStatus) -> AppResult<()> {
    match status {
        OrderStatus::Delivered => Err(AppError::new(ErrorCode::OrderAlreadyDelivered)),
        OrderStatus::Cancelled => Err(AppError::new(ErrorCode::OrderAlreadyCancelled)),
        _ => Ok(()),
    }
}

/// Guard checkout validation
///
/// Checkout only makes sense before the kitchen starts working: the order
/// must still be `PENDING_CONFIRMATION` or `CONFIRMED`.
pub fn guard_checkout(status: OrderStatus) -> AppResult<()> {
    match status {
        OrderStatus::PendingConfirmation | OrderStatus::Confirmed => Ok(()),
        other => Err(AppError::invalid_transition(format!(
            "Checkout is not available for an order in status {:?}",
            other
        ))),
    }
}

/// Guard a forward status transition
pub fn guard_advance(current: OrderStatus, next: OrderStatus) -> AppResult<()> {
    if current.can_advance_to(next) {
        Ok(())
    } else {
        Err(AppError::invalid_transition(format!(
            "Cannot move an order from {:?} to {:?}",
            current, next
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_cancel_reports_which_terminal_state() {
        assert_eq!(
            guard_cancel(OrderStatus::Delivered).unwrap_err().code,
            ErrorCode::OrderAlreadyDelivered
        );
        assert_eq!(
            guard_cancel(OrderStatus::Cancelled).unwrap_err().code,
            ErrorCode::OrderAlreadyCancelled
        );
        assert!(guard_cancel(OrderStatus::OutForDelivery).is_ok());
        assert!(guard_cancel(OrderStatus::PendingConfirmation).is_ok());
    }

    #[test]
    fn test_guard_checkout() {
        assert!(guard_checkout(OrderStatus::PendingConfirmation).is_ok());
        assert!(guard_checkout(OrderStatus::Confirmed).is_ok());
        assert_eq!(
            guard_checkout(OrderStatus::Preparing).unwrap_err().code,
            ErrorCode::InvalidStateTransition
        );
        assert_eq!(
            guard_checkout(OrderStatus::Cancelled).unwrap_err().code,
            ErrorCode::InvalidStateTransition
        );
    }

    #[test]
    fn test_guard_advance_follows_graph() {
        assert!(guard_advance(OrderStatus::Preparing, OrderStatus::OutForDelivery).is_ok());
        assert!(guard_advance(OrderStatus::PendingConfirmation, OrderStatus::Preparing).is_err());
        assert!(guard_advance(OrderStatus::Delivered, OrderStatus::Confirmed).is_err());
    }
}
