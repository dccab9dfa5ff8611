//! Resource gateway
//!
//! The gateway is the source of truth for restaurants, orders and payment
//! methods. This server holds no authoritative copies: every read goes
//! out, every write goes out, and a response is never assumed.
//!
//! "Not implemented" (HTTP 501) is a first-class outcome, not a fault:
//! the upstream grows endpoint by endpoint and callers must keep working
//! around the gaps.

pub mod http;
pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use shared::models::{Order, OrderStatus, PaymentMethod, PaymentMethodDraft, Restaurant};
use shared::{AppError, ErrorCode};

pub use http::HttpGateway;
pub use memory::MemoryGateway;

/// Which payment method collection an operation addresses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentScope {
    /// A user's personal wallet
    User(String),
    /// The org-wide set managed by admins
    Global,
}

/// Gateway outcomes that are not success
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("resource not found")]
    NotFound,

    #[error("gateway rejected the credentials")]
    Unauthorized,

    #[error("operation not implemented by the gateway")]
    NotImplemented,

    #[error("invalid gateway response: {0}")]
    Protocol(String),

    #[error("gateway unreachable: {0}")]
    Unreachable(String),
}

impl GatewayError {
    /// Convert to an [`AppError`], substituting a resource-specific code
    /// for the generic not-found case
    pub fn not_found_as(self, code: ErrorCode) -> AppError {
        match self {
            Self::NotFound => AppError::new(code),
            other => other.into(),
        }
    }
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::NotFound => AppError::new(ErrorCode::NotFound),
            GatewayError::Unauthorized => AppError::unauthorized(),
            GatewayError::NotImplemented => AppError::not_implemented(),
            GatewayError::Protocol(msg) => {
                AppError::with_message(ErrorCode::GatewayProtocol, msg)
            }
            GatewayError::Unreachable(msg) => {
                AppError::with_message(ErrorCode::GatewayUnreachable, msg)
            }
        }
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Contract with the external resource service
///
/// Implementations must distinguish "the endpoint does not exist yet"
/// ([`GatewayError::NotImplemented`]) from transport failures, and must
/// never invent data for either.
#[async_trait]
pub trait ResourceGateway: Send + Sync {
    async fn list_restaurants(&self) -> GatewayResult<Vec<Restaurant>>;
    async fn get_restaurant(&self, id: &str) -> GatewayResult<Restaurant>;

    async fn list_orders(&self) -> GatewayResult<Vec<Order>>;
    async fn get_order(&self, id: &str) -> GatewayResult<Order>;
    async fn create_order(&self, order: Order) -> GatewayResult<Order>;
    async fn set_order_status(&self, id: &str, status: OrderStatus) -> GatewayResult<Order>;

    async fn list_payment_methods(&self, scope: &PaymentScope) -> GatewayResult<Vec<PaymentMethod>>;
    async fn create_payment_method(
        &self,
        scope: &PaymentScope,
        draft: PaymentMethodDraft,
    ) -> GatewayResult<PaymentMethod>;
    async fn update_payment_method(
        &self,
        scope: &PaymentScope,
        method: PaymentMethod,
    ) -> GatewayResult<PaymentMethod>;
    async fn delete_payment_method(&self, scope: &PaymentScope, id: &str) -> GatewayResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_mapping() {
        let err: AppError = GatewayError::NotImplemented.into();
        assert_eq!(err.code, ErrorCode::GatewayNotImplemented);

        let err: AppError = GatewayError::Unreachable("connection refused".to_string()).into();
        assert_eq!(err.code, ErrorCode::GatewayUnreachable);

        let err = GatewayError::NotFound.not_found_as(ErrorCode::RestaurantNotFound);
        assert_eq!(err.code, ErrorCode::RestaurantNotFound);

        // The substitution only touches the not-found case
        let err = GatewayError::NotImplemented.not_found_as(ErrorCode::RestaurantNotFound);
        assert_eq!(err.code, ErrorCode::GatewayNotImplemented);
    }
}
