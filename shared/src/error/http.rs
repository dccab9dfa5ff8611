//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::RestaurantNotFound
            | Self::OrderNotFound
            | Self::PaymentMethodNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict (state disagreements and duplicates)
            Self::AlreadyExists
            | Self::OrderAlreadyDelivered
            | Self::OrderAlreadyCancelled
            | Self::InvalidStateTransition
            | Self::DuplicatePrimary => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid
            | Self::UnknownSubject
            | Self::AccountDisabled => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::PermissionDenied
            | Self::AdminRequired
            | Self::WrongRegion
            | Self::NotOwner => StatusCode::FORBIDDEN,

            // 501 Not Implemented (gateway stub passthrough)
            Self::GatewayNotImplemented => StatusCode::NOT_IMPLEMENTED,

            // 502 Bad Gateway (upstream transport/protocol failures)
            Self::GatewayUnreachable | Self::GatewayProtocol => StatusCode::BAD_GATEWAY,

            // 500 Internal Server Error
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (default for validation/business errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
