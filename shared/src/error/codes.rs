//! Unified error codes for the Slloze platform
//!
//! Error codes are shared between the server and its clients and are
//! organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Restaurant errors
//! - 4xxx: Order errors
//! - 5xxx: Payment method errors
//! - 6xxx: Resource gateway errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Token subject does not match any known user
    UnknownSubject = 1005,
    /// Account is disabled
    AccountDisabled = 1006,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2002,
    /// Resource belongs to another region
    WrongRegion = 2003,
    /// Resource is owned by another user
    NotOwner = 2004,

    // ==================== 3xxx: Restaurant ====================
    /// Restaurant not found
    RestaurantNotFound = 3001,
    /// Menu is unavailable for this restaurant
    MenuUnavailable = 3002,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has already been delivered
    OrderAlreadyDelivered = 4002,
    /// Order has already been cancelled
    OrderAlreadyCancelled = 4003,
    /// Requested status transition is not allowed
    InvalidStateTransition = 4004,
    /// Order has no items
    OrderEmpty = 4005,
    /// Order total does not match the sum of its items
    OrderTotalMismatch = 4006,

    // ==================== 5xxx: Payment methods ====================
    /// Payment method not found
    PaymentMethodNotFound = 5001,
    /// Cannot delete the only primary payment method
    SolePrimaryDeletion = 5002,
    /// More than one payment method marked primary
    DuplicatePrimary = 5003,
    /// Payment method payload is invalid for its type
    PaymentMethodInvalid = 5004,

    // ==================== 6xxx: Resource gateway ====================
    /// Gateway endpoint is not implemented yet
    GatewayNotImplemented = 6001,
    /// Gateway could not be reached
    GatewayUnreachable = 6002,
    /// Gateway returned a malformed response
    GatewayProtocol = 6003,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
}

/// Error for invalid error code conversion
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid error code: {0}")]
pub struct InvalidErrorCode(pub u16);

impl ErrorCode {
    /// Get the numeric code value
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the default human-readable message for this error code
    pub fn message(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Unknown => "Unknown error",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",
            Self::InvalidFormat => "Invalid format",
            Self::RequiredField => "Required field missing",

            Self::NotAuthenticated => "Not authenticated",
            Self::InvalidCredentials => "Invalid email or password",
            Self::TokenExpired => "Token expired",
            Self::TokenInvalid => "Invalid token",
            Self::UnknownSubject => "Not authenticated",
            Self::AccountDisabled => "Account has been disabled",

            Self::PermissionDenied => "Access denied",
            Self::AdminRequired => "Access denied",
            Self::WrongRegion => "Access denied",
            Self::NotOwner => "Access denied",

            Self::RestaurantNotFound => "Restaurant not found",
            Self::MenuUnavailable => "Menu is unavailable",

            Self::OrderNotFound => "Order not found",
            Self::OrderAlreadyDelivered => "Order has already been delivered",
            Self::OrderAlreadyCancelled => "Order has already been cancelled",
            Self::InvalidStateTransition => "Operation not allowed in the current order status",
            Self::OrderEmpty => "Order has no items",
            Self::OrderTotalMismatch => "Order total does not match its items",

            Self::PaymentMethodNotFound => "Payment method not found",
            Self::SolePrimaryDeletion => "Cannot delete the only primary payment method",
            Self::DuplicatePrimary => "Only one payment method may be primary",
            Self::PaymentMethodInvalid => "Payment method details are invalid",

            Self::GatewayNotImplemented => "This operation is not supported yet",
            Self::GatewayUnreachable => "Upstream service is unreachable",
            Self::GatewayProtocol => "Upstream service returned an invalid response",

            Self::InternalError => "Internal server error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> u16 {
        code.code()
    }
}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let code = match value {
            0 => Self::Success,
            1 => Self::Unknown,
            2 => Self::ValidationFailed,
            3 => Self::NotFound,
            4 => Self::AlreadyExists,
            5 => Self::InvalidRequest,
            6 => Self::InvalidFormat,
            7 => Self::RequiredField,

            1001 => Self::NotAuthenticated,
            1002 => Self::InvalidCredentials,
            1003 => Self::TokenExpired,
            1004 => Self::TokenInvalid,
            1005 => Self::UnknownSubject,
            1006 => Self::AccountDisabled,

            2001 => Self::PermissionDenied,
            2002 => Self::AdminRequired,
            2003 => Self::WrongRegion,
            2004 => Self::NotOwner,

            3001 => Self::RestaurantNotFound,
            3002 => Self::MenuUnavailable,

            4001 => Self::OrderNotFound,
            4002 => Self::OrderAlreadyDelivered,
            4003 => Self::OrderAlreadyCancelled,
            4004 => Self::InvalidStateTransition,
            4005 => Self::OrderEmpty,
            4006 => Self::OrderTotalMismatch,

            5001 => Self::PaymentMethodNotFound,
            5002 => Self::SolePrimaryDeletion,
            5003 => Self::DuplicatePrimary,
            5004 => Self::PaymentMethodInvalid,

            6001 => Self::GatewayNotImplemented,
            6002 => Self::GatewayUnreachable,
            6003 => Self::GatewayProtocol,

            9001 => Self::InternalError,

            other => return Err(InvalidErrorCode(other)),
        };
        Ok(code)
    }
}
