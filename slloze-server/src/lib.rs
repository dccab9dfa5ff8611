//! Slloze Server - role-scoped food ordering backend
//!
//! # Architecture
//!
//! The server is the authoritative enforcement point for authentication,
//! access control and order lifecycle rules, while the data itself lives
//! behind an external resource gateway:
//!
//! - **Authentication** (`auth`): JWT + Argon2, fail-closed verification
//! - **Access control** (`policy`): pure role and region scoped decisions
//! - **Orders** (`orders`): lifecycle state machine and guards
//! - **Payments** (`payments`): collection reconciliation and batching
//! - **Gateway** (`gateway`): REST contract with the resource service
//! - **HTTP API** (`api`): Axum routes and handlers
//!
//! # Module structure
//!
//! ```text
//! slloze-server/src/
//! ├── core/          # config, state, server startup
//! ├── auth/          # JWT, user directory, middleware
//! ├── policy/        # access control decisions
//! ├── orders/        # order construction and lifecycle
//! ├── payments/      # reconciliation and batch dispatch
//! ├── gateway/       # resource gateway trait + impls
//! ├── api/           # HTTP routes and handlers
//! └── utils/         # logging
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod gateway;
pub mod orders;
pub mod payments;
pub mod policy;
pub mod utils;

// Re-export public types
pub use auth::{JwtService, Principal, UserDirectory};
pub use core::{Config, Server, ServerState, build_router};
pub use gateway::{GatewayError, HttpGateway, MemoryGateway, PaymentScope, ResourceGateway};

// Re-export unified error types from shared
pub use shared::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - supports tracing format specifiers
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

pub fn print_banner() {
    println!(
        r#"
   _____ ____
  / ___// / /___ _____  ___
  \__ \/ / / __ \_  / / _ \
 ___/ / / / /_/ // /_/  __/
/____/_/_/\____//___/\___/
    "#
    );
}
