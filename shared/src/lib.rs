//! Shared types for the Slloze ordering platform
//!
//! Common types used by the server and tooling: domain models, the unified
//! error system, and auth DTOs.

pub mod client;
pub mod error;
pub mod models;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use serde::{Deserialize, Serialize};
