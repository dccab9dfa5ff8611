//! API routes
//!
//! # Structure
//!
//! - [`health`] - health check
//! - [`auth`] - login, logout, current user
//! - [`restaurants`] - region-scoped catalog reads
//! - [`orders`] - order listing, creation, cancel and checkout
//! - [`payment_methods`] - personal wallets and the org-wide set

pub mod auth;
pub mod health;
pub mod orders;
pub mod payment_methods;
pub mod restaurants;

// Re-export common types for handlers
pub use shared::{ApiResponse, AppResult};
