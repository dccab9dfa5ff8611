//! Authentication routes

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

/// Build the authentication router
/// - /api/auth/login: public (no auth required)
/// - /api/auth/me, /api/auth/logout: protected by the global auth middleware
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/auth/login", post(handler::login))
        .route("/api/auth/me", get(handler::me))
        .route("/api/auth/logout", post(handler::logout))
}
