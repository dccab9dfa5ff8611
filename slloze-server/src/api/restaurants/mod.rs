//! Restaurant routes

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// Restaurant router - read-only, region-scoped
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/restaurants", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/menu", get(handler::get_menu))
}
