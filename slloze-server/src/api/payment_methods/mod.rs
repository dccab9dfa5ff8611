//! Payment method routes
//!
//! Two collections share the same handlers underneath:
//! - `/api/me/payment-methods` is the caller's own wallet
//! - `/api/payment-methods` is the org-wide set, admin only

mod handler;

use axum::{
    Router, middleware,
    routing::{get, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    let own = Router::new()
        .route(
            "/api/me/payment-methods",
            get(handler::list_own)
                .post(handler::create_own)
                .put(handler::reconcile_own),
        )
        .route(
            "/api/me/payment-methods/{id}",
            put(handler::update_own).delete(handler::delete_own),
        );

    let global = Router::new()
        .route(
            "/api/payment-methods",
            get(handler::list_global)
                .post(handler::create_global)
                .put(handler::reconcile_global),
        )
        .route(
            "/api/payment-methods/{id}",
            put(handler::update_global).delete(handler::delete_global),
        )
        .route_layer(middleware::from_fn(require_admin));

    own.merge(global)
}
