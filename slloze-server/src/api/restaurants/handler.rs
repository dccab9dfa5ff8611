//! Restaurant handlers
//!
//! All data comes from the resource gateway; these handlers only apply
//! the region scope before returning it.

use axum::{
    Extension,
    extract::{Path, State},
};

use shared::models::{MenuSection, Restaurant};
use shared::{ApiResponse, AppResult, ErrorCode};

use crate::auth::Principal;
use crate::core::ServerState;
use crate::policy;

/// List restaurants visible to the caller
///
/// Out-of-scope restaurants are filtered, not 403'd: a scoped caller
/// sees their region's slice of the catalog as if it were the whole.
pub async fn list(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
) -> AppResult<ApiResponse<Vec<Restaurant>>> {
    let restaurants = state.gateway().list_restaurants().await?;

    let visible = restaurants
        .into_iter()
        .filter(|r| policy::view_restaurant(&principal, &r.region).is_allowed())
        .collect();

    Ok(ApiResponse::success(visible))
}

/// Get one restaurant
pub async fn get_by_id(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Restaurant>> {
    let restaurant = state
        .gateway()
        .get_restaurant(&id)
        .await
        .map_err(|e| e.not_found_as(ErrorCode::RestaurantNotFound))?;

    policy::authorize(
        policy::view_restaurant(&principal, &restaurant.region),
        &principal,
        "restaurants.view",
    )?;

    Ok(ApiResponse::success(restaurant))
}

/// Get a restaurant's menu
pub async fn get_menu(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Vec<MenuSection>>> {
    let restaurant = state
        .gateway()
        .get_restaurant(&id)
        .await
        .map_err(|e| e.not_found_as(ErrorCode::RestaurantNotFound))?;

    policy::authorize(
        policy::view_restaurant(&principal, &restaurant.region),
        &principal,
        "restaurants.menu",
    )?;

    Ok(ApiResponse::success(restaurant.menu))
}
