//! Authentication handlers
//!
//! Login, logout and current-user lookup.

use std::time::Duration;

use axum::{Extension, Json, extract::State};

use shared::client::{LoginRequest, LoginResponse, UserInfo};
use shared::{ApiResponse, AppError, AppResult, ErrorCode};

use crate::auth::Principal;
use crate::core::ServerState;

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// Login handler
///
/// Verifies credentials against the directory and issues a JWT. Unknown
/// email and wrong password produce the same response, after the same
/// fixed delay, so neither timing nor wording enumerates accounts.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<ApiResponse<LoginResponse>> {
    let record = state.directory().find_by_email(&req.email).cloned();

    // Fixed delay before inspecting the result
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let record = match record {
        Some(record) => {
            if !record.is_active {
                return Err(AppError::new(ErrorCode::AccountDisabled));
            }

            if !record.verify_password(&req.password)? {
                tracing::warn!(email = %req.email, "Login failed - invalid credentials");
                return Err(AppError::invalid_credentials());
            }

            record
        }
        None => {
            tracing::warn!(email = %req.email, "Login failed - user not found");
            return Err(AppError::invalid_credentials());
        }
    };

    let token = state
        .get_jwt_service()
        .generate_token(
            &record.id,
            &record.name,
            &record.email,
            record.role,
            record.region.as_deref(),
        )
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    tracing::info!(
        user_id = %record.id,
        role = %record.role,
        "User logged in successfully"
    );

    Ok(ApiResponse::success(LoginResponse {
        token,
        user: record.to_user_info(),
    }))
}

/// Get current user info
///
/// Reads the directory rather than echoing token claims, so role or
/// region changes show up without waiting for token expiry.
pub async fn me(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
) -> AppResult<ApiResponse<UserInfo>> {
    let record = state.directory().resolve_subject(&principal.id)?;
    Ok(ApiResponse::success(record.to_user_info()))
}

/// Logout handler
///
/// Tokens are stateless, so this only records the event; the client
/// discards its copy.
pub async fn logout(
    Extension(principal): Extension<Principal>,
) -> AppResult<ApiResponse<()>> {
    tracing::info!(user_id = %principal.id, "User logged out");
    Ok(ApiResponse::ok())
}
