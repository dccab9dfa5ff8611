//! Authentication middleware
//!
//! Axum middleware for token verification and role gating.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use shared::{AppError, ErrorCode};

use crate::auth::{JwtService, Principal};
use crate::core::ServerState;
use crate::security_log;

/// Authentication middleware
///
/// Extracts and verifies the JWT from `Authorization: Bearer <token>`,
/// resolves the subject against the user directory, and injects a
/// [`Principal`] into request extensions. Verification is fail-closed:
/// any defect yields 401 and the request never reaches a handler.
///
/// # Paths that skip authentication
///
/// - `OPTIONS *` (CORS preflight)
/// - non-`/api/` paths (they 404 normally)
/// - `/api/auth/login`
/// - `/api/health`
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    let is_public_api_route = path == "/api/auth/login" || path == "/api/health";
    if is_public_api_route {
        return Ok(next.run(req).await);
    }

    let jwt_service = state.get_jwt_service();
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
            return Err(AppError::unauthorized());
        }
    };

    let claims = match jwt_service.validate_token(token) {
        Ok(claims) => claims,
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", req.uri())
            );

            return match e {
                crate::auth::JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            };
        }
    };

    // A valid signature is not enough: the subject must still resolve to
    // an active account.
    if let Err(e) = state.directory().resolve_subject(&claims.sub) {
        security_log!(
            "WARN",
            "auth_subject_rejected",
            subject = claims.sub.clone(),
            code = u16::from(e.code)
        );
        return Err(AppError::unauthorized());
    }

    let principal = Principal::from(claims);
    req.extensions_mut().insert(principal);
    Ok(next.run(req).await)
}

/// Admin middleware
///
/// Gates the org-wide management routes on the ADMIN role.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let principal = req
        .extensions()
        .get::<Principal>()
        .ok_or(AppError::unauthorized())?;

    if !principal.is_admin() {
        security_log!(
            "WARN",
            "admin_required",
            user_id = principal.id.clone(),
            role = principal.role.name()
        );
        return Err(AppError::new(ErrorCode::AdminRequired));
    }

    Ok(next.run(req).await)
}
