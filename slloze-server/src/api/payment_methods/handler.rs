//! Payment method handlers
//!
//! Single-entry operations enforce the primary invariant inline; the
//! batch PUT goes through the reconciliation planner. Either way the
//! response reflects a re-read from the gateway, never the plan.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Serialize;

use shared::models::{PaymentMethod, PaymentMethodDraft};
use shared::{ApiResponse, AppError, AppResult, ErrorCode};

use crate::auth::Principal;
use crate::core::ServerState;
use crate::gateway::PaymentScope;
use crate::payments::{self, BatchReport};

/// Batch reconcile response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileResponse {
    pub report: BatchReport,
    /// The collection as it stands after the batch
    pub methods: Vec<PaymentMethod>,
}

// ==================== Own wallet ====================

pub async fn list_own(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
) -> AppResult<ApiResponse<Vec<PaymentMethod>>> {
    let scope = PaymentScope::User(principal.id.clone());
    list(&state, &scope).await
}

pub async fn create_own(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    Json(draft): Json<PaymentMethodDraft>,
) -> AppResult<ApiResponse<PaymentMethod>> {
    let scope = PaymentScope::User(principal.id.clone());
    create(&state, &scope, draft).await
}

pub async fn update_own(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    Json(draft): Json<PaymentMethodDraft>,
) -> AppResult<ApiResponse<PaymentMethod>> {
    let scope = PaymentScope::User(principal.id.clone());
    update(&state, &scope, id, draft).await
}

pub async fn delete_own(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    let scope = PaymentScope::User(principal.id.clone());
    delete(&state, &scope, id).await
}

pub async fn reconcile_own(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    Json(drafts): Json<Vec<PaymentMethodDraft>>,
) -> AppResult<ApiResponse<ReconcileResponse>> {
    let scope = PaymentScope::User(principal.id.clone());
    reconcile(&state, &scope, drafts).await
}

// ==================== Org-wide set (admin) ====================

pub async fn list_global(
    State(state): State<ServerState>,
) -> AppResult<ApiResponse<Vec<PaymentMethod>>> {
    list(&state, &PaymentScope::Global).await
}

pub async fn create_global(
    State(state): State<ServerState>,
    Json(draft): Json<PaymentMethodDraft>,
) -> AppResult<ApiResponse<PaymentMethod>> {
    create(&state, &PaymentScope::Global, draft).await
}

pub async fn update_global(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(draft): Json<PaymentMethodDraft>,
) -> AppResult<ApiResponse<PaymentMethod>> {
    update(&state, &PaymentScope::Global, id, draft).await
}

pub async fn delete_global(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    delete(&state, &PaymentScope::Global, id).await
}

pub async fn reconcile_global(
    State(state): State<ServerState>,
    Json(drafts): Json<Vec<PaymentMethodDraft>>,
) -> AppResult<ApiResponse<ReconcileResponse>> {
    reconcile(&state, &PaymentScope::Global, drafts).await
}

// ==================== Shared implementations ====================

async fn list(
    state: &ServerState,
    scope: &PaymentScope,
) -> AppResult<ApiResponse<Vec<PaymentMethod>>> {
    let methods = state.gateway().list_payment_methods(scope).await?;
    Ok(ApiResponse::success(methods))
}

/// Create one method
///
/// The first entry in an empty set becomes primary no matter what was
/// submitted; a new primary demotes the current one.
async fn create(
    state: &ServerState,
    scope: &PaymentScope,
    mut draft: PaymentMethodDraft,
) -> AppResult<ApiResponse<PaymentMethod>> {
    draft.validate()?;
    draft.id = None;

    let existing = state.gateway().list_payment_methods(scope).await?;
    if existing.is_empty() {
        draft.is_primary = true;
    }

    let created = state.gateway().create_payment_method(scope, draft).await?;

    if created.is_primary {
        demote_others(state, scope, &existing, &created.id).await?;
    }

    Ok(ApiResponse::success(created))
}

/// Update one method
async fn update(
    state: &ServerState,
    scope: &PaymentScope,
    id: String,
    draft: PaymentMethodDraft,
) -> AppResult<ApiResponse<PaymentMethod>> {
    draft.validate()?;

    let existing = state.gateway().list_payment_methods(scope).await?;
    let current = existing
        .iter()
        .find(|m| m.id == id)
        .ok_or_else(|| AppError::new(ErrorCode::PaymentMethodNotFound))?;

    // The set must keep exactly one primary: un-marking the current
    // primary without a successor is rejected, swapping via a new
    // primary is handled below.
    if current.is_primary && !draft.is_primary {
        return Err(AppError::invalid_request(
            "Designate another primary payment method first",
        ));
    }

    let updated = state
        .gateway()
        .update_payment_method(scope, draft.into_method(id))
        .await
        .map_err(|e| e.not_found_as(ErrorCode::PaymentMethodNotFound))?;

    if updated.is_primary {
        demote_others(state, scope, &existing, &updated.id).await?;
    }

    Ok(ApiResponse::success(updated))
}

/// Delete one method
///
/// The primary cannot be deleted this way; swapping the primary and
/// deleting in one step is what the batch PUT is for.
async fn delete(
    state: &ServerState,
    scope: &PaymentScope,
    id: String,
) -> AppResult<ApiResponse<()>> {
    let existing = state.gateway().list_payment_methods(scope).await?;
    let current = existing
        .iter()
        .find(|m| m.id == id)
        .ok_or_else(|| AppError::new(ErrorCode::PaymentMethodNotFound))?;

    if current.is_primary {
        return Err(AppError::new(ErrorCode::SolePrimaryDeletion));
    }

    state
        .gateway()
        .delete_payment_method(scope, &id)
        .await
        .map_err(|e| e.not_found_as(ErrorCode::PaymentMethodNotFound))?;

    Ok(ApiResponse::ok())
}

/// Batch reconcile
async fn reconcile(
    state: &ServerState,
    scope: &PaymentScope,
    drafts: Vec<PaymentMethodDraft>,
) -> AppResult<ApiResponse<ReconcileResponse>> {
    let (report, methods) =
        payments::reconcile_and_apply(state.gateway(), scope, &drafts).await?;
    Ok(ApiResponse::success(ReconcileResponse { report, methods }))
}

async fn demote_others(
    state: &ServerState,
    scope: &PaymentScope,
    existing: &[PaymentMethod],
    keep_id: &str,
) -> AppResult<()> {
    for method in existing {
        if method.is_primary && method.id != keep_id {
            let mut demoted = method.clone();
            demoted.is_primary = false;
            state
                .gateway()
                .update_payment_method(scope, demoted)
                .await?;
        }
    }
    Ok(())
}
