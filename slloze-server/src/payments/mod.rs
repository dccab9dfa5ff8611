//! Payment method domain logic
//!
//! The reconciliation planner plus the batch dispatcher that carries a
//! plan out against the resource gateway. Per-entry failures never abort
//! the batch; "not implemented" upstream is reported, not raised.

pub mod reconcile;

use futures::future::join_all;
use serde::Serialize;

use shared::models::PaymentMethod;
use shared::{AppResult, ErrorCode};

use crate::gateway::{GatewayError, PaymentScope, ResourceGateway};

pub use reconcile::{ReconcilePlan, reconcile};

/// Outcome of one dispatched batch operation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchItemError {
    /// Which operation failed: "create", "update" or "delete"
    pub op: &'static str,
    /// Entry id where known; creates have none until the gateway answers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub code: u16,
    pub message: String,
}

/// Summary of a dispatched reconcile batch
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    /// Operations the gateway does not support yet
    pub not_implemented: usize,
    /// Operations that failed for any other reason
    pub failed: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<BatchItemError>,
}

impl BatchReport {
    fn record(&mut self, op: &'static str, id: Option<String>, result: Result<(), GatewayError>) {
        match result {
            Ok(()) => match op {
                "create" => self.created += 1,
                "update" => self.updated += 1,
                _ => self.deleted += 1,
            },
            Err(GatewayError::NotImplemented) => {
                self.not_implemented += 1;
                self.errors.push(BatchItemError {
                    op,
                    id,
                    code: ErrorCode::GatewayNotImplemented.code(),
                    message: ErrorCode::GatewayNotImplemented.message().to_string(),
                });
            }
            Err(e) => {
                self.failed += 1;
                let app = shared::AppError::from(e);
                self.errors.push(BatchItemError {
                    op,
                    id,
                    code: app.code.code(),
                    message: app.message,
                });
            }
        }
    }
}

/// Dispatch a reconcile plan against the gateway
///
/// The three operation groups run concurrently within themselves. Every
/// outcome lands in the report; the caller re-reads the collection from
/// the gateway afterwards instead of trusting the plan to have applied.
pub async fn apply_plan(
    gateway: &dyn ResourceGateway,
    scope: &PaymentScope,
    plan: ReconcilePlan,
) -> BatchReport {
    let mut report = BatchReport::default();

    let creates = join_all(
        plan.to_create
            .into_iter()
            .map(|draft| gateway.create_payment_method(scope, draft)),
    )
    .await;
    for result in creates {
        report.record("create", None, result.map(|_| ()));
    }

    let updates = join_all(plan.to_update.into_iter().map(|method| {
        let id = method.id.clone();
        async move { (id, gateway.update_payment_method(scope, method).await) }
    }))
    .await;
    for (id, result) in updates {
        report.record("update", Some(id), result.map(|_| ()));
    }

    let deletes = join_all(plan.to_delete.into_iter().map(|id| async move {
        let result = gateway.delete_payment_method(scope, &id).await;
        (id, result)
    }))
    .await;
    for (id, result) in deletes {
        report.record("delete", Some(id), result);
    }

    report
}

/// Reconcile and dispatch in one step, returning the resulting set
///
/// The returned collection is re-read from the gateway, so it reflects
/// what actually happened rather than what was planned.
pub async fn reconcile_and_apply(
    gateway: &dyn ResourceGateway,
    scope: &PaymentScope,
    client: &[shared::models::PaymentMethodDraft],
) -> AppResult<(BatchReport, Vec<PaymentMethod>)> {
    let server = gateway.list_payment_methods(scope).await?;
    let plan = reconcile::reconcile(&server, client)?;
    let report = apply_plan(gateway, scope, plan).await;
    let methods = gateway.list_payment_methods(scope).await?;
    Ok((report, methods))
}
