//! Payment method reconciliation
//!
//! Diffs a client-submitted collection against the server copy into
//! create/update/delete batches, repairing the primary flag so the
//! resulting set never has zero or multiple primaries while non-empty.
//!
//! The whole computation is a pure function of the two input sets, so
//! submitting the same edit twice yields an empty plan the second time.

use std::collections::{HashMap, HashSet};

use shared::models::{PaymentMethod, PaymentMethodDraft};
use shared::{AppError, AppResult, ErrorCode};

/// Batched outcome of reconciling a collection edit
///
/// The three lists are disjoint: an entry is created, updated or deleted,
/// never two of those.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcilePlan {
    /// New entries, in submission order; the gateway assigns their ids
    pub to_create: Vec<PaymentMethodDraft>,
    /// Entries whose fields changed, carrying their server ids
    pub to_update: Vec<PaymentMethod>,
    /// Server ids absent from the submission
    pub to_delete: Vec<String>,
}

impl ReconcilePlan {
    /// Whether the edit changes nothing
    pub fn is_noop(&self) -> bool {
        self.to_create.is_empty() && self.to_update.is_empty() && self.to_delete.is_empty()
    }
}

/// Reconcile a submitted collection against the server copy
///
/// Entries without an id, or with an id unknown to the server, are
/// treated as new. Server entries missing from the submission are
/// deleted. Deleting the sole primary is rejected unless the submission
/// designates a replacement primary.
pub fn reconcile(
    server: &[PaymentMethod],
    client: &[PaymentMethodDraft],
) -> AppResult<ReconcilePlan> {
    for draft in client {
        draft.validate()?;
    }

    let server_by_id: HashMap<&str, &PaymentMethod> =
        server.iter().map(|m| (m.id.as_str(), m)).collect();

    // Survivors are the desired final set, in submission order. Ids the
    // server does not know are dropped so the gateway assigns fresh ones.
    let mut survivors: Vec<PaymentMethodDraft> = Vec::with_capacity(client.len());
    let mut seen_ids: HashSet<String> = HashSet::new();
    for draft in client {
        let mut draft = draft.clone();
        match &draft.id {
            Some(id) if server_by_id.contains_key(id.as_str()) => {
                if !seen_ids.insert(id.clone()) {
                    return Err(AppError::validation(format!(
                        "Payment method {} appears more than once",
                        id
                    )));
                }
            }
            Some(_) => draft.id = None,
            None => {}
        }
        survivors.push(draft);
    }

    let to_delete: Vec<String> = server
        .iter()
        .filter(|m| !seen_ids.contains(&m.id))
        .map(|m| m.id.clone())
        .collect();

    // Deleting the primary is only allowed when the submission names a
    // replacement; otherwise the set would be left primary-less by intent
    // rather than by accident, and that is rejected before dispatch.
    let deleting_primary = server
        .iter()
        .any(|m| m.is_primary && to_delete.contains(&m.id));
    if deleting_primary && !survivors.iter().any(|d| d.is_primary) {
        return Err(AppError::new(ErrorCode::SolePrimaryDeletion));
    }

    repair_primary(&mut survivors, &server_by_id);

    let mut plan = ReconcilePlan {
        to_delete,
        ..Default::default()
    };

    for draft in survivors {
        match &draft.id {
            None => plan.to_create.push(draft),
            Some(id) => {
                // Keyed survivors always resolve; the id was checked above
                if let Some(current) = server_by_id.get(id.as_str())
                    && current.projection() != draft.projection()
                {
                    plan.to_update.push(draft.clone().into_method(id.clone()));
                }
            }
        }
    }

    Ok(plan)
}

/// Repair the primary flag over the desired final set
///
/// Leaves exactly one primary whenever the set is non-empty. With more
/// than one primary, a newly designated one wins over one that was
/// already primary on the server; ties break to the lowest id, with new
/// entries after keyed ones in submission order. With none, the same
/// ordering picks the entry to promote.
fn repair_primary(
    survivors: &mut [PaymentMethodDraft],
    server_by_id: &HashMap<&str, &PaymentMethod>,
) {
    if survivors.is_empty() {
        return;
    }

    let rank = |idx: usize, draft: &PaymentMethodDraft| -> (u8, String, usize) {
        match &draft.id {
            Some(id) => (0, id.clone(), idx),
            None => (1, String::new(), idx),
        }
    };

    let primaries: Vec<usize> = survivors
        .iter()
        .enumerate()
        .filter(|(_, d)| d.is_primary)
        .map(|(i, _)| i)
        .collect();

    let winner = match primaries.len() {
        1 => return,
        0 => survivors
            .iter()
            .enumerate()
            .min_by_key(|(i, d)| rank(*i, d))
            .map(|(i, _)| i),
        _ => {
            let newly: Vec<usize> = primaries
                .iter()
                .copied()
                .filter(|&i| match &survivors[i].id {
                    Some(id) => server_by_id
                        .get(id.as_str())
                        .is_none_or(|m| !m.is_primary),
                    None => true,
                })
                .collect();
            let pool = if newly.is_empty() { &primaries } else { &newly };
            pool.iter()
                .copied()
                .min_by_key(|&i| rank(i, &survivors[i]))
        }
    };

    if let Some(winner) = winner {
        for (i, draft) in survivors.iter_mut().enumerate() {
            draft.is_primary = i == winner;
        }
    }
}
