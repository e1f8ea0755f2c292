//! # Staking Workflows
//!
//! The four mutating workflows: deposit, withdraw, claim, and transfer.
//!
//! ## Execution Model
//!
//! Preconditions and the per-pool [`PoolGuard`] are checked synchronously, before
//! any remote call. The remote part then runs in a tracked task spawned with
//! [`spawn_tracked`]; the caller only awaits its `JoinHandle`. Dropping the caller
//! future therefore never stops a workflow between steps: an approval is always
//! followed by its stake attempt, and a successful mutation is always followed by
//! its cache refresh.
//!
//! Nothing here retries. Every remote call maps to exactly one
//! [`OperationError`] on failure.

pub mod stake;
pub mod transfer;
pub mod withdraw;

use crate::app::guard::PoolGuard;
use crate::app::pools::Pool;
use crate::app::position::Position;
use crate::app::state::AppState;
use crate::core::error::{OperationError, OperationResult};
use crate::core::identity::Identity;
use crate::debug::task_tracker::spawn_tracked;
use shared::dto::icrc::BlockIndex;
use std::future::Future;
use tracing::{debug, error, warn};

/// What a successful workflow did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeKind {
    Deposited { amount: u128 },
    Withdrew { amount: u128 },
    Claimed,
    Transferred { block_index: BlockIndex },
}

/// Success payload of a workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub kind: OutcomeKind,
    /// Position after the post-success refresh, when that refresh succeeded
    pub position: Option<Position>,
}

impl Outcome {
    pub fn position_refreshed(&self) -> bool {
        self.position.is_some()
    }
}

/// A pool workflow that passed its local checks and holds the pool.
pub(crate) struct Prepared {
    pub pool: Pool,
    pub identity: Identity,
    pub guard: PoolGuard,
}

/// Local checks shared by deposit, withdraw, and claim, in order: amount,
/// identity, then the pool guard.
pub(crate) fn prepare(state: &AppState, amount: Option<u128>) -> OperationResult<Prepared> {
    if amount == Some(0) {
        return Err(OperationError::ZeroAmount);
    }

    let identity = state
        .session
        .current_identity()
        .ok_or(OperationError::NotAuthenticated)?;

    let pool = state.selected_pool();
    let guard = state.in_flight.try_acquire(pool.label).ok_or_else(|| {
        debug!(pool = pool.label, "Workflow already in flight");
        OperationError::Busy
    })?;

    Ok(Prepared { pool, identity, guard })
}

/// Refresh after a successful pool workflow and build its outcome.
///
/// Refresh failures are logged and leave `position` empty; they never change
/// the workflow's result.
pub(crate) async fn settle(state: &AppState, prepared: Prepared, kind: OutcomeKind) -> Outcome {
    let position = match state.refresh_pinned(&prepared.pool, &prepared.identity).await {
        Ok(position) => Some(position),
        Err(e) => {
            warn!(pool = prepared.pool.label, error = %e, "Post-success refresh failed");
            None
        }
    };
    drop(prepared.guard);
    Outcome { kind, position }
}

/// Run `workflow` to completion in its own task, independent of the caller.
///
/// A panicked task reports `on_panic`.
pub(crate) async fn run_detached<F>(
    name: &'static str,
    on_panic: OperationError,
    workflow: F,
) -> OperationResult<Outcome>
where
    F: Future<Output = OperationResult<Outcome>> + Send + 'static,
{
    match spawn_tracked(name, workflow).await {
        Ok(result) => result,
        Err(e) => {
            error!(task = name, error = %e, "Workflow task failed");
            Err(on_panic)
        }
    }
}
