//! # Withdraw and Claim Workflows
//!
//! Single-call workflows against the selected pool's staking canister. The
//! canister keeps its early-exit fee itself; [`early_exit_notice`] only exposes
//! the configured rate so it can be shown before a withdrawal.

use crate::app::pools::Pool;
use crate::app::state::AppState;
use crate::app::tasks::{settle, Outcome, OutcomeKind, Prepared};
use crate::core::error::{OperationError, OperationResult};
use crate::core::identity::Caller;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

#[instrument(
    name = "withdraw",
    skip_all,
    fields(pool = prepared.pool.label, amount = %amount, operation_id = %Uuid::new_v4())
)]
pub(crate) async fn withdraw(state: Arc<AppState>, prepared: Prepared, amount: u128) -> OperationResult<Outcome> {
    let caller = Caller::Identity(prepared.identity.clone());

    match state.staking.withdraw(&prepared.pool.service_address, &caller, amount).await {
        Ok(Ok(())) => info!("Withdraw accepted"),
        Ok(Err(e)) => {
            warn!(reason = ?e, "Withdraw rejected");
            return Err(e.into());
        }
        Err(e) => {
            warn!(error = %e, "Withdraw call failed");
            return Err(OperationError::WithdrawFailed);
        }
    }

    Ok(settle(&state, prepared, OutcomeKind::Withdrew { amount }).await)
}

#[instrument(
    name = "claim_rewards",
    skip_all,
    fields(pool = prepared.pool.label, operation_id = %Uuid::new_v4())
)]
pub(crate) async fn claim_rewards(state: Arc<AppState>, prepared: Prepared) -> OperationResult<Outcome> {
    let caller = Caller::Identity(prepared.identity.clone());

    match state.staking.claim_rewards(&prepared.pool.service_address, &caller).await {
        Ok(Ok(())) => info!("Rewards claimed"),
        Ok(Err(e)) => {
            let err = OperationError::from(e);
            if err.is_expected() {
                info!("No rewards to claim");
            } else {
                warn!(reason = ?e, "Claim rejected");
            }
            return Err(err);
        }
        Err(e) => {
            warn!(error = %e, "Claim call failed");
            return Err(OperationError::ClaimFailed);
        }
    }

    Ok(settle(&state, prepared, OutcomeKind::Claimed).await)
}

/// What withdrawing from a pool early costs, for display before a withdrawal.
#[derive(Debug, Clone, PartialEq)]
pub struct EarlyExitNotice {
    pub pool: &'static str,
    pub lock_duration_seconds: u64,
    /// Configured fee rate of the pool, in `[0, 1]`
    pub fee_rate: f64,
    /// Fee the canister last reported, when metadata is cached
    pub reported_fee_basis_points: Option<u32>,
}

impl EarlyExitNotice {
    pub fn fee_percent(&self) -> f64 {
        self.fee_rate * 100.0
    }
}

pub(crate) fn early_exit_notice(state: &AppState, pool: &Pool) -> EarlyExitNotice {
    EarlyExitNotice {
        pool: pool.label,
        lock_duration_seconds: pool.lock_duration_seconds,
        fee_rate: pool.early_exit_fee_rate,
        reported_fee_basis_points: state
            .metadata
            .get(pool.label)
            .map(|m| m.early_exit_fee_basis_points),
    }
}
