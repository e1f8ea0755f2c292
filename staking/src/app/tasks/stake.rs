//! # Deposit Workflow
//!
//! `icrc1_fee` → `icrc2_approve(amount + fee)` → `stake(amount)` → refresh.
//!
//! The approval sets the allowance to exactly `amount + fee`, so repeating a
//! deposit after a failed stake never stacks allowances.

use crate::app::state::AppState;
use crate::app::tasks::{settle, Outcome, OutcomeKind, Prepared};
use crate::core::error::{OperationError, OperationResult};
use crate::core::identity::Caller;
use chrono::Duration;
use lib_utils::time::{now_utc, utc_to_nanos};
use shared::dto::icrc::{Account, ApproveArgs};
use shared::Nat;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

#[instrument(
    name = "deposit",
    skip_all,
    fields(pool = prepared.pool.label, amount = %amount, operation_id = %Uuid::new_v4())
)]
pub(crate) async fn deposit(
    state: Arc<AppState>,
    prepared: Prepared,
    amount: u128,
    memo: Option<Vec<u8>>,
) -> OperationResult<Outcome> {
    let pool = prepared.pool.clone();
    let caller = Caller::Identity(prepared.identity.clone());

    let metadata = state.ensure_metadata(&pool).await?;
    let token = metadata.staked_token_id;

    let fee = state.ledger.fee(&token).await.map_err(|e| {
        warn!(token = %token, error = %e, "Fee query failed");
        OperationError::RemoteUnavailable
    })?;

    let allowance = amount.checked_add(fee).ok_or_else(|| {
        warn!(fee, "Amount plus fee overflows");
        OperationError::ApproveFailed
    })?;

    let args = ApproveArgs {
        from_subaccount: None,
        spender: Account::from(pool.service_address),
        amount: Nat::from(allowance),
        expected_allowance: None,
        expires_at: approval_expiry(state.approval_ttl_secs),
        fee: None,
        memo: None,
        created_at_time: None,
    };

    match state.ledger.approve(&token, &caller, args).await {
        Ok(Ok(block_index)) => info!(block_index = %block_index, allowance, "Allowance approved"),
        Ok(Err(e)) => {
            warn!(error = ?e, "Ledger rejected approval");
            return Err(OperationError::ApproveFailed);
        }
        Err(e) => {
            warn!(error = %e, "Approval call failed");
            return Err(OperationError::ApproveFailed);
        }
    }

    match state.staking.stake(&pool.service_address, &caller, amount, memo).await {
        Ok(Ok(())) => info!("Stake accepted"),
        Ok(Err(e)) => {
            warn!(reason = ?e, "Stake rejected");
            return Err(e.into());
        }
        Err(e) => {
            warn!(error = %e, "Stake call failed");
            return Err(OperationError::StakeFailed);
        }
    }

    Ok(settle(&state, prepared, OutcomeKind::Deposited { amount }).await)
}

/// Ledger timestamp (nanoseconds) at which a new approval lapses.
fn approval_expiry(ttl_secs: u64) -> Option<u64> {
    if ttl_secs == 0 {
        return None;
    }
    let ttl = Duration::try_seconds(i64::try_from(ttl_secs).ok()?)?;
    let at = now_utc().checked_add_signed(ttl)?;
    Some(utc_to_nanos(at))
}
