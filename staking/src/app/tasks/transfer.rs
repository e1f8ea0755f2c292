//! # Token Transfer Workflow
//!
//! Plain `icrc1_transfer` of any token to any principal. Not tied to a pool and
//! not serialized by the pool guard. Afterwards only the wallet balance of the
//! selected pool's position is re-read, and only when the transferred token is
//! that pool's staked token.

use crate::app::state::AppState;
use crate::app::tasks::{Outcome, OutcomeKind};
use crate::core::error::{OperationError, OperationResult};
use crate::core::identity::{Caller, Identity};
use shared::dto::icrc::{Account, TransferArg};
use shared::{Nat, Principal};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// A transfer that passed its local checks.
pub(crate) struct TransferRequest {
    pub token: Principal,
    pub to: Principal,
    pub amount: u128,
    pub identity: Identity,
}

/// Validate in order: addresses, amount, identity.
pub(crate) fn prepare_transfer(
    state: &AppState,
    token_address: &str,
    to: &str,
    amount: u128,
) -> OperationResult<TransferRequest> {
    let token = parse_address(token_address)?;
    let to = parse_address(to)?;

    if amount == 0 {
        return Err(OperationError::ZeroAmount);
    }

    let identity = state
        .session
        .current_identity()
        .ok_or(OperationError::NotAuthenticated)?;

    Ok(TransferRequest {
        token,
        to,
        amount,
        identity,
    })
}

fn parse_address(text: &str) -> OperationResult<Principal> {
    Principal::from_text(text.trim()).map_err(|e| {
        debug!(address = text, error = %e, "Rejected address");
        OperationError::InvalidAddress
    })
}

#[instrument(
    name = "transfer",
    skip_all,
    fields(token = %request.token, to = %request.to, amount = %request.amount, operation_id = %Uuid::new_v4())
)]
pub(crate) async fn transfer(state: Arc<AppState>, request: TransferRequest) -> OperationResult<Outcome> {
    let caller = Caller::Identity(request.identity.clone());
    let args = TransferArg {
        from_subaccount: None,
        to: Account::from(request.to),
        amount: Nat::from(request.amount),
        fee: None,
        memo: None,
        created_at_time: None,
    };

    let block_index = match state.ledger.transfer(&request.token, &caller, args).await {
        Ok(Ok(block_index)) => {
            info!(block_index = %block_index, "Transfer completed");
            block_index
        }
        Ok(Err(e)) => {
            warn!(error = ?e, "Ledger rejected transfer");
            return Err(OperationError::TransferFailed);
        }
        Err(e) => {
            warn!(error = %e, "Transfer call failed");
            return Err(OperationError::TransferFailed);
        }
    };

    let pool = state.selected_pool();
    let staked_token = state.metadata.get(pool.label).map(|m| m.staked_token_id);
    let position = if staked_token.as_ref() == Some(&request.token) {
        match state.refresh_wallet_balance(&pool, &request.token, &request.identity).await {
            Ok(position) => position,
            Err(e) => {
                warn!(pool = pool.label, error = %e, "Wallet balance refresh failed");
                None
            }
        }
    } else {
        None
    };

    Ok(Outcome {
        kind: OutcomeKind::Transferred { block_index },
        position,
    })
}
