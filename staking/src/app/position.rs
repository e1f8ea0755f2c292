//! # User Position Reader
//!
//! Per-pool, per-identity snapshot of the user's wallet balance, staked balance,
//! and pending reward.

use crate::app::metadata::Metadata;
use crate::app::pools::Pool;
use crate::core::error::{OperationError, OperationResult};
use crate::core::identity::{Caller, Identity};
use crate::core::service::{LedgerService, StakingService};
use chrono::{DateTime, Utc};
use lib_utils::time::now_utc;
use parking_lot::RwLock;
use shared::dto::icrc::Account;
use shared::Principal;
use std::collections::HashMap;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    /// Balance of the staked token in the user's wallet
    pub wallet_token_balance: u128,
    pub staked_balance: u128,
    pub pending_reward: u128,
    pub fetched_at: DateTime<Utc>,
}

/// Read a fresh position of `identity` in `pool`.
///
/// The three reads run concurrently; any failure discards the whole snapshot.
pub async fn fetch_position(
    staking: &dyn StakingService,
    ledger: &dyn LedgerService,
    pool: &Pool,
    metadata: &Metadata,
    identity: &Identity,
) -> OperationResult<Position> {
    let owner = identity.principal();
    let caller = Caller::Identity(identity.clone());
    let account = Account::from(*owner);

    let (staked, wallet, pending) = tokio::join!(
        staking.balance_of(&pool.service_address, owner),
        ledger.balance_of(&metadata.staked_token_id, &account),
        staking.pending_rewards(&pool.service_address, &caller),
    );

    match (staked, wallet, pending) {
        (Ok(staked_balance), Ok(wallet_token_balance), Ok(pending_reward)) => {
            debug!(
                pool = pool.label,
                principal = %owner,
                staked_balance,
                wallet_token_balance,
                pending_reward,
                "Position fetched"
            );
            Ok(Position {
                wallet_token_balance,
                staked_balance,
                pending_reward,
                fetched_at: now_utc(),
            })
        }
        (staked, wallet, pending) => {
            let errors = [staked.err(), wallet.err(), pending.err()];
            for error in errors.iter().flatten() {
                warn!(pool = pool.label, principal = %owner, error = %error, "Position read failed");
            }
            Err(OperationError::RemoteUnavailable)
        }
    }
}

/// Read the wallet balance of `identity` on the `token` ledger.
pub async fn fetch_wallet_balance(
    ledger: &dyn LedgerService,
    token: &Principal,
    identity: &Identity,
) -> OperationResult<u128> {
    ledger
        .balance_of(token, &Account::from(*identity.principal()))
        .await
        .map_err(|e| {
            warn!(token = %token, error = %e, "Wallet balance read failed");
            OperationError::RemoteUnavailable
        })
}

/// Cached positions keyed by pool label and principal.
#[derive(Debug, Default)]
pub struct PositionCache {
    entries: RwLock<HashMap<(&'static str, Principal), Position>>,
}

impl PositionCache {
    pub fn get(&self, pool: &'static str, owner: &Principal) -> Option<Position> {
        self.entries.read().get(&(pool, *owner)).cloned()
    }

    pub(crate) fn insert(&self, pool: &'static str, owner: Principal, position: Position) {
        self.entries.write().insert((pool, owner), position);
    }

    /// Overwrite only the wallet balance of a cached position.
    ///
    /// Returns the updated position, or `None` if nothing was cached.
    pub(crate) fn set_wallet_balance(&self, pool: &'static str, owner: &Principal, balance: u128) -> Option<Position> {
        let mut entries = self.entries.write();
        let position = entries.get_mut(&(pool, *owner))?;
        position.wallet_token_balance = balance;
        position.fetched_at = now_utc();
        Some(position.clone())
    }

    /// Drop every position held for `pool`.
    pub fn invalidate_pool(&self, pool: &str) {
        self.entries.write().retain(|(label, _), _| *label != pool);
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}
