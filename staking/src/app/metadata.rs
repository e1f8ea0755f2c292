//! # Metadata Cache
//!
//! Per-pool snapshot of what the staking canister reports about itself. Entries
//! are only ever replaced wholesale by a refresh, never edited.

use crate::app::pools::Pool;
use crate::core::error::{OperationError, OperationResult};
use crate::core::service::StakingService;
use chrono::{DateTime, Utc};
use lib_utils::time::now_utc;
use parking_lot::RwLock;
use shared::dto::staking::CanisterMetadata;
use shared::Principal;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Remote-reported pool parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    /// Ledger of the token users stake
    pub staked_token_id: Principal,
    /// Ledger of the token rewards are paid in
    pub reward_token_id: Principal,
    pub fee_recipient_id: Principal,
    pub lock_duration_seconds: u64,
    pub early_exit_fee_basis_points: u32,
    pub total_staked: u128,
    pub total_rewards: u128,
    pub fetched_at: DateTime<Utc>,
}

impl Metadata {
    /// Combine a `getMetadata` reply with the pool totals.
    ///
    /// The canister reports the early-exit fee in whole percent.
    pub fn from_wire(wire: CanisterMetadata, total_staked: u128, total_rewards: u128) -> Self {
        let early_exit_fee_basis_points =
            u32::try_from(wire.leave_early_fee.saturating_mul(100)).unwrap_or(u32::MAX);

        Self {
            staked_token_id: wire.token,
            reward_token_id: wire.reward,
            fee_recipient_id: wire.fee_recipient,
            lock_duration_seconds: wire.lock_time,
            early_exit_fee_basis_points,
            total_staked,
            total_rewards,
            fetched_at: now_utc(),
        }
    }
}

/// Read a fresh metadata snapshot for `pool`.
///
/// All three reads are issued; the snapshot is all-or-nothing.
pub async fn fetch_metadata(staking: &dyn StakingService, pool: &Pool) -> OperationResult<Metadata> {
    let address = &pool.service_address;
    let (metadata, total_staked, total_rewards) = tokio::join!(
        staking.get_metadata(address),
        staking.total_supply(address),
        staking.total_rewards(address),
    );

    match (metadata, total_staked, total_rewards) {
        (Ok(metadata), Ok(total_staked), Ok(total_rewards)) => {
            debug!(pool = pool.label, total_staked, total_rewards, "Metadata fetched");
            Ok(Metadata::from_wire(metadata, total_staked, total_rewards))
        }
        (metadata, total_staked, total_rewards) => {
            let errors = [metadata.err(), total_staked.err(), total_rewards.err()];
            for error in errors.iter().flatten() {
                warn!(pool = pool.label, error = %error, "Metadata read failed");
            }
            Err(OperationError::RemoteUnavailable)
        }
    }
}

#[derive(Debug, Default)]
pub struct MetadataCache {
    entries: RwLock<HashMap<&'static str, Metadata>>,
}

impl MetadataCache {
    pub fn get(&self, pool: &str) -> Option<Metadata> {
        self.entries.read().get(pool).cloned()
    }

    pub(crate) fn insert(&self, pool: &'static str, metadata: Metadata) {
        self.entries.write().insert(pool, metadata);
    }

    pub fn invalidate(&self, pool: &str) {
        self.entries.write().remove(pool);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::mocks::{ledger_id, MockStaking};
    use crate::app::pools::PoolRegistry;

    #[tokio::test]
    async fn test_fetch_converts_fee_to_basis_points() {
        let staking = MockStaking::default();
        staking.set_totals(5_000, 700);
        let pool = PoolRegistry::standard().unwrap().selected();

        let metadata = fetch_metadata(&staking, &pool).await.unwrap();
        assert_eq!(metadata.staked_token_id, ledger_id());
        assert_eq!(metadata.early_exit_fee_basis_points, 1_000);
        assert_eq!(metadata.total_staked, 5_000);
        assert_eq!(metadata.total_rewards, 700);
    }

    #[tokio::test]
    async fn test_fetch_is_all_or_nothing() {
        let staking = MockStaking::default();
        staking.fail_reads();
        let pool = PoolRegistry::standard().unwrap().selected();

        assert_eq!(fetch_metadata(&staking, &pool).await, Err(OperationError::RemoteUnavailable));
        assert_eq!(staking.calls("getMetadata"), 1);
        assert_eq!(staking.calls("totalSupply"), 1);
        assert_eq!(staking.calls("totalRewards"), 1);
    }

    #[test]
    fn test_cache_invalidate() {
        let cache = MetadataCache::default();
        let wire = CanisterMetadata {
            token: ledger_id(),
            reward: ledger_id(),
            fee_recipient: Principal::anonymous(),
            leave_early_fee: 15,
            lock_time: 7_776_000,
        };
        cache.insert("90 days", Metadata::from_wire(wire, 0, 0));
        assert_eq!(cache.get("90 days").unwrap().early_exit_fee_basis_points, 1_500);

        cache.invalidate("90 days");
        assert!(cache.get("90 days").is_none());
    }
}
