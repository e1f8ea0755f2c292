//! # Pool Registry
//!
//! The fixed set of locked staking pools and the currently selected one.
//!
//! Selection changes are published on a `tokio::sync::watch` channel. Dropping
//! the caches of the previously selected pool is the job of
//! [`AppState`](crate::app::state::AppState), not of the registry.

use crate::core::error::{OperationError, OperationResult};
use lib_core::AppError;
use shared::utils::canister_id;
use shared::Principal;
use tokio::sync::watch;

const DAY_SECS: u64 = 24 * 60 * 60;
const YEAR_SECS: u64 = 365 * DAY_SECS;

/// First canister index of the pool deployment; pools occupy consecutive ids.
const FIRST_POOL_CANISTER_INDEX: u64 = 0x3a0;

/// A locked staking pool.
#[derive(Debug, Clone, PartialEq)]
pub struct Pool {
    /// Human-readable, unique pool name (`"30 days"`)
    pub label: &'static str,
    pub lock_duration_seconds: u64,
    pub reward_multiplier: u32,
    /// Fraction of a withdrawal kept as fee before the lock expires, in `[0, 1]`
    pub early_exit_fee_rate: f64,
    /// Staking canister serving this pool
    pub service_address: Principal,
}

impl Pool {
    pub fn new(
        label: &'static str,
        lock_duration_seconds: u64,
        reward_multiplier: u32,
        early_exit_fee_rate: f64,
        service_address: Principal,
    ) -> Self {
        Self {
            label,
            lock_duration_seconds,
            reward_multiplier,
            early_exit_fee_rate,
            service_address,
        }
    }
}

/// The six standard pools, shortest lock first.
pub fn standard_pools() -> Vec<Pool> {
    let terms: [(&'static str, u64, u32, f64); 6] = [
        ("30 days", 30 * DAY_SECS, 1, 0.10),
        ("90 days", 90 * DAY_SECS, 2, 0.15),
        ("180 days", 180 * DAY_SECS, 5, 0.20),
        ("1 year", YEAR_SECS, 10, 0.30),
        ("2 years", 2 * YEAR_SECS, 20, 0.50),
        ("5 years", 5 * YEAR_SECS, 50, 0.70),
    ];

    terms
        .into_iter()
        .zip(FIRST_POOL_CANISTER_INDEX..)
        .map(|((label, lock, multiplier, fee), index)| {
            Pool::new(label, lock, multiplier, fee, canister_id(index))
        })
        .collect()
}

/// Immutable pool list plus the selection.
#[derive(Debug)]
pub struct PoolRegistry {
    pools: Vec<Pool>,
    selected: watch::Sender<Pool>,
}

impl PoolRegistry {
    /// Registry over [`standard_pools`]; "30 days" starts selected.
    pub fn standard() -> Result<Self, AppError> {
        Self::with_pools(standard_pools())
    }

    /// Registry over a custom pool list; the first pool starts selected.
    pub fn with_pools(pools: Vec<Pool>) -> Result<Self, AppError> {
        let first = pools
            .first()
            .cloned()
            .ok_or_else(|| AppError::Config("pool list is empty".to_string()))?;

        for (i, pool) in pools.iter().enumerate() {
            if pools[..i].iter().any(|other| other.label == pool.label) {
                return Err(AppError::Config(format!("duplicate pool label '{}'", pool.label)));
            }
            if !(0.0..=1.0).contains(&pool.early_exit_fee_rate) {
                return Err(AppError::Config(format!(
                    "pool '{}' early exit fee rate {} is outside [0, 1]",
                    pool.label, pool.early_exit_fee_rate
                )));
            }
        }

        let (selected, _) = watch::channel(first);
        Ok(Self { pools, selected })
    }

    pub fn list_pools(&self) -> &[Pool] {
        &self.pools
    }

    pub fn get(&self, label: &str) -> Option<&Pool> {
        self.pools.iter().find(|pool| pool.label == label)
    }

    pub fn selected(&self) -> Pool {
        self.selected.borrow().clone()
    }

    /// Select the pool named `label`.
    pub fn select(&self, label: &str) -> OperationResult<Pool> {
        self.replace_selection(label).map(|(_, pool)| pool)
    }

    /// Select `label`, returning `(previous, current)`.
    pub(crate) fn replace_selection(&self, label: &str) -> OperationResult<(Pool, Pool)> {
        let pool = self.get(label).cloned().ok_or(OperationError::UnknownPool)?;
        let previous = self.selected.send_replace(pool.clone());
        Ok((previous, pool))
    }

    /// Listen for selection changes.
    pub fn subscribe(&self) -> watch::Receiver<Pool> {
        self.selected.subscribe()
    }
}
