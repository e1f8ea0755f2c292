//! # Per-Pool Guards
//!
//! - [`InFlightSet`]: at most one mutating workflow per pool. A [`PoolGuard`] is
//!   held for the whole workflow and releases the pool when dropped.
//! - [`RefreshEpochs`]: decides whether a refresh result may still be written to
//!   the caches. Invalidation starts a new epoch for the pool and discards every
//!   refresh already running. A plain refresh additionally yields to
//!   post-success refreshes: it only applies if none ran since it started.

use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Pools with a mutating workflow in flight.
#[derive(Debug, Clone, Default)]
pub struct InFlightSet {
    pools: Arc<Mutex<HashSet<&'static str>>>,
}

impl InFlightSet {
    /// Claim `pool`, or `None` if a workflow already holds it.
    pub fn try_acquire(&self, pool: &'static str) -> Option<PoolGuard> {
        if !self.pools.lock().insert(pool) {
            return None;
        }
        Some(PoolGuard {
            pools: Arc::clone(&self.pools),
            pool,
        })
    }

    pub fn is_in_flight(&self, pool: &str) -> bool {
        self.pools.lock().contains(pool)
    }
}

/// Exclusive claim on a pool; released on drop.
#[derive(Debug)]
pub struct PoolGuard {
    pools: Arc<Mutex<HashSet<&'static str>>>,
    pool: &'static str,
}

impl PoolGuard {
    pub fn pool(&self) -> &'static str {
        self.pool
    }
}

impl Drop for PoolGuard {
    fn drop(&mut self) {
        self.pools.lock().remove(self.pool);
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct EpochState {
    /// Bumped by invalidation only.
    epoch: u64,
    /// Post-success refreshes started so far.
    pins: u64,
    /// Post-success refreshes still running.
    pinned: usize,
}

/// Point in time a plain refresh started at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshStamp {
    epoch: u64,
    pins: u64,
}

/// Per-pool refresh epochs.
#[derive(Debug, Clone, Default)]
pub struct RefreshEpochs {
    pools: Arc<Mutex<HashMap<&'static str, EpochState>>>,
}

impl RefreshEpochs {
    fn state(&self, pool: &str) -> EpochState {
        self.pools.lock().get(pool).copied().unwrap_or_default()
    }

    /// Stamp a plain refresh starts with.
    pub fn current(&self, pool: &'static str) -> RefreshStamp {
        let state = self.state(pool);
        RefreshStamp {
            epoch: state.epoch,
            pins: state.pins,
        }
    }

    /// Whether a plain refresh stamped `started` may apply its result.
    ///
    /// False while a post-success refresh runs, and also when one started and
    /// finished after `started` was taken.
    pub fn may_apply(&self, pool: &'static str, started: RefreshStamp) -> bool {
        let state = self.state(pool);
        state.pinned == 0 && state.epoch == started.epoch && state.pins == started.pins
    }

    /// Start a post-success refresh. Plain refreshes are discarded until the pin drops.
    ///
    /// Pins never invalidate each other; only [`invalidate`](Self::invalidate) does.
    pub fn pin(&self, pool: &'static str) -> RefreshPin {
        let epoch = {
            let mut pools = self.pools.lock();
            let state = pools.entry(pool).or_default();
            state.pins += 1;
            state.pinned += 1;
            state.epoch
        };
        RefreshPin {
            epochs: self.clone(),
            pool,
            epoch,
        }
    }

    /// Start a new epoch so that every refresh already running is discarded.
    pub fn invalidate(&self, pool: &'static str) {
        self.pools.lock().entry(pool).or_default().epoch += 1;
    }

    pub fn invalidate_all(&self) {
        for state in self.pools.lock().values_mut() {
            state.epoch += 1;
        }
    }

    pub fn is_pinned(&self, pool: &str) -> bool {
        self.state(pool).pinned > 0
    }
}

/// An in-flight post-success refresh.
#[derive(Debug)]
pub struct RefreshPin {
    epochs: RefreshEpochs,
    pool: &'static str,
    epoch: u64,
}

impl RefreshPin {
    /// Whether nothing invalidated the pool since the pin was taken.
    pub fn may_apply(&self) -> bool {
        self.epochs.state(self.pool).epoch == self.epoch
    }
}

impl Drop for RefreshPin {
    fn drop(&mut self) {
        if let Some(state) = self.epochs.pools.lock().get_mut(self.pool) {
            state.pinned = state.pinned.saturating_sub(1);
        }
    }
}
