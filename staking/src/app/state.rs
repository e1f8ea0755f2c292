//! # Application State
//!
//! [`AppState`] owns everything the workflows share: the session, the pool
//! registry, the metadata and position caches, the per-pool guards, and the
//! injected remote services. It is shared as `Arc<AppState>`; every lock inside
//! is a short `parking_lot` critical section that is never held across `.await`.
//!
//! Caches are written only here, by the refresh methods. A refresh is either:
//!
//! - **plain**: user- or selection-triggered. Its result is dropped if a
//!   post-success refresh for the same pool started in the meantime, or the
//!   pool was invalidated.
//! - **pinned**: issued after a successful mutating workflow. Always applied
//!   unless the pool was invalidated while it ran.

use crate::app::guard::{InFlightSet, RefreshEpochs, RefreshPin};
use crate::app::metadata::{fetch_metadata, Metadata, MetadataCache};
use crate::app::pools::{Pool, PoolRegistry};
use crate::app::position::{fetch_position, fetch_wallet_balance, Position, PositionCache};
use crate::app::session::SessionManager;
use crate::core::error::OperationResult;
use crate::core::identity::Identity;
use crate::core::service::{IdentityProvider, LedgerService, StakingService};
use lib_core::{AppError, Config};
use shared::Principal;
use std::sync::Arc;
use tracing::debug;

pub struct AppState {
    pub session: SessionManager,
    pub registry: PoolRegistry,
    pub metadata: MetadataCache,
    pub positions: PositionCache,
    pub(crate) in_flight: InFlightSet,
    pub(crate) epochs: RefreshEpochs,
    pub(crate) staking: Arc<dyn StakingService>,
    pub(crate) ledger: Arc<dyn LedgerService>,
    /// Lifetime of deposit approvals in seconds; `0` means no expiry
    pub(crate) approval_ttl_secs: u64,
}

impl AppState {
    pub fn new(
        staking: Arc<dyn StakingService>,
        ledger: Arc<dyn LedgerService>,
        identity_provider: Arc<dyn IdentityProvider>,
    ) -> Result<Self, AppError> {
        Ok(Self {
            session: SessionManager::new(identity_provider),
            registry: PoolRegistry::standard()?,
            metadata: MetadataCache::default(),
            positions: PositionCache::default(),
            in_flight: InFlightSet::default(),
            epochs: RefreshEpochs::default(),
            staking,
            ledger,
            approval_ttl_secs: 0,
        })
    }

    /// Apply the settings of `config` that the workflows use.
    pub fn with_config(mut self, config: &Config) -> Self {
        self.approval_ttl_secs = config.approval_ttl_secs;
        self
    }

    pub fn with_registry(mut self, registry: PoolRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_approval_ttl(mut self, secs: u64) -> Self {
        self.approval_ttl_secs = secs;
        self
    }

    pub fn selected_pool(&self) -> Pool {
        self.registry.selected()
    }

    /// Whether a deposit, withdraw, or claim is running on `pool`.
    pub fn is_busy(&self, pool: &str) -> bool {
        self.in_flight.is_in_flight(pool)
    }

    /// Cached position of the signed-in user in `pool`.
    pub fn position(&self, pool: &Pool) -> Option<Position> {
        let identity = self.session.current_identity()?;
        self.positions.get(pool.label, identity.principal())
    }

    /// Drop cached metadata and positions of `pool`, discarding refreshes still running for it.
    pub fn invalidate_pool(&self, pool: &Pool) {
        self.epochs.invalidate(pool.label);
        self.metadata.invalidate(pool.label);
        self.positions.invalidate_pool(pool.label);
        debug!(pool = pool.label, "Pool caches invalidated");
    }

    /// Drop every cached position.
    pub fn clear_positions(&self) {
        self.epochs.invalidate_all();
        self.positions.clear();
    }

    // region:    --- Metadata

    pub async fn refresh_metadata(&self, pool: &Pool) -> OperationResult<Metadata> {
        let started = self.epochs.current(pool.label);
        let metadata = fetch_metadata(self.staking.as_ref(), pool).await?;

        if self.epochs.may_apply(pool.label, started) {
            self.metadata.insert(pool.label, metadata.clone());
        } else {
            debug!(pool = pool.label, "Discarding superseded metadata refresh");
        }
        Ok(metadata)
    }

    /// Cached metadata of `pool`, fetched first if absent.
    pub async fn ensure_metadata(&self, pool: &Pool) -> OperationResult<Metadata> {
        match self.metadata.get(pool.label) {
            Some(metadata) => Ok(metadata),
            None => self.refresh_metadata(pool).await,
        }
    }

    // endregion: --- Metadata

    // region:    --- Position

    pub async fn refresh_position(&self, pool: &Pool, identity: &Identity) -> OperationResult<Position> {
        let started = self.epochs.current(pool.label);
        let metadata = self.ensure_metadata(pool).await?;
        let position =
            fetch_position(self.staking.as_ref(), self.ledger.as_ref(), pool, &metadata, identity).await?;

        if self.epochs.may_apply(pool.label, started) {
            self.positions.insert(pool.label, *identity.principal(), position.clone());
        } else {
            debug!(pool = pool.label, "Discarding superseded position refresh");
        }
        Ok(position)
    }

    /// Post-success refresh of `pool`: totals and the user's position.
    pub(crate) async fn refresh_pinned(&self, pool: &Pool, identity: &Identity) -> OperationResult<Position> {
        let pin = self.epochs.pin(pool.label);

        let metadata = fetch_metadata(self.staking.as_ref(), pool).await?;
        let position =
            fetch_position(self.staking.as_ref(), self.ledger.as_ref(), pool, &metadata, identity).await?;

        self.apply_pinned(&pin, pool, |state| {
            state.metadata.insert(pool.label, metadata);
            state.positions.insert(pool.label, *identity.principal(), position.clone());
        });
        Ok(position)
    }

    /// Re-read only the wallet balance of `token` into the cached position of `pool`.
    ///
    /// Returns the refreshed position, or `None` if no position was cached.
    pub async fn refresh_wallet_balance(
        &self,
        pool: &Pool,
        token: &Principal,
        identity: &Identity,
    ) -> OperationResult<Option<Position>> {
        let pin = self.epochs.pin(pool.label);
        let balance = fetch_wallet_balance(self.ledger.as_ref(), token, identity).await?;

        let mut updated = None;
        self.apply_pinned(&pin, pool, |state| {
            updated = state.positions.set_wallet_balance(pool.label, identity.principal(), balance);
        });
        Ok(updated)
    }

    fn apply_pinned(&self, pin: &RefreshPin, pool: &Pool, apply: impl FnOnce(&Self)) {
        if pin.may_apply() {
            apply(self);
        } else {
            debug!(pool = pool.label, "Pool invalidated during post-success refresh");
        }
    }

    // endregion: --- Position
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::mocks::{test_identity, MockLedger, MockProvider, MockStaking};
    use crate::core::error::OperationError;

    fn state() -> (Arc<MockStaking>, Arc<MockLedger>, AppState) {
        let staking = Arc::new(MockStaking::default());
        let ledger = Arc::new(MockLedger::default());
        let state = AppState::new(staking.clone(), ledger.clone(), Arc::new(MockProvider::default())).unwrap();
        (staking, ledger, state)
    }

    #[tokio::test]
    async fn test_refresh_position_caches() {
        let (staking, _ledger, state) = state();
        let identity = test_identity();
        let pool = state.selected_pool();
        staking.set_staked(&pool, identity.principal(), 50);

        state.refresh_position(&pool, &identity).await.unwrap();
        let cached = state.positions.get(pool.label, identity.principal()).unwrap();
        assert_eq!(cached.staked_balance, 50);
        assert!(state.metadata.get(pool.label).is_some());
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_snapshot() {
        let (staking, _ledger, state) = state();
        let identity = test_identity();
        let pool = state.selected_pool();
        staking.set_staked(&pool, identity.principal(), 50);
        state.refresh_position(&pool, &identity).await.unwrap();

        staking.set_staked(&pool, identity.principal(), 80);
        staking.fail_reads();
        assert_eq!(
            state.refresh_position(&pool, &identity).await,
            Err(OperationError::RemoteUnavailable)
        );
        assert_eq!(state.positions.get(pool.label, identity.principal()).unwrap().staked_balance, 50);
        assert!(state.metadata.get(pool.label).is_some());
    }

    #[tokio::test]
    async fn test_plain_refresh_not_applied_while_pinned() {
        let (staking, _ledger, state) = state();
        let identity = test_identity();
        let pool = state.selected_pool();
        staking.set_staked(&pool, identity.principal(), 10);

        let pin = state.epochs.pin(pool.label);
        let read = state.refresh_position(&pool, &identity).await.unwrap();
        assert_eq!(read.staked_balance, 10);
        assert!(state.positions.get(pool.label, identity.principal()).is_none());
        drop(pin);

        state.refresh_pinned(&pool, &identity).await.unwrap();
        assert_eq!(state.positions.get(pool.label, identity.principal()).unwrap().staked_balance, 10);
    }

    #[tokio::test]
    async fn test_invalidate_pool() {
        let (_staking, _ledger, state) = state();
        let identity = test_identity();
        let pool = state.selected_pool();
        state.refresh_position(&pool, &identity).await.unwrap();

        state.invalidate_pool(&pool);
        assert!(state.metadata.get(pool.label).is_none());
        assert!(state.positions.get(pool.label, identity.principal()).is_none());
    }

    #[tokio::test]
    async fn test_refresh_wallet_balance_only_touches_wallet() {
        let (staking, ledger, state) = state();
        let identity = test_identity();
        let pool = state.selected_pool();
        staking.set_staked(&pool, identity.principal(), 5);
        ledger.set_balance(identity.principal(), 100);
        state.refresh_position(&pool, &identity).await.unwrap();

        staking.set_staked(&pool, identity.principal(), 999);
        ledger.set_balance(identity.principal(), 60);
        let metadata = state.metadata.get(pool.label).unwrap();
        let position = state
            .refresh_wallet_balance(&pool, &metadata.staked_token_id, &identity)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(position.wallet_token_balance, 60);
        assert_eq!(position.staked_balance, 5);
    }
}
