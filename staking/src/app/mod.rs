//! # Application Orchestrator
//!
//! [`App`] is the entry point for a front end: it owns the shared [`AppState`]
//! and exposes the session, pool, refresh, and workflow operations.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Front end (CLI, GUI, ...)                                   │
//! │     app.deposit(amount).await                                │
//! └──────────────┬───────────────────────────────────────────────┘
//!                │
//! ┌──────────────▼───────────────────────────────────────────────┐
//! │  App                                                          │
//! │  - handlers: login/logout, select_pool, refresh_*            │
//! │  - tasks:    deposit, withdraw, claim_rewards, transfer      │
//! └──────────────┬───────────────────────────────────────────────┘
//!                │ Arc<AppState>
//! ┌──────────────▼───────────────────────────────────────────────┐
//! │  AppState                                                     │
//! │  - SessionManager, PoolRegistry                              │
//! │  - MetadataCache, PositionCache (parking_lot::RwLock)        │
//! │  - InFlightSet, RefreshEpochs                                │
//! │  - Arc<dyn StakingService>, Arc<dyn LedgerService>           │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Components
//!
//! - **[`App`]**: Cloneable handle over `Arc<AppState>`
//! - **[`state`]**: Shared state and the cache refresh rules
//! - **[`handlers`]**: Session lifecycle and pool selection
//! - **[`tasks`]**: The mutating workflows, each run in its own tracked task
//!
//! ## Usage
//!
//! ```rust,ignore
//! let app = App::new(AppState::new(staking, ledger, identity_provider)?);
//!
//! if app.start().await.is_none() {
//!     app.login().await?;
//! }
//! app.select_pool("90 days").await?;
//!
//! match app.claim_rewards().await {
//!     Ok(outcome) => println!("claimed, position: {:?}", outcome.position),
//!     Err(e) if e.is_expected() => println!("nothing to claim yet"),
//!     Err(e) => eprintln!("claim failed: {}", e),
//! }
//! ```

pub mod guard;
pub mod handlers;
pub mod metadata;
pub mod pools;
pub mod position;
pub mod session;
pub mod state;
pub mod tasks;

#[cfg(test)]
pub(crate) mod mocks;

pub use metadata::Metadata;
pub use pools::{Pool, PoolRegistry};
pub use position::Position;
pub use state::AppState;
pub use tasks::withdraw::EarlyExitNotice;
pub use tasks::{Outcome, OutcomeKind};

use crate::core::error::{OperationError, OperationResult};
use crate::core::identity::Identity;
use std::sync::Arc;

#[derive(Clone)]
pub struct App {
    state: Arc<AppState>,
}

impl App {
    pub fn new(state: AppState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    // region:    --- Session

    /// Restore a stored session, loading the selected pool's position for it.
    pub async fn start(&self) -> Option<Identity> {
        handlers::session::handle_start(&self.state).await
    }

    pub async fn login(&self) -> OperationResult<Identity> {
        handlers::session::handle_login(&self.state).await
    }

    pub async fn logout(&self) {
        handlers::session::handle_logout(&self.state).await
    }

    pub fn current_identity(&self) -> Option<Identity> {
        self.state.session.current_identity()
    }

    // endregion: --- Session

    // region:    --- Pools

    pub fn list_pools(&self) -> &[Pool] {
        self.state.registry.list_pools()
    }

    pub fn selected_pool(&self) -> Pool {
        self.state.selected_pool()
    }

    pub async fn select_pool(&self, label: &str) -> OperationResult<Pool> {
        handlers::pools::handle_select_pool(&self.state, label).await
    }

    pub async fn refresh_metadata(&self) -> OperationResult<Metadata> {
        handlers::pools::handle_refresh_metadata(&self.state).await
    }

    pub async fn refresh_position(&self) -> OperationResult<Position> {
        handlers::pools::handle_refresh_position(&self.state).await
    }

    /// Cached metadata of the selected pool.
    pub fn metadata(&self) -> Option<Metadata> {
        self.state.metadata.get(self.state.selected_pool().label)
    }

    /// Cached position of the signed-in user in the selected pool.
    pub fn position(&self) -> Option<Position> {
        self.state.position(&self.state.selected_pool())
    }

    pub fn early_exit_notice(&self) -> EarlyExitNotice {
        tasks::withdraw::early_exit_notice(&self.state, &self.state.selected_pool())
    }

    // endregion: --- Pools

    // region:    --- Workflows

    /// Stake `amount` into the selected pool.
    pub async fn deposit(&self, amount: u128) -> OperationResult<Outcome> {
        self.deposit_with_memo(amount, None).await
    }

    pub async fn deposit_with_memo(&self, amount: u128, memo: Option<Vec<u8>>) -> OperationResult<Outcome> {
        let prepared = tasks::prepare(&self.state, Some(amount))?;
        let state = Arc::clone(&self.state);
        tasks::run_detached(
            "deposit",
            OperationError::StakeFailed,
            tasks::stake::deposit(state, prepared, amount, memo),
        )
        .await
    }

    /// Withdraw `amount` of staked principal from the selected pool.
    pub async fn withdraw(&self, amount: u128) -> OperationResult<Outcome> {
        let prepared = tasks::prepare(&self.state, Some(amount))?;
        let state = Arc::clone(&self.state);
        tasks::run_detached(
            "withdraw",
            OperationError::WithdrawFailed,
            tasks::withdraw::withdraw(state, prepared, amount),
        )
        .await
    }

    /// Claim pending rewards of the selected pool.
    pub async fn claim_rewards(&self) -> OperationResult<Outcome> {
        let prepared = tasks::prepare(&self.state, None)?;
        let state = Arc::clone(&self.state);
        tasks::run_detached(
            "claim_rewards",
            OperationError::ClaimFailed,
            tasks::withdraw::claim_rewards(state, prepared),
        )
        .await
    }

    /// Send `amount` of the token at `token_address` to the principal `to`.
    pub async fn transfer(&self, token_address: &str, to: &str, amount: u128) -> OperationResult<Outcome> {
        let request = tasks::transfer::prepare_transfer(&self.state, token_address, to, amount)?;
        let state = Arc::clone(&self.state);
        tasks::run_detached(
            "transfer",
            OperationError::TransferFailed,
            tasks::transfer::transfer(state, request),
        )
        .await
    }

    // endregion: --- Workflows
}
