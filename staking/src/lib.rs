//! # Locked-Pool Staking Client - Library Root
//!
//! Orchestration core for staking a fungible token into fixed-duration locked
//! pools: deposit, withdraw, claim rewards, and token transfers against an
//! ICRC-1/ICRC-2 ledger and per-pool staking canisters.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │              staking (this crate)                      │
//! ├────────────────────────────────────────────────────────┤
//! │  app        - AppState, pool registry, caches,         │
//! │               session, deposit/withdraw/claim/transfer │
//! │  core       - Service traits, OperationError, Identity │
//! │  services   - HTTP gateway, browser identity provider  │
//! │  debug      - tracing setup, tracked task spawning     │
//! └────────────────────────────────────────────────────────┘
//!          │                              │
//!          │ HTTP/JSON                    │ Browser redirect
//!          ▼                              ▼
//! ┌─────────────────┐          ┌──────────────────────────┐
//! │ Canister gateway│          │   Identity provider      │
//! │ ledger, pools   │          │   callback on 127.0.0.1  │
//! └─────────────────┘          └──────────────────────────┘
//! ```
//!
//! ## Module Dependency Graph
//!
//! ```text
//! app
//!   ├── core::service (StakingService, LedgerService, IdentityProvider)
//!   ├── core::error (OperationError)
//!   └── debug::task_tracker (workflow tasks)
//!
//! services
//!   ├── core::service (trait implementations)
//!   └── lib_core (Config, AppError)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use staking::{App, AppState, BrowserIdentityProvider, GatewayClient};
//!
//! let _log_guard = staking::debug::init()?;
//! lib_core::init_config()?;
//! let config = lib_core::core_config();
//!
//! let gateway = Arc::new(GatewayClient::new(config)?);
//! let identity = Arc::new(BrowserIdentityProvider::new(config));
//! let app = App::new(AppState::new(gateway.clone(), gateway, identity)?.with_config(config));
//!
//! if app.start().await.is_none() {
//!     app.login().await?;
//! }
//! app.select_pool("1 year").await?;
//! let outcome = app.deposit(100_000_000).await?;
//! ```
//!
//! ## Testing
//!
//! Every module carries its own `#[cfg(test)]` tests; workflows run against the
//! mock services in `app::mocks`, the gateway against an in-process `axum` fake.

pub mod app;
pub mod core;
pub mod debug;
pub mod services;

// Re-export the main entry points
pub use app::{App, AppState, EarlyExitNotice, Metadata, Outcome, OutcomeKind, Pool, Position};
pub use core::{Caller, Identity, OperationError, OperationResult};
pub use services::{BrowserIdentityProvider, GatewayClient};
