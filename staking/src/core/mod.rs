//! # Core Abstractions
//!
//! Core traits and error types for dependency injection and better testability.
//!
//! ## Modules
//!
//! - **[`error`]**: Workflow error taxonomy (`OperationError`, `OperationResult<T>`)
//! - **[`identity`]**: Signed-in identity and calling context (`Identity`, `Caller`)
//! - **[`service`]**: Service traits for the remote collaborators
//!   (`StakingService`, `LedgerService`, `IdentityProvider`)
//!
//! ## Dependency Injection
//!
//! ```rust,ignore
//! use staking::core::service::{LedgerService, StakingService};
//!
//! // In production: the HTTP gateway
//! let gateway = Arc::new(GatewayClient::new(core_config())?);
//! let staking: Arc<dyn StakingService> = gateway.clone();
//! let ledger: Arc<dyn LedgerService> = gateway;
//!
//! // In tests: mock implementations with call counters
//! let staking: Arc<dyn StakingService> = Arc::new(MockStaking::default());
//! ```

pub mod error;
pub mod identity;
pub mod service;

pub use error::{OperationError, OperationResult};
pub use identity::{Caller, Identity};
pub use service::{IdentityProvider, LedgerService, PendingLogin, RemoteResult, StakingService};
