//! # Services Module
//!
//! Production implementations of the service traits in [`crate::core::service`].
//!
//! ## Module Overview
//!
//! ```text
//! services/
//! ├── gateway/     - HTTP/JSON canister gateway
//! │                  (StakingService + LedgerService)
//! └── identity.rs  - Browser login through the identity provider
//!                    (IdentityProvider, session persistence)
//! ```
//!
//! ## Wiring
//!
//! ```rust,ignore
//! let config = core_config();
//! let gateway = Arc::new(GatewayClient::new(config)?);
//! let identity = Arc::new(BrowserIdentityProvider::new(config));
//!
//! let state = AppState::new(gateway.clone(), gateway, identity)?.with_config(config);
//! ```
//!
//! ## Error Handling
//!
//! Both services report transport faults as `lib_core::AppError`; the workflows
//! map them onto `OperationError` kinds. Login failures surface as plain
//! strings and become `OperationError::LoginFailed`.

pub mod gateway;
pub mod identity;

pub use gateway::GatewayClient;
pub use identity::BrowserIdentityProvider;
