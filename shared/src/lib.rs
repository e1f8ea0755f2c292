//! # Shared Wire Types Library
//!
//! This library defines the contract between the staking client and the remote
//! services it talks to: ICRC-1/ICRC-2 token ledgers and the locked-pool staking
//! canisters. The schemas are owned by those services; this crate only mirrors
//! them so replies can be decoded into closed Rust types.
//!
//! ## Structure
//!
//! - **[`dto`]**: Wire types
//!   - **[`dto::icrc`]**: Ledger accounts, approve/transfer arguments and their error enums
//!   - **[`dto::staking`]**: Staking canister metadata and `StakingError`
//! - **[`utils`]**: Canister id helpers
//!
//! ## Wire Format
//!
//! Replies use the JSON rendering of Candid values:
//! - Records are objects with the Candid field names (snake_case)
//! - `nat` values are JSON numbers, decoded into `u128` or, in ledger arguments
//!   and replies, `candid::Nat` through the adapters in [`dto::icrc`]
//! - `opt T` is `null` or the value
//! - Variants are externally tagged: `{"Ok": 42}`, `{"Err": {"NothingToClaim": null}}`
//!
//! ```rust
//! use shared::dto::staking::{StakingError, StakingResult};
//!
//! let reply: StakingResult = serde_json::from_str(r#"{"Err":{"NothingToClaim":null}}"#).unwrap();
//! assert_eq!(reply, Err(StakingError::NothingToClaim));
//! ```

pub mod dto;
pub mod utils;

// Re-export commonly used types for convenience
pub use dto::*;
pub use candid::{Nat, Principal};
pub use utils::*;
