//! # Wire Types
//!
//! Data structures exchanged with the ledger and staking services.
//!
//! ## Module Organization
//!
//! - [`icrc`] - ICRC-1 / ICRC-2 ledger types
//! - [`staking`] - Staking canister types
//!
//! ## Example JSON Communication
//!
//! ```text
//! POST /api/v1/canister/ryjl3-tyaaa-aaaaa-aaaba-cai/call/icrc2_approve
//! Content-Type: application/json
//!
//! [{
//!   "spender": { "owner": "iznzw-lyaaa-aaaaa-aaoqa-cai", "subaccount": null },
//!   "amount": 100010000,
//!   "from_subaccount": null,
//!   "expected_allowance": null,
//!   "expires_at": null,
//!   "fee": null,
//!   "memo": null,
//!   "created_at_time": null
//! }]
//! ```
//!
//! ```text
//! HTTP/1.1 200 OK
//! Content-Type: application/json
//!
//! { "Ok": 1842 }
//! ```

pub mod icrc;
pub mod staking;

pub use icrc::*;
pub use staking::*;
