//! # Operation Errors
//!
//! The single error taxonomy every workflow reports through.
//!
//! ## Error Categories
//!
//! - **Precondition** (checked locally, never sent to a remote service):
//!   `NotAuthenticated`, `ZeroAmount`, `InvalidAddress`, `UnknownPool`, `LoginFailed`
//! - **Remote structured** (pass-through of the staking canister's `StakingError`):
//!   `NothingToClaim`, `NoShare`, `Busy`, `InsufficientBalance`, `RaceCondition`,
//!   `TransferTokenFailed`, `UserDoesNotExist`, and `ZeroAmount`
//! - **Step failure** (no structured answer, or a ledger rejection):
//!   `ApproveFailed`, `StakeFailed`, `WithdrawFailed`, `ClaimFailed`, `TransferFailed`,
//!   `RemoteUnavailable`
//!
//! `Busy` doubles as the local answer when a workflow is already in flight for the
//! same pool. Nothing in this crate retries on any of these; a retry is always a new
//! user-initiated call.
//!
//! ## Usage Pattern
//!
//! ```rust
//! use staking::core::error::OperationError;
//!
//! fn describe(result: Result<(), OperationError>) -> &'static str {
//!     match result {
//!         Ok(()) => "done",
//!         Err(e) if e.is_expected() => "nothing to do",
//!         Err(_) => "failed",
//!     }
//! }
//!
//! assert_eq!(describe(Err(OperationError::NothingToClaim)), "nothing to do");
//! ```

use shared::dto::staking::StakingError;
use thiserror::Error;

/// Outcome error of a staking workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum OperationError {
    #[error("not signed in")]
    NotAuthenticated,

    #[error("amount must be greater than zero")]
    ZeroAmount,

    #[error("invalid account identifier")]
    InvalidAddress,

    #[error("unknown pool")]
    UnknownPool,

    #[error("login failed")]
    LoginFailed,

    #[error("no rewards to claim")]
    NothingToClaim,

    #[error("no share in this pool")]
    NoShare,

    #[error("another operation is in progress")]
    Busy,

    #[error("insufficient balance")]
    InsufficientBalance,

    #[error("state changed while the operation was running")]
    RaceCondition,

    #[error("the staking service failed to move tokens")]
    TransferTokenFailed,

    #[error("user has no position in this pool")]
    UserDoesNotExist,

    #[error("token approval failed")]
    ApproveFailed,

    #[error("stake failed")]
    StakeFailed,

    #[error("withdraw failed")]
    WithdrawFailed,

    #[error("claim rewards failed")]
    ClaimFailed,

    #[error("transfer failed")]
    TransferFailed,

    #[error("remote service unavailable")]
    RemoteUnavailable,
}

/// Result of a staking workflow.
pub type OperationResult<T> = std::result::Result<T, OperationError>;

impl OperationError {
    /// An outcome the caller should present as an empty state, not a failure.
    pub fn is_expected(&self) -> bool {
        matches!(self, OperationError::NothingToClaim)
    }

    /// Rejected locally before any remote call.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            OperationError::NotAuthenticated
                | OperationError::ZeroAmount
                | OperationError::InvalidAddress
                | OperationError::UnknownPool
                | OperationError::LoginFailed
        )
    }

    /// Stable machine-readable code.
    pub fn kind(&self) -> &'static str {
        match self {
            OperationError::NotAuthenticated => "NotAuthenticated",
            OperationError::ZeroAmount => "ZeroAmount",
            OperationError::InvalidAddress => "InvalidAddress",
            OperationError::UnknownPool => "UnknownPool",
            OperationError::LoginFailed => "LoginFailed",
            OperationError::NothingToClaim => "NothingToClaim",
            OperationError::NoShare => "NoShare",
            OperationError::Busy => "Busy",
            OperationError::InsufficientBalance => "InsufficientBalance",
            OperationError::RaceCondition => "RaceCondition",
            OperationError::TransferTokenFailed => "TransferTokenFailed",
            OperationError::UserDoesNotExist => "UserDoesNotExist",
            OperationError::ApproveFailed => "ApproveFailed",
            OperationError::StakeFailed => "StakeFailed",
            OperationError::WithdrawFailed => "WithdrawFailed",
            OperationError::ClaimFailed => "ClaimFailed",
            OperationError::TransferFailed => "TransferFailed",
            OperationError::RemoteUnavailable => "RemoteUnavailable",
        }
    }
}

impl From<StakingError> for OperationError {
    fn from(err: StakingError) -> Self {
        match err {
            StakingError::NothingToClaim => OperationError::NothingToClaim,
            StakingError::NoShare => OperationError::NoShare,
            StakingError::Busy => OperationError::Busy,
            StakingError::ZeroAmount => OperationError::ZeroAmount,
            StakingError::InsufficientBalance => OperationError::InsufficientBalance,
            StakingError::RaceCondition => OperationError::RaceCondition,
            StakingError::TransferTokenFailed => OperationError::TransferTokenFailed,
            StakingError::UserDoesNotExist => OperationError::UserDoesNotExist,
        }
    }
}
