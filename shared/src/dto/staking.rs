//! Staking canister types.

use candid::Principal;
use serde::{Deserialize, Serialize};

/// Reply of `getMetadata`.
///
/// `leave_early_fee` is a whole percentage applied by the canister to withdrawals
/// made before the lock expires; `lock_time` is in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanisterMetadata {
    pub token: Principal,
    pub reward: Principal,
    pub fee_recipient: Principal,
    pub leave_early_fee: u128,
    pub lock_time: u64,
}

/// Structured rejection returned by `stake`, `withdraw`, and `claimRewards`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StakingError {
    NothingToClaim,
    NoShare,
    Busy,
    ZeroAmount,
    InsufficientBalance,
    RaceCondition,
    TransferTokenFailed,
    UserDoesNotExist,
}

/// `{"Ok": null}` or `{"Err": {<StakingError>: null}}`.
pub type StakingResult = Result<(), StakingError>;

impl StakingError {
    pub fn all() -> &'static [StakingError] {
        &[
            StakingError::NothingToClaim,
            StakingError::NoShare,
            StakingError::Busy,
            StakingError::ZeroAmount,
            StakingError::InsufficientBalance,
            StakingError::RaceCondition,
            StakingError::TransferTokenFailed,
            StakingError::UserDoesNotExist,
        ]
    }
}
