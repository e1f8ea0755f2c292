//! # Service Traits
//!
//! Narrow contracts for the remote collaborators, enabling dependency injection and
//! mocking in tests.
//!
//! Every method returns `RemoteResult<T>`: the outer `Err` is a transport fault (no
//! structured answer obtained), while structured rejections live inside `T`
//! (`StakingResult`, `ApproveResult`, `TransferResult`).

use crate::core::identity::{Caller, Identity};
use async_trait::async_trait;
use lib_core::AppError;
use shared::dto::icrc::{Account, ApproveArgs, ApproveResult, TransferArg, TransferResult};
use shared::dto::staking::{CanisterMetadata, StakingResult};
use shared::Principal;

pub type RemoteResult<T> = Result<T, AppError>;

/// Operations of a locked-pool staking canister.
///
/// `pool` is the canister the call is addressed to.
#[async_trait]
pub trait StakingService: Send + Sync {
    /// Staked balance of `owner`.
    async fn balance_of(&self, pool: &Principal, owner: &Principal) -> RemoteResult<u128>;

    /// Claimable reward of the caller.
    async fn pending_rewards(&self, pool: &Principal, caller: &Caller) -> RemoteResult<u128>;

    async fn total_supply(&self, pool: &Principal) -> RemoteResult<u128>;

    async fn total_rewards(&self, pool: &Principal) -> RemoteResult<u128>;

    async fn get_metadata(&self, pool: &Principal) -> RemoteResult<CanisterMetadata>;

    /// Pull `amount` from the caller's approved allowance into the pool.
    async fn stake(
        &self,
        pool: &Principal,
        caller: &Caller,
        amount: u128,
        memo: Option<Vec<u8>>,
    ) -> RemoteResult<StakingResult>;

    async fn withdraw(&self, pool: &Principal, caller: &Caller, amount: u128) -> RemoteResult<StakingResult>;

    async fn claim_rewards(&self, pool: &Principal, caller: &Caller) -> RemoteResult<StakingResult>;
}

/// Operations of an ICRC-1 / ICRC-2 token ledger.
#[async_trait]
pub trait LedgerService: Send + Sync {
    async fn fee(&self, ledger: &Principal) -> RemoteResult<u128>;

    async fn balance_of(&self, ledger: &Principal, account: &Account) -> RemoteResult<u128>;

    /// Set (not add to) the allowance of `args.spender`.
    async fn approve(&self, ledger: &Principal, caller: &Caller, args: ApproveArgs) -> RemoteResult<ApproveResult>;

    async fn transfer(&self, ledger: &Principal, caller: &Caller, args: TransferArg) -> RemoteResult<TransferResult>;
}

/// A login handshake that has been started but not yet completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLogin {
    /// Correlates the provider's callback with this attempt.
    pub id: String,
    /// Where the user completes the login.
    pub authorize_url: String,
}

/// External identity provider, driven as `begin_login` followed by `on_result`.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// A still-valid session from a previous run, without prompting the user.
    async fn existing_session(&self) -> Option<Identity>;

    /// Start the redirect handshake.
    async fn begin_login(&self) -> RemoteResult<PendingLogin>;

    /// Wait for the provider to report the outcome of `pending`.
    ///
    /// `Err` carries the provider's reason (failure, cancellation, or timeout).
    async fn on_result(&self, pending: &PendingLogin) -> Result<Identity, String>;

    /// Forget the stored session.
    async fn logout(&self);
}
