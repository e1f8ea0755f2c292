//! # Staking Canister Endpoints
//!
//! Methods of a locked-pool staking canister.

use super::client::{GatewayClient, NO_ARGS};
use crate::core::identity::Caller;
use crate::core::service::RemoteResult;
use shared::dto::staking::{CanisterMetadata, StakingResult};
use shared::Principal;

/// Staked balance of `owner`.
pub async fn balance_of(client: &GatewayClient, pool: &Principal, owner: &Principal) -> RemoteResult<u128> {
    client.query(pool, "balanceOf", &Caller::Anonymous, &(owner,)).await
}

/// Reward claimable by the caller.
pub async fn pending_rewards(client: &GatewayClient, pool: &Principal, caller: &Caller) -> RemoteResult<u128> {
    client.query(pool, "pendingRewards", caller, &NO_ARGS).await
}

pub async fn total_supply(client: &GatewayClient, pool: &Principal) -> RemoteResult<u128> {
    client.query(pool, "totalSupply", &Caller::Anonymous, &NO_ARGS).await
}

pub async fn total_rewards(client: &GatewayClient, pool: &Principal) -> RemoteResult<u128> {
    client.query(pool, "totalRewards", &Caller::Anonymous, &NO_ARGS).await
}

pub async fn get_metadata(client: &GatewayClient, pool: &Principal) -> RemoteResult<CanisterMetadata> {
    client.query(pool, "getMetadata", &Caller::Anonymous, &NO_ARGS).await
}

pub async fn stake(
    client: &GatewayClient,
    pool: &Principal,
    caller: &Caller,
    amount: u128,
    memo: Option<Vec<u8>>,
) -> RemoteResult<StakingResult> {
    client.update(pool, "stake", caller, &(amount, memo)).await
}

pub async fn withdraw(
    client: &GatewayClient,
    pool: &Principal,
    caller: &Caller,
    amount: u128,
) -> RemoteResult<StakingResult> {
    client.update(pool, "withdraw", caller, &(amount,)).await
}

pub async fn claim_rewards(client: &GatewayClient, pool: &Principal, caller: &Caller) -> RemoteResult<StakingResult> {
    client.update(pool, "claimRewards", caller, &NO_ARGS).await
}
