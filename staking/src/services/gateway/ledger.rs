//! # Ledger Endpoints
//!
//! ICRC-1 / ICRC-2 methods of a token ledger. Arguments and replies pass
//! through the `Wire*` adapters so `nat` values travel as JSON numbers.

use super::client::{GatewayClient, NO_ARGS};
use crate::core::identity::Caller;
use crate::core::service::RemoteResult;
use shared::dto::icrc::{
    Account, ApproveArgs, ApproveReply, ApproveResult, TransferArg, TransferReply, TransferResult, WireAccount,
    WireApproveArgs, WireTransferArg,
};
use shared::Principal;

pub async fn fee(client: &GatewayClient, ledger: &Principal) -> RemoteResult<u128> {
    client.query(ledger, "icrc1_fee", &Caller::Anonymous, &NO_ARGS).await
}

pub async fn balance_of(client: &GatewayClient, ledger: &Principal, account: &Account) -> RemoteResult<u128> {
    client
        .query(ledger, "icrc1_balance_of", &Caller::Anonymous, &(WireAccount(*account),))
        .await
}

/// Set the allowance of `args.spender` over the caller's account.
pub async fn approve(
    client: &GatewayClient,
    ledger: &Principal,
    caller: &Caller,
    args: ApproveArgs,
) -> RemoteResult<ApproveResult> {
    let reply: ApproveReply = client.update(ledger, "icrc2_approve", caller, &(WireApproveArgs(args),)).await?;
    Ok(reply.into())
}

pub async fn transfer(
    client: &GatewayClient,
    ledger: &Principal,
    caller: &Caller,
    args: TransferArg,
) -> RemoteResult<TransferResult> {
    let reply: TransferReply = client.update(ledger, "icrc1_transfer", caller, &(WireTransferArg(args),)).await?;
    Ok(reply.into())
}
