//! # Gateway Client
//!
//! HTTP client for the canister gateway. Every canister method is one
//! `POST {gateway_url}/api/v1/canister/{canister}/{query|call}/{method}` with
//! the Candid arguments as a JSON array; the reply body is the Candid-JSON
//! rendering of the method's return value.

use crate::core::identity::Caller;
use crate::core::service::{LedgerService, RemoteResult, StakingService};
use lib_core::{AppError, Config};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared::dto::icrc::{Account, ApproveArgs, ApproveResult, TransferArg, TransferResult};
use shared::dto::staking::{CanisterMetadata, StakingResult};
use shared::Principal;
use std::time::Duration;
use tracing::debug;

/// Argument list of a method without parameters.
pub(crate) const NO_ARGS: [(); 0] = [];

/// Read-only queries versus state-changing update calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CallMode {
    Query,
    Update,
}

impl CallMode {
    fn path_segment(self) -> &'static str {
        match self {
            CallMode::Query => "query",
            CallMode::Update => "call",
        }
    }
}

/// HTTP client for communicating with the canister gateway.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    pub(crate) client: Client,
    base_url: String,
}

impl GatewayClient {
    /// Create a client for the gateway configured in `config`.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let timeout = Duration::from_secs(config.http_timeout_secs);
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.gateway_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn endpoint(&self, canister: &Principal, mode: CallMode, method: &str) -> String {
        format!(
            "{}/api/v1/canister/{}/{}/{}",
            self.base_url,
            canister,
            mode.path_segment(),
            method
        )
    }

    /// Invoke `method` on `canister` as `caller` and decode the reply.
    ///
    /// `args` must serialize to a JSON array.
    pub(crate) async fn invoke<A, R>(
        &self,
        canister: &Principal,
        mode: CallMode,
        method: &str,
        caller: &Caller,
        args: &A,
    ) -> RemoteResult<R>
    where
        A: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.endpoint(canister, mode, method);
        debug!(canister = %canister, method, mode = ?mode, caller = %caller.principal(), "Gateway request");

        let mut request = self.client.post(&url).json(args);
        if let Some(identity) = caller.identity() {
            request = request.bearer_auth(identity.delegation());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Rpc(format!("status {} from {}: {}", status, method, body)));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body)
            .map_err(|e| AppError::Decoding(format!("{} reply: {}", method, e)))
    }

    pub(crate) async fn query<A, R>(&self, canister: &Principal, method: &str, caller: &Caller, args: &A) -> RemoteResult<R>
    where
        A: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.invoke(canister, CallMode::Query, method, caller, args).await
    }

    pub(crate) async fn update<A, R>(&self, canister: &Principal, method: &str, caller: &Caller, args: &A) -> RemoteResult<R>
    where
        A: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.invoke(canister, CallMode::Update, method, caller, args).await
    }
}

// Implement StakingService trait for GatewayClient
#[async_trait::async_trait]
impl StakingService for GatewayClient {
    async fn balance_of(&self, pool: &Principal, owner: &Principal) -> RemoteResult<u128> {
        super::staking::balance_of(self, pool, owner).await
    }

    async fn pending_rewards(&self, pool: &Principal, caller: &Caller) -> RemoteResult<u128> {
        super::staking::pending_rewards(self, pool, caller).await
    }

    async fn total_supply(&self, pool: &Principal) -> RemoteResult<u128> {
        super::staking::total_supply(self, pool).await
    }

    async fn total_rewards(&self, pool: &Principal) -> RemoteResult<u128> {
        super::staking::total_rewards(self, pool).await
    }

    async fn get_metadata(&self, pool: &Principal) -> RemoteResult<CanisterMetadata> {
        super::staking::get_metadata(self, pool).await
    }

    async fn stake(
        &self,
        pool: &Principal,
        caller: &Caller,
        amount: u128,
        memo: Option<Vec<u8>>,
    ) -> RemoteResult<StakingResult> {
        super::staking::stake(self, pool, caller, amount, memo).await
    }

    async fn withdraw(&self, pool: &Principal, caller: &Caller, amount: u128) -> RemoteResult<StakingResult> {
        super::staking::withdraw(self, pool, caller, amount).await
    }

    async fn claim_rewards(&self, pool: &Principal, caller: &Caller) -> RemoteResult<StakingResult> {
        super::staking::claim_rewards(self, pool, caller).await
    }
}

// Implement LedgerService trait for GatewayClient
#[async_trait::async_trait]
impl LedgerService for GatewayClient {
    async fn fee(&self, ledger: &Principal) -> RemoteResult<u128> {
        super::ledger::fee(self, ledger).await
    }

    async fn balance_of(&self, ledger: &Principal, account: &Account) -> RemoteResult<u128> {
        super::ledger::balance_of(self, ledger, account).await
    }

    async fn approve(&self, ledger: &Principal, caller: &Caller, args: ApproveArgs) -> RemoteResult<ApproveResult> {
        super::ledger::approve(self, ledger, caller, args).await
    }

    async fn transfer(&self, ledger: &Principal, caller: &Caller, args: TransferArg) -> RemoteResult<TransferResult> {
        super::ledger::transfer(self, ledger, caller, args).await
    }
}
