//! # Canister Gateway
//!
//! Production [`StakingService`](crate::core::service::StakingService) and
//! [`LedgerService`](crate::core::service::LedgerService) over HTTP/JSON.
//!
//! ## Module Organization
//!
//! - [`client`] - `GatewayClient`, request plumbing and trait implementations
//! - [`staking`] - Staking canister methods
//! - [`ledger`] - ICRC-1 / ICRC-2 ledger methods
//!
//! ## Failure Classification
//!
//! Connection failures, timeouts, non-2xx statuses, and bodies that do not
//! decode are all transport faults (`AppError`). A decoded `{"Err": ...}` reply
//! is a structured answer and is returned inside `Ok`.

pub mod client;
pub mod ledger;
pub mod staking;

pub use client::GatewayClient;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identity::{Caller, Identity};
    use crate::core::service::{LedgerService, StakingService};
    use axum::extract::{Path, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use lib_core::{AppError, Config};
    use parking_lot::Mutex;
    use serde_json::{json, Value};
    use shared::dto::icrc::{Account, TransferArg, TransferError};
    use shared::utils::canister_id;
    use shared::dto::staking::StakingError;
    use shared::{Nat, Principal};
    use std::sync::Arc;

    /// What the fake gateway saw for one request.
    #[derive(Debug, Clone)]
    struct Seen {
        canister: String,
        mode: String,
        method: String,
        auth: Option<String>,
        body: Value,
    }

    type Log = Arc<Mutex<Vec<Seen>>>;

    async fn handle(
        State(log): State<Log>,
        Path((canister, mode, method)): Path<(String, String, String)>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (StatusCode, &'static str) {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        log.lock().push(Seen {
            canister,
            mode,
            method: method.clone(),
            auth,
            body,
        });

        match method.as_str() {
            "icrc1_fee" => (StatusCode::OK, "10000"),
            "totalSupply" => (StatusCode::OK, "340282366920938463463374607431768211455"),
            "claimRewards" => (StatusCode::OK, r#"{"Err":{"NothingToClaim":null}}"#),
            "stake" => (StatusCode::OK, r#"{"Ok":null}"#),
            "icrc1_transfer" => (StatusCode::OK, r#"{"Err":{"BadFee":{"expected_fee":10000}}}"#),
            "getMetadata" => (StatusCode::OK, r#"{"unexpected":true}"#),
            _ => (StatusCode::SERVICE_UNAVAILABLE, "canister stopped"),
        }
    }

    async fn gateway() -> (GatewayClient, Log) {
        let log: Log = Arc::default();
        let router = Router::new()
            .route("/api/v1/canister/{canister}/{mode}/{method}", post(handle))
            .with_state(log.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let config = Config {
            gateway_url: format!("http://{}", addr),
            ..Config::default()
        };
        (GatewayClient::new(&config).unwrap(), log)
    }

    fn pool() -> Principal {
        canister_id(0x3a0)
    }

    fn signed_in() -> Caller {
        let principal =
            Principal::from_text("tasxg-7ryw7-s5kzi-2v6cw-sst2p-rwv3m-jhll4-gu3pz-hi3lr-jfc45-yqe").unwrap();
        Caller::Identity(Identity::new(principal, "dlg-token", None))
    }

    #[tokio::test]
    async fn test_query_without_identity() {
        let (client, log) = gateway().await;
        let ledger = Principal::from_text("ryjl3-tyaaa-aaaaa-aaaba-cai").unwrap();

        assert_eq!(client.fee(&ledger).await.unwrap(), 10_000);
        assert_eq!(StakingService::total_supply(&client, &pool()).await.unwrap(), u128::MAX);

        let seen = log.lock()[0].clone();
        assert_eq!(seen.canister, "ryjl3-tyaaa-aaaaa-aaaba-cai");
        assert_eq!(seen.mode, "query");
        assert_eq!(seen.method, "icrc1_fee");
        assert_eq!(seen.body, json!([]));
        assert!(seen.auth.is_none());
    }

    #[tokio::test]
    async fn test_update_sends_delegation_and_args() {
        let (client, log) = gateway().await;

        let reply = client.stake(&pool(), &signed_in(), 1_000, None).await.unwrap();
        assert_eq!(reply, Ok(()));

        let seen = log.lock()[0].clone();
        assert_eq!(seen.mode, "call");
        assert_eq!(seen.canister, "iznzw-lyaaa-aaaaa-aaoqa-cai");
        assert_eq!(seen.body, json!([1000, null]));
        assert_eq!(seen.auth.as_deref(), Some("Bearer dlg-token"));
    }

    #[tokio::test]
    async fn test_structured_errors_are_ok_replies() {
        let (client, log) = gateway().await;

        let reply = client.claim_rewards(&pool(), &signed_in()).await.unwrap();
        assert_eq!(reply, Err(StakingError::NothingToClaim));

        let ledger = Principal::from_text("ryjl3-tyaaa-aaaaa-aaaba-cai").unwrap();
        let args = TransferArg {
            from_subaccount: None,
            to: Account::from(Principal::anonymous()),
            amount: Nat::from(5u64),
            fee: None,
            memo: None,
            created_at_time: None,
        };
        let reply = client.transfer(&ledger, &signed_in(), args).await.unwrap();
        assert_eq!(
            reply,
            Err(TransferError::BadFee {
                expected_fee: Nat::from(10_000u64)
            })
        );

        let seen = log.lock()[1].clone();
        assert_eq!(seen.method, "icrc1_transfer");
        assert_eq!(seen.body[0]["amount"], json!(5));
        assert_eq!(seen.body[0]["to"]["owner"], json!("2vxsx-fae"));
    }

    #[tokio::test]
    async fn test_transport_faults() {
        let (client, _log) = gateway().await;

        let err = client.withdraw(&pool(), &signed_in(), 1).await.unwrap_err();
        assert!(matches!(err, AppError::Rpc(msg) if msg.contains("503")));

        let err = client.get_metadata(&pool()).await.unwrap_err();
        assert!(matches!(err, AppError::Decoding(_)));
    }

    #[tokio::test]
    async fn test_unreachable_gateway() {
        let config = Config {
            gateway_url: "http://127.0.0.1:1".to_string(),
            ..Config::default()
        };
        let client = GatewayClient::new(&config).unwrap();
        let err = client.total_rewards(&pool()).await.unwrap_err();
        assert!(matches!(err, AppError::Rpc(_)));
    }
}
