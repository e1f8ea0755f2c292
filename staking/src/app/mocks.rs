//! In-memory service doubles for workflow tests.

use crate::app::pools::Pool;
use crate::core::identity::{Caller, Identity};
use crate::core::service::{IdentityProvider, LedgerService, PendingLogin, RemoteResult, StakingService};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use lib_core::AppError;
use parking_lot::Mutex;
use shared::dto::icrc::{
    nat_to_u128, Account, ApproveArgs, ApproveError, ApproveResult, TransferArg, TransferError, TransferResult,
};
use shared::dto::staking::{CanisterMetadata, StakingError, StakingResult};
use shared::{Nat, Principal};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Notify;

pub const LEDGER_FEE: u128 = 10_000;

pub fn ledger_id() -> Principal {
    Principal::from_text("ryjl3-tyaaa-aaaaa-aaaba-cai").unwrap()
}

pub fn test_identity() -> Identity {
    let principal =
        Principal::from_text("tasxg-7ryw7-s5kzi-2v6cw-sst2p-rwv3m-jhll4-gu3pz-hi3lr-jfc45-yqe").unwrap();
    Identity::new(principal, "delegation", Some(Utc::now() + Duration::hours(1)))
}

pub fn other_principal() -> Principal {
    Principal::from_text("mnnk5-gfqmo-4omau-3uj75-wcco3-qwour-lsvsv-tmcw3-2kwze-f6orv-yqe").unwrap()
}

fn transport_fault() -> AppError {
    AppError::Rpc("connect: connection refused".to_string())
}

/// Scripted reply for a mutating call.
#[derive(Debug, Clone)]
pub enum Reply<E> {
    Reject(E),
    Transport,
}

/// Holds a call in flight until released.
#[derive(Default)]
pub struct Gate {
    pub entered: Notify,
    pub release: Notify,
}

#[derive(Default)]
struct StakingLedgerState {
    staked: HashMap<(Principal, Principal), u128>,
    pending: HashMap<Principal, u128>,
    total_supply: u128,
    total_rewards: u128,
}

/// Staking canister double. Every pool shares the same bookkeeping, keyed by pool address.
#[derive(Default)]
pub struct MockStaking {
    state: Mutex<StakingLedgerState>,
    calls: Mutex<HashMap<&'static str, usize>>,
    fail_reads: Mutex<bool>,
    replies: Mutex<HashMap<&'static str, Reply<StakingError>>>,
    stake_gate: Mutex<Option<Arc<Gate>>>,
    balance_gate: Mutex<Option<Arc<Gate>>>,
}

impl MockStaking {
    pub fn calls(&self, method: &str) -> usize {
        self.calls.lock().get(method).copied().unwrap_or(0)
    }

    fn record(&self, method: &'static str) {
        *self.calls.lock().entry(method).or_default() += 1;
    }

    pub fn set_totals(&self, total_supply: u128, total_rewards: u128) {
        let mut state = self.state.lock();
        state.total_supply = total_supply;
        state.total_rewards = total_rewards;
    }

    pub fn set_staked(&self, pool: &Pool, owner: &Principal, amount: u128) {
        self.state
            .lock()
            .staked
            .insert((pool.service_address, *owner), amount);
    }

    pub fn set_pending(&self, pool: &Pool, amount: u128) {
        self.state.lock().pending.insert(pool.service_address, amount);
    }

    pub fn staked(&self, pool: &Pool, owner: &Principal) -> u128 {
        self.state
            .lock()
            .staked
            .get(&(pool.service_address, *owner))
            .copied()
            .unwrap_or(0)
    }

    pub fn fail_reads(&self) {
        *self.fail_reads.lock() = true;
    }

    pub fn restore_reads(&self) {
        *self.fail_reads.lock() = false;
    }

    /// Make the next `method` call answer with `reply` instead of succeeding.
    pub fn script(&self, method: &'static str, reply: Reply<StakingError>) {
        self.replies.lock().insert(method, reply);
    }

    /// Block `stake` calls until the returned gate is released.
    pub fn hold_stake(&self) -> Arc<Gate> {
        let gate = Arc::new(Gate::default());
        *self.stake_gate.lock() = Some(gate.clone());
        gate
    }

    /// Block the next `balanceOf` call until the returned gate is released.
    pub fn hold_balance_of(&self) -> Arc<Gate> {
        let gate = Arc::new(Gate::default());
        *self.balance_gate.lock() = Some(gate.clone());
        gate
    }

    fn read<T>(&self, method: &'static str, value: T) -> RemoteResult<T> {
        self.record(method);
        if *self.fail_reads.lock() {
            return Err(transport_fault());
        }
        Ok(value)
    }

    fn scripted(&self, method: &'static str) -> Option<RemoteResult<StakingResult>> {
        self.replies.lock().remove(method).map(|reply| match reply {
            Reply::Reject(e) => Ok(Err(e)),
            Reply::Transport => Err(transport_fault()),
        })
    }
}

#[async_trait]
impl StakingService for MockStaking {
    async fn balance_of(&self, pool: &Principal, owner: &Principal) -> RemoteResult<u128> {
        let gate = self.balance_gate.lock().take();
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        let staked = self
            .state
            .lock()
            .staked
            .get(&(*pool, *owner))
            .copied()
            .unwrap_or(0);
        self.read("balanceOf", staked)
    }

    async fn pending_rewards(&self, pool: &Principal, _caller: &Caller) -> RemoteResult<u128> {
        let pending = self.state.lock().pending.get(pool).copied().unwrap_or(0);
        self.read("pendingRewards", pending)
    }

    async fn total_supply(&self, _pool: &Principal) -> RemoteResult<u128> {
        let total = self.state.lock().total_supply;
        self.read("totalSupply", total)
    }

    async fn total_rewards(&self, _pool: &Principal) -> RemoteResult<u128> {
        let total = self.state.lock().total_rewards;
        self.read("totalRewards", total)
    }

    async fn get_metadata(&self, _pool: &Principal) -> RemoteResult<CanisterMetadata> {
        self.read(
            "getMetadata",
            CanisterMetadata {
                token: ledger_id(),
                reward: ledger_id(),
                fee_recipient: Principal::anonymous(),
                leave_early_fee: 10,
                lock_time: 2_592_000,
            },
        )
    }

    async fn stake(
        &self,
        pool: &Principal,
        caller: &Caller,
        amount: u128,
        _memo: Option<Vec<u8>>,
    ) -> RemoteResult<StakingResult> {
        self.record("stake");
        let gate = self.stake_gate.lock().clone();
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        if let Some(reply) = self.scripted("stake") {
            return reply;
        }

        let mut state = self.state.lock();
        *state.staked.entry((*pool, caller.principal())).or_default() += amount;
        state.total_supply += amount;
        Ok(Ok(()))
    }

    async fn withdraw(&self, pool: &Principal, caller: &Caller, amount: u128) -> RemoteResult<StakingResult> {
        self.record("withdraw");
        if let Some(reply) = self.scripted("withdraw") {
            return reply;
        }

        let mut state = self.state.lock();
        let staked = state.staked.entry((*pool, caller.principal())).or_default();
        if *staked < amount {
            return Ok(Err(StakingError::InsufficientBalance));
        }
        *staked -= amount;
        state.total_supply = state.total_supply.saturating_sub(amount);
        Ok(Ok(()))
    }

    async fn claim_rewards(&self, pool: &Principal, _caller: &Caller) -> RemoteResult<StakingResult> {
        self.record("claimRewards");
        if let Some(reply) = self.scripted("claimRewards") {
            return reply;
        }

        let mut state = self.state.lock();
        match state.pending.get_mut(pool) {
            Some(pending) if *pending > 0 => {
                *pending = 0;
                Ok(Ok(()))
            }
            _ => Ok(Err(StakingError::NothingToClaim)),
        }
    }
}

/// Single-token ledger double.
#[derive(Default)]
pub struct MockLedger {
    balances: Mutex<HashMap<Principal, u128>>,
    calls: Mutex<HashMap<&'static str, usize>>,
    fail_reads: Mutex<bool>,
    approve_reply: Mutex<Option<Reply<ApproveError>>>,
    transfer_reply: Mutex<Option<Reply<TransferError>>>,
    pub approvals: Mutex<Vec<ApproveArgs>>,
    pub transfers: Mutex<Vec<TransferArg>>,
}

impl MockLedger {
    pub fn calls(&self, method: &str) -> usize {
        self.calls.lock().get(method).copied().unwrap_or(0)
    }

    fn record(&self, method: &'static str) {
        *self.calls.lock().entry(method).or_default() += 1;
    }

    pub fn set_balance(&self, owner: &Principal, amount: u128) {
        self.balances.lock().insert(*owner, amount);
    }

    pub fn fail_reads(&self) {
        *self.fail_reads.lock() = true;
    }

    pub fn script_approve(&self, reply: Reply<ApproveError>) {
        *self.approve_reply.lock() = Some(reply);
    }

    pub fn script_transfer(&self, reply: Reply<TransferError>) {
        *self.transfer_reply.lock() = Some(reply);
    }
}

#[async_trait]
impl LedgerService for MockLedger {
    async fn fee(&self, _ledger: &Principal) -> RemoteResult<u128> {
        self.record("icrc1_fee");
        if *self.fail_reads.lock() {
            return Err(transport_fault());
        }
        Ok(LEDGER_FEE)
    }

    async fn balance_of(&self, _ledger: &Principal, account: &Account) -> RemoteResult<u128> {
        self.record("icrc1_balance_of");
        if *self.fail_reads.lock() {
            return Err(transport_fault());
        }
        Ok(self.balances.lock().get(&account.owner).copied().unwrap_or(0))
    }

    async fn approve(&self, _ledger: &Principal, _caller: &Caller, args: ApproveArgs) -> RemoteResult<ApproveResult> {
        self.record("icrc2_approve");
        self.approvals.lock().push(args);
        match self.approve_reply.lock().take() {
            Some(Reply::Reject(e)) => Ok(Err(e)),
            Some(Reply::Transport) => Err(transport_fault()),
            None => Ok(Ok(Nat::from(1u64))),
        }
    }

    async fn transfer(&self, _ledger: &Principal, caller: &Caller, args: TransferArg) -> RemoteResult<TransferResult> {
        self.record("icrc1_transfer");
        self.transfers.lock().push(args.clone());
        match self.transfer_reply.lock().take() {
            Some(Reply::Reject(e)) => return Ok(Err(e)),
            Some(Reply::Transport) => return Err(transport_fault()),
            None => {}
        }

        let mut balances = self.balances.lock();
        let from = balances.entry(caller.principal()).or_default();
        let amount = nat_to_u128(&args.amount).unwrap();
        let debit = amount + LEDGER_FEE;
        if *from < debit {
            return Ok(Err(TransferError::InsufficientFunds { balance: Nat::from(*from) }));
        }
        *from -= debit;
        *balances.entry(args.to.owner).or_default() += amount;
        Ok(Ok(Nat::from(42u64)))
    }
}

/// Identity provider answering with canned results.
#[derive(Default)]
pub struct MockProvider {
    pub stored: Mutex<Option<Identity>>,
    pub login_result: Mutex<Option<Result<Identity, String>>>,
    pub fail_begin: bool,
    pub logouts: Mutex<usize>,
}

#[async_trait]
impl IdentityProvider for MockProvider {
    async fn existing_session(&self) -> Option<Identity> {
        self.stored.lock().clone()
    }

    async fn begin_login(&self) -> RemoteResult<PendingLogin> {
        if self.fail_begin {
            return Err(AppError::Internal("port in use".to_string()));
        }
        Ok(PendingLogin {
            id: "login-1".to_string(),
            authorize_url: "https://identity.example/authorize".to_string(),
        })
    }

    async fn on_result(&self, _pending: &PendingLogin) -> Result<Identity, String> {
        self.login_result
            .lock()
            .take()
            .unwrap_or_else(|| Err("cancelled".to_string()))
    }

    async fn logout(&self) {
        *self.stored.lock() = None;
        *self.logouts.lock() += 1;
    }
}
