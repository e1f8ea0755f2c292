//! ICRC-1 / ICRC-2 ledger types.
//!
//! The argument and error types are the ones from `icrc-ledger-types`. The
//! gateway renders Candid `nat` as a plain JSON number, while `candid::Nat`
//! has its own serde encoding, so requests and replies go through the wire
//! adapters at the bottom of this module.

use candid::{Nat, Principal};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub use icrc_ledger_types::icrc1::account::{Account, Subaccount};
pub use icrc_ledger_types::icrc1::transfer::{BlockIndex, Memo, NumTokens, TransferArg, TransferError};
pub use icrc_ledger_types::icrc2::approve::{ApproveArgs, ApproveError};

pub type TransferResult = Result<BlockIndex, TransferError>;
pub type ApproveResult = Result<BlockIndex, ApproveError>;

/// `nat` as `u128`, or `None` if it does not fit.
pub fn nat_to_u128(value: &Nat) -> Option<u128> {
    u128::try_from(&value.0).ok()
}

/// Serde adapter rendering `nat` as a JSON number.
pub mod nat {
    use super::*;
    use serde::ser;

    pub fn serialize<S: Serializer>(value: &Nat, serializer: S) -> Result<S::Ok, S::Error> {
        let value = nat_to_u128(value)
            .ok_or_else(|| <S::Error as ser::Error>::custom("nat does not fit in u128"))?;
        serializer.serialize_u128(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Nat, D::Error> {
        u128::deserialize(deserializer).map(Nat::from)
    }
}

/// Serde adapter for `opt nat`.
pub mod opt_nat {
    use super::*;
    use serde::ser;

    pub fn serialize<S: Serializer>(value: &Option<Nat>, serializer: S) -> Result<S::Ok, S::Error> {
        let value = match value {
            Some(nat) => Some(
                nat_to_u128(nat).ok_or_else(|| <S::Error as ser::Error>::custom("nat does not fit in u128"))?,
            ),
            None => None,
        };
        value.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Nat>, D::Error> {
        Ok(Option::<u128>::deserialize(deserializer)?.map(Nat::from))
    }
}

// region:    --- Wire adapters

#[derive(Serialize, Deserialize)]
#[serde(remote = "Account")]
struct AccountDef {
    owner: Principal,
    subaccount: Option<Subaccount>,
}

#[derive(Serialize)]
#[serde(remote = "ApproveArgs")]
struct ApproveArgsDef {
    from_subaccount: Option<Subaccount>,
    #[serde(with = "AccountDef")]
    spender: Account,
    #[serde(with = "nat")]
    amount: Nat,
    #[serde(with = "opt_nat")]
    expected_allowance: Option<Nat>,
    expires_at: Option<u64>,
    #[serde(with = "opt_nat")]
    fee: Option<Nat>,
    memo: Option<Memo>,
    created_at_time: Option<u64>,
}

#[derive(Serialize)]
#[serde(remote = "TransferArg")]
struct TransferArgDef {
    from_subaccount: Option<Subaccount>,
    #[serde(with = "AccountDef")]
    to: Account,
    #[serde(with = "opt_nat")]
    fee: Option<Nat>,
    created_at_time: Option<u64>,
    memo: Option<Memo>,
    #[serde(with = "nat")]
    amount: Nat,
}

#[derive(Deserialize)]
#[serde(remote = "TransferError")]
enum TransferErrorDef {
    BadFee {
        #[serde(with = "nat")]
        expected_fee: Nat,
    },
    BadBurn {
        #[serde(with = "nat")]
        min_burn_amount: Nat,
    },
    InsufficientFunds {
        #[serde(with = "nat")]
        balance: Nat,
    },
    TooOld,
    CreatedInFuture {
        ledger_time: u64,
    },
    TemporarilyUnavailable,
    Duplicate {
        #[serde(with = "nat")]
        duplicate_of: Nat,
    },
    GenericError {
        #[serde(with = "nat")]
        error_code: Nat,
        message: String,
    },
}

#[derive(Deserialize)]
#[serde(remote = "ApproveError")]
enum ApproveErrorDef {
    BadFee {
        #[serde(with = "nat")]
        expected_fee: Nat,
    },
    InsufficientFunds {
        #[serde(with = "nat")]
        balance: Nat,
    },
    AllowanceChanged {
        #[serde(with = "nat")]
        current_allowance: Nat,
    },
    Expired {
        ledger_time: u64,
    },
    TooOld,
    CreatedInFuture {
        ledger_time: u64,
    },
    Duplicate {
        #[serde(with = "nat")]
        duplicate_of: Nat,
    },
    TemporarilyUnavailable,
    GenericError {
        #[serde(with = "nat")]
        error_code: Nat,
        message: String,
    },
}

/// An [`Account`] as the gateway encodes it.
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct WireAccount(#[serde(with = "AccountDef")] pub Account);

/// [`ApproveArgs`] as the gateway encodes it.
#[derive(Serialize)]
#[serde(transparent)]
pub struct WireApproveArgs(#[serde(with = "ApproveArgsDef")] pub ApproveArgs);

/// [`TransferArg`] as the gateway encodes it.
#[derive(Serialize)]
#[serde(transparent)]
pub struct WireTransferArg(#[serde(with = "TransferArgDef")] pub TransferArg);

/// Reply of `icrc1_transfer`: `{"Ok": <nat>}` or `{"Err": <TransferError>}`.
#[derive(Deserialize)]
pub enum TransferReply {
    Ok(#[serde(with = "nat")] BlockIndex),
    Err(#[serde(with = "TransferErrorDef")] TransferError),
}

impl From<TransferReply> for TransferResult {
    fn from(reply: TransferReply) -> Self {
        match reply {
            TransferReply::Ok(block_index) => Ok(block_index),
            TransferReply::Err(e) => Err(e),
        }
    }
}

/// Reply of `icrc2_approve`.
#[derive(Deserialize)]
pub enum ApproveReply {
    Ok(#[serde(with = "nat")] BlockIndex),
    Err(#[serde(with = "ApproveErrorDef")] ApproveError),
}

impl From<ApproveReply> for ApproveResult {
    fn from(reply: ApproveReply) -> Self {
        match reply {
            ApproveReply::Ok(block_index) => Ok(block_index),
            ApproveReply::Err(e) => Err(e),
        }
    }
}

// endregion: --- Wire adapters
