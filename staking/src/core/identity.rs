//! # Identity and Calling Context
//!
//! [`Identity`] is the signed-in principal together with the opaque delegation the
//! gateway accepts as proof of it. [`Caller`] is what every remote call is made as.

use chrono::{DateTime, Utc};
use shared::Principal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An authenticated principal, valid until `expires_at`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    principal: Principal,
    delegation: String,
    expires_at: Option<DateTime<Utc>>,
}

impl Identity {
    pub fn new(principal: Principal, delegation: impl Into<String>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            principal,
            delegation: delegation.into(),
            expires_at,
        }
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    /// Bearer credential presented to the gateway.
    pub fn delegation(&self) -> &str {
        &self.delegation
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

// The delegation is a credential and stays out of logs.
impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("principal", &self.principal)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

/// The calling context of a remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    /// Read-only queries before sign-in.
    Anonymous,
    Identity(Identity),
}

impl Caller {
    pub fn principal(&self) -> Principal {
        match self {
            Caller::Anonymous => Principal::anonymous(),
            Caller::Identity(identity) => *identity.principal(),
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Caller::Anonymous => None,
            Caller::Identity(identity) => Some(identity),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Caller::Anonymous)
    }
}

impl From<Identity> for Caller {
    fn from(identity: Identity) -> Self {
        Caller::Identity(identity)
    }
}
