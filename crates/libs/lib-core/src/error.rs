//! # Transport Error Handling
//!
//! This module defines [`AppError`], the error type for everything that can go
//! wrong *below* the staking workflows: configuration, the HTTP gateway, and
//! decoding of remote replies. It follows the `thiserror` pattern.
//!
//! An `AppError` always means "no structured answer was obtained from the remote
//! service". Structured rejections (`{"Err": ...}` replies) are not `AppError`s;
//! they are decoded into the wire enums in `shared` and classified by the
//! orchestrator.
//!
//! ## Error Categories
//!
//! - [`Config`](AppError::Config) - invalid or missing configuration
//! - [`Rpc`](AppError::Rpc) - network failure or non-success HTTP status
//! - [`Decoding`](AppError::Decoding) - a reply body that does not match the expected shape
//! - [`Internal`](AppError::Internal) - anything else (task join failures, I/O)
//!
//! ## Usage Example
//!
//! ```rust
//! use lib_core::error::{AppError, Result};
//!
//! fn require_gateway(url: &str) -> Result<&str> {
//!     if url.is_empty() {
//!         return Err(AppError::Config("gateway URL is empty".to_string()));
//!     }
//!     Ok(url)
//! }
//! ```

use thiserror::Error;

/// Convenience type alias for `Result<T, AppError>`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Transport-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration error during startup or environment loading.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Gateway unreachable, timed out, or answered with a non-success status.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Reply body could not be decoded.
    #[error("Decoding error: {0}")]
    Decoding(String),

    /// Unexpected internal failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether the failure happened before any bytes reached the remote side.
    ///
    /// Only connection failures qualify; a timeout may still have been delivered.
    pub fn is_connect(&self) -> bool {
        matches!(self, AppError::Rpc(msg) if msg.starts_with("connect:"))
    }
}

/// Convert `reqwest::Error` to `AppError`.
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::Decoding(err.to_string())
        } else if err.is_connect() {
            AppError::Rpc(format!("connect: {}", err))
        } else if err.is_timeout() {
            AppError::Rpc(format!("timeout: {}", err))
        } else if let Some(status) = err.status() {
            AppError::Rpc(format!("status {}: {}", status, err))
        } else {
            AppError::Rpc(err.to_string())
        }
    }
}

/// Convert `serde_json::Error` to `AppError`.
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Decoding(format!("JSON error: {}", err))
    }
}

/// Convert `std::io::Error` to `AppError`.
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(format!("I/O error: {}", err))
    }
}
