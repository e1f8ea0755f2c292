//! # Debugging and Tracing Infrastructure
//!
//! File-based structured logging and tracked task spawning for the staking client.
//!
//! ## Features
//!
//! - **File-based logging**: Structured logs to `logs/staking.log` (daily rotation)
//! - **Async task tracking**: Workflow tasks are counted and slow ones reported
//! - **Panic logging**: Panics are written to the log before the default hook runs
//!
//! ## Usage
//!
//! ```rust,ignore
//! // Initialize at startup and keep the guard alive
//! let _log_guard = staking::debug::init()?;
//!
//! // Log with structured fields
//! info!(pool = "90 days", amount = %amount, "Deposit requested");
//! ```
//!
//! ## Configuration
//!
//! Environment variables:
//! - `RUST_LOG`: Log level filter (e.g., `staking=debug,info`)
//! - `STAKING_LOG_DIR`: Log directory (default: `logs`)
//! - `STAKING_LOG_STDERR`: Mirror logs to stderr (1=on, 0=off)

pub mod config;
pub mod logger;
pub mod task_tracker;

pub use config::DebugConfig;
pub use task_tracker::{active_task_count, spawn_tracked};

use tracing_appender::non_blocking::WorkerGuard;

/// Initialize the debugging system from the environment
///
/// Call this at application startup, before any other operations.
pub fn init() -> Result<WorkerGuard, String> {
    logger::init(&DebugConfig::from_env())
}
