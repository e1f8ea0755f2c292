//! # Core Library
//!
//! Configuration and transport-level error types shared by the staking client.

pub mod config;
pub mod error;

// Re-export commonly used types
pub use config::{core_config, init_config, Config};
pub use error::{AppError, Result};
