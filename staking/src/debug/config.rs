//! Logging configuration from environment variables

use lib_utils::envs::{get_env_or, get_env_parse_or};
use std::path::PathBuf;

const DEFAULT_LOG_DIR: &str = "logs";
const DEFAULT_LOG_LEVEL: &str = "staking=info,warn";

/// Debug system configuration
#[derive(Debug, Clone)]
pub struct DebugConfig {
    /// Log directory (for rotation)
    pub log_dir: PathBuf,
    /// Log file name prefix inside `log_dir`
    pub log_file_name: String,
    /// Log level filter (e.g., "staking=debug,info")
    pub log_level: String,
    /// Mirror log lines to stderr
    pub log_to_stderr: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            log_file_name: "staking.log".to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_to_stderr: cfg!(feature = "debug-mode"),
        }
    }
}

impl DebugConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        // Logging is not initialized yet; a malformed flag keeps the default.
        let log_to_stderr = get_env_parse_or::<u8>("STAKING_LOG_STDERR", u8::from(defaults.log_to_stderr))
            .map(|flag| flag == 1)
            .unwrap_or(defaults.log_to_stderr);

        Self {
            log_dir: PathBuf::from(get_env_or("STAKING_LOG_DIR", DEFAULT_LOG_DIR)),
            log_level: get_env_or("RUST_LOG", DEFAULT_LOG_LEVEL),
            log_to_stderr,
            log_file_name: defaults.log_file_name,
        }
    }

    /// Full path of the current log file (without the rotation date suffix)
    pub fn log_file(&self) -> PathBuf {
        self.log_dir.join(&self.log_file_name)
    }

    /// Check if debug logging is enabled
    pub fn is_debug_enabled(&self) -> bool {
        self.log_level.contains("debug") || self.log_level.contains("trace")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DebugConfig::default();
        assert_eq!(config.log_file(), PathBuf::from("logs/staking.log"));
        assert!(!config.is_debug_enabled());
    }

    #[test]
    fn test_from_env() {
        std::env::set_var("STAKING_LOG_DIR", "/tmp/staking-logs");
        std::env::set_var("STAKING_LOG_STDERR", "1");
        let config = DebugConfig::from_env();
        assert_eq!(config.log_file(), PathBuf::from("/tmp/staking-logs/staking.log"));
        assert!(config.log_to_stderr);

        std::env::set_var("STAKING_LOG_STDERR", "yes");
        assert_eq!(DebugConfig::from_env().log_to_stderr, DebugConfig::default().log_to_stderr);

        std::env::remove_var("STAKING_LOG_DIR");
        std::env::remove_var("STAKING_LOG_STDERR");
    }

    #[test]
    fn test_debug_detection() {
        let config = DebugConfig {
            log_level: "staking=debug".to_string(),
            ..Default::default()
        };
        assert!(config.is_debug_enabled());
    }
}
