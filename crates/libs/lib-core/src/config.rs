//! # Application Configuration
//!
//! This module manages client configuration loaded from environment variables
//! (and an optional `.env` file). Configuration is validated on startup to fail
//! fast if misconfigured.
//!
//! ## Global Config Access
//!
//! Use [`core_config()`] to access the global configuration instance:
//!
//! ```rust,no_run
//! use lib_core::config::core_config;
//!
//! let config = core_config();
//! let gateway = &config.gateway_url;
//! ```
//!
//! Call [`init_config()`] once at startup. If it was never called,
//! [`core_config()`] hands out the built-in defaults.
//!
//! ## Variables
//!
//! | Variable | Default |
//! |---|---|
//! | `STAKING_GATEWAY_URL` | `https://icp-api.io` |
//! | `STAKING_IDENTITY_PROVIDER_URL` | `https://identity.internetcomputer.org` |
//! | `STAKING_CALLBACK_PORT` | `4943` |
//! | `STAKING_SESSION_FILE` | `data/session.json` |
//! | `STAKING_APPROVAL_TTL_SECS` | `0` (approvals never expire) |
//! | `STAKING_HTTP_TIMEOUT_SECS` | `30` |
//! | `STAKING_LOGIN_TIMEOUT_SECS` | `300` |

use lib_utils::envs::{get_env_or, get_env_parse_or};
use lib_utils::validation::validate_http_url;
use std::path::PathBuf;
use std::sync::OnceLock;

const DEFAULT_GATEWAY_URL: &str = "https://icp-api.io";
const DEFAULT_IDENTITY_PROVIDER_URL: &str = "https://identity.internetcomputer.org";
const DEFAULT_CALLBACK_PORT: u16 = 4943;
const DEFAULT_SESSION_FILE: &str = "data/session.json";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
const DEFAULT_LOGIN_TIMEOUT_SECS: u64 = 300;

/// Client configuration loaded from environment variables.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the HTTP gateway that relays canister queries and calls
    pub gateway_url: String,

    /// Identity provider the browser login is sent to
    pub identity_provider_url: String,

    /// Local port the login callback listener binds to
    pub callback_port: u16,

    /// File the authenticated session is persisted to between runs
    pub session_file: PathBuf,

    /// Lifetime of token approvals granted before a deposit, in seconds
    ///
    /// `0` leaves approvals without an expiry.
    pub approval_ttl_secs: u64,

    /// Connect/request timeout for the gateway HTTP client, in seconds
    pub http_timeout_secs: u64,

    /// How long a browser login may take before it is abandoned, in seconds
    pub login_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            identity_provider_url: DEFAULT_IDENTITY_PROVIDER_URL.to_string(),
            callback_port: DEFAULT_CALLBACK_PORT,
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
            approval_ttl_secs: 0,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            login_timeout_secs: DEFAULT_LOGIN_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        let gateway_url = get_env_or("STAKING_GATEWAY_URL", DEFAULT_GATEWAY_URL)
            .trim_end_matches('/')
            .to_string();

        let identity_provider_url =
            get_env_or("STAKING_IDENTITY_PROVIDER_URL", DEFAULT_IDENTITY_PROVIDER_URL)
                .trim_end_matches('/')
                .to_string();

        let callback_port = get_env_parse_or("STAKING_CALLBACK_PORT", DEFAULT_CALLBACK_PORT)
            .map_err(|e| format!("STAKING_CALLBACK_PORT must be a valid port: {}", e))?;

        let session_file = PathBuf::from(get_env_or("STAKING_SESSION_FILE", DEFAULT_SESSION_FILE));

        let approval_ttl_secs = get_env_parse_or("STAKING_APPROVAL_TTL_SECS", 0u64)
            .map_err(|e| format!("STAKING_APPROVAL_TTL_SECS must be a valid number: {}", e))?;

        let http_timeout_secs = get_env_parse_or("STAKING_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)
            .map_err(|e| format!("STAKING_HTTP_TIMEOUT_SECS must be a valid number: {}", e))?;

        let login_timeout_secs = get_env_parse_or("STAKING_LOGIN_TIMEOUT_SECS", DEFAULT_LOGIN_TIMEOUT_SECS)
            .map_err(|e| format!("STAKING_LOGIN_TIMEOUT_SECS must be a valid number: {}", e))?;

        Ok(Self {
            gateway_url,
            identity_provider_url,
            callback_port,
            session_file,
            approval_ttl_secs,
            http_timeout_secs,
            login_timeout_secs,
        })
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        validate_http_url(&self.gateway_url, "STAKING_GATEWAY_URL")?;
        validate_http_url(&self.identity_provider_url, "STAKING_IDENTITY_PROVIDER_URL")?;

        if self.callback_port == 0 {
            return Err("STAKING_CALLBACK_PORT must not be 0".to_string());
        }

        if self.http_timeout_secs == 0 || self.http_timeout_secs > 600 {
            return Err("STAKING_HTTP_TIMEOUT_SECS must be between 1 and 600".to_string());
        }

        if self.login_timeout_secs == 0 {
            return Err("STAKING_LOGIN_TIMEOUT_SECS must not be 0".to_string());
        }

        if self.session_file.as_os_str().is_empty() {
            return Err("STAKING_SESSION_FILE cannot be empty".to_string());
        }

        Ok(())
    }
}

/// Global configuration instance (initialized once at startup).
static CONFIG: OnceLock<Config> = OnceLock::new();

/// Initialize the global configuration.
///
/// Loads `.env` if present, then reads the environment.
///
/// # Errors
///
/// Returns an error if:
/// - Environment variables are malformed
/// - Configuration validation fails
/// - Config has already been initialized
pub fn init_config() -> Result<(), String> {
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file loaded: {}", e);
    }

    let config = Config::from_env()?;
    config.validate()?;

    CONFIG.set(config)
        .map_err(|_| "Config has already been initialized".to_string())
}

/// Get a reference to the global configuration.
///
/// Falls back to [`Config::default()`] when [`init_config()`] was never called.
pub fn core_config() -> &'static Config {
    CONFIG.get_or_init(Config::default)
}
