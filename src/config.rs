//! Client configuration loaded from environment variables.
//!
//! The API base URL set here is the build/environment default. A runtime
//! override stored in the secure session takes precedence over it.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_RETRY_DELAY_MS: u64 = 1500;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_DIAGNOSTICS_CAPACITY: usize = 20;
const DEFAULT_STORE_PATH: &str = ".fitcoach/store.json";

/// Length of the key used by the sealed file store.
pub const STORE_KEY_LEN: usize = 32;

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend base URL from the environment (None when not configured)
    pub api_base_url: Option<String>,
    /// Enables the development-only `POST /api/qa/login-as` endpoint
    pub qa_login_enabled: bool,
    /// Delay before the single retry of a failed transport attempt
    pub retry_delay: Duration,
    /// Per-request timeout for the HTTP transport
    pub request_timeout: Duration,
    /// Number of failed requests kept for the diagnostics screen
    pub diagnostics_capacity: usize,
    /// Location of the sealed session store
    pub store_path: PathBuf,
    /// Key for the sealed session store (raw bytes)
    pub store_key: Option<Vec<u8>>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is loaded first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let store_key = match non_empty_var("FITCOACH_STORE_KEY") {
            Some(encoded) => Some(parse_store_key(&encoded)?),
            None => None,
        };

        Ok(Self {
            api_base_url: non_empty_var("FITCOACH_API_URL")
                .map(|url| url.trim_end_matches('/').to_string()),
            qa_login_enabled: non_empty_var("FITCOACH_QA_LOGIN")
                .map(|v| parse_flag("FITCOACH_QA_LOGIN", &v))
                .transpose()?
                .unwrap_or(false),
            retry_delay: Duration::from_millis(parse_number(
                "FITCOACH_RETRY_DELAY_MS",
                DEFAULT_RETRY_DELAY_MS,
            )?),
            request_timeout: Duration::from_secs(parse_number(
                "FITCOACH_REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )?),
            diagnostics_capacity: parse_number(
                "FITCOACH_DIAGNOSTICS_CAPACITY",
                DEFAULT_DIAGNOSTICS_CAPACITY,
            )?,
            store_path: non_empty_var("FITCOACH_STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH)),
            store_key,
        })
    }

    /// Config for testing only.
    pub fn test_default() -> Self {
        Self {
            api_base_url: Some("http://localhost:3000".to_string()),
            qa_login_enabled: false,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            request_timeout: Duration::from_secs(5),
            diagnostics_capacity: DEFAULT_DIAGNOSTICS_CAPACITY,
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            store_key: None,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_number<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match non_empty_var(name) {
        Some(raw) => raw
            .parse()
            .map_err(|_| ConfigError::Invalid(name, format!("expected a number, got {raw:?}"))),
        None => Ok(default),
    }
}

fn parse_flag(name: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid(
            name,
            format!("expected a boolean, got {raw:?}"),
        )),
    }
}

fn parse_store_key(encoded: &str) -> Result<Vec<u8>, ConfigError> {
    let key = BASE64
        .decode(encoded)
        .map_err(|e| ConfigError::Invalid("FITCOACH_STORE_KEY", e.to_string()))?;
    if key.len() != STORE_KEY_LEN {
        return Err(ConfigError::Invalid(
            "FITCOACH_STORE_KEY",
            format!("expected {STORE_KEY_LEN} bytes, got {}", key.len()),
        ));
    }
    Ok(key)
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
