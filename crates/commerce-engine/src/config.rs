//! Engine configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `COMMERCE_API_BASE_URL` - Product and order service base URL. Unset runs offline.
//! - `COMMERCE_REQUEST_TIMEOUT_MS` - Deadline for each remote call (default: 10000)
//! - `COMMERCE_CART_KEY` - Storage key for the persisted cart (default: cart)
//! - `COMMERCE_LOW_STOCK_THRESHOLD` - Stock below this is reported as low (default: 5)
//! - `COMMERCE_STATE_FILE` - JSON file backing the key-value store
//! - `COMMERCE_ACTOR_BUFFER` - Request buffer per store actor (default: 32)

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Product and order service base URL; `None` means no remote service.
    pub api_base_url: Option<String>,
    pub request_timeout: Duration,
    pub cart_key: String,
    pub low_stock_threshold: u32,
    pub state_file: Option<PathBuf>,
    pub actor_buffer: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            api_base_url: None,
            request_timeout: Duration::from_millis(10_000),
            cart_key: "cart".to_string(),
            low_stock_threshold: 5,
            state_file: None,
            actor_buffer: 32,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to something unparsable.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let timeout_ms: u64 = parse_or(&optional, "COMMERCE_REQUEST_TIMEOUT_MS", 10_000)?;
        let actor_buffer: usize = parse_or(&optional, "COMMERCE_ACTOR_BUFFER", defaults.actor_buffer)?;
        if actor_buffer == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "COMMERCE_ACTOR_BUFFER".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            api_base_url: optional("COMMERCE_API_BASE_URL"),
            request_timeout: Duration::from_millis(timeout_ms),
            cart_key: optional("COMMERCE_CART_KEY").unwrap_or(defaults.cart_key),
            low_stock_threshold: parse_or(
                &optional,
                "COMMERCE_LOW_STOCK_THRESHOLD",
                defaults.low_stock_threshold,
            )?,
            state_file: optional("COMMERCE_STATE_FILE").map(PathBuf::from),
            actor_buffer,
        })
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
    }
}
