//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; the defaults target the public fake store API
//! and a per-user data directory.
//!
//! - `BAZARI_API_BASE_URL` - Catalog API base URL (default: `https://fakestoreapi.com`)
//! - `BAZARI_DATA_DIR` - Directory holding the cart and session blobs
//!   (default: `<platform local data dir>/bazari`)
//! - `BAZARI_HTTP_TIMEOUT_SECS` - Per-request HTTP timeout (default: 10)
//! - `BAZARI_DEFAULT_CART_ID` - Remote cart used to seed an empty local cart
//!   (default: 1)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use bazari_core::CartId;

/// Default base URL of the public catalog API.
pub const DEFAULT_API_BASE_URL: &str = "https://fakestoreapi.com";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the remote catalog API
    pub api_base_url: Url,
    /// Directory holding the persisted cart and session blobs
    pub data_dir: PathBuf,
    /// Per-request HTTP timeout
    pub http_timeout: Duration,
    /// Remote cart used to seed an empty local cart
    pub default_cart_id: CartId,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = get_env_or_default("BAZARI_API_BASE_URL", DEFAULT_API_BASE_URL)
            .parse::<Url>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("BAZARI_API_BASE_URL".to_string(), e.to_string())
            })?;

        let data_dir = get_optional_env("BAZARI_DATA_DIR")
            .map_or_else(default_data_dir, PathBuf::from);

        let timeout_secs = get_env_or_default("BAZARI_HTTP_TIMEOUT_SECS", "10")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("BAZARI_HTTP_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        let default_cart_id = get_env_or_default("BAZARI_DEFAULT_CART_ID", "1")
            .parse::<i64>()
            .map(CartId::new)
            .map_err(|e| {
                ConfigError::InvalidEnvVar("BAZARI_DEFAULT_CART_ID".to_string(), e.to_string())
            })?;

        Ok(Self {
            api_base_url,
            data_dir,
            http_timeout: Duration::from_secs(timeout_secs),
            default_cart_id,
        })
    }
}

/// Per-user data directory when `BAZARI_DATA_DIR` is not set.
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bazari")
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base_url_parses() {
        let url = DEFAULT_API_BASE_URL.parse::<Url>().unwrap();
        assert_eq!(url.host_str(), Some("fakestoreapi.com"));
    }

    #[test]
    fn test_default_data_dir_ends_with_app_name() {
        let dir = default_data_dir();
        assert!(dir.ends_with("bazari"));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidEnvVar("BAZARI_HTTP_TIMEOUT_SECS".to_string(), "nan".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid environment variable BAZARI_HTTP_TIMEOUT_SECS: nan"
        );
    }
}
