//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `LOCALCART_API_URL` - Base URL of the LocalCart API
//!   (default: `http://localhost:8080/api/v1`)
//! - `LOCALCART_TOKEN_FILE` - Path for persisted auth tokens; when unset
//!   the session is memory-only and does not survive the process

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Default API base path when `LOCALCART_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api/v1";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// LocalCart client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL for API requests, without a trailing slash.
    pub api_url: String,
    /// Path for the persisted token file, when token persistence is
    /// enabled.
    pub token_file: Option<PathBuf>,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `LOCALCART_API_URL` is set but is not a
    /// valid URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_url = get_env_or_default("LOCALCART_API_URL", DEFAULT_API_URL);
        let mut config = Self::new(&api_url)
            .map_err(|e| ConfigError::InvalidEnvVar("LOCALCART_API_URL".to_owned(), e))?;

        config.token_file = get_optional_env("LOCALCART_TOKEN_FILE").map(PathBuf::from);

        Ok(config)
    }

    /// Build a configuration from an explicit base URL.
    ///
    /// # Errors
    ///
    /// Returns the parse failure message if `api_url` is not a valid
    /// absolute URL.
    pub fn new(api_url: &str) -> Result<Self, String> {
        let parsed = Url::parse(api_url).map_err(|e| e.to_string())?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(format!("unsupported URL scheme: {}", parsed.scheme()));
        }

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_owned(),
            token_file: None,
        })
    }

    /// Enable token persistence at the given path.
    #[must_use]
    pub fn with_token_file(mut self, path: PathBuf) -> Self {
        self.token_file = Some(path);
        self
    }
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_trailing_slash() {
        let config = ClientConfig::new("http://localhost:8080/api/v1/").unwrap();
        assert_eq!(config.api_url, "http://localhost:8080/api/v1");
    }

    #[test]
    fn test_new_rejects_invalid_url() {
        assert!(ClientConfig::new("not a url").is_err());
    }

    #[test]
    fn test_new_rejects_non_http_scheme() {
        assert!(ClientConfig::new("ftp://example.com/api").is_err());
    }

    #[test]
    fn test_default_has_no_token_file() {
        let config = ClientConfig::new(DEFAULT_API_URL).unwrap();
        assert!(config.token_file.is_none());
    }

    #[test]
    fn test_with_token_file() {
        let config = ClientConfig::new(DEFAULT_API_URL)
            .unwrap()
            .with_token_file(PathBuf::from("/tmp/tokens.json"));
        assert_eq!(
            config.token_file.as_deref(),
            Some(std::path::Path::new("/tmp/tokens.json"))
        );
    }
}
