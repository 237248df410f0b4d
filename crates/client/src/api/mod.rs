//! LocalCart commerce API client.
//!
//! # Architecture
//!
//! - [`ApiClient`](http::ApiClient) is the single point of outbound request
//!   construction: base URL, JSON content type, bearer-token injection,
//!   uniform error normalization, and the session-expiry signal on `401`.
//! - [`CommerceClient`](client::CommerceClient) layers a keyed response
//!   cache (`moka`, 5 minute TTL) over the reads and an explicit
//!   mutation-to-invalidation mapping over the writes.
//! - The server is the source of truth for every monetary aggregate; cart
//!   and order totals are never computed or patched locally, only refetched.
//!
//! # Example
//!
//! ```rust,ignore
//! use localcart_client::{ClientConfig, CommerceClient, TokenStorage};
//! use localcart_client::api::http::ApiClient;
//!
//! let config = ClientConfig::from_env()?;
//! let storage = TokenStorage::new(config.token_file.clone());
//! let http = ApiClient::new(&config, storage);
//! let commerce = CommerceClient::new(http);
//!
//! // Browse the catalog
//! let page = commerce.products(1, 12).await?;
//!
//! // Mutate the cart; the cached cart is invalidated, not patched
//! commerce.add_to_cart(&"p1".into(), 2).await?;
//! let cart = commerce.cart().await?;
//! ```

pub mod cache;
pub mod client;
pub mod http;
pub mod types;

pub use client::CommerceClient;
pub use http::ApiClient;

use std::collections::HashMap;

use thiserror::Error;

/// Errors surfaced by the LocalCart API client.
///
/// Callers never see the transport-specific error shape: every non-2xx
/// response is normalized into [`ApiError::Http`] by the request layer.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network unreachable or connection-level failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response, normalized from the LocalCart error body.
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Server-provided message, or a fallback.
        message: String,
        /// Per-field validation messages, when the server provides them.
        field_errors: HashMap<String, String>,
    },

    /// Response body could not be decoded.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Client-side pre-flight rejection; never reaches the network.
    #[error("validation error: {0}")]
    Validation(String),
}

impl ApiError {
    /// Construct an HTTP error without field details.
    #[must_use]
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
            field_errors: HashMap::new(),
        }
    }

    /// HTTP status code, when this error carries one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether this error is a `401 Unauthorized` response.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Http { status: 401, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_display() {
        let err = ApiError::http(404, "Product not found");
        assert_eq!(err.to_string(), "HTTP 404: Product not found");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_validation_error_display() {
        let err = ApiError::Validation("email cannot be empty".to_string());
        assert_eq!(err.to_string(), "validation error: email cannot be empty");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_is_unauthorized() {
        assert!(ApiError::http(401, "Unauthorized").is_unauthorized());
        assert!(!ApiError::http(403, "Forbidden").is_unauthorized());
        assert!(!ApiError::Validation("x".into()).is_unauthorized());
    }
}
