//! Low-level HTTP wrapper for the LocalCart API.
//!
//! Every outbound request goes through [`ApiClient`]: it prefixes the
//! configured base URL, sets the JSON content type, attaches the bearer
//! token when one is present in [`TokenStorage`], and normalizes every
//! failure into [`ApiError`].
//!
//! A `401` on any request additionally clears the persisted tokens and
//! broadcasts a [`SessionExpired`] event. The transport itself performs no
//! navigation or state reset beyond that - the session store is the sole
//! subscriber and decides what "logged out" means.
//!
//! The wrapper never retries; GET/PUT/DELETE are safe for callers to retry.

use std::collections::HashMap;
use std::sync::Arc;

use reqwest::{Method, StatusCode, header};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::api::ApiError;
use crate::config::ClientConfig;
use crate::storage::TokenStorage;

/// Broadcast when a request comes back `401 Unauthorized` and tokens were
/// actually cleared. Fired at most once per authenticated session, even
/// when several in-flight requests fail together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionExpired;

/// Error body the LocalCart API returns for non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    #[serde(default)]
    errors: HashMap<String, String>,
}

/// HTTP client for the LocalCart API.
///
/// Cheap to clone; all clones share the underlying connection pool, token
/// storage, and session-expiry channel.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
    storage: TokenStorage,
    expired_tx: broadcast::Sender<SessionExpired>,
}

impl ApiClient {
    /// Create a new API client over the given token storage.
    #[must_use]
    pub fn new(config: &ClientConfig, storage: TokenStorage) -> Self {
        let (expired_tx, _) = broadcast::channel(16);

        Self {
            inner: Arc::new(ApiClientInner {
                client: reqwest::Client::new(),
                base_url: config.api_url.clone(),
                storage,
                expired_tx,
            }),
        }
    }

    /// The token storage this client reads bearer tokens from.
    #[must_use]
    pub fn storage(&self) -> &TokenStorage {
        &self.inner.storage
    }

    /// Subscribe to session-expiry events raised by `401` responses.
    #[must_use]
    pub fn subscribe_expiry(&self) -> broadcast::Receiver<SessionExpired> {
        self.inner.expired_tx.subscribe()
    }

    // =========================================================================
    // Request Methods
    // =========================================================================

    /// `GET` a JSON resource.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-2xx status, or an
    /// undecodable body.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(Method::GET, path, None::<&()>).await
    }

    /// `POST` a JSON body and decode the response.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-2xx status, or an
    /// undecodable body.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(Method::POST, path, Some(body)).await
    }

    /// `PUT` a JSON body and decode the response.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-2xx status, or an
    /// undecodable body.
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(Method::PUT, path, Some(body)).await
    }

    /// `PATCH` a JSON body and decode the response.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-2xx status, or an
    /// undecodable body.
    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(Method::PATCH, path, Some(body)).await
    }

    /// `DELETE` a resource and decode the response.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-2xx status, or an
    /// undecodable body.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(Method::DELETE, path, None::<&()>).await
    }

    /// `POST` a JSON body, discarding the response body.
    ///
    /// Used for mutations whose response is never authoritative for
    /// client state (the caller refetches instead).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or non-2xx status.
    pub async fn post_unit<B>(&self, path: &str, body: &B) -> Result<(), ApiError>
    where
        B: serde::Serialize + ?Sized,
    {
        self.send(Method::POST, path, Some(body)).await.map(|_| ())
    }

    /// `PUT` a JSON body, discarding the response body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or non-2xx status.
    pub async fn put_unit<B>(&self, path: &str, body: &B) -> Result<(), ApiError>
    where
        B: serde::Serialize + ?Sized,
    {
        self.send(Method::PUT, path, Some(body)).await.map(|_| ())
    }

    /// `DELETE` a resource, discarding the response body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or non-2xx status.
    pub async fn delete_unit(&self, path: &str) -> Result<(), ApiError> {
        self.send(Method::DELETE, path, None::<&()>)
            .await
            .map(|_| ())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    async fn execute<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let text = self.send(method, path, body).await?;
        serde_json::from_str(&text).map_err(|e| {
            warn!(
                path,
                body = %text.chars().take(500).collect::<String>(),
                "failed to decode API response"
            );
            ApiError::Parse(e)
        })
    }

    /// Send a request and return the raw response text after status
    /// handling and error normalization.
    async fn send<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<String, ApiError>
    where
        B: serde::Serialize + ?Sized,
    {
        let url = format!("{}{}", self.inner.base_url, path);

        let mut request = self
            .inner
            .client
            .request(method.clone(), &url)
            .header(header::CONTENT_TYPE, "application/json");

        if let Some(token) = self.inner.storage.access_token() {
            request = request.bearer_auth(token.expose_secret());
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            debug!(%method, path, status = status.as_u16(), "API request ok");
            return Ok(text);
        }

        if status == StatusCode::UNAUTHORIZED {
            self.invalidate_session();
        }

        Err(normalize_error(status, &text))
    }

    /// Clear persisted tokens and, when they were actually present,
    /// broadcast [`SessionExpired`]. The clear is idempotent, so only the
    /// first of several concurrent `401`s produces an event.
    fn invalidate_session(&self) {
        if self.inner.storage.clear() {
            debug!("session expired, tokens cleared");
            let _ = self.inner.expired_tx.send(SessionExpired);
        }
    }
}

/// Normalize a non-2xx response into [`ApiError::Http`].
///
/// The LocalCart API reports failures as `{"message": …, "errors":
/// {field: message}}`; anything else falls back to the raw body or the
/// status' canonical reason.
fn normalize_error(status: StatusCode, body: &str) -> ApiError {
    let parsed: Option<ErrorBody> = serde_json::from_str(body).ok();

    let (message, field_errors) = match parsed {
        Some(parsed) => {
            let message = parsed.message.unwrap_or_else(|| fallback_message(status, body));
            (message, parsed.errors)
        }
        None => (fallback_message(status, body), HashMap::new()),
    };

    ApiError::Http {
        status: status.as_u16(),
        message,
        field_errors,
    }
}

fn fallback_message(status: StatusCode, body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_owned()
    } else {
        trimmed.chars().take(200).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_error_with_api_body() {
        let err = normalize_error(
            StatusCode::BAD_REQUEST,
            r#"{"message": "Validation failed", "errors": {"email": "must not be blank"}}"#,
        );
        let ApiError::Http {
            status,
            message,
            field_errors,
        } = err
        else {
            panic!("expected Http error");
        };
        assert_eq!(status, 400);
        assert_eq!(message, "Validation failed");
        assert_eq!(
            field_errors.get("email").map(String::as_str),
            Some("must not be blank")
        );
    }

    #[test]
    fn test_normalize_error_non_json_body() {
        let err = normalize_error(StatusCode::BAD_GATEWAY, "upstream exploded");
        assert_eq!(err.to_string(), "HTTP 502: upstream exploded");
    }

    #[test]
    fn test_normalize_error_empty_body_uses_reason() {
        let err = normalize_error(StatusCode::NOT_FOUND, "");
        assert_eq!(err.to_string(), "HTTP 404: Not Found");
    }

    #[test]
    fn test_normalize_error_json_without_message() {
        let err = normalize_error(StatusCode::INTERNAL_SERVER_ERROR, r#"{"errors": {}}"#);
        let ApiError::Http { message, .. } = err else {
            panic!("expected Http error");
        };
        assert_eq!(message, r#"{"errors": {}}"#);
    }
}
