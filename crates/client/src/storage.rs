//! Persisted token storage.
//!
//! The browser build of LocalCart keeps its two auth tokens in
//! local storage under well-known keys; this is the native analog. Tokens
//! live in memory and are optionally mirrored to a JSON file so a new
//! process can resume the session. Writes are last-writer-wins, which is
//! acceptable because writes (login, refresh, logout) are rare relative
//! to reads.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

/// Errors from reading or writing the token file.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("token file I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Token file contents could not be decoded.
    #[error("token file parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The access/refresh token pair persisted after authentication.
#[derive(Clone)]
pub struct TokenPair {
    /// Bearer token attached to outgoing requests.
    pub access: SecretString,
    /// Token exchanged for a fresh access token.
    pub refresh: SecretString,
}

impl TokenPair {
    /// Build a pair from plain strings.
    #[must_use]
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self {
            access: SecretString::from(access.into()),
            refresh: SecretString::from(refresh.into()),
        }
    }
}

impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair")
            .field("access", &"[REDACTED]")
            .field("refresh", &"[REDACTED]")
            .finish()
    }
}

/// On-disk shape; field names match the browser's storage keys.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenFile {
    access_token: String,
    refresh_token: String,
}

/// Process-wide token store shared by the request layer and the session
/// store.
///
/// Cheap to clone; all clones share state. When constructed without a file
/// path the store is memory-only and [`load`](Self::load) is a no-op - the
/// equivalent of running outside a persistence context.
#[derive(Clone)]
pub struct TokenStorage {
    inner: Arc<TokenStorageInner>,
}

struct TokenStorageInner {
    tokens: Mutex<Option<TokenPair>>,
    path: Option<PathBuf>,
}

impl TokenStorage {
    /// Create a token store, file-backed when `path` is given.
    #[must_use]
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            inner: Arc::new(TokenStorageInner {
                tokens: Mutex::new(None),
                path,
            }),
        }
    }

    /// Create a memory-only store (used in tests and ephemeral sessions).
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(None)
    }

    /// Current access token, if authenticated.
    #[must_use]
    pub fn access_token(&self) -> Option<SecretString> {
        self.lock().as_ref().map(|t| t.access.clone())
    }

    /// Current refresh token, if authenticated.
    #[must_use]
    pub fn refresh_token(&self) -> Option<SecretString> {
        self.lock().as_ref().map(|t| t.refresh.clone())
    }

    /// Store both tokens, replacing any previous pair, and mirror them to
    /// the token file when one is configured.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the token file cannot be written; the
    /// in-memory pair is updated regardless, so the session stays usable.
    pub fn store(&self, pair: TokenPair) -> Result<(), StorageError> {
        *self.lock() = Some(pair.clone());

        if let Some(path) = &self.inner.path {
            let body = serde_json::json!({
                "accessToken": pair.access.expose_secret(),
                "refreshToken": pair.refresh.expose_secret(),
            });
            write_atomically(path, &serde_json::to_vec_pretty(&body)?)?;
        }

        Ok(())
    }

    /// Hydrate the in-memory pair from the token file.
    ///
    /// A no-op when the store is memory-only or the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the file exists but cannot be read or
    /// decoded.
    pub fn load(&self) -> Result<(), StorageError> {
        let Some(path) = &self.inner.path else {
            return Ok(());
        };

        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        let file: TokenFile = serde_json::from_slice(&bytes)?;
        *self.lock() = Some(TokenPair::new(file.access_token, file.refresh_token));
        Ok(())
    }

    /// Remove both tokens from memory and disk.
    ///
    /// Idempotent: returns `true` only when tokens were actually present,
    /// so concurrent clears (e.g. several in-flight requests all hitting a
    /// `401`) observe exactly one effective clear.
    pub fn clear(&self) -> bool {
        let had_tokens = self.lock().take().is_some();

        if let Some(path) = &self.inner.path
            && let Err(e) = std::fs::remove_file(path)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            warn!(error = %e, "failed to remove token file");
        }

        had_tokens
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<TokenPair>> {
        // A poisoned lock means a panic mid-swap of an Option; the value is
        // still coherent, so recover rather than propagate the poison.
        self.inner
            .tokens
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// Write via a temp file in the same directory, then rename over the
/// target, so readers never observe a partially written token file.
fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        std::fs::create_dir_all(dir)?;
    }

    let tmp = path.with_extension("tmp");
    {
        let mut options = std::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        // Owner-only: the file holds both bearer tokens in the clear
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut f = options.open(&tmp)?;
        f.write_all(bytes)?;
        f.sync_all()?;
    }
    std::fs::rename(&tmp, path)?;
    Ok(())
}
