//! Client-side session and token lifecycle.
//!
//! [`SessionStore`] owns the authentication state machine from the
//! storefront: `anonymous` → `authenticating` (while a login or
//! registration is in flight) → `authenticated` → back to `anonymous` on
//! logout or refresh failure. The access token itself lives in
//! [`TokenStorage`]; the store holds the user and the loading flag, and
//! `is_authenticated` is always derived from the presence of a user.
//!
//! The store is the sole subscriber of the transport's [`SessionExpired`]
//! events: when any request comes back `401`, the request layer clears
//! the persisted tokens and the session store - not the transport -
//! resets the in-memory state.

use std::sync::{Arc, RwLock, RwLockWriteGuard};

use secrecy::ExposeSecret;
use tokio::sync::broadcast;
use tracing::{debug, instrument, warn};

use crate::api::ApiError;
use crate::api::http::{ApiClient, SessionExpired};
use crate::api::types::{AuthResponse, LoginRequest, RefreshRequest, RegisterRequest, User};
use crate::storage::{StorageError, TokenPair, TokenStorage};

/// Errors from session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The API call behind the operation failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Persisted token storage failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// A point-in-time snapshot of the session.
#[derive(Debug, Clone)]
pub struct Session {
    /// The authenticated user, when logged in.
    pub user: Option<User>,
    /// Whether a login or registration is currently in flight.
    pub is_loading: bool,
    /// Derived: `user.is_some()`, always.
    pub is_authenticated: bool,
}

#[derive(Default)]
struct SessionState {
    user: Option<User>,
    is_loading: bool,
}

/// Process-wide authentication state with an explicit lifecycle.
///
/// Created at application start, cleared on logout. Cheap to clone; all
/// clones share state. Operations are not serialized against each other -
/// the last one to settle wins, and clearing is idempotent, so races like
/// a profile fetch crossing a logout are harmless.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionStoreInner>,
}

struct SessionStoreInner {
    http: ApiClient,
    storage: TokenStorage,
    state: RwLock<SessionState>,
}

impl SessionStore {
    /// Create a session store over the given HTTP client.
    ///
    /// The store shares the client's token storage, so tokens persisted by
    /// a login are immediately visible to the request layer.
    #[must_use]
    pub fn new(http: ApiClient) -> Self {
        let storage = http.storage().clone();
        Self {
            inner: Arc::new(SessionStoreInner {
                http,
                storage,
                state: RwLock::new(SessionState::default()),
            }),
        }
    }

    /// Snapshot the current session.
    #[must_use]
    pub fn session(&self) -> Session {
        let state = self.read();
        Session {
            user: state.user.clone(),
            is_loading: state.is_loading,
            is_authenticated: state.user.is_some(),
        }
    }

    /// Whether a user is currently logged in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.read().user.is_some()
    }

    // =========================================================================
    // Auth Operations
    // =========================================================================

    /// Log in with email and password.
    ///
    /// Credentials are validated by the caller (non-empty, well-formed
    /// email); the store posts them as-is. On success both tokens are
    /// persisted and the state becomes authenticated; on failure the state
    /// is left untouched and the error propagates. The loading flag is
    /// true for the duration and guaranteed false afterwards either way.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the request or token persistence fails.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<(), SessionError> {
        let _loading = LoadingGuard::begin(self);

        let response: AuthResponse = self
            .inner
            .http
            .post("/auth/login", &LoginRequest { email, password })
            .await?;

        self.establish(response)?;
        debug!("login succeeded");
        Ok(())
    }

    /// Register a new account.
    ///
    /// Same contract as [`login`](Self::login): tokens persisted and state
    /// authenticated on success, untouched on failure, loading flag
    /// released on every path.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the request or token persistence fails.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<(), SessionError> {
        let _loading = LoadingGuard::begin(self);

        let response: AuthResponse = self
            .inner
            .http
            .post(
                "/auth/register",
                &RegisterRequest {
                    email,
                    password,
                    first_name,
                    last_name,
                },
            )
            .await?;

        self.establish(response)?;
        debug!("registration succeeded");
        Ok(())
    }

    /// Log out: clear persisted tokens and reset to anonymous.
    ///
    /// Synchronous and idempotent; safe to call when already anonymous.
    pub fn logout(&self) {
        self.inner.storage.clear();
        let mut state = self.write();
        state.user = None;
        state.is_loading = false;
    }

    /// Exchange the persisted refresh token for a fresh session.
    ///
    /// A no-op when no refresh token is persisted. On any failure the
    /// store falls back to [`logout`](Self::logout) so a stale or invalid
    /// token is never left active, then propagates the error.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the exchange or token persistence
    /// fails (after the logout fallback has run).
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<(), SessionError> {
        let Some(refresh_token) = self.inner.storage.refresh_token() else {
            debug!("no refresh token persisted, skipping refresh");
            return Ok(());
        };

        let result: Result<AuthResponse, ApiError> = self
            .inner
            .http
            .post(
                "/auth/refresh",
                &RefreshRequest {
                    refresh_token: refresh_token.expose_secret(),
                },
            )
            .await;

        match result {
            Ok(response) => {
                // The server may rotate the refresh token; persist both
                self.establish(response)?;
                debug!("token refresh succeeded");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "token refresh failed, logging out");
                self.logout();
                Err(e.into())
            }
        }
    }

    /// Hydrate tokens from persisted storage.
    ///
    /// Does not fetch the user profile; call
    /// [`get_profile`](Self::get_profile) afterwards to populate the user.
    /// A no-op when the storage has no file backing.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the token file exists but cannot be
    /// read.
    pub fn load_from_storage(&self) -> Result<(), SessionError> {
        self.inner.storage.load()?;
        Ok(())
    }

    /// Fetch the current user's profile with the attached token.
    ///
    /// On failure (typically an expired or invalid token) the store falls
    /// back to [`logout`](Self::logout), then propagates the error.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the request fails (after the logout
    /// fallback has run).
    #[instrument(skip(self))]
    pub async fn get_profile(&self) -> Result<User, SessionError> {
        match self.inner.http.get::<User>("/auth/profile").await {
            Ok(user) => {
                self.write().user = Some(user.clone());
                Ok(user)
            }
            Err(e) => {
                warn!(error = %e, "profile fetch failed, logging out");
                self.logout();
                Err(e.into())
            }
        }
    }

    // =========================================================================
    // Session Expiry
    // =========================================================================

    /// Subscribe to transport-level session-expiry events.
    #[must_use]
    pub fn subscribe_expiry(&self) -> broadcast::Receiver<SessionExpired> {
        self.inner.http.subscribe_expiry()
    }

    /// Reset state after a session-expiry event.
    ///
    /// The request layer has already cleared the tokens; this drops the
    /// in-memory user. Idempotent.
    pub fn handle_session_expired(&self) {
        debug!("handling session expiry");
        self.logout();
    }

    /// Spawn a background task that resets the session whenever the
    /// transport reports an expired session.
    ///
    /// Returns the task handle; dropping it does not stop the listener,
    /// aborting it does.
    pub fn spawn_expiry_listener(&self) -> tokio::task::JoinHandle<()> {
        let store = self.clone();
        let mut rx = self.subscribe_expiry();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(SessionExpired) | Err(broadcast::error::RecvError::Lagged(_)) => {
                        store.handle_session_expired();
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Persist tokens and install the user from an auth response.
    fn establish(&self, response: AuthResponse) -> Result<(), StorageError> {
        self.inner
            .storage
            .store(TokenPair::new(response.access_token, response.refresh_token))?;
        self.write().user = Some(response.user);
        Ok(())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, SessionState> {
        self.inner
            .state
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.inner
            .state
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// RAII guard for the loading flag: set on construction, always released
/// on drop, so `is_loading` ends up false on success, failure, and panic
/// alike.
struct LoadingGuard {
    store: SessionStore,
}

impl LoadingGuard {
    fn begin(store: &SessionStore) -> Self {
        store.write().is_loading = true;
        Self {
            store: store.clone(),
        }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.store.write().is_loading = false;
    }
}
