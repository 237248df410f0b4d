//! LocalCart Client - typed client library for the LocalCart commerce API.
//!
//! This crate implements the customer-facing client side of the LocalCart
//! platform: browsing the product catalog, managing a shopping cart,
//! checking out, viewing order history, and the session/token lifecycle
//! that authenticates it all.
//!
//! # Architecture
//!
//! - [`api::ApiClient`] - the single HTTP entry point: base URL, JSON
//!   content type, bearer-token injection, uniform error normalization,
//!   and a session-expiry signal on `401`
//! - [`TokenStorage`] - the persisted access/refresh token pair, shared
//!   between the request layer and the session store
//! - [`SessionStore`] - login, registration, logout, silent refresh, and
//!   profile fetches; the sole consumer of session-expiry signals
//! - [`CommerceClient`] - cached reads for products, categories, cart,
//!   and orders, with an explicit mutation-to-invalidation mapping
//!
//! The remote API is the source of truth: cart and order totals are never
//! computed locally, and every successful mutation invalidates the
//! affected cached reads so the next access refetches.
//!
//! # Example
//!
//! ```rust,ignore
//! use localcart_client::{ApiClient, ClientConfig, CommerceClient, SessionStore, TokenStorage};
//!
//! let config = ClientConfig::from_env()?;
//! let storage = TokenStorage::new(config.token_file.clone());
//! let http = ApiClient::new(&config, storage);
//!
//! let session = SessionStore::new(http.clone());
//! session.load_from_storage()?;
//! session.login("shopper@example.com", "hunter2secret").await?;
//!
//! let commerce = CommerceClient::new(http);
//! commerce.add_to_cart(&"p1".into(), 2).await?;
//! let cart = commerce.cart().await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod session;
pub mod storage;

pub use api::http::{ApiClient, SessionExpired};
pub use api::{ApiError, CommerceClient};
pub use config::{ClientConfig, ConfigError};
pub use session::{Session, SessionError, SessionStore};
pub use storage::{StorageError, TokenPair, TokenStorage};
