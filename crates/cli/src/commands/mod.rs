//! Command implementations for the LocalCart CLI.
//!
//! Each module wires a subcommand group to the client library. Input
//! validation the library leaves to callers (non-empty credentials,
//! well-formed email) happens here, before any request goes out.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod orders;

use localcart_client::{
    ApiClient, ApiError, ClientConfig, CommerceClient, ConfigError, SessionError, SessionStore,
    TokenStorage,
};
use localcart_core::EmailError;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Client configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The API request behind the command failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A session operation failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The email argument is not a well-formed address.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// A command argument failed pre-flight validation.
    #[error("{0}")]
    InvalidInput(String),
}

/// Shared handles for one command invocation.
pub struct Context {
    pub commerce: CommerceClient,
    pub session: SessionStore,
}

/// Build the client stack from the environment and hydrate persisted
/// tokens.
pub fn context() -> Result<Context, CliError> {
    let config = ClientConfig::from_env()?;
    let storage = TokenStorage::new(config.token_file.clone());
    let http = ApiClient::new(&config, storage);

    let session = SessionStore::new(http.clone());
    session.load_from_storage()?;

    Ok(Context {
        commerce: CommerceClient::new(http),
        session,
    })
}
