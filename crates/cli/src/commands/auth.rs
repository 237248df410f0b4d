//! Authentication commands: login, register, logout, whoami.
//!
//! # Usage
//!
//! ```bash
//! localcart login -e you@example.com -p secret
//! localcart whoami
//! localcart logout
//! ```

use localcart_core::Email;

use super::{CliError, context};

/// Log in and persist the session tokens.
pub async fn login(email: &str, password: &str) -> Result<(), CliError> {
    let email = Email::parse(email)?;
    require_password(password)?;

    let ctx = context()?;
    ctx.session.login(email.as_str(), password).await?;

    if let Some(user) = ctx.session.session().user {
        tracing::info!("Logged in as {} ({})", user.email, user.role);
    }
    Ok(())
}

/// Register a new account and log straight in.
pub async fn register(
    email: &str,
    password: &str,
    first_name: &str,
    last_name: &str,
) -> Result<(), CliError> {
    let email = Email::parse(email)?;
    require_password(password)?;

    let ctx = context()?;
    ctx.session
        .register(email.as_str(), password, first_name, last_name)
        .await?;

    tracing::info!("Account created for {}", email);
    Ok(())
}

/// Discard the session and persisted tokens.
pub fn logout() -> Result<(), CliError> {
    let ctx = context()?;
    ctx.session.logout();
    tracing::info!("Logged out");
    Ok(())
}

/// Fetch and display the authenticated user's profile.
pub async fn whoami() -> Result<(), CliError> {
    let ctx = context()?;
    let user = ctx.session.get_profile().await?;

    tracing::info!("User ID: {}", user.id);
    tracing::info!("Email:   {}", user.email);
    tracing::info!("Role:    {}", user.role);
    if let Some(name) = user.first_name {
        let last = user.last_name.unwrap_or_default();
        tracing::info!("Name:    {name} {last}");
    }
    Ok(())
}

fn require_password(password: &str) -> Result<(), CliError> {
    if password.is_empty() {
        return Err(CliError::InvalidInput(
            "password must not be empty".to_owned(),
        ));
    }
    Ok(())
}
