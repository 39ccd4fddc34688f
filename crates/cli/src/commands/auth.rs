//! Session marker commands.
//!
//! # Usage
//!
//! ```bash
//! bazari login -u johnd -p 'm38rmF$'
//! bazari whoami
//! bazari logout
//! ```
//!
//! The session marker only gates routing in a real front-end; the cart
//! operations work without it.

use tracing::info;

use bazari_storefront::error::Result;
use bazari_storefront::session::Session;
use bazari_storefront::state::AppState;

/// Log in against the catalog's auth endpoint and persist the session marker.
///
/// # Errors
///
/// Returns an error if the credentials are rejected or the marker cannot be
/// written.
pub async fn login(state: &AppState, username: &str, password: &str) -> Result<()> {
    let token = state.catalog().login(username, password).await?;

    let session = Session {
        token,
        username: Some(username.to_string()),
    };
    state.sessions().save(&session).await?;

    info!(username = %username, "session stored");
    println!("Logged in as {username}");
    Ok(())
}

/// Remove the persisted session marker.
///
/// # Errors
///
/// Returns an error if the marker exists but cannot be removed.
pub async fn logout(state: &AppState) -> Result<()> {
    state.sessions().clear().await?;
    println!("Logged out");
    Ok(())
}

/// Print the username of the stored session, if any.
///
/// # Errors
///
/// Returns an error if the session blob cannot be read.
pub async fn whoami(state: &AppState) -> Result<()> {
    match state.sessions().load().await? {
        Some(session) => {
            println!("{}", session.username.as_deref().unwrap_or("(unknown user)"));
        }
        None => println!("Not logged in"),
    }
    Ok(())
}
