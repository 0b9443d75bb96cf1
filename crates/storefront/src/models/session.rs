//! Session-related types.
//!
//! Types stored in the session for sign-in state and the cart.

use serde::{Deserialize, Serialize};
use tastebud_core::{CartStore, Email, UserId, UserRole};
use tower_sessions::Session;
use tracing::warn;

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user. The
/// access token is kept under its own key so this type can be logged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Backend user ID.
    pub id: UserId,
    /// Platform role.
    pub role: UserRole,
    /// Email the user signed in with.
    pub email: Email,
}

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the backend access token.
    pub const ACCESS_TOKEN: &str = "access_token";

    /// Key for the serialized cart.
    pub const CART: &str = "cart";
}

/// Load the session's cart.
///
/// A stored cart that no longer satisfies the cart invariants is discarded
/// and an empty cart returned in its place.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn load_cart(session: &Session) -> Result<CartStore, tower_sessions::session::Error> {
    let Some(raw) = session.get::<serde_json::Value>(keys::CART).await? else {
        return Ok(CartStore::new());
    };

    match serde_json::from_value::<CartStore>(raw) {
        Ok(cart) => Ok(cart),
        Err(e) => {
            warn!(error = %e, "Discarding invalid stored cart");
            session.remove_value(keys::CART).await?;
            Ok(CartStore::new())
        }
    }
}

/// Write the cart back to the session; an empty cart removes the key.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn save_cart(
    session: &Session,
    cart: &CartStore,
) -> Result<(), tower_sessions::session::Error> {
    if cart.is_empty() {
        session.remove_value(keys::CART).await?;
    } else {
        session.insert(keys::CART, cart).await?;
    }
    Ok(())
}
