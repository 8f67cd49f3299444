//! Session-related types.
//!
//! Everything the storefront remembers about a shopper lives in their
//! session: the backend bearer token, the cart mirror and the cart signal.
//! The token and the signal last as long as the session. The cart mirror
//! only lasts for one product page view and is reset by [`reset_mirror`].

use shopfront_core::{CartMirror, CartSignal};
use tower_sessions::Session;

/// Session keys for storefront state.
pub mod keys {
    /// Key for the bearer token sent to the shop backend.
    pub const AUTH_TOKEN: &str = "auth_token";

    /// Key for the local copy of the backend cart.
    pub const CART_MIRROR: &str = "cart_mirror";

    /// Key for the cart activity counter shown in the navbar.
    pub const CART_SIGNAL: &str = "cart_signal";
}

/// Load the cart mirror, falling back to an empty, closed cart.
///
/// # Errors
///
/// Returns an error if the session store cannot be read.
pub async fn load_mirror(session: &Session) -> Result<CartMirror, tower_sessions::session::Error> {
    Ok(session
        .get::<CartMirror>(keys::CART_MIRROR)
        .await?
        .unwrap_or_default())
}

/// Store the cart mirror.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn save_mirror(
    session: &Session,
    mirror: &CartMirror,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::CART_MIRROR, mirror).await
}

/// Start a new page view with an empty, closed cart mirror.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn reset_mirror(session: &Session) -> Result<CartMirror, tower_sessions::session::Error> {
    let mirror = CartMirror::default();
    save_mirror(session, &mirror).await?;
    Ok(mirror)
}

/// Load the cart signal (zero when unset).
///
/// # Errors
///
/// Returns an error if the session store cannot be read.
pub async fn load_signal(session: &Session) -> Result<CartSignal, tower_sessions::session::Error> {
    Ok(session
        .get::<CartSignal>(keys::CART_SIGNAL)
        .await?
        .unwrap_or_default())
}

/// Store the cart signal.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn save_signal(
    session: &Session,
    signal: CartSignal,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::CART_SIGNAL, signal).await
}
