//! Session-related types.
//!
//! The shopper's cart is stored in the session under [`keys::CART`]. It is
//! kept for the life of the session only; there is no server-side order log.

use tower_sessions::Session;
use vitrina_core::Cart;

/// Session keys for storefront data.
pub mod keys {
    /// Key for storing the shopper's cart.
    pub const CART: &str = "cart";
}

/// Load the cart from the session, or an empty cart if none is stored.
///
/// # Errors
///
/// Returns an error if the session store cannot be read.
pub async fn load_cart(session: &Session) -> Result<Cart, tower_sessions::session::Error> {
    Ok(session.get::<Cart>(keys::CART).await?.unwrap_or_default())
}

/// Store the cart in the session.
///
/// # Errors
///
/// Returns an error if the session store cannot be written.
pub async fn save_cart(session: &Session, cart: &Cart) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::CART, cart).await
}
