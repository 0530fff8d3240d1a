//! Session middleware configuration.
//!
//! Sessions hold the shopper's cart and live in a bounded in-process moka
//! cache: expired sessions are evicted, and a restart empties every cart,
//! the same as closing the page would.

use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_moka_store::MokaStore;

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "vitrina_session";

/// Session expiry time in seconds (2 days of inactivity).
const SESSION_EXPIRY_SECONDS: i64 = 2 * 24 * 60 * 60;

/// Upper bound on live sessions held in memory.
pub const MAX_SESSIONS: u64 = 10_000;

/// Create the session store, bounded to [`MAX_SESSIONS`] entries.
#[must_use]
pub fn create_session_store() -> MokaStore {
    MokaStore::new(Some(MAX_SESSIONS))
}

/// Create the session layer backed by the moka store.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MokaStore> {
    SessionManagerLayer::new(create_session_store())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
