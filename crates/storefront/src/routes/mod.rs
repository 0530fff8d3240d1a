//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Storefront page (filters, grid, cart panel)
//! GET  /products               - Product grid fragment (brand, category, q)
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart panel fragment
//! POST /cart/add               - Add product (returns cart panel, triggers cart-updated)
//! POST /cart/update            - Set quantity (returns cart panel)
//! POST /cart/remove            - Remove line (returns cart panel)
//! POST /cart/clear             - Empty the cart (returns cart panel)
//! GET  /cart/count             - Cart count badge fragment
//!
//! # Order
//! POST /order                  - Redirect to the composed messaging link
//! ```

pub mod cart;
pub mod home;
pub mod order;
pub mod products;

use axum::{
    Router,
    http::HeaderMap,
    routing::{get, post},
};

use crate::state::AppState;

/// Whether the request was issued by HTMX.
pub(crate) fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get("HX-Request")
        .is_some_and(|value| value.as_bytes() == b"true")
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/products", get(products::index))
        .nest("/cart", cart_routes())
        .route("/order", post(order::send))
}
