//! Order route handler.
//!
//! The order is never sent by the server: the cart is composed into a
//! message and the shopper is redirected to the messaging link.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;
use vitrina_core::{Shop, ShopEvent, ShopOutcome};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::load_cart;
use crate::routes::is_htmx;
use crate::state::AppState;

/// Warning shown when an order is requested with an empty cart.
pub const EMPTY_CART_WARNING: &str = "Your cart is empty.";

/// Order warning fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/order_warning.html")]
pub struct OrderWarningTemplate {
    pub message: &'static str,
}

/// Compose the order and send the shopper to the messaging link.
///
/// HTMX requests get an `HX-Redirect` header; plain form posts get a
/// `303 See Other`. An empty cart answers 422 with a warning fragment.
#[instrument(skip(state, session, headers))]
pub async fn send(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
) -> Result<Response> {
    let cart = load_cart(&session).await?;
    let mut shop = Shop::new(state.catalog(), state.composer(), cart);

    match shop.dispatch(ShopEvent::SendOrder) {
        ShopOutcome::OrderReady { message, link } => {
            add_breadcrumb("order", "Order link composed", None);
            tracing::info!(
                lines = shop.cart().len(),
                total = %shop.cart().total(),
                "Order composed"
            );
            tracing::debug!(%message, "Order message");

            if is_htmx(&headers) {
                Ok((AppendHeaders([("HX-Redirect", link)]), StatusCode::OK).into_response())
            } else {
                Ok(Redirect::to(&link).into_response())
            }
        }
        ShopOutcome::EmptyCart => Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            OrderWarningTemplate {
                message: EMPTY_CART_WARNING,
            },
        )
            .into_response()),
        other => Err(AppError::Internal(format!(
            "unexpected order outcome: {other:?}"
        ))),
    }
}
