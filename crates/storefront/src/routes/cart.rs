//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Every mutation loads the cart from the session, dispatches one event to
//! the shop controller and stores the result. Requests without the
//! `HX-Request` header are redirected back to the page instead.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use vitrina_core::{Cart, CartLine, ProductId, Shop, ShopEvent, ShopOutcome, parse_quantity};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::{load_cart, save_cart};
use crate::routes::is_htmx;
use crate::state::AppState;

/// Event fired after the cart changes so the badge refreshes itself.
pub const CART_UPDATED_EVENT: &str = "cart-updated";

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.product_id.to_string(),
            name: line.name.clone(),
            quantity: line.quantity(),
            price: line.unit_price.to_string(),
            line_price: line.subtotal().to_string(),
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub item_count: u32,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.lines().iter().map(CartItemView::from).collect(),
            total: cart.total().to_string(),
            item_count: cart.item_count(),
        }
    }
}

/// Form data naming one product.
#[derive(Debug, Deserialize)]
pub struct ProductForm {
    pub product_id: String,
}

/// Update quantity form data.
///
/// The quantity is kept raw so that anything a browser can submit is
/// normalized instead of rejected.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    #[serde(default)]
    pub quantity: String,
}

/// Cart panel fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Dispatch one cart event for the session and render the result.
async fn apply(
    state: &AppState,
    session: &Session,
    headers: &HeaderMap,
    event: ShopEvent,
) -> Result<Response> {
    let cart = load_cart(session).await?;
    let mut shop = Shop::new(state.catalog(), state.composer(), cart);

    match shop.dispatch(event) {
        ShopOutcome::CartChanged => {
            let cart = shop.into_cart();
            save_cart(session, &cart).await?;

            if !is_htmx(headers) {
                return Ok(Redirect::to("/").into_response());
            }

            Ok((
                AppendHeaders([("HX-Trigger", CART_UPDATED_EVENT)]),
                CartItemsTemplate {
                    cart: CartView::from(&cart),
                },
            )
                .into_response())
        }
        ShopOutcome::UnknownProduct(id) => Err(AppError::NotFound(format!("product {id}"))),
        _ => {
            if !is_htmx(headers) {
                return Ok(Redirect::to("/").into_response());
            }

            Ok(CartItemsTemplate {
                cart: CartView::from(shop.cart()),
            }
            .into_response())
        }
    }
}

/// Cart panel fragment.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<CartItemsTemplate> {
    let cart = load_cart(&session).await?;

    Ok(CartItemsTemplate {
        cart: CartView::from(&cart),
    })
}

/// Add one unit of a product to the cart (HTMX).
#[instrument(skip(state, session, headers))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    add_breadcrumb("cart", "Add to cart", Some(&[("product_id", form.product_id.as_str())]));

    apply(
        &state,
        &session,
        &headers,
        ShopEvent::AddToCart(ProductId::new(form.product_id)),
    )
    .await
}

/// Set the quantity of a cart line (HTMX).
#[instrument(skip(state, session, headers))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let quantity = parse_quantity(&form.quantity);

    apply(
        &state,
        &session,
        &headers,
        ShopEvent::SetQuantity {
            id: ProductId::new(form.product_id),
            quantity,
        },
    )
    .await
}

/// Remove a line from the cart (HTMX).
#[instrument(skip(state, session, headers))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    add_breadcrumb("cart", "Remove from cart", Some(&[("product_id", form.product_id.as_str())]));

    apply(
        &state,
        &session,
        &headers,
        ShopEvent::RemoveFromCart(ProductId::new(form.product_id)),
    )
    .await
}

/// Empty the cart (HTMX).
#[instrument(skip(state, session, headers))]
pub async fn clear(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
) -> Result<Response> {
    add_breadcrumb("cart", "Clear cart", None);

    apply(&state, &session, &headers, ShopEvent::ClearCart).await
}

/// Cart count badge fragment.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<CartCountTemplate> {
    let cart = load_cart(&session).await?;

    Ok(CartCountTemplate {
        count: cart.item_count(),
    })
}
