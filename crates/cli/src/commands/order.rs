//! Order composition command.
//!
//! Builds a cart from `--item` arguments and prints the order message and
//! the messaging link, exactly as the storefront would produce them.
//!
//! # Usage
//!
//! ```bash
//! vitrina order compose --item 1=2 --item g-1 --phone 5491100000000
//! ```

use std::io::Write;

use vitrina_core::{
    Cart, Catalog, OrderComposer, OrderError, ProductId, Shop, ShopEvent, ShopOutcome,
    parse_quantity,
};
use vitrina_storefront::config::{parse_phone, resolve_link_template};

use super::CommandError;

/// Build the order composer from the link settings.
///
/// # Errors
///
/// Returns an error if the phone number or the link template is invalid.
pub fn composer(
    phone: &str,
    link_template: &str,
    greeting: String,
) -> Result<OrderComposer, CommandError> {
    let phone = parse_phone("ORDER_PHONE", phone)?;
    let link = resolve_link_template("ORDER_LINK_TEMPLATE", link_template, &phone)?;
    Ok(OrderComposer::new(greeting, link))
}

/// Parse an `ID` or `ID=QTY` argument.
///
/// The quantity follows the storefront's input rules: anything that is not
/// a positive integer counts as 1.
fn parse_item(raw: &str) -> Result<(ProductId, i64), CommandError> {
    let (id, quantity) = match raw.split_once('=') {
        Some((id, quantity)) => (id.trim(), parse_quantity(quantity).max(1)),
        None => (raw.trim(), 1),
    };

    if id.is_empty() {
        return Err(CommandError::InvalidItem(raw.to_string()));
    }
    Ok((ProductId::new(id), quantity))
}

/// Compose the order for the given items and print message and link.
///
/// Repeating an id adds to its quantity.
///
/// # Errors
///
/// Returns an error for a malformed item, an id missing from the catalog,
/// or a failed write.
pub fn compose(
    catalog: &Catalog,
    composer: &OrderComposer,
    items: &[String],
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let mut shop = Shop::new(catalog, composer, Cart::new());

    for raw in items {
        let (id, quantity) = parse_item(raw)?;
        let current = shop
            .cart()
            .line(&id)
            .map_or(0, |line| i64::from(line.quantity()));

        if let ShopOutcome::UnknownProduct(id) = shop.dispatch(ShopEvent::AddToCart(id.clone())) {
            return Err(CommandError::UnknownProduct(id.into_inner()));
        }
        shop.dispatch(ShopEvent::SetQuantity {
            id,
            quantity: current.saturating_add(quantity),
        });
    }

    match shop.dispatch(ShopEvent::SendOrder) {
        ShopOutcome::OrderReady { message, link } => {
            writeln!(out, "{message}")?;
            writeln!(out)?;
            writeln!(out, "{link}")?;
            Ok(())
        }
        _ => Err(CommandError::Order(OrderError::EmptyCart)),
    }
}
