//! The shopping cart.
//!
//! A [`Cart`] holds at most one [`CartLine`] per product and every line has a
//! quantity of at least 1. All operations are total: bad input is normalized,
//! never rejected.

use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::types::{Price, ProductId};

/// One product-quantity pairing.
///
/// The name and unit price are a snapshot taken when the product was first
/// added, so a cart survives independently of the catalog it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Price,
    quantity: u32,
}

impl CartLine {
    fn new(product: &Product) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.price,
            quantity: 1,
        }
    }

    /// Always at least 1.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// The cart of a single shopping session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add one unit of `product`.
    ///
    /// Increments the existing line for the product, or appends a new line
    /// with quantity 1.
    pub fn add(&mut self, product: &Product) {
        match self.line_mut(&product.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(1),
            None => self.lines.push(CartLine::new(product)),
        }
    }

    /// Set the quantity of an existing line.
    ///
    /// Quantities below 1 clamp to 1 and values above `u32::MAX` saturate.
    /// Unknown ids are ignored.
    pub fn set_quantity(&mut self, id: &ProductId, quantity: i64) {
        let quantity = u32::try_from(quantity.max(1)).unwrap_or(u32::MAX);
        if let Some(line) = self.line_mut(id) {
            line.quantity = quantity;
        }
    }

    /// Remove the line for `id`, if any.
    pub fn remove(&mut self, id: &ProductId) {
        self.lines.retain(|line| &line.product_id != id);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of all line subtotals. Display rounds to two decimals.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// Sum of all quantities, shown on the cart badge.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0, |count, line| count.saturating_add(line.quantity))
    }

    /// Lines in the order products were first added.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn line(&self, id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.product_id == id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    fn line_mut(&mut self, id: &ProductId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| &line.product_id == id)
    }
}

/// Parse a quantity typed by a shopper.
///
/// Leading whitespace is skipped and the leading
/// integer is taken (`"3 units"` is 3, `"2.7"` is 2). Input without a leading
/// integer becomes 1. The result may still be zero or negative;
/// [`Cart::set_quantity`] clamps it.
#[must_use]
pub fn parse_quantity(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, trimmed.get(1..).unwrap_or_default()),
        Some(b'+') => (false, trimmed.get(1..).unwrap_or_default()),
        _ => (false, trimmed),
    };

    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return 1;
    }

    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    if negative { -magnitude } else { magnitude }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::tests::product;

    fn widget() -> Product {
        product("1", "Widget", 999, "Acme", "Tools")
    }

    #[test]
    fn test_repeated_add_counts_calls() {
        let mut cart = Cart::new();
        for _ in 0..5 {
            cart.add(&widget());
        }
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.line(&ProductId::new("1")).map(CartLine::quantity), Some(5));
    }

    #[test]
    fn test_walkthrough() {
        let mut cart = Cart::new();
        let id = ProductId::new("1");

        cart.add(&widget());
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total().to_string(), "$9.99");

        cart.add(&widget());
        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.total().to_string(), "$19.98");

        cart.set_quantity(&id, 0);
        assert_eq!(cart.line(&id).map(CartLine::quantity), Some(1));

        cart.remove(&id);
        assert!(cart.is_empty());
        assert_eq!(cart.total().to_string(), "$0.00");
    }

    #[test]
    fn test_set_quantity_clamps_non_positive() {
        let mut cart = Cart::new();
        let id = ProductId::new("1");
        cart.add(&widget());

        for quantity in [0, -1, -500, i64::MIN] {
            cart.set_quantity(&id, quantity);
            assert_eq!(cart.line(&id).map(CartLine::quantity), Some(1));
        }

        cart.set_quantity(&id, 7);
        assert_eq!(cart.line(&id).map(CartLine::quantity), Some(7));

        cart.set_quantity(&id, i64::MAX);
        assert_eq!(cart.line(&id).map(CartLine::quantity), Some(u32::MAX));
    }

    #[test]
    fn test_set_quantity_unknown_is_noop() {
        let mut cart = Cart::new();
        cart.add(&widget());
        let before = cart.clone();
        cart.set_quantity(&ProductId::new("missing"), 4);
        assert_eq!(cart, before);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut cart = Cart::new();
        cart.add(&widget());
        cart.remove(&ProductId::new("missing"));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_total_is_sum_of_subtotals() {
        let mut cart = Cart::new();
        cart.add(&widget());
        cart.add(&product("2", "Gadget", 1_250, "Globex", "Toys"));
        cart.set_quantity(&ProductId::new("2"), 3);

        let subtotals: Price = cart.lines().iter().map(CartLine::subtotal).sum();
        assert_eq!(cart.total(), subtotals);
        assert_eq!(cart.total().to_string(), "$47.49");
        assert_eq!(cart.item_count(), 4);
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add(&widget());
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_lines_keep_insertion_order() {
        let mut cart = Cart::new();
        cart.add(&product("b", "B", 1, "", ""));
        cart.add(&product("a", "A", 1, "", ""));
        cart.add(&product("b", "B", 1, "", ""));

        let ids: Vec<_> = cart.lines().iter().map(|l| l.product_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_snapshot_survives_serialization() {
        let mut cart = Cart::new();
        cart.add(&widget());
        let json = serde_json::to_string(&cart).unwrap();
        let restored: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, cart);
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("3"), 3);
        assert_eq!(parse_quantity("  12 "), 12);
        assert_eq!(parse_quantity("3 units"), 3);
        assert_eq!(parse_quantity("2.7"), 2);
        assert_eq!(parse_quantity("-4"), -4);
        assert_eq!(parse_quantity("+6"), 6);
        assert_eq!(parse_quantity(""), 1);
        assert_eq!(parse_quantity("abc"), 1);
        assert_eq!(parse_quantity("-"), 1);
        assert_eq!(parse_quantity("99999999999999999999999"), i64::MAX);
    }
}
