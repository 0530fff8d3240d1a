//! Order message composition.
//!
//! Orders are not placed through an API. The cart is rendered as a plain text
//! message and handed to a messaging service through a link such as
//! `https://wa.me/<phone>?text=<message>`; the shopper sends it themselves.

use std::fmt::Write as _;

use thiserror::Error;
use url::Url;

use crate::cart::CartLine;
use crate::types::Price;

/// Placeholder substituted with the percent-encoded message.
pub const MESSAGE_PLACEHOLDER: &str = "{message}";

/// Errors raised when composing an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OrderError {
    /// There is nothing to order.
    #[error("the cart is empty")]
    EmptyCart,
}

/// Errors raised when parsing a [`LinkTemplate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkTemplateError {
    #[error("link template must contain the {{message}} placeholder")]
    MissingPlaceholder,
    #[error("link template is not a valid URL: {0}")]
    InvalidUrl(String),
}

/// Compose the order body: one line per cart line, then the total.
///
/// ```rust
/// # use vitrina_core::{compose, OrderError};
/// assert_eq!(compose(&[]), Err(OrderError::EmptyCart));
/// ```
///
/// # Errors
///
/// Returns [`OrderError::EmptyCart`] when `lines` is empty.
pub fn compose(lines: &[CartLine]) -> Result<String, OrderError> {
    if lines.is_empty() {
        return Err(OrderError::EmptyCart);
    }

    let mut message = String::new();
    for line in lines {
        let _ = writeln!(
            message,
            "{} x{} - {}",
            line.name,
            line.quantity(),
            line.subtotal()
        );
    }
    let total: Price = lines.iter().map(CartLine::subtotal).sum();
    let _ = write!(message, "\nTotal: {total}");

    Ok(message)
}

/// URL template of the messaging endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTemplate(String);

impl LinkTemplate {
    /// Parse a template containing [`MESSAGE_PLACEHOLDER`].
    ///
    /// # Errors
    ///
    /// Returns an error if the placeholder is missing or the template is not
    /// an absolute URL once the placeholder is filled in.
    pub fn parse(template: &str) -> Result<Self, LinkTemplateError> {
        if !template.contains(MESSAGE_PLACEHOLDER) {
            return Err(LinkTemplateError::MissingPlaceholder);
        }
        Url::parse(&template.replace(MESSAGE_PLACEHOLDER, "probe"))
            .map_err(|e| LinkTemplateError::InvalidUrl(e.to_string()))?;
        Ok(Self(template.to_owned()))
    }

    /// Substitute the percent-encoded `message`.
    #[must_use]
    pub fn render(&self, message: &str) -> String {
        self.0
            .replace(MESSAGE_PLACEHOLDER, &urlencoding::encode(message))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Builds the full order message and its outgoing link.
#[derive(Debug, Clone)]
pub struct OrderComposer {
    greeting: String,
    link: LinkTemplate,
}

impl OrderComposer {
    /// An empty `greeting` omits the header.
    #[must_use]
    pub fn new(greeting: impl Into<String>, link: LinkTemplate) -> Self {
        Self {
            greeting: greeting.into(),
            link,
        }
    }

    /// The greeting, a blank line, then the [`compose`]d body.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::EmptyCart`] when `lines` is empty.
    pub fn message(&self, lines: &[CartLine]) -> Result<String, OrderError> {
        let body = compose(lines)?;
        if self.greeting.is_empty() {
            return Ok(body);
        }
        Ok(format!("{}\n\n{body}", self.greeting))
    }

    /// The link that opens the messaging service with the message prefilled.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::EmptyCart`] when `lines` is empty.
    pub fn link(&self, lines: &[CartLine]) -> Result<String, OrderError> {
        self.message(lines).map(|message| self.link_for(&message))
    }

    /// The link for an already composed message.
    #[must_use]
    pub fn link_for(&self, message: &str) -> String {
        self.link.render(message)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cart::Cart;
    use crate::catalog::tests::product;
    use crate::types::ProductId;

    fn cart_with_two_widgets() -> Cart {
        let mut cart = Cart::new();
        let widget = product("1", "Widget", 999, "Acme", "Tools");
        cart.add(&widget);
        cart.add(&widget);
        cart
    }

    fn composer(greeting: &str) -> OrderComposer {
        let link = LinkTemplate::parse("https://wa.me/5491100000000?text={message}")
            .unwrap();
        OrderComposer::new(greeting, link)
    }

    #[test]
    fn test_compose_empty_cart() {
        assert_eq!(compose(Cart::new().lines()), Err(OrderError::EmptyCart));
        assert_eq!(
            composer("Hi").link(Cart::new().lines()),
            Err(OrderError::EmptyCart)
        );
    }

    #[test]
    fn test_compose_single_line() {
        let cart = cart_with_two_widgets();
        let message = compose(cart.lines()).unwrap();
        assert_eq!(message, "Widget x2 - $19.98\n\nTotal: $19.98");
    }

    #[test]
    fn test_compose_multiple_lines_keep_cart_order() {
        let mut cart = cart_with_two_widgets();
        cart.add(&product("2", "Gadget", 1_250, "Globex", "Toys"));
        cart.set_quantity(&ProductId::new("2"), 3);

        let message = compose(cart.lines()).unwrap();
        assert_eq!(
            message,
            "Widget x2 - $19.98\nGadget x3 - $37.50\n\nTotal: $57.48"
        );
    }

    #[test]
    fn test_message_with_greeting() {
        let cart = cart_with_two_widgets();
        let message = composer("Hello!").message(cart.lines()).unwrap();
        assert!(message.starts_with("Hello!\n\nWidget x2"));
        assert!(message.ends_with("Total: $19.98"));

        let bare = composer("").message(cart.lines()).unwrap();
        assert!(bare.starts_with("Widget x2"));
    }

    #[test]
    fn test_link_is_percent_encoded() {
        let cart = cart_with_two_widgets();
        let link = composer("Hi there").link(cart.lines()).unwrap();
        assert_eq!(
            link,
            "https://wa.me/5491100000000?text=Hi%20there%0A%0AWidget%20x2%20-%20%2419.98%0A%0ATotal%3A%20%2419.98"
        );
    }

    #[test]
    fn test_link_template_requires_placeholder() {
        assert_eq!(
            LinkTemplate::parse("https://wa.me/123"),
            Err(LinkTemplateError::MissingPlaceholder)
        );
    }

    #[test]
    fn test_link_template_requires_absolute_url() {
        assert!(matches!(
            LinkTemplate::parse("wa.me/123?text={message}"),
            Err(LinkTemplateError::InvalidUrl(_))
        ));
    }
}
