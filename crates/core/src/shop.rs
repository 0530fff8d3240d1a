//! The shop controller.
//!
//! [`Shop`] owns the state of one shopping session (its cart and active
//! filters) and borrows the shared catalog and order composer. Every user
//! interaction is a [`ShopEvent`] passed to [`Shop::dispatch`], which returns
//! a [`ShopOutcome`] telling the caller what to re-render.
//!
//! # Example
//!
//! ```rust
//! use vitrina_core::{
//!     Catalog, Cart, LinkTemplate, OrderComposer, Price, Product, ProductId, Shop,
//!     ShopEvent, ShopOutcome,
//! };
//!
//! let (catalog, _) = Catalog::from_products([Product {
//!     id: ProductId::new("1"),
//!     name: "Widget".into(),
//!     price: Price::from_cents(999),
//!     image: String::new(),
//!     description: String::new(),
//!     brand: "Acme".into(),
//!     category: "Tools".into(),
//! }]);
//! let link = LinkTemplate::parse("https://wa.me/1?text={message}").unwrap();
//! let composer = OrderComposer::new("", link);
//!
//! let mut shop = Shop::new(&catalog, &composer, Cart::new());
//! assert_eq!(shop.dispatch(ShopEvent::AddToCart(ProductId::new("1"))), ShopOutcome::CartChanged);
//! assert_eq!(shop.cart().total().to_string(), "$9.99");
//! ```

use crate::cart::Cart;
use crate::catalog::{Catalog, Product};
use crate::filter::{self, FilterCriteria};
use crate::order::{OrderComposer, OrderError};
use crate::types::ProductId;

/// A user interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShopEvent {
    /// "Add to cart" on a product card.
    AddToCart(ProductId),
    /// A quantity input changed. The raw value is normalized by the cart.
    SetQuantity { id: ProductId, quantity: i64 },
    /// The remove button on a cart line.
    RemoveFromCart(ProductId),
    /// The "clear cart" control.
    ClearCart,
    /// A brand, category or search input changed.
    ApplyFilters(FilterCriteria),
    /// The "clear filters" control.
    ClearFilters,
    /// The "send order" control.
    SendOrder,
}

/// What changed as a result of an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShopOutcome {
    /// Cart contents, total and badge need re-rendering.
    CartChanged,
    /// The product grid needs re-rendering.
    FiltersChanged,
    /// The event referred to a line that is not in the cart.
    Unchanged,
    /// The product id is not in the catalog.
    UnknownProduct(ProductId),
    /// The order link is ready for the shopper to follow.
    OrderReady { message: String, link: String },
    /// An order was requested with nothing in the cart.
    EmptyCart,
}

/// State of one shopping session.
#[derive(Debug, Clone)]
pub struct Shop<'a> {
    catalog: &'a Catalog,
    composer: &'a OrderComposer,
    cart: Cart,
    criteria: FilterCriteria,
}

impl<'a> Shop<'a> {
    #[must_use]
    pub fn new(catalog: &'a Catalog, composer: &'a OrderComposer, cart: Cart) -> Self {
        Self {
            catalog,
            composer,
            cart,
            criteria: FilterCriteria::default(),
        }
    }

    /// Apply one event to the session state.
    pub fn dispatch(&mut self, event: ShopEvent) -> ShopOutcome {
        match event {
            ShopEvent::AddToCart(id) => match self.catalog.get(&id) {
                Some(product) => {
                    self.cart.add(product);
                    ShopOutcome::CartChanged
                }
                None => ShopOutcome::UnknownProduct(id),
            },
            ShopEvent::SetQuantity { id, quantity } => {
                if self.cart.line(&id).is_none() {
                    return ShopOutcome::Unchanged;
                }
                self.cart.set_quantity(&id, quantity);
                ShopOutcome::CartChanged
            }
            ShopEvent::RemoveFromCart(id) => {
                if self.cart.line(&id).is_none() {
                    return ShopOutcome::Unchanged;
                }
                self.cart.remove(&id);
                ShopOutcome::CartChanged
            }
            ShopEvent::ClearCart => {
                self.cart.clear();
                ShopOutcome::CartChanged
            }
            ShopEvent::ApplyFilters(criteria) => {
                self.criteria = criteria;
                ShopOutcome::FiltersChanged
            }
            ShopEvent::ClearFilters => {
                self.criteria.clear();
                ShopOutcome::FiltersChanged
            }
            ShopEvent::SendOrder => self.order(),
        }
    }

    fn order(&self) -> ShopOutcome {
        match self.composer.message(self.cart.lines()) {
            Ok(message) => {
                let link = self.composer.link_for(&message);
                ShopOutcome::OrderReady { message, link }
            }
            Err(OrderError::EmptyCart) => ShopOutcome::EmptyCart,
        }
    }

    /// Catalog products passing the active filters.
    #[must_use]
    pub fn visible_products(&self) -> Vec<&'a Product> {
        filter::apply(self.catalog.products(), &self.criteria)
    }

    #[must_use]
    pub const fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub const fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Hand the cart back for storage.
    #[must_use]
    pub fn into_cart(self) -> Cart {
        self.cart
    }
}
