//! Vitrina Core - storefront domain library.
//!
//! This crate holds everything the storefront knows about products and carts:
//! - `catalog` - The product catalog loaded from the remote sheet
//! - `cart` - Per-session cart lines and their totals
//! - `filter` - Brand, category and free-text filtering over the catalog
//! - `order` - Order message composition and the outgoing message link
//! - `shop` - The controller that applies user events to the state above
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no sessions. The `storefront` and `cli` crates do the fetching and
//! rendering and call into this crate for every state change.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod filter;
pub mod order;
pub mod shop;
pub mod types;

pub use cart::{Cart, CartLine, parse_quantity};
pub use catalog::{Catalog, FacetOption, Product};
pub use filter::{FilterCriteria, apply};
pub use order::{LinkTemplate, LinkTemplateError, OrderComposer, OrderError, compose};
pub use shop::{Shop, ShopEvent, ShopOutcome};
pub use types::*;
