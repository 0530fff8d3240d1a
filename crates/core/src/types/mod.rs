//! Value types shared by the catalog and the cart.

pub mod id;
pub mod price;

pub use id::ProductId;
pub use price::Price;
