//! CLI command implementations.

pub mod catalog;
pub mod order;

use thiserror::Error;
use vitrina_core::OrderError;
use vitrina_storefront::{config::ConfigError, sheets::SheetError};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The catalog could not be fetched or decoded.
    #[error("Catalog error: {0}")]
    Sheet(#[from] SheetError),

    /// Order link settings are invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// An `--item` argument is malformed.
    #[error("Invalid item {0:?}: expected ID or ID=QTY")]
    InvalidItem(String),

    /// An `--item` names a product that is not in the catalog.
    #[error("Unknown product: {0}")]
    UnknownProduct(String),

    /// The order could not be composed.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// JSON output failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing output failed.
    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
}
