//! Catalog source: a published Google Sheet.
//!
//! # Architecture
//!
//! - The sheet is fetched once at startup with `reqwest`; there is no retry,
//!   no timeout and no refresh
//! - The gviz payload is decoded in [`gviz`] and turned into a [`Catalog`]
//! - Rows that cannot be read (bad price) are skipped and logged, never fatal
//!
//! # Example
//!
//! ```rust,ignore
//! use vitrina_storefront::sheets::SheetClient;
//!
//! let client = SheetClient::new(config.catalog.sheet_url.clone());
//! let load = client.fetch_catalog().await?;
//! println!("{} products", load.catalog.len());
//! ```

pub mod gviz;

use thiserror::Error;
use tracing::{error, info, instrument, warn};
use url::Url;
use vitrina_core::Catalog;

pub use gviz::strip_envelope;

/// Errors that can occur when loading the catalog.
#[derive(Debug, Error)]
pub enum SheetError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The sheet answered with a non-success status.
    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    /// The body is not wrapped the way the gviz endpoint wraps it.
    #[error("response is not a gviz payload")]
    Envelope,

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The query was rejected by the sheet (private sheet, bad query).
    #[error("sheet query failed: {}", .0.join("; "))]
    Query(Vec<String>),

    /// The payload has no table.
    #[error("response has no table")]
    MissingTable,
}

/// A row that was left out of the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based data row number (header excluded).
    pub row: usize,
    pub reason: String,
}

/// Result of decoding a sheet.
#[derive(Debug, Clone, Default)]
pub struct CatalogLoad {
    pub catalog: Catalog,
    /// Rows with unreadable cells.
    pub skipped: Vec<SkippedRow>,
    /// Rows dropped for a blank or repeated id.
    pub duplicates: usize,
}

/// Decode a gviz response body into a catalog.
///
/// # Errors
///
/// Returns an error if the envelope, the JSON or the table is missing or
/// malformed. Individual bad rows do not fail the load.
pub fn parse_catalog(body: &str) -> Result<CatalogLoad, SheetError> {
    let table = gviz::decode(body)?;

    let mut skipped = Vec::new();
    let products: Vec<_> = table
        .rows
        .iter()
        .enumerate()
        .filter_map(|(index, row)| match gviz::row_to_product(row) {
            Ok(product) => Some(product),
            Err(reason) => {
                skipped.push(SkippedRow {
                    row: index + 1,
                    reason,
                });
                None
            }
        })
        .collect();

    let (catalog, duplicates) = Catalog::from_products(products);

    Ok(CatalogLoad {
        catalog,
        skipped,
        duplicates,
    })
}

/// Client for the catalog sheet.
#[derive(Debug, Clone)]
pub struct SheetClient {
    client: reqwest::Client,
    url: Url,
}

impl SheetClient {
    /// Create a new client for the given gviz URL.
    #[must_use]
    pub fn new(url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }

    /// The sheet URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Fetch and decode the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the sheet answers with a
    /// non-success status, or the payload cannot be decoded.
    #[instrument(skip(self), fields(url = %self.url))]
    pub async fn fetch_catalog(&self) -> Result<CatalogLoad, SheetError> {
        let response = self.client.get(self.url.clone()).send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Sheet returned non-success status"
            );
            return Err(SheetError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        parse_catalog(&body)
    }
}

/// Fetch the catalog, falling back to an empty one on failure.
///
/// Skipped rows are logged as warnings; a failed load is logged as an error
/// (and reported to Sentry through the tracing layer).
pub async fn load_catalog(client: &SheetClient) -> Catalog {
    match client.fetch_catalog().await {
        Ok(load) => {
            for skipped in &load.skipped {
                warn!(row = skipped.row, reason = %skipped.reason, "Skipped catalog row");
            }
            if load.duplicates > 0 {
                warn!(
                    count = load.duplicates,
                    "Dropped catalog rows with a blank or repeated id"
                );
            }
            info!(products = load.catalog.len(), "Catalog loaded");
            load.catalog
        }
        Err(e) => {
            error!(error = %e, "Failed to load catalog, starting with an empty one");
            Catalog::empty()
        }
    }
}
