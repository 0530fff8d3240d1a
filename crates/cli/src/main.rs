//! Vitrina CLI - catalog inspection and order links from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # List the catalog, optionally filtered
//! vitrina catalog list --brand acme --search widget
//!
//! # Dump the catalog as JSON
//! vitrina catalog list --json
//!
//! # Show the brand and category options
//! vitrina catalog facets
//!
//! # Compose an order message and link
//! vitrina order compose --item 1=2 --item g-1
//! ```
//!
//! # Environment Variables
//!
//! - `CATALOG_SHEET_URL` - gviz JSON URL of the catalog sheet
//! - `ORDER_PHONE` - destination number for order links
//! - `ORDER_LINK_TEMPLATE` - link template with `{phone}` and `{message}`
//! - `ORDER_GREETING` - first line of the order message

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use url::Url;
use vitrina_storefront::config::{DEFAULT_GREETING, DEFAULT_LINK_TEMPLATE};

mod commands;

#[derive(Parser)]
#[command(name = "vitrina")]
#[command(author, version, about = "Vitrina CLI tools")]
struct Cli {
    /// gviz JSON URL of the catalog sheet
    #[arg(long, env = "CATALOG_SHEET_URL")]
    sheet_url: Url,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect the catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Work with orders
    Order {
        #[command(subcommand)]
        action: OrderAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List products, optionally filtered
    List {
        /// Only products of this brand (case-insensitive)
        #[arg(short, long)]
        brand: Option<String>,

        /// Only products of this category (case-insensitive)
        #[arg(short, long)]
        category: Option<String>,

        /// Only products mentioning this text
        #[arg(short, long)]
        search: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show the brand and category filter options
    Facets,
}

#[derive(Subcommand)]
enum OrderAction {
    /// Compose the order message and link for a set of items
    Compose {
        /// Product to order, as `ID` or `ID=QTY` (repeatable)
        #[arg(short, long = "item", required = true)]
        items: Vec<String>,

        /// Destination phone number
        #[arg(long, env = "ORDER_PHONE")]
        phone: String,

        /// Link template with `{phone}` and `{message}` placeholders
        #[arg(long, env = "ORDER_LINK_TEMPLATE", default_value = DEFAULT_LINK_TEMPLATE)]
        link_template: String,

        /// First line of the message
        #[arg(long, env = "ORDER_GREETING", default_value = DEFAULT_GREETING)]
        greeting: String,
    },
}

#[tokio::main]
async fn main() {
    // Load .env before parsing so env fallbacks see it
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Catalog { action } => {
            let catalog = commands::catalog::fetch(&cli.sheet_url).await?;
            let mut out = std::io::stdout().lock();

            match action {
                CatalogAction::List {
                    brand,
                    category,
                    search,
                    json,
                } => {
                    let criteria = vitrina_core::FilterCriteria::new(
                        brand.as_deref(),
                        category.as_deref(),
                        search.as_deref(),
                    );
                    commands::catalog::list(&catalog, &criteria, json, &mut out)?;
                }
                CatalogAction::Facets => commands::catalog::facets(&catalog, &mut out)?,
            }
        }
        Commands::Order { action } => match action {
            OrderAction::Compose {
                items,
                phone,
                link_template,
                greeting,
            } => {
                // Validate the link settings before touching the network
                let composer = commands::order::composer(&phone, &link_template, greeting)?;
                let catalog = commands::catalog::fetch(&cli.sheet_url).await?;
                let mut out = std::io::stdout().lock();
                commands::order::compose(&catalog, &composer, &items, &mut out)?;
            }
        },
    }
    Ok(())
}
