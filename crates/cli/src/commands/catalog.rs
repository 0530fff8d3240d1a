//! Catalog inspection commands.
//!
//! # Usage
//!
//! ```bash
//! vitrina catalog list --category toys
//! vitrina catalog list --json
//! vitrina catalog facets
//! ```

use std::io::Write;

use tracing::{info, warn};
use url::Url;
use vitrina_core::{Catalog, FacetOption, FilterCriteria, filter};
use vitrina_storefront::sheets::SheetClient;

use super::CommandError;

/// Fetch the catalog from the sheet.
///
/// Skipped rows are reported as warnings; an unreachable sheet is an error
/// here, unlike the server which starts with an empty catalog.
///
/// # Errors
///
/// Returns an error if the sheet cannot be fetched or decoded.
pub async fn fetch(sheet_url: &Url) -> Result<Catalog, CommandError> {
    let load = SheetClient::new(sheet_url.clone()).fetch_catalog().await?;

    for skipped in &load.skipped {
        warn!(row = skipped.row, reason = %skipped.reason, "Skipped catalog row");
    }
    if load.duplicates > 0 {
        warn!(count = load.duplicates, "Dropped rows with a blank or repeated id");
    }
    info!(products = load.catalog.len(), "Catalog loaded");

    Ok(load.catalog)
}

/// Print the products passing the filters, as a table or as JSON.
///
/// # Errors
///
/// Returns an error if writing the output fails.
pub fn list(
    catalog: &Catalog,
    criteria: &FilterCriteria,
    json: bool,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let products = filter::apply(catalog.products(), criteria);

    if json {
        serde_json::to_writer_pretty(&mut *out, &products)?;
        writeln!(out)?;
        return Ok(());
    }

    if products.is_empty() {
        writeln!(out, "No products match.")?;
        return Ok(());
    }

    let id_width = products
        .iter()
        .map(|p| p.id.as_str().chars().count())
        .max()
        .unwrap_or(0)
        .max("ID".len());
    let name_width = products
        .iter()
        .map(|p| p.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("NAME".len());

    writeln!(
        out,
        "{:<id_width$}  {:<name_width$}  {:>10}  BRAND / CATEGORY",
        "ID", "NAME", "PRICE"
    )?;
    for product in &products {
        writeln!(
            out,
            "{:<id_width$}  {:<name_width$}  {:>10}  {} / {}",
            product.id,
            product.name,
            product.price.to_string(),
            or_dash(&product.brand),
            or_dash(&product.category),
        )?;
    }
    writeln!(out, "{} of {} products", products.len(), catalog.len())?;

    Ok(())
}

/// Print the brand and category filter options.
///
/// # Errors
///
/// Returns an error if writing the output fails.
pub fn facets(catalog: &Catalog, out: &mut impl Write) -> Result<(), CommandError> {
    write_facets(out, "Brands", &catalog.brands())?;
    write_facets(out, "Categories", &catalog.categories())?;
    Ok(())
}

fn write_facets(
    out: &mut impl Write,
    title: &str,
    options: &[FacetOption],
) -> Result<(), CommandError> {
    writeln!(out, "{title}:")?;
    if options.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for option in options {
        writeln!(out, "  {} ({})", option.label, option.value)?;
    }
    Ok(())
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use vitrina_core::{Price, Product, ProductId};

    use super::*;

    fn catalog() -> Catalog {
        let product = |id: &str, name: &str, cents, brand: &str, category: &str| Product {
            id: ProductId::new(id),
            name: name.to_string(),
            price: Price::from_cents(cents),
            image: String::new(),
            description: String::new(),
            brand: brand.to_string(),
            category: category.to_string(),
        };
        Catalog::from_products([
            product("1", "Widget", 999, "Acme", "Tools"),
            product("2", "Gadget", 1500, "Globex", ""),
        ])
        .0
    }

    fn render(f: impl FnOnce(&mut Vec<u8>) -> Result<(), CommandError>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_list_table() {
        let catalog = catalog();
        let text = render(|out| list(&catalog, &FilterCriteria::default(), false, out));

        assert!(text.starts_with("ID  NAME"));
        assert!(text.contains("Widget       $9.99  Acme / Tools"));
        assert!(text.contains("Gadget      $15.00  Globex / -"));
        assert!(text.ends_with("2 of 2 products\n"));
    }

    #[test]
    fn test_list_filtered_json() {
        let catalog = catalog();
        let criteria = FilterCriteria::new(Some("ACME"), None, None);
        let text = render(|out| list(&catalog, &criteria, true, out));

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        let items = value.as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items.first().unwrap()["name"], "Widget");
    }

    #[test]
    fn test_list_no_match() {
        let catalog = catalog();
        let criteria = FilterCriteria::new(None, None, Some("zzz"));
        let text = render(|out| list(&catalog, &criteria, false, out));
        assert_eq!(text, "No products match.\n");
    }

    #[test]
    fn test_facets() {
        let catalog = catalog();
        let text = render(|out| facets(&catalog, out));
        assert_eq!(
            text,
            "Brands:\n  Acme (acme)\n  Globex (globex)\nCategories:\n  Tools (tools)\n"
        );
    }
}
