//! Google Visualization (gviz) payload decoding.
//!
//! The `tqx=out:json` endpoint wraps its JSON in a JavaScript callback:
//!
//! ```text
//! /*O_o*/
//! google.visualization.Query.setResponse({"version":"0.6","status":"ok","table":{...}});
//! ```
//!
//! Rows are `{"c": [cell, ...]}` where each cell is `{"v": value, "f": formatted}`
//! or `null`. Columns are positional: id, name, price, image, description,
//! brand, category.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use vitrina_core::{Price, Product, ProductId};

use super::SheetError;

const ENVELOPE_START: &str = "setResponse(";

const COL_ID: usize = 0;
const COL_NAME: usize = 1;
const COL_PRICE: usize = 2;
const COL_IMAGE: usize = 3;
const COL_DESCRIPTION: usize = 4;
const COL_BRAND: usize = 5;
const COL_CATEGORY: usize = 6;

#[derive(Debug, Deserialize)]
pub(crate) struct GvizResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub errors: Vec<GvizMessage>,
    #[serde(default)]
    pub table: Option<GvizTable>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GvizMessage {
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub detailed_message: Option<String>,
}

impl GvizMessage {
    fn describe(&self) -> String {
        self.detailed_message
            .as_deref()
            .or(self.message.as_deref())
            .or(self.reason.as_deref())
            .unwrap_or("unknown error")
            .to_string()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GvizTable {
    #[serde(default)]
    pub rows: Vec<GvizRow>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GvizRow {
    #[serde(default)]
    pub c: Vec<Option<GvizCell>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GvizCell {
    #[serde(default)]
    pub v: Value,
}

impl GvizRow {
    fn value(&self, column: usize) -> &Value {
        self.c
            .get(column)
            .and_then(Option::as_ref)
            .map_or(&Value::Null, |cell| &cell.v)
    }

    fn text(&self, column: usize) -> String {
        cell_text(self.value(column))
    }
}

/// Remove the JavaScript callback around the JSON body.
///
/// A body that already starts with `{` is returned as is.
///
/// # Errors
///
/// Returns `SheetError::Envelope` if the callback wrapper is not found.
pub fn strip_envelope(body: &str) -> Result<&str, SheetError> {
    let trimmed = body.trim();
    if trimmed.starts_with('{') {
        return Ok(trimmed);
    }

    let start = trimmed.find(ENVELOPE_START).ok_or(SheetError::Envelope)? + ENVELOPE_START.len();
    let inner = trimmed.get(start..).ok_or(SheetError::Envelope)?.trim_end();
    let inner = inner.strip_suffix(';').unwrap_or(inner).trim_end();
    inner.strip_suffix(')').ok_or(SheetError::Envelope)
}

/// Decode the payload, surfacing query errors reported by the sheet.
pub(crate) fn decode(body: &str) -> Result<GvizTable, SheetError> {
    let response: GvizResponse = serde_json::from_str(strip_envelope(body)?)?;

    if response.status.as_deref() == Some("error") {
        return Err(SheetError::Query(
            response.errors.iter().map(GvizMessage::describe).collect(),
        ));
    }

    response.table.ok_or(SheetError::MissingTable)
}

/// Convert one row into a product.
///
/// Missing cells become empty strings and a missing price becomes zero.
pub(crate) fn row_to_product(row: &GvizRow) -> Result<Product, String> {
    let price = cell_price(row.value(COL_PRICE))?;

    Ok(Product {
        id: ProductId::new(row.text(COL_ID)),
        name: row.text(COL_NAME),
        price: Price::new(price),
        image: row.text(COL_IMAGE),
        description: row.text(COL_DESCRIPTION),
        brand: row.text(COL_BRAND),
        category: row.text(COL_CATEGORY),
    })
}

/// Render a cell value as text. Whole numbers lose their fractional part.
fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else {
                // Whole floats lose their trailing ".0" at any magnitude.
                let raw = n.to_string();
                parse_decimal(&raw).map_or(raw, |d| d.normalize().to_string())
            }
        }
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

fn cell_price(value: &Value) -> Result<Decimal, String> {
    let price = match value {
        Value::Null => Decimal::ZERO,
        Value::Number(n) => parse_decimal(&n.to_string())
            .ok_or_else(|| format!("price {n} is out of range"))?,
        Value::String(s) => {
            let cleaned = s.trim();
            let cleaned = cleaned.strip_prefix('$').unwrap_or(cleaned).trim();
            if cleaned.is_empty() {
                Decimal::ZERO
            } else {
                parse_decimal(cleaned).ok_or_else(|| format!("price {s:?} is not a number"))?
            }
        }
        other => return Err(format!("price {other} is not a number")),
    };

    if price.is_sign_negative() && !price.is_zero() {
        return Err(format!("price {price} is negative"));
    }
    Ok(price)
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn row(cells: Value) -> GvizRow {
        serde_json::from_value(json!({ "c": cells })).unwrap()
    }

    #[test]
    fn test_strip_envelope() {
        let body = "/*O_o*/\ngoogle.visualization.Query.setResponse({\"status\":\"ok\"});";
        assert_eq!(strip_envelope(body).unwrap(), "{\"status\":\"ok\"}");
    }

    #[test]
    fn test_strip_envelope_without_semicolon() {
        let body = "google.visualization.Query.setResponse({\"a\":1})\n";
        assert_eq!(strip_envelope(body).unwrap(), "{\"a\":1}");
    }

    #[test]
    fn test_strip_envelope_accepts_bare_json() {
        assert_eq!(strip_envelope("  {\"a\":1} ").unwrap(), "{\"a\":1}");
    }

    #[test]
    fn test_strip_envelope_rejects_html() {
        let err = strip_envelope("<html>Sign in</html>").unwrap_err();
        assert!(matches!(err, SheetError::Envelope));
    }

    #[test]
    fn test_decode_query_error() {
        let body = r#"setResponse({"status":"error","errors":[{"reason":"access_denied","message":"Access denied","detailed_message":"Sheet is private"}]});"#;
        match decode(body) {
            Err(SheetError::Query(messages)) => assert_eq!(messages, vec!["Sheet is private"]),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_decode_missing_table() {
        assert!(matches!(
            decode(r#"{"status":"ok"}"#),
            Err(SheetError::MissingTable)
        ));
    }

    #[test]
    fn test_row_to_product_full() {
        let product = row_to_product(&row(json!([
            {"v": 1.0, "f": "1"},
            {"v": "Widget"},
            {"v": 9.99, "f": "9.99"},
            {"v": "https://img.example/w.jpg"},
            {"v": "A fine widget"},
            {"v": "Acme"},
            {"v": "Tools"}
        ])))
        .unwrap();

        assert_eq!(product.id.as_str(), "1");
        assert_eq!(product.name, "Widget");
        assert_eq!(product.price.amount(), Decimal::new(999, 2));
        assert_eq!(product.image, "https://img.example/w.jpg");
        assert_eq!(product.description, "A fine widget");
        assert_eq!(product.brand, "Acme");
        assert_eq!(product.category, "Tools");
    }

    #[test]
    fn test_row_to_product_missing_cells_default_to_empty() {
        let product = row_to_product(&row(json!([{"v": "sku-1"}, null, null]))).unwrap();
        assert_eq!(product.id.as_str(), "sku-1");
        assert_eq!(product.name, "");
        assert_eq!(product.price, Price::ZERO);
        assert_eq!(product.category, "");
    }

    #[test]
    fn test_row_to_product_string_price() {
        let product =
            row_to_product(&row(json!([{"v": "2"}, {"v": "Gadget"}, {"v": " $12.50 "}]))).unwrap();
        assert_eq!(product.price.to_string(), "$12.50");
    }

    #[test]
    fn test_row_to_product_rejects_bad_prices() {
        assert!(row_to_product(&row(json!([{"v": "3"}, {"v": "X"}, {"v": "cheap"}]))).is_err());
        assert!(row_to_product(&row(json!([{"v": "3"}, {"v": "X"}, {"v": -4}]))).is_err());
        assert!(row_to_product(&row(json!([{"v": "3"}, {"v": "X"}, {"v": true}]))).is_err());
    }

    #[test]
    fn test_cell_text_numbers() {
        assert_eq!(cell_text(&json!(42)), "42");
        assert_eq!(cell_text(&json!(42.0)), "42");
        assert_eq!(cell_text(&json!(4.5)), "4.5");
        assert_eq!(cell_text(&Value::Null), "");
    }

    #[test]
    fn test_cell_text_large_whole_floats() {
        assert_eq!(cell_text(&json!(1.5e15)), "1500000000000000");
        assert_eq!(cell_text(&json!(1e20)), "100000000000000000000");
        assert_eq!(cell_text(&json!(12_345_678_901_234.0)), "12345678901234");
    }
}
