//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Image shown for products whose sheet row has no image URL.
pub const PLACEHOLDER_IMAGE: &str = "/static/img/placeholder.svg";

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Falls back to the placeholder image when the URL is blank.
///
/// Usage in templates: `{{ product.image|image_or_placeholder }}`
#[askama::filter_fn]
pub fn image_or_placeholder(url: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(resolve_image(&url.to_string()).to_string())
}

fn resolve_image(url: &str) -> &str {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        PLACEHOLDER_IMAGE
    } else {
        trimmed
    }
}
