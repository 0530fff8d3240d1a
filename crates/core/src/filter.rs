//! Catalog filtering by brand, category and free text.

use serde::{Deserialize, Serialize};

use crate::catalog::Product;

/// The shopper's current filter selection.
///
/// Every field is optional and an empty string counts as unset, so a form
/// that submits `brand=` means "any brand".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Case-insensitive exact match on [`Product::brand`].
    pub brand: Option<String>,
    /// Case-insensitive exact match on [`Product::category`].
    pub category: Option<String>,
    /// Case-insensitive substring of name, description, brand or category.
    pub text: Option<String>,
}

impl FilterCriteria {
    /// Build criteria, lowercasing values and treating empty strings as unset.
    #[must_use]
    pub fn new(brand: Option<&str>, category: Option<&str>, text: Option<&str>) -> Self {
        Self {
            brand: normalize(brand),
            category: normalize(category),
            text: normalize(text),
        }
    }

    /// Whether no constraint is active.
    #[must_use]
    pub const fn is_unconstrained(&self) -> bool {
        self.brand.is_none() && self.category.is_none() && self.text.is_none()
    }

    /// Reset every constraint.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether `product` satisfies all active constraints.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let brand = product.brand.to_lowercase();
        let category = product.category.to_lowercase();

        let brand_ok = self
            .brand
            .as_deref()
            .is_none_or(|wanted| wanted.is_empty() || wanted.to_lowercase() == brand);
        let category_ok = self
            .category
            .as_deref()
            .is_none_or(|wanted| wanted.is_empty() || wanted.to_lowercase() == category);
        let text_ok = self.text.as_deref().is_none_or(|needle| {
            let needle = needle.to_lowercase();
            product.name.to_lowercase().contains(&needle)
                || product.description.to_lowercase().contains(&needle)
                || brand.contains(&needle)
                || category.contains(&needle)
        });

        brand_ok && category_ok && text_ok
    }
}

fn normalize(value: Option<&str>) -> Option<String> {
    value
        .filter(|value| !value.is_empty())
        .map(str::to_lowercase)
}

/// Products matching `criteria`, in catalog order.
///
/// Unconstrained criteria return every product.
#[must_use]
pub fn apply<'a>(products: &'a [Product], criteria: &FilterCriteria) -> Vec<&'a Product> {
    if criteria.is_unconstrained() {
        return products.iter().collect();
    }
    products
        .iter()
        .filter(|product| criteria.matches(product))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::product;

    fn catalog() -> Vec<Product> {
        vec![
            product("1", "Widget", 999, "Acme", "Tools"),
            product("2", "Gadget", 1_500, "Globex", "Toys"),
            product("3", "Hammer", 2_000, "ACME", "Hardware"),
            product("4", "Yo-yo", 300, "Initech", "toys"),
        ]
    }

    fn ids(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.id.to_string()).collect()
    }

    #[test]
    fn test_unconstrained_is_identity() {
        let products = catalog();
        let filtered = apply(&products, &FilterCriteria::default());
        assert_eq!(filtered.len(), products.len());
        assert!(filtered.iter().zip(&products).all(|(a, b)| *a == b));
    }

    #[test]
    fn test_empty_strings_are_unset() {
        let criteria = FilterCriteria::new(Some(""), Some(""), Some(""));
        assert!(criteria.is_unconstrained());
    }

    #[test]
    fn test_brand_is_case_insensitive_exact() {
        let products = catalog();
        let filtered = apply(&products, &FilterCriteria::new(Some("acme"), None, None));
        assert_eq!(ids(&filtered), vec!["1", "3"]);
        assert!(filtered.iter().all(|p| p.brand.to_lowercase() == "acme"));

        let partial = apply(&products, &FilterCriteria::new(Some("acm"), None, None));
        assert!(partial.is_empty());
    }

    #[test]
    fn test_category_is_case_insensitive_exact() {
        let products = catalog();
        let filtered = apply(&products, &FilterCriteria::new(None, Some("TOYS"), None));
        assert_eq!(ids(&filtered), vec!["2", "4"]);
    }

    #[test]
    fn test_text_searches_all_fields() {
        let products = catalog();

        let by_name = apply(&products, &FilterCriteria::new(None, None, Some("GADG")));
        assert_eq!(ids(&by_name), vec!["2"]);

        let by_description = apply(&products, &FilterCriteria::new(None, None, Some("hammer desc")));
        assert_eq!(ids(&by_description), vec!["3"]);

        let by_brand = apply(&products, &FilterCriteria::new(None, None, Some("init")));
        assert_eq!(ids(&by_brand), vec!["4"]);

        let by_category = apply(&products, &FilterCriteria::new(None, None, Some("hardw")));
        assert_eq!(ids(&by_category), vec!["3"]);
    }

    #[test]
    fn test_constraints_are_anded() {
        let products = catalog();
        let criteria = FilterCriteria::new(Some("acme"), Some("tools"), Some("widg"));
        assert_eq!(ids(&apply(&products, &criteria)), vec!["1"]);

        let criteria = FilterCriteria::new(Some("acme"), Some("toys"), None);
        assert!(apply(&products, &criteria).is_empty());
    }

    #[test]
    fn test_preserves_catalog_order() {
        let products = catalog();
        let filtered = apply(&products, &FilterCriteria::new(None, None, Some("e")));
        let positions: Vec<_> = filtered
            .iter()
            .filter_map(|p| products.iter().position(|q| q.id == p.id))
            .collect();
        assert!(positions.windows(2).all(|w| matches!(w, [a, b] if a < b)));
    }

    #[test]
    fn test_clear() {
        let mut criteria = FilterCriteria::new(Some("acme"), None, Some("x"));
        criteria.clear();
        assert!(criteria.is_unconstrained());
    }
}
