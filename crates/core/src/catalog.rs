//! The product catalog.
//!
//! A [`Catalog`] is built once from the rows of the remote sheet and never
//! mutated afterwards. It guarantees that every product has a non-blank,
//! unique [`ProductId`].

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// A product as listed in the sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    /// Image URL, possibly empty.
    pub image: String,
    pub description: String,
    pub brand: String,
    pub category: String,
}

/// One entry of a brand or category selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetOption {
    /// Lowercased value submitted by the selector.
    pub value: String,
    /// The value as written in the sheet.
    pub label: String,
}

/// Immutable, ordered collection of products with unique ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog, keeping sheet order.
    ///
    /// Products with a blank id are dropped. When an id repeats, the first
    /// row wins. Returns the catalog and the number of discarded products.
    #[must_use]
    pub fn from_products(products: impl IntoIterator<Item = Product>) -> (Self, usize) {
        let mut seen = HashSet::new();
        let mut dropped = 0;
        let products = products
            .into_iter()
            .filter(|product| {
                let keep = !product.id.is_blank() && seen.insert(product.id.clone());
                if !keep {
                    dropped += 1;
                }
                keep
            })
            .collect();

        (Self { products }, dropped)
    }

    /// An empty catalog, used when loading fails.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            products: Vec::new(),
        }
    }

    /// All products in sheet order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Distinct non-empty brands, sorted by label.
    #[must_use]
    pub fn brands(&self) -> Vec<FacetOption> {
        facet(self.products.iter().map(|product| product.brand.as_str()))
    }

    /// Distinct non-empty categories, sorted by label.
    #[must_use]
    pub fn categories(&self) -> Vec<FacetOption> {
        facet(self.products.iter().map(|product| product.category.as_str()))
    }
}

fn facet<'a>(values: impl Iterator<Item = &'a str>) -> Vec<FacetOption> {
    values
        .filter(|value| !value.is_empty())
        .map(|label| (label, label.to_lowercase()))
        .collect::<BTreeMap<_, _>>()
        .into_iter()
        .map(|(label, value)| FacetOption {
            value,
            label: label.to_owned(),
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use rust_decimal::Decimal;

    use super::*;

    /// Build a product for tests; image and description derive from the name.
    pub(crate) fn product(id: &str, name: &str, cents: i64, brand: &str, category: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_owned(),
            price: Price::from_cents(cents),
            image: format!("https://img.example/{id}.jpg"),
            description: format!("{name} description"),
            brand: brand.to_owned(),
            category: category.to_owned(),
        }
    }

    #[test]
    fn test_from_products_drops_blank_and_duplicate_ids() {
        let (catalog, dropped) = Catalog::from_products([
            product("1", "Widget", 999, "Acme", "Tools"),
            product("", "Nameless", 100, "Acme", "Tools"),
            product("1", "Widget Copy", 1, "Acme", "Tools"),
            product("2", "Gadget", 500, "Globex", "Toys"),
        ]);

        assert_eq!(dropped, 2);
        assert_eq!(catalog.len(), 2);
        let first = catalog.get(&ProductId::new("1"));
        assert_eq!(first.map(|p| p.name.as_str()), Some("Widget"));
        assert_eq!(first.map(|p| p.price.amount()), Some(Decimal::new(999, 2)));
    }

    #[test]
    fn test_get_unknown() {
        let catalog = Catalog::empty();
        assert!(catalog.get(&ProductId::new("nope")).is_none());
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_facets_are_distinct_sorted_and_non_empty() {
        let (catalog, _) = Catalog::from_products([
            product("1", "A", 1, "Zeta", "Tools"),
            product("2", "B", 1, "Acme", ""),
            product("3", "C", 1, "Zeta", "Garden"),
            product("4", "D", 1, "", "Tools"),
        ]);

        let brands = catalog.brands();
        assert_eq!(
            brands,
            vec![
                FacetOption {
                    value: "acme".to_owned(),
                    label: "Acme".to_owned()
                },
                FacetOption {
                    value: "zeta".to_owned(),
                    label: "Zeta".to_owned()
                },
            ]
        );

        let categories: Vec<_> = catalog
            .categories()
            .into_iter()
            .map(|option| option.value)
            .collect();
        assert_eq!(categories, vec!["garden", "tools"]);
    }
}
