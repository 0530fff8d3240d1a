//! Product grid route handlers.
//!
//! The grid is re-rendered as a fragment whenever a filter control changes.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use serde::Deserialize;
use tracing::instrument;
use vitrina_core::{FilterCriteria, Product, filter};

use crate::filters;
use crate::state::AppState;

/// Filter query parameters shared by the page and the grid fragment.
#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    pub brand: Option<String>,
    pub category: Option<String>,
    pub q: Option<String>,
}

impl FilterQuery {
    /// Normalized criteria for the filter engine.
    #[must_use]
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria::new(
            self.brand.as_deref(),
            self.category.as_deref(),
            self.q.as_deref(),
        )
    }
}

/// Product card display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub price: String,
    pub image: String,
    pub description: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            price: product.price.to_string(),
            image: product.image.clone(),
            description: product.description.clone(),
        }
    }
}

/// Product grid display data.
#[derive(Clone)]
pub struct GridView {
    pub products: Vec<ProductView>,
    /// Exactly one product is shown; the grid switches to a wide card.
    pub single: bool,
}

impl GridView {
    #[must_use]
    pub fn new(products: &[&Product]) -> Self {
        Self {
            products: products.iter().map(|p| ProductView::from(*p)).collect(),
            single: products.len() == 1,
        }
    }
}

/// Product grid fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_grid.html")]
pub struct ProductGridTemplate {
    pub grid: GridView,
}

/// Grid of the products passing the given filters.
#[must_use]
pub fn filtered_grid(state: &AppState, criteria: &FilterCriteria) -> GridView {
    GridView::new(&filter::apply(state.catalog().products(), criteria))
}

/// Product grid fragment.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> ProductGridTemplate {
    let grid = filtered_grid(&state, &query.criteria());
    tracing::debug!(shown = grid.products.len(), "Filtered products");

    ProductGridTemplate { grid }
}
