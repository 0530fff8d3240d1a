//! Storefront page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use tower_sessions::Session;
use tracing::instrument;
use vitrina_core::FacetOption;

use crate::error::Result;
use crate::filters;
use crate::models::load_cart;
use crate::routes::cart::CartView;
use crate::routes::products::{FilterQuery, GridView, filtered_grid};
use crate::state::AppState;

/// A brand or category option in a filter select.
#[derive(Clone)]
pub struct FacetView {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl FacetView {
    fn list(options: Vec<FacetOption>, selected: Option<&str>) -> Vec<Self> {
        options
            .into_iter()
            .map(|option| Self {
                selected: selected == Some(option.value.as_str()),
                value: option.value,
                label: option.label,
            })
            .collect()
    }
}

/// Storefront page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub store_name: String,
    pub brands: Vec<FacetView>,
    pub categories: Vec<FacetView>,
    pub search: String,
    pub grid: GridView,
    pub cart: CartView,
}

/// Display the storefront page.
///
/// Filter values in the query string pre-select the controls, so the page
/// also works as a plain GET form.
#[instrument(skip(state, session))]
pub async fn home(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<FilterQuery>,
) -> Result<IndexTemplate> {
    let criteria = query.criteria();
    let cart = load_cart(&session).await?;
    let catalog = state.catalog();

    Ok(IndexTemplate {
        store_name: state.config().store_name.clone(),
        brands: FacetView::list(catalog.brands(), criteria.brand.as_deref()),
        categories: FacetView::list(catalog.categories(), criteria.category.as_deref()),
        search: query.q.clone().unwrap_or_default(),
        grid: filtered_grid(&state, &criteria),
        cart: CartView::from(&cart),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facet_view_marks_selected() {
        let options = vec![
            FacetOption {
                value: "acme".to_string(),
                label: "Acme".to_string(),
            },
            FacetOption {
                value: "globex".to_string(),
                label: "Globex".to_string(),
            },
        ];

        let views = FacetView::list(options, Some("globex"));
        let selected: Vec<_> = views.iter().map(|v| v.selected).collect();
        assert_eq!(selected, vec![false, true]);
    }
}
