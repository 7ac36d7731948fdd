//! Menu route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use delights_core::{CatalogItem, Category, ItemId};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::SessionCart;
use crate::state::AppState;

/// Food item card display data for templates.
#[derive(Clone)]
pub struct ItemCardView {
    pub id: String,
    pub name: String,
    pub price: String,
    pub description: String,
    pub image_url: String,
    pub motif_image_url: Option<String>,
    pub category: &'static str,
}

impl From<&CatalogItem> for ItemCardView {
    fn from(item: &CatalogItem) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.name.clone(),
            price: item.price.display(),
            description: item.description.clone(),
            image_url: item.image_url.clone(),
            motif_image_url: item.motif_image_url.clone(),
            category: item.category.label(),
        }
    }
}

/// Category tab display data for templates.
#[derive(Clone)]
pub struct CategoryTabView {
    pub slug: &'static str,
    pub label: &'static str,
    pub active: bool,
}

impl CategoryTabView {
    /// One tab per category, marking `active` (if any).
    #[must_use]
    pub fn all(active: Option<Category>) -> Vec<Self> {
        Category::ALL
            .into_iter()
            .map(|category| Self {
                slug: category.slug(),
                label: category.label(),
                active: active == Some(category),
            })
            .collect()
    }
}

/// A category section of the menu.
#[derive(Clone)]
pub struct MenuSectionView {
    pub slug: &'static str,
    pub label: &'static str,
    pub items: Vec<ItemCardView>,
}

/// Menu query parameters.
#[derive(Debug, Deserialize)]
pub struct MenuQuery {
    pub category: Option<String>,
}

/// Menu page template.
#[derive(Template, WebTemplate)]
#[template(path = "menu/index.html")]
pub struct MenuTemplate {
    pub cart_count: u64,
    pub tabs: Vec<CategoryTabView>,
    pub all_active: bool,
    pub sections: Vec<MenuSectionView>,
}

/// Item details dialog fragment (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "menu/details.html")]
pub struct MenuItemDetailsTemplate {
    pub item: ItemCardView,
}

/// Display the menu, optionally filtered to one category.
///
/// An empty `category` shows every category; an unknown one is a 404.
#[instrument(skip(state, cart))]
pub async fn index(
    State(state): State<AppState>,
    cart: SessionCart,
    Query(query): Query<MenuQuery>,
) -> Result<MenuTemplate> {
    let active = match query.category.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(slug) => Some(
            slug.parse::<Category>()
                .map_err(|e| AppError::NotFound(e.to_string()))?,
        ),
    };

    let catalog = state.catalog();
    let sections = Category::ALL
        .into_iter()
        .filter(|category| active.is_none_or(|a| a == *category))
        .map(|category| MenuSectionView {
            slug: category.slug(),
            label: category.label(),
            items: catalog
                .by_category(category)
                .into_iter()
                .map(ItemCardView::from)
                .collect(),
        })
        .collect();

    Ok(MenuTemplate {
        cart_count: state.carts().snapshot(cart.id()).await.item_count(),
        tabs: CategoryTabView::all(active),
        all_active: active.is_none(),
        sections,
    })
}

/// Item details dialog (HTMX).
#[instrument(skip(state))]
pub async fn details(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<MenuItemDetailsTemplate> {
    let item = state
        .catalog()
        .find(&ItemId::new(id.as_str()))
        .ok_or_else(|| AppError::NotFound(format!("menu item {id}")))?;

    Ok(MenuItemDetailsTemplate {
        item: ItemCardView::from(item),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use delights_core::{CatalogProvider, StaticCatalog};

    use super::*;

    #[test]
    fn test_item_card_view() {
        let catalog = StaticCatalog::house_menu();
        let view = ItemCardView::from(catalog.find(&ItemId::from("mc1")).unwrap());
        assert_eq!(view.price, "$12.99");
        assert_eq!(view.category, "Main Courses");
        assert!(view.motif_image_url.is_some());
    }

    #[test]
    fn test_tabs_mark_active() {
        let tabs = CategoryTabView::all(Some(Category::Desserts));
        assert_eq!(tabs.len(), 4);
        assert_eq!(
            tabs.iter().filter(|t| t.active).map(|t| t.slug).collect::<Vec<_>>(),
            vec!["desserts"]
        );
        assert!(CategoryTabView::all(None).iter().all(|t| !t.active));
    }
}
