//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use crate::middleware::SessionCart;
use crate::routes::menu::{CategoryTabView, ItemCardView};
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub cart_count: u64,
    /// Bestsellers carousel, in showcase order.
    pub bestsellers: Vec<ItemCardView>,
    /// Shortcuts into the menu.
    pub categories: Vec<CategoryTabView>,
}

/// Display home page with the bestsellers showcase.
#[instrument(skip(state, cart))]
pub async fn home(State(state): State<AppState>, cart: SessionCart) -> HomeTemplate {
    let bestsellers = state
        .catalog()
        .bestsellers()
        .into_iter()
        .map(ItemCardView::from)
        .collect();

    HomeTemplate {
        cart_count: state.carts().snapshot(cart.id()).await.item_count(),
        bestsellers,
        categories: CategoryTabView::all(None),
    }
}
