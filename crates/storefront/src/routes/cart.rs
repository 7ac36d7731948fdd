//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Every write answers with `HX-Trigger: cart-updated` so the header badge
//! re-fetches `/cart/count`.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use delights_core::{Cart, CartLine, ItemId};
use serde::{Deserialize, Deserializer};
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::SessionCart;
use crate::state::AppState;

/// HTMX event fired after every cart write.
pub const CART_UPDATED_TRIGGER: (&str, &str) = ("HX-Trigger", "cart-updated");

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartLineView {
    pub id: String,
    pub name: String,
    pub image_url: String,
    pub quantity: u32,
    pub unit_price: String,
    pub subtotal: String,
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.id.to_string(),
            name: line.name.clone(),
            image_url: line.image_url.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price.display(),
            subtotal: line.subtotal().display(),
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub total: String,
    pub item_count: u64,
}

impl CartView {
    /// Whether there is anything to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            lines: cart.lines().iter().map(CartLineView::from).collect(),
            total: cart.total().display(),
            item_count: cart.item_count(),
        }
    }
}

/// Parse a quantity box leniently: blank or non-numeric input is `None`.
fn lenient_quantity<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| value.trim().parse().ok()))
}

/// Clamp a submitted quantity to `1..=u32::MAX`; missing means one.
fn clamp_quantity(quantity: Option<i64>) -> u32 {
    u32::try_from(quantity.unwrap_or(1).max(1)).unwrap_or(u32::MAX)
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub item_id: String,
    #[serde(default, deserialize_with = "lenient_quantity")]
    pub quantity: Option<i64>,
}

/// Update cart form data.
///
/// Quantities below one (or a cleared box) are stored as one.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub item_id: String,
    #[serde(default, deserialize_with = "lenient_quantity")]
    pub quantity: Option<i64>,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub item_id: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart_count: u64,
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u64,
}

/// Display cart page.
#[instrument(skip(state, cart))]
pub async fn show(State(state): State<AppState>, cart: SessionCart) -> CartShowTemplate {
    let cart = state.carts().snapshot(cart.id()).await;

    CartShowTemplate {
        cart_count: cart.item_count(),
        cart: CartView::from(&cart),
    }
}

/// Add item to cart (HTMX).
///
/// Returns the updated count badge. Unknown items are a 404.
#[instrument(skip(state, cart))]
pub async fn add(
    State(state): State<AppState>,
    mut cart: SessionCart,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let item = state
        .catalog()
        .find(&ItemId::new(form.item_id.as_str()))
        .ok_or_else(|| AppError::NotFound(format!("menu item {}", form.item_id)))?;

    let quantity = clamp_quantity(form.quantity);
    let cart_id = cart.id_or_create().await?;
    let updated = state
        .carts()
        .add_item(cart_id, item, quantity)
        .await
        .map_err(|e| AppError::Internal(format!("cannot add {}: {e}", item.id)))?;

    add_breadcrumb(
        "cart",
        "Added item",
        Some(&[("item_id", item.id.as_str()), ("name", item.name.as_str())]),
    );
    tracing::info!(item_id = %item.id, quantity, "Added to cart");

    Ok((
        AppendHeaders([CART_UPDATED_TRIGGER]),
        CartCountTemplate {
            count: updated.item_count(),
        },
    )
        .into_response())
}

/// Update cart item quantity (HTMX).
#[instrument(skip(state, cart))]
pub async fn update(
    State(state): State<AppState>,
    cart: SessionCart,
    Form(form): Form<UpdateCartForm>,
) -> Response {
    let updated = match cart.id() {
        Some(cart_id) => {
            let quantity = i64::from(clamp_quantity(form.quantity));
            state
                .carts()
                .set_quantity(cart_id, &ItemId::new(form.item_id), quantity)
                .await
        }
        None => state.carts().snapshot(None).await,
    };

    (
        AppendHeaders([CART_UPDATED_TRIGGER]),
        CartItemsTemplate {
            cart: CartView::from(&updated),
        },
    )
        .into_response()
}

/// Remove item from cart (HTMX).
#[instrument(skip(state, cart))]
pub async fn remove(
    State(state): State<AppState>,
    cart: SessionCart,
    Form(form): Form<RemoveFromCartForm>,
) -> Response {
    let updated = match cart.id() {
        Some(cart_id) => {
            state
                .carts()
                .remove_line(cart_id, &ItemId::new(form.item_id))
                .await
        }
        None => state.carts().snapshot(None).await,
    };

    (
        AppendHeaders([CART_UPDATED_TRIGGER]),
        CartItemsTemplate {
            cart: CartView::from(&updated),
        },
    )
        .into_response()
}

/// Get cart count badge (HTMX).
#[instrument(skip(state, cart))]
pub async fn count(State(state): State<AppState>, cart: SessionCart) -> CartCountTemplate {
    CartCountTemplate {
        count: state.carts().snapshot(cart.id()).await.item_count(),
    }
}
