//! Order confirmation page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use delights_core::{Fulfillment, OrderConfirmation};
use tracing::instrument;

use crate::error::Result;
use crate::middleware::SessionCart;
use crate::models::session_keys;
use crate::routes::cart::CartLineView;
use crate::state::AppState;

/// Confirmed order display data for templates.
#[derive(Clone)]
pub struct ConfirmationView {
    pub order_number: String,
    pub customer_name: String,
    pub email: String,
    pub lines: Vec<CartLineView>,
    pub total: String,
    pub eta: String,
    pub is_delivery: bool,
    /// Single-line delivery address, for delivery orders.
    pub address: Option<String>,
    pub payment_method: &'static str,
    pub special_instructions: Option<String>,
    pub placed_at: String,
}

impl From<&OrderConfirmation> for ConfirmationView {
    fn from(confirmation: &OrderConfirmation) -> Self {
        let order = &confirmation.order;
        let address = match &order.fulfillment {
            Fulfillment::Delivery(address) => Some(format!(
                "{}, {} {}, {}",
                address.street_address, address.city, address.postal_code, address.country
            )),
            Fulfillment::Pickup => None,
        };

        Self {
            order_number: confirmation.order_number.to_string(),
            customer_name: order.name.clone(),
            email: order.email.to_string(),
            lines: confirmation.lines.iter().map(CartLineView::from).collect(),
            total: confirmation.total.display(),
            eta: confirmation.eta.to_string(),
            is_delivery: address.is_some(),
            address,
            payment_method: order.payment_method.label(),
            special_instructions: order.special_instructions.clone(),
            placed_at: confirmation.placed_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        }
    }
}

/// Order confirmation page template.
#[derive(Template, WebTemplate)]
#[template(path = "order/confirmation.html")]
pub struct ConfirmationTemplate {
    pub cart_count: u64,
    pub order: ConfirmationView,
}

/// Show the last order placed in this session, or go back to the menu.
#[instrument(skip(state, cart))]
pub async fn show(State(state): State<AppState>, cart: SessionCart) -> Result<Response> {
    let Some(confirmation) = cart
        .session
        .get::<OrderConfirmation>(session_keys::LAST_ORDER)
        .await?
    else {
        return Ok(Redirect::to("/menu").into_response());
    };

    Ok(ConfirmationTemplate {
        cart_count: state.carts().snapshot(cart.id()).await.item_count(),
        order: ConfirmationView::from(&confirmation),
    }
    .into_response())
}
