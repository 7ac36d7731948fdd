//! Kitchen client: where validated orders are sent.
//!
//! The kitchen answers after a configurable delay and can be told to turn a
//! share of orders away, so the checkout failure path is exercised without a
//! real backend. There is no cancellation and no timeout: once an order is
//! handed over the caller waits for the answer.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use delights_core::{Cart, OrderConfirmation, OrderForm};
use rand::Rng;
use thiserror::Error;
use tracing::instrument;

use crate::config::KitchenConfig;

/// Errors that can occur when handing an order to the kitchen.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KitchenError {
    /// The kitchen could not take the order right now.
    #[error("the kitchen is busy on a time trip, please try again")]
    Unavailable,

    /// Nothing to cook.
    #[error("cannot place an order for an empty cart")]
    EmptyOrder,
}

/// Client for submitting orders to the kitchen.
#[derive(Clone)]
pub struct KitchenClient {
    inner: Arc<KitchenClientInner>,
}

struct KitchenClientInner {
    latency: Duration,
    failure_rate: f64,
}

impl KitchenClient {
    /// Create a new kitchen client.
    #[must_use]
    pub fn new(config: &KitchenConfig) -> Self {
        Self {
            inner: Arc::new(KitchenClientInner {
                latency: config.latency,
                failure_rate: config.failure_rate.clamp(0.0, 1.0),
            }),
        }
    }

    /// Submit an order for the contents of `cart`.
    ///
    /// # Errors
    ///
    /// Returns [`KitchenError::EmptyOrder`] for an empty cart and
    /// [`KitchenError::Unavailable`] when the kitchen turns the order away.
    #[instrument(
        skip(self, order, cart),
        fields(order_type = order.order_type().as_str(), items = cart.item_count())
    )]
    pub async fn submit_order(
        &self,
        order: OrderForm,
        cart: &Cart,
    ) -> Result<OrderConfirmation, KitchenError> {
        if cart.is_empty() {
            return Err(KitchenError::EmptyOrder);
        }

        tokio::time::sleep(self.inner.latency).await;

        let turned_away = rand::rng().random_bool(self.inner.failure_rate);
        if turned_away {
            tracing::warn!("Kitchen turned the order away");
            return Err(KitchenError::Unavailable);
        }

        let confirmation = OrderConfirmation::new(order, cart, Utc::now());
        tracing::info!(
            order_number = %confirmation.order_number,
            total = %confirmation.total,
            eta = %confirmation.eta,
            "Order accepted by kitchen"
        );
        Ok(confirmation)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use delights_core::{
        CatalogProvider, CheckoutForm, CurrencyCode, EtaRange, ItemId, StaticCatalog, validate,
    };

    use super::*;

    fn order() -> OrderForm {
        validate(&CheckoutForm {
            name: Some("Suneo Honekawa".to_owned()),
            email: Some("suneo@honekawa.jp".to_owned()),
            phone: Some("0398765432".to_owned()),
            order_type: Some("delivery".to_owned()),
            street_address: Some("4-5-6 Tsukimidai".to_owned()),
            city: Some("Nerima".to_owned()),
            postal_code: Some("1760000".to_owned()),
            payment_method: Some("timeMachineTransfer".to_owned()),
            country: Some("Japan".to_owned()),
            agree_to_terms: true,
            ..CheckoutForm::default()
        })
        .unwrap()
    }

    fn cart() -> Cart {
        let catalog = StaticCatalog::house_menu();
        let mut cart = Cart::new(CurrencyCode::USD);
        cart.add_item(catalog.find(&ItemId::from("mc2")).unwrap(), 1)
            .unwrap();
        cart
    }

    fn kitchen(failure_rate: f64) -> KitchenClient {
        KitchenClient::new(&KitchenConfig {
            latency: Duration::ZERO,
            failure_rate,
        })
    }

    #[tokio::test]
    async fn test_accepts_order() {
        let confirmation = kitchen(0.0).submit_order(order(), &cart()).await.unwrap();
        assert_eq!(confirmation.eta, EtaRange::DELIVERY);
        assert_eq!(confirmation.total.display(), "$15.50");
        assert_eq!(confirmation.order.name, "Suneo Honekawa");
    }

    #[tokio::test]
    async fn test_turns_order_away() {
        let err = kitchen(1.0)
            .submit_order(order(), &cart())
            .await
            .unwrap_err();
        assert_eq!(err, KitchenError::Unavailable);
    }

    #[tokio::test]
    async fn test_rejects_empty_cart() {
        let err = kitchen(0.0)
            .submit_order(order(), &Cart::default())
            .await
            .unwrap_err();
        assert_eq!(err, KitchenError::EmptyOrder);
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_for_latency() {
        let client = KitchenClient::new(&KitchenConfig {
            latency: Duration::from_millis(1500),
            failure_rate: 0.0,
        });
        let started = tokio::time::Instant::now();
        client.submit_order(order(), &cart()).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(1500));
    }
}
