//! Session carts shared across views.
//!
//! Each cart lives in a `tokio::sync::watch` channel keyed by the cart id
//! stored in the visitor's session. All writes go through this store, so the
//! cart page, the checkout summary and the header badge always read the same
//! ledger, and anything holding a [`watch::Receiver`] sees every change.
//!
//! Carts untouched for the configured idle period are dropped (moka
//! time-to-idle). Nothing survives a restart.

use std::sync::Arc;
use std::time::Duration;

use delights_core::{Cart, CartLine, CatalogItem, CurrencyCode, ItemId, PriceError};
use moka::future::Cache;
use tokio::sync::watch;
use uuid::Uuid;

/// Identifier of a session cart.
pub type CartId = Uuid;

/// In-memory store of session carts.
#[derive(Clone)]
pub struct CartStore {
    carts: Cache<CartId, Arc<watch::Sender<Cart>>>,
    currency_code: CurrencyCode,
}

impl CartStore {
    /// Create a store whose carts expire after `idle_timeout` without use.
    #[must_use]
    pub fn new(idle_timeout: Duration, currency_code: CurrencyCode) -> Self {
        let carts = Cache::builder()
            .max_capacity(100_000)
            .time_to_idle(idle_timeout)
            .build();

        Self {
            carts,
            currency_code,
        }
    }

    /// The channel for `cart_id`, creating an empty cart on first use.
    async fn channel(&self, cart_id: CartId) -> Arc<watch::Sender<Cart>> {
        let currency_code = self.currency_code;
        self.carts
            .get_with(cart_id, async move {
                let (sender, _) = watch::channel(Cart::new(currency_code));
                Arc::new(sender)
            })
            .await
    }

    /// Current contents of a cart.
    ///
    /// A visitor without a cart, or whose cart was evicted, sees an empty one.
    /// Reading never creates a cart.
    pub async fn snapshot(&self, cart_id: Option<CartId>) -> Cart {
        let Some(cart_id) = cart_id else {
            return Cart::new(self.currency_code);
        };
        match self.carts.get(&cart_id).await {
            Some(channel) => channel.borrow().clone(),
            None => Cart::new(self.currency_code),
        }
    }

    /// Watch a cart for changes.
    pub async fn subscribe(&self, cart_id: CartId) -> watch::Receiver<Cart> {
        self.channel(cart_id).await.subscribe()
    }

    /// Add `quantity` of `item` and return the updated cart.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::CurrencyMismatch`] if the item is priced in a
    /// different currency from the store.
    pub async fn add_item(
        &self,
        cart_id: CartId,
        item: &CatalogItem,
        quantity: u32,
    ) -> Result<Cart, PriceError> {
        let channel = self.channel(cart_id).await;
        let mut result = Ok(());
        channel.send_if_modified(|cart| {
            result = cart.add_item(item, quantity);
            result.is_ok()
        });
        result?;
        let cart = channel.borrow().clone();
        Ok(cart)
    }

    /// Set a line's quantity (clamped to at least one) and return the cart.
    ///
    /// Unknown line ids leave the cart unchanged.
    pub async fn set_quantity(&self, cart_id: CartId, line_id: &ItemId, quantity: i64) -> Cart {
        let channel = self.channel(cart_id).await;
        if !channel.send_if_modified(|cart| cart.set_quantity(line_id, quantity)) {
            tracing::debug!(%cart_id, %line_id, "Quantity update for a line not in the cart");
        }
        let cart = channel.borrow().clone();
        cart
    }

    /// Remove a line and return the cart. Removing twice is harmless.
    pub async fn remove_line(&self, cart_id: CartId, line_id: &ItemId) -> Cart {
        let channel = self.channel(cart_id).await;
        channel.send_if_modified(|cart| cart.remove_line(line_id));
        let cart = channel.borrow().clone();
        cart
    }

    /// Take a confirmed order's lines out of the cart and return what is left.
    ///
    /// Runs as one write, so items added while the order was with the
    /// kitchen stay in the cart.
    pub async fn remove_ordered(&self, cart_id: CartId, ordered: &[CartLine]) -> Cart {
        let channel = self.channel(cart_id).await;
        channel.send_if_modified(|cart| cart.remove_ordered(ordered));
        let cart = channel.borrow().clone();
        cart
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use delights_core::{CatalogProvider, StaticCatalog};

    use super::*;

    fn store() -> CartStore {
        CartStore::new(Duration::from_secs(60), CurrencyCode::USD)
    }

    fn item(id: &str) -> CatalogItem {
        StaticCatalog::house_menu()
            .find(&ItemId::from(id))
            .cloned()
            .unwrap()
    }

    #[tokio::test]
    async fn test_new_cart_is_empty() {
        let store = store();
        assert!(store.snapshot(None).await.is_empty());
        assert!(store.snapshot(Some(Uuid::new_v4())).await.is_empty());
        assert_eq!(store.carts.entry_count(), 0);
    }

    #[tokio::test]
    async fn test_carts_are_isolated() {
        let store = store();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        store.add_item(a, &item("dr2"), 2).await.unwrap();
        assert_eq!(store.snapshot(Some(a)).await.item_count(), 2);
        assert!(store.snapshot(Some(b)).await.is_empty());
    }

    #[tokio::test]
    async fn test_subscribers_see_updates() {
        let store = store();
        let id = Uuid::new_v4();
        let mut badge = store.subscribe(id).await;

        store.add_item(id, &item("sd1"), 3).await.unwrap();
        assert!(badge.has_changed().unwrap());
        assert_eq!(badge.borrow_and_update().item_count(), 3);

        store.set_quantity(id, &ItemId::from("sd1"), 0).await;
        assert!(badge.has_changed().unwrap());
        assert_eq!(badge.borrow_and_update().item_count(), 1);
    }

    #[tokio::test]
    async fn test_noop_writes_do_not_notify() {
        let store = store();
        let id = Uuid::new_v4();
        store.add_item(id, &item("sd1"), 1).await.unwrap();
        let mut badge = store.subscribe(id).await;

        store.remove_line(id, &ItemId::from("missing")).await;
        store.set_quantity(id, &ItemId::from("missing"), 5).await;
        assert!(!badge.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_remove_line_twice() {
        let store = store();
        let id = Uuid::new_v4();
        store.add_item(id, &item("ds1"), 1).await.unwrap();
        store.add_item(id, &item("ds2"), 1).await.unwrap();

        let cart = store.remove_line(id, &ItemId::from("ds1")).await;
        assert_eq!(cart.lines().len(), 1);
        let cart = store.remove_line(id, &ItemId::from("ds1")).await;
        assert_eq!(cart.lines().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_ordered_keeps_items_added_meanwhile() {
        let store = store();
        let id = Uuid::new_v4();
        let ordered = store.add_item(id, &item("mc1"), 1).await.unwrap();
        store.add_item(id, &item("dr1"), 2).await.unwrap();

        let left = store.remove_ordered(id, ordered.lines()).await;
        assert_eq!(left.item_count(), 2);
        assert!(left.line(&ItemId::from("mc1")).is_none());
        assert_eq!(store.snapshot(Some(id)).await, left);
    }

    #[tokio::test]
    async fn test_currency_mismatch_leaves_cart_untouched() {
        let store = CartStore::new(Duration::from_secs(60), CurrencyCode::EUR);
        let id = Uuid::new_v4();
        assert!(store.add_item(id, &item("dr1"), 1).await.is_err());
        assert!(store.snapshot(Some(id)).await.is_empty());
    }
}
