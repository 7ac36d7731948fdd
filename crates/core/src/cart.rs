//! The cart ledger.
//!
//! A [`Cart`] is an ordered list of [`CartLine`]s, one per menu item. Lines
//! are created by copying fields out of a [`CatalogItem`], then edited in
//! place. Quantities never drop below one: decrementing past one clamps
//! instead of failing, and removing a line is a separate, idempotent call.
//!
//! All amounts are fixed-point decimals rounded half-up to cents.

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogItem;
use crate::types::{CurrencyCode, ItemId, Price, PriceError};

/// Smallest quantity a line may hold.
pub const MIN_QUANTITY: u32 = 1;

/// One product entry in a cart with its own quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Id of the catalog item this line was created from.
    pub id: ItemId,
    pub name: String,
    pub unit_price: Price,
    /// Always at least [`MIN_QUANTITY`].
    pub quantity: u32,
    pub image_url: String,
}

impl CartLine {
    /// Build a line for `item`, clamping `quantity` to at least one.
    #[must_use]
    pub fn from_item(item: &CatalogItem, quantity: u32) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            unit_price: item.price,
            quantity: quantity.max(MIN_QUANTITY),
            image_url: item.image_url.clone(),
        }
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        line_subtotal(self)
    }
}

/// Unit price times quantity, rounded to cents.
#[must_use]
pub fn line_subtotal(line: &CartLine) -> Price {
    line.unit_price.times(line.quantity)
}

/// Sum of every line subtotal; zero (in USD) for an empty slice.
///
/// # Errors
///
/// Returns [`PriceError::CurrencyMismatch`] if the lines are priced in more
/// than one currency.
pub fn cart_total(lines: &[CartLine]) -> Result<Price, PriceError> {
    let currency = lines
        .first()
        .map_or_else(CurrencyCode::default, |line| line.unit_price.currency_code);
    Price::sum(lines.iter().map(line_subtotal), currency)
}

/// Sum of quantities, as shown on the header badge.
#[must_use]
pub fn item_count(lines: &[CartLine]) -> u64 {
    lines.iter().map(|line| u64::from(line.quantity)).sum()
}

/// An ordered collection of cart lines in a single currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
    currency_code: CurrencyCode,
}

impl Cart {
    /// Create an empty cart priced in `currency_code`.
    #[must_use]
    pub const fn new(currency_code: CurrencyCode) -> Self {
        Self {
            lines: Vec::new(),
            currency_code,
        }
    }

    /// Lines in the order they were added.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Currency every line is priced in.
    #[must_use]
    pub const fn currency_code(&self) -> CurrencyCode {
        self.currency_code
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Look up a line by item id.
    #[must_use]
    pub fn line(&self, line_id: &ItemId) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.id == line_id)
    }

    /// Add `quantity` of `item`, merging into an existing line for the same
    /// item. Quantities below one are treated as one.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::CurrencyMismatch`] if the item is priced in a
    /// different currency from the cart.
    pub fn add_item(&mut self, item: &CatalogItem, quantity: u32) -> Result<(), PriceError> {
        if item.price.currency_code != self.currency_code {
            return Err(PriceError::CurrencyMismatch {
                left: self.currency_code,
                right: item.price.currency_code,
            });
        }

        let quantity = quantity.max(MIN_QUANTITY);
        match self.lines.iter_mut().find(|line| line.id == item.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => self.lines.push(CartLine::from_item(item, quantity)),
        }
        Ok(())
    }

    /// Set a line's quantity, clamped to `1..=u32::MAX`.
    ///
    /// Unknown ids are ignored. Returns whether a line was updated.
    pub fn set_quantity(&mut self, line_id: &ItemId, new_qty: i64) -> bool {
        let Some(line) = self.lines.iter_mut().find(|line| &line.id == line_id) else {
            return false;
        };
        line.quantity = u32::try_from(new_qty.max(i64::from(MIN_QUANTITY))).unwrap_or(u32::MAX);
        true
    }

    /// Remove a line. Removing an absent id is not an error.
    ///
    /// Returns whether a line was removed.
    pub fn remove_line(&mut self, line_id: &ItemId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| &line.id != line_id);
        self.lines.len() != before
    }

    /// Take the ordered quantities out of the cart.
    ///
    /// Each ordered line lowers the matching line by its quantity; lines that
    /// reach zero are removed. Anything added after the order was taken stays.
    /// Returns whether the cart changed.
    pub fn remove_ordered(&mut self, ordered: &[CartLine]) -> bool {
        let mut changed = false;
        for taken in ordered {
            if let Some(line) = self.lines.iter_mut().find(|line| line.id == taken.id) {
                line.quantity = line.quantity.saturating_sub(taken.quantity);
                changed = true;
            }
        }
        self.lines.retain(|line| line.quantity > 0);
        changed
    }

    /// Sum of every line subtotal.
    #[must_use]
    pub fn total(&self) -> Price {
        // Lines only enter through `add_item`, which rejects other currencies.
        Price::sum(self.lines.iter().map(line_subtotal), self.currency_code)
            .unwrap_or_else(|_| Price::zero(self.currency_code))
    }

    /// Sum of quantities.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        item_count(&self.lines)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogProvider, StaticCatalog};

    fn catalog_item(id: &str) -> CatalogItem {
        StaticCatalog::house_menu()
            .find(&ItemId::from(id))
            .cloned()
            .unwrap()
    }

    /// Three dessert and side lines.
    fn sample_cart() -> Cart {
        let mut cart = Cart::new(CurrencyCode::USD);
        cart.add_item(&catalog_item("dorayaki-delight"), 2).unwrap();
        cart.add_item(&catalog_item("memory-bread-toasties"), 1)
            .unwrap();
        cart.add_item(&catalog_item("anywhere-door-donuts"), 3)
            .unwrap();
        cart
    }

    fn usd(s: &str) -> Price {
        Price::parse(s, CurrencyCode::USD).unwrap()
    }

    #[test]
    fn test_totals() {
        let cart = sample_cart();
        assert_eq!(cart.total(), usd("19.60"));
        assert_eq!(cart.item_count(), 6);
        assert_eq!(cart_total(cart.lines()).unwrap(), usd("19.60"));
    }

    #[test]
    fn test_total_equals_sum_of_subtotals() {
        let cart = sample_cart();
        let subtotals: Vec<_> = cart.lines().iter().map(CartLine::subtotal).collect();
        assert_eq!(subtotals, vec![usd("7.00"), usd("4.20"), usd("8.40")]);
        let summed = Price::sum(subtotals, CurrencyCode::USD).unwrap();
        assert_eq!(cart.total(), summed);
        assert!(!cart.total().amount.is_sign_negative());
    }

    #[test]
    fn test_empty_cart_totals_zero() {
        let cart = Cart::default();
        assert!(cart.is_empty());
        assert!(cart.total().amount.is_zero());
        assert_eq!(cart.item_count(), 0);
        assert!(cart_total(&[]).unwrap().amount.is_zero());
    }

    #[test]
    fn test_add_item_merges_lines() {
        let mut cart = sample_cart();
        cart.add_item(&catalog_item("dorayaki-delight"), 1).unwrap();
        assert_eq!(cart.lines().len(), 3);
        assert_eq!(
            cart.line(&ItemId::from("dorayaki-delight")).unwrap().quantity,
            3
        );
    }

    #[test]
    fn test_add_item_clamps_zero_quantity() {
        let mut cart = Cart::default();
        cart.add_item(&catalog_item("ds1"), 0).unwrap();
        assert_eq!(cart.line(&ItemId::from("ds1")).unwrap().quantity, 1);
    }

    #[test]
    fn test_add_item_rejects_other_currency() {
        let mut cart = Cart::new(CurrencyCode::JPY);
        assert!(matches!(
            cart.add_item(&catalog_item("ds1"), 1),
            Err(PriceError::CurrencyMismatch { .. })
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_clamps_to_one() {
        let mut cart = sample_cart();
        let id = ItemId::from("anywhere-door-donuts");
        for q in [0, -1, -500, i64::MIN] {
            assert!(cart.set_quantity(&id, q));
            assert_eq!(cart.line(&id).unwrap().quantity, 1);
        }
        assert!(cart.set_quantity(&id, 7));
        assert_eq!(cart.line(&id).unwrap().quantity, 7);
        assert!(cart.set_quantity(&id, i64::MAX));
        assert_eq!(cart.line(&id).unwrap().quantity, u32::MAX);
    }

    #[test]
    fn test_set_quantity_unknown_id_is_noop() {
        let mut cart = sample_cart();
        let before = cart.clone();
        assert!(!cart.set_quantity(&ItemId::from("gian-stew"), 4));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_remove_line_is_idempotent() {
        let mut cart = sample_cart();
        let id = ItemId::from("memory-bread-toasties");
        assert!(cart.remove_line(&id));
        let after_first = cart.clone();
        assert!(!cart.remove_line(&id));
        assert_eq!(cart, after_first);
        assert_eq!(cart.lines().len(), 2);
    }

    #[test]
    fn test_subtotal_uses_decimal_arithmetic() {
        let mut cart = Cart::default();
        cart.add_item(&catalog_item("dr1"), 3).unwrap();
        // 4.99 * 3 in binary floating point is 14.969999...
        assert_eq!(cart.total(), usd("14.97"));
    }

    #[test]
    fn test_remove_ordered_keeps_later_additions() {
        let mut cart = sample_cart();
        let ordered = cart.lines().to_vec();

        cart.add_item(&catalog_item("dorayaki-delight"), 1).unwrap();
        cart.add_item(&catalog_item("dr1"), 2).unwrap();

        assert!(cart.remove_ordered(&ordered));
        let left: Vec<_> = cart
            .lines()
            .iter()
            .map(|line| (line.id.as_str(), line.quantity))
            .collect();
        assert_eq!(left, vec![("dorayaki-delight", 1), ("dr1", 2)]);

        assert!(!cart.remove_ordered(&[]));
    }

    #[test]
    fn test_cart_line_serde_roundtrip() {
        let line = CartLine::from_item(&catalog_item("mc2"), 2);
        let json = serde_json::to_string(&line).unwrap();
        let parsed: CartLine = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, line);
    }
}
