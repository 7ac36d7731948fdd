//! Session-related types.
//!
//! The session holds only identifiers and the last confirmation; cart
//! contents live in the [`CartStore`](crate::services::CartStore).

/// Session keys for storefront data.
pub mod keys {
    /// Key for the visitor's cart id (a UUID into the cart store).
    pub const CART_ID: &str = "cart_id";

    /// Key for the most recent [`OrderConfirmation`](delights_core::OrderConfirmation),
    /// shown on the confirmation page.
    pub const LAST_ORDER: &str = "last_order";
}
