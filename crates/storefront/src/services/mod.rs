//! Stateful services behind the route handlers.
//!
//! - `cart_store` - Session carts with change notification
//! - `kitchen` - Order submission to the kitchen

pub mod cart_store;
pub mod kitchen;

pub use cart_store::{CartId, CartStore};
pub use kitchen::{KitchenClient, KitchenError};
