//! Doraemon Delights Core - domain library.
//!
//! This crate provides the domain logic shared by every Doraemon Delights
//! component:
//! - `storefront` - the themed web shop (home, menu, cart, checkout)
//! - `cli` - command-line tools for pricing carts and checking orders
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP, no
//! async runtime. Everything here is synchronous and deterministic apart
//! from order number generation.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices and emails
//! - [`catalog`] - Menu items and the read-only catalog provider
//! - [`cart`] - The cart ledger (lines, subtotals, totals)
//! - [`checkout`] - Checkout form validation into a typed order
//! - [`order`] - Order submission state machine and confirmations

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod order;
pub mod types;

pub use cart::{Cart, CartLine, cart_total, item_count, line_subtotal};
pub use catalog::{CatalogItem, CatalogProvider, Category, StaticCatalog, UnknownCategory};
pub use checkout::{
    COUNTRIES, CheckoutForm, DEFAULT_COUNTRY, DeliveryAddress, Field, FieldError, Fulfillment,
    OrderForm, OrderType, PaymentMethod, ValidationErrors, validate,
};
pub use order::{EtaRange, OrderConfirmation, Submission, SubmissionError};
pub use types::*;
