//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, transaction)
//! 2. `TraceLayer` (request span with a `request_id` field)
//! 3. Request ID (fill the span field, echo the header)
//! 4. Session layer (tower-sessions over a bounded moka store)
//!
//! [`SessionCart`] is an extractor, not a layer: it resolves the cart id for
//! the handlers that need one.

pub mod cart_session;
pub mod request_id;
pub mod session;

pub use cart_session::SessionCart;
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use session::create_session_layer;
