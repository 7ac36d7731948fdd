//! Extractor for the visitor's cart id.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::session_keys;
use crate::services::CartId;

/// The visitor's session and, once they have one, the id of their cart.
///
/// Reading handlers use [`SessionCart::id`] and treat a missing id as an
/// empty cart, so browsing never writes to the session. The first cart write
/// calls [`SessionCart::id_or_create`].
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(State(state): State<AppState>, cart: SessionCart) -> String {
///     state.carts().snapshot(cart.id()).await.total().display()
/// }
/// ```
pub struct SessionCart {
    id: Option<CartId>,
    /// The underlying session, for handlers that store more than the cart.
    pub session: Session,
}

impl SessionCart {
    /// Key into the [`CartStore`](crate::services::CartStore), if a cart was started.
    #[must_use]
    pub const fn id(&self) -> Option<CartId> {
        self.id
    }

    /// The cart id, starting a cart in the session if there is none yet.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Session`] if the session cannot be written.
    pub async fn id_or_create(&mut self) -> Result<CartId, AppError> {
        if let Some(id) = self.id {
            return Ok(id);
        }

        let id = Uuid::new_v4();
        self.session.insert(session_keys::CART_ID, id).await?;
        tracing::debug!(cart_id = %id, "Started a new cart");
        self.id = Some(id);
        Ok(id)
    }
}

impl<S> FromRequestParts<S> for SessionCart
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer not installed".to_string()))?;

        let id = session.get::<CartId>(session_keys::CART_ID).await?;

        Ok(Self { id, session })
    }
}
