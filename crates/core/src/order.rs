//! Order submission.
//!
//! ```text
//! Editing --begin(valid form)--> Submitting --complete(Ok)--> Confirmed
//!    ^                              |    ^
//!    |                     complete(Err)  | retry / begin
//!    |                              v    |
//!    +------------------------------ Failed
//! ```
//!
//! `Submitting` is the one asynchronous boundary in checkout: the caller
//! hands the order to the kitchen and later reports the outcome with
//! [`Submission::complete`]. A failed submission keeps the order so it can be
//! retried unchanged or edited and resubmitted.

use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::{Cart, CartLine};
use crate::checkout::{CheckoutForm, OrderForm, OrderType, ValidationErrors, validate};
use crate::types::{OrderNumber, Price};

/// Estimated minutes until the order is ready or at the door.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EtaRange {
    pub min_minutes: u32,
    pub max_minutes: u32,
}

impl EtaRange {
    /// Delivery estimate.
    pub const DELIVERY: Self = Self {
        min_minutes: 30,
        max_minutes: 45,
    };

    /// Pickup estimate.
    pub const PICKUP: Self = Self {
        min_minutes: 15,
        max_minutes: 20,
    };

    /// Estimate for an order type.
    #[must_use]
    pub const fn for_order_type(order_type: OrderType) -> Self {
        match order_type {
            OrderType::Delivery => Self::DELIVERY,
            OrderType::Pickup => Self::PICKUP,
        }
    }
}

impl fmt::Display for EtaRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{} minutes", self.min_minutes, self.max_minutes)
    }
}

/// What the kitchen hands back for an accepted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConfirmation {
    pub order_number: OrderNumber,
    pub eta: EtaRange,
    /// The submitted form, echoed back.
    pub order: OrderForm,
    pub lines: Vec<CartLine>,
    pub total: Price,
    pub placed_at: DateTime<Utc>,
}

impl OrderConfirmation {
    /// Confirm `order` for the contents of `cart` with a fresh order number.
    #[must_use]
    pub fn new(order: OrderForm, cart: &Cart, placed_at: DateTime<Utc>) -> Self {
        Self {
            order_number: OrderNumber::generate(),
            eta: EtaRange::for_order_type(order.order_type()),
            lines: cart.lines().to_vec(),
            total: cart.total(),
            order,
            placed_at,
        }
    }

    /// Sum of quantities across the confirmed lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        crate::cart::item_count(&self.lines)
    }
}

/// Errors raised while moving an order through submission.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    /// The checkout form failed validation.
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),
    /// The requested step is not allowed from the current state.
    #[error("cannot {action} while {state}")]
    InvalidTransition {
        /// State the submission was in.
        state: &'static str,
        /// Step that was attempted.
        action: &'static str,
    },
    /// The kitchen did not accept the order; the order can be retried.
    #[error("order not accepted: {0}")]
    Rejected(String),
}

/// Where an order is in checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Submission {
    /// The customer is filling in the form.
    #[default]
    Editing,
    /// A valid order is with the kitchen.
    Submitting { order: OrderForm },
    /// The kitchen accepted the order.
    Confirmed { confirmation: Box<OrderConfirmation> },
    /// The kitchen did not accept the order.
    Failed { order: OrderForm, reason: String },
}

impl Submission {
    /// Name of the current state, for logs and errors.
    #[must_use]
    pub const fn state_name(&self) -> &'static str {
        match self {
            Self::Editing => "editing",
            Self::Submitting { .. } => "submitting",
            Self::Confirmed { .. } => "confirmed",
            Self::Failed { .. } => "failed",
        }
    }

    /// Validate `form` and move to `Submitting`.
    ///
    /// Allowed from `Editing` and from `Failed` (an edited resubmission).
    /// On validation failure the state is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionError::Invalid`] with every field error, or
    /// [`SubmissionError::InvalidTransition`] from any other state.
    pub fn begin(&mut self, form: &CheckoutForm) -> Result<&OrderForm, SubmissionError> {
        if !matches!(self, Self::Editing | Self::Failed { .. }) {
            return Err(self.invalid("submit"));
        }
        let order = validate(form)?;
        *self = Self::Submitting { order };
        self.order().ok_or_else(|| self.invalid("submit"))
    }

    /// Resubmit the same order after a failure.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionError::InvalidTransition`] unless `Failed`.
    pub fn retry(&mut self) -> Result<&OrderForm, SubmissionError> {
        match std::mem::take(self) {
            Self::Failed { order, .. } => {
                *self = Self::Submitting { order };
                self.order().ok_or_else(|| self.invalid("retry"))
            }
            other => {
                *self = other;
                Err(self.invalid("retry"))
            }
        }
    }

    /// Record the kitchen's answer.
    ///
    /// `Ok` moves to `Confirmed`; `Err(reason)` moves to `Failed`, keeping
    /// the order for a retry.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionError::InvalidTransition`] unless `Submitting`.
    pub fn complete(
        &mut self,
        outcome: Result<OrderConfirmation, String>,
    ) -> Result<(), SubmissionError> {
        match std::mem::take(self) {
            Self::Submitting { order } => {
                *self = match outcome {
                    Ok(confirmation) => Self::Confirmed {
                        confirmation: Box::new(confirmation),
                    },
                    Err(reason) => Self::Failed { order, reason },
                };
                Ok(())
            }
            other => {
                *self = other;
                Err(self.invalid("complete"))
            }
        }
    }

    /// Go back to editing, e.g. after the customer dismisses a failure notice.
    pub fn edit(&mut self) {
        if !matches!(self, Self::Confirmed { .. } | Self::Submitting { .. }) {
            *self = Self::Editing;
        }
    }

    /// The order in flight or awaiting retry.
    #[must_use]
    pub const fn order(&self) -> Option<&OrderForm> {
        match self {
            Self::Submitting { order } | Self::Failed { order, .. } => Some(order),
            Self::Confirmed { confirmation } => Some(&confirmation.order),
            Self::Editing => None,
        }
    }

    /// The confirmation, once confirmed.
    #[must_use]
    pub fn confirmation(&self) -> Option<&OrderConfirmation> {
        match self {
            Self::Confirmed { confirmation } => Some(confirmation),
            _ => None,
        }
    }

    /// The failure reason, once failed.
    #[must_use]
    pub fn failure(&self) -> Option<&str> {
        match self {
            Self::Failed { reason, .. } => Some(reason),
            _ => None,
        }
    }

    const fn invalid(&self, action: &'static str) -> SubmissionError {
        SubmissionError::InvalidTransition {
            state: self.state_name(),
            action,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogProvider, StaticCatalog};
    use crate::checkout::Field;
    use crate::types::{CurrencyCode, ItemId};

    fn pickup_form() -> CheckoutForm {
        CheckoutForm {
            name: Some("Shizuka".to_owned()),
            email: Some("shizuka@minamoto.jp".to_owned()),
            phone: Some("0312345678".to_owned()),
            order_type: Some("pickup".to_owned()),
            payment_method: Some("gadgetPay".to_owned()),
            agree_to_terms: true,
            ..CheckoutForm::default()
        }
    }

    fn cart() -> Cart {
        let catalog = StaticCatalog::house_menu();
        let mut cart = Cart::new(CurrencyCode::USD);
        cart.add_item(catalog.find(&ItemId::from("ds1")).unwrap(), 2)
            .unwrap();
        cart
    }

    #[test]
    fn test_begin_requires_valid_form() {
        let mut submission = Submission::default();
        let form = CheckoutForm {
            agree_to_terms: false,
            ..pickup_form()
        };
        let err = submission.begin(&form).unwrap_err();
        let SubmissionError::Invalid(errors) = err else {
            panic!("expected validation errors, got {err:?}");
        };
        assert_eq!(errors.fields(), vec![Field::AgreeToTerms]);
        assert_eq!(submission, Submission::Editing);
    }

    #[test]
    fn test_happy_path() {
        let mut submission = Submission::default();
        let order = submission.begin(&pickup_form()).unwrap().clone();
        assert_eq!(submission.state_name(), "submitting");

        let confirmation = OrderConfirmation::new(order, &cart(), Utc::now());
        submission.complete(Ok(confirmation)).unwrap();

        let confirmation = submission.confirmation().unwrap();
        assert!(confirmation.order_number.as_str().starts_with("DORA-"));
        assert_eq!(confirmation.eta, EtaRange::PICKUP);
        assert_eq!(confirmation.total.display(), "$17.50");
        assert_eq!(confirmation.item_count(), 2);
    }

    #[test]
    fn test_failure_then_retry() {
        let mut submission = Submission::default();
        submission.begin(&pickup_form()).unwrap();
        submission
            .complete(Err("kitchen is on a time trip".to_owned()))
            .unwrap();
        assert_eq!(submission.failure(), Some("kitchen is on a time trip"));
        assert!(submission.order().is_some());

        let order = submission.retry().unwrap();
        assert_eq!(order.name, "Shizuka");
        assert_eq!(submission.state_name(), "submitting");
    }

    #[test]
    fn test_failed_can_be_edited_and_resubmitted() {
        let mut submission = Submission::Failed {
            order: validate(&pickup_form()).unwrap(),
            reason: "timeout".to_owned(),
        };
        let form = CheckoutForm {
            name: Some("Dekisugi".to_owned()),
            ..pickup_form()
        };
        assert_eq!(submission.begin(&form).unwrap().name, "Dekisugi");
    }

    #[test]
    fn test_invalid_transitions_leave_state_alone() {
        let mut submission = Submission::default();
        assert_eq!(
            submission.retry().unwrap_err(),
            SubmissionError::InvalidTransition {
                state: "editing",
                action: "retry"
            }
        );
        assert!(submission.complete(Err("x".to_owned())).is_err());
        assert_eq!(submission, Submission::Editing);

        submission.begin(&pickup_form()).unwrap();
        let before = submission.clone();
        assert!(submission.begin(&pickup_form()).is_err());
        assert!(submission.retry().is_err());
        assert_eq!(submission, before);
    }

    #[test]
    fn test_edit_after_failure() {
        let mut submission = Submission::Failed {
            order: validate(&pickup_form()).unwrap(),
            reason: "timeout".to_owned(),
        };
        submission.edit();
        assert_eq!(submission, Submission::Editing);
    }

    #[test]
    fn test_eta_display() {
        assert_eq!(EtaRange::DELIVERY.to_string(), "30-45 minutes");
        assert_eq!(
            EtaRange::for_order_type(OrderType::Pickup).to_string(),
            "15-20 minutes"
        );
    }

    #[test]
    fn test_confirmation_serde_roundtrip() {
        let order = validate(&pickup_form()).unwrap();
        let confirmation = OrderConfirmation::new(order, &cart(), Utc::now());
        let json = serde_json::to_string(&confirmation).unwrap();
        let parsed: OrderConfirmation = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, confirmation);
    }
}
