//! Checkout route handlers.
//!
//! `POST /checkout` drives one [`Submission`] from the submitted form:
//! invalid forms are re-rendered with every field error, a kitchen failure
//! re-renders the form with a notice and the submitted values, and a
//! confirmed order is stored in the session before redirecting to
//! `/order-confirmation`.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use delights_core::{
    COUNTRIES, CheckoutForm, Field, OrderType, PaymentMethod, Submission, SubmissionError,
    ValidationErrors,
};
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::SessionCart;
use crate::models::session_keys;
use crate::routes::cart::CartView;
use crate::state::AppState;

/// Select/radio option display data for templates.
#[derive(Clone)]
pub struct OptionView {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Submitted (or default) form values for re-rendering.
#[derive(Clone)]
pub struct CheckoutFormView {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub street_address: String,
    pub city: String,
    pub postal_code: String,
    pub special_instructions: String,
    pub agree_to_terms: bool,
    pub order_types: Vec<OptionView>,
    pub countries: Vec<OptionView>,
    pub payment_methods: Vec<OptionView>,
}

const fn order_type_label(order_type: OrderType) -> &'static str {
    match order_type {
        OrderType::Delivery => "Delivery (via Bamboo Copter Express!)",
        OrderType::Pickup => "Pickup (at Doraemon's Kitchen Door)",
    }
}

fn value_of(field: Option<&String>) -> String {
    field.cloned().unwrap_or_default()
}

impl From<&CheckoutForm> for CheckoutFormView {
    fn from(form: &CheckoutForm) -> Self {
        let chosen = |field: Option<&String>, value: &str| field.is_some_and(|v| v == value);

        Self {
            name: value_of(form.name.as_ref()),
            email: value_of(form.email.as_ref()),
            phone: value_of(form.phone.as_ref()),
            street_address: value_of(form.street_address.as_ref()),
            city: value_of(form.city.as_ref()),
            postal_code: value_of(form.postal_code.as_ref()),
            special_instructions: value_of(form.special_instructions.as_ref()),
            agree_to_terms: form.agree_to_terms,
            order_types: [OrderType::Delivery, OrderType::Pickup]
                .into_iter()
                .map(|order_type| OptionView {
                    value: order_type.as_str(),
                    label: order_type_label(order_type),
                    selected: chosen(form.order_type.as_ref(), order_type.as_str()),
                })
                .collect(),
            countries: COUNTRIES
                .into_iter()
                .map(|(value, label)| OptionView {
                    value,
                    label,
                    selected: chosen(form.country.as_ref(), value),
                })
                .collect(),
            payment_methods: PaymentMethod::ALL
                .into_iter()
                .map(|method| OptionView {
                    value: method.as_str(),
                    label: method.label(),
                    selected: chosen(form.payment_method.as_ref(), method.as_str()),
                })
                .collect(),
        }
    }
}

/// Per-field error messages for templates.
#[derive(Clone, Default)]
pub struct FieldErrorsView {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub order_type: Option<String>,
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub payment_method: Option<String>,
    pub agree_to_terms: Option<String>,
}

impl From<&ValidationErrors> for FieldErrorsView {
    fn from(errors: &ValidationErrors) -> Self {
        let message = |field: Field| errors.get(field).map(|e| e.message.clone());

        Self {
            name: message(Field::Name),
            email: message(Field::Email),
            phone: message(Field::Phone),
            order_type: message(Field::OrderType),
            street_address: message(Field::StreetAddress),
            city: message(Field::City),
            postal_code: message(Field::PostalCode),
            country: message(Field::Country),
            payment_method: message(Field::PaymentMethod),
            agree_to_terms: message(Field::AgreeToTerms),
        }
    }
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub cart_count: u64,
    pub cart: CartView,
    pub form: CheckoutFormView,
    pub errors: FieldErrorsView,
    pub error_count: usize,
    /// Dismissible notice after the kitchen turned the order away.
    pub notice: Option<String>,
}

impl CheckoutTemplate {
    fn new(cart: CartView, form: &CheckoutForm) -> Self {
        Self {
            cart_count: cart.item_count,
            cart,
            form: CheckoutFormView::from(form),
            errors: FieldErrorsView::default(),
            error_count: 0,
            notice: None,
        }
    }
}

/// Display the checkout form. An empty cart goes back to `/cart`.
#[instrument(skip(state, cart))]
pub async fn show(State(state): State<AppState>, cart: SessionCart) -> Response {
    let cart = state.carts().snapshot(cart.id()).await;
    if cart.is_empty() {
        return Redirect::to("/cart").into_response();
    }

    CheckoutTemplate::new(CartView::from(&cart), &CheckoutForm::fresh()).into_response()
}

/// Validate and submit the order.
#[instrument(skip(state, cart, form), fields(order_type = form.order_type.as_deref()))]
pub async fn submit(
    State(state): State<AppState>,
    cart: SessionCart,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let Some(cart_id) = cart.id() else {
        return Ok(Redirect::to("/cart").into_response());
    };
    let ledger = state.carts().snapshot(Some(cart_id)).await;
    if ledger.is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }

    let mut submission = Submission::default();
    let order = match submission.begin(&form) {
        Ok(order) => order.clone(),
        Err(SubmissionError::Invalid(errors)) => {
            tracing::info!(fields = %errors, "Checkout form rejected");
            let page = CheckoutTemplate {
                errors: FieldErrorsView::from(&errors),
                error_count: errors.len(),
                ..CheckoutTemplate::new(CartView::from(&ledger), &form)
            };
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
        }
        Err(e) => return Err(AppError::Internal(e.to_string())),
    };

    let outcome = state
        .kitchen()
        .submit_order(order, &ledger)
        .await
        .map_err(|e| e.to_string());
    submission
        .complete(outcome)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    match submission {
        Submission::Confirmed { confirmation } => {
            // Only what was ordered; the cart may have changed meanwhile
            state
                .carts()
                .remove_ordered(cart_id, &confirmation.lines)
                .await;
            cart.session
                .insert(session_keys::LAST_ORDER, &*confirmation)
                .await?;
            add_breadcrumb(
                "checkout",
                "Order confirmed",
                Some(&[("order_number", confirmation.order_number.as_str())]),
            );
            Ok(Redirect::to("/order-confirmation").into_response())
        }
        Submission::Failed { reason, .. } => {
            tracing::warn!(%reason, "Order submission failed");
            let page = CheckoutTemplate {
                notice: Some(reason),
                ..CheckoutTemplate::new(CartView::from(&ledger), &form)
            };
            Ok((StatusCode::SERVICE_UNAVAILABLE, page).into_response())
        }
        other => Err(AppError::Internal(format!(
            "submission ended while {}",
            other.state_name()
        ))),
    }
}
