//! Checkout form validation.
//!
//! [`CheckoutForm`] is the untrusted form exactly as the browser (or a JSON
//! client) sends it. [`validate`] checks every field independently, reports
//! every failure, and on success produces an [`OrderForm`] in which the
//! delivery address exists only for delivery orders.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::Email;

/// Country pre-selected on a fresh checkout form.
pub const DEFAULT_COUNTRY: &str = "Dora-World";

/// Countries offered in the checkout country picker.
pub const COUNTRIES: [(&str, &str); 4] = [
    ("Dora-World", "Dora-World"),
    ("Japan", "Japan"),
    ("FutureLand", "FutureLand"),
    ("OtherDimension", "Other Dimension"),
];

const MIN_NAME_LEN: usize = 2;
const MIN_PHONE_LEN: usize = 10;
const MIN_STREET_LEN: usize = 5;
const MIN_CITY_LEN: usize = 2;
const MIN_POSTAL_CODE_LEN: usize = 4;
const MIN_COUNTRY_LEN: usize = 2;

// =============================================================================
// Options
// =============================================================================

/// How the order reaches the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrderType {
    Delivery,
    Pickup,
}

impl OrderType {
    /// Form value (`delivery` / `pickup`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Delivery => "delivery",
            Self::Pickup => "pickup",
        }
    }
}

impl FromStr for OrderType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "delivery" => Ok(Self::Delivery),
            "pickup" => Ok(Self::Pickup),
            _ => Err(()),
        }
    }
}

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaymentMethod {
    CreditCard,
    GadgetPay,
    TimeMachineTransfer,
    /// Only offered for pickup orders.
    CashOnPickup,
}

impl PaymentMethod {
    /// Every payment method in picker order.
    pub const ALL: [Self; 4] = [
        Self::CreditCard,
        Self::GadgetPay,
        Self::TimeMachineTransfer,
        Self::CashOnPickup,
    ];

    /// Form value (e.g., `creditCard`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreditCard => "creditCard",
            Self::GadgetPay => "gadgetPay",
            Self::TimeMachineTransfer => "timeMachineTransfer",
            Self::CashOnPickup => "cashOnPickup",
        }
    }

    /// Label shown in the payment picker.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CreditCard => "Credit/Debit Card (Standard Dimension)",
            Self::GadgetPay => "GadgetPay (Instant & Magical)",
            Self::TimeMachineTransfer => "Time Machine Transfer (For approved time travelers)",
            Self::CashOnPickup => "Cash on Pickup (Dorayaki coins accepted!)",
        }
    }

    /// Whether the method can be used with `order_type`.
    #[must_use]
    pub const fn allowed_for(self, order_type: OrderType) -> bool {
        !matches!(
            (self, order_type),
            (Self::CashOnPickup, OrderType::Delivery)
        )
    }
}

impl FromStr for PaymentMethod {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or(())
    }
}

// =============================================================================
// Validated order
// =============================================================================

/// Where a delivery order goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryAddress {
    pub street_address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

/// Delivery with an address, or pickup with none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "orderType", rename_all = "camelCase")]
pub enum Fulfillment {
    Delivery(DeliveryAddress),
    Pickup,
}

impl Fulfillment {
    /// The order type this fulfillment corresponds to.
    #[must_use]
    pub const fn order_type(&self) -> OrderType {
        match self {
            Self::Delivery(_) => OrderType::Delivery,
            Self::Pickup => OrderType::Pickup,
        }
    }

    /// The delivery address, if this is a delivery.
    #[must_use]
    pub const fn address(&self) -> Option<&DeliveryAddress> {
        match self {
            Self::Delivery(address) => Some(address),
            Self::Pickup => None,
        }
    }
}

/// A checkout form that passed validation, ready to submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderForm {
    pub name: String,
    pub email: Email,
    pub phone: String,
    pub fulfillment: Fulfillment,
    pub payment_method: PaymentMethod,
    pub special_instructions: Option<String>,
}

impl OrderForm {
    /// Delivery or pickup.
    #[must_use]
    pub const fn order_type(&self) -> OrderType {
        self.fulfillment.order_type()
    }
}

// =============================================================================
// Raw form
// =============================================================================

/// Checkout form as submitted, before validation.
///
/// Field names follow the browser form (`orderType`, `agreeToTerms`, ...).
/// Empty strings and absent keys count as missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckoutForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub order_type: Option<String>,
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub payment_method: Option<String>,
    #[serde(deserialize_with = "deserialize_checkbox")]
    pub agree_to_terms: bool,
    pub special_instructions: Option<String>,
}

impl CheckoutForm {
    /// The form a customer starts from, with [`DEFAULT_COUNTRY`] pre-selected.
    #[must_use]
    pub fn fresh() -> Self {
        Self {
            country: Some(DEFAULT_COUNTRY.to_owned()),
            ..Self::default()
        }
    }
}

/// Accept a JSON boolean or an HTML checkbox value (`on`, `true`, `1`, `yes`).
fn deserialize_checkbox<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Checkbox {
        Bool(bool),
        Text(String),
    }

    Ok(match Checkbox::deserialize(deserializer)? {
        Checkbox::Bool(checked) => checked,
        Checkbox::Text(value) => matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "on" | "true" | "1" | "yes"
        ),
    })
}

// =============================================================================
// Errors
// =============================================================================

/// A form input that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Name,
    Email,
    Phone,
    OrderType,
    StreetAddress,
    City,
    PostalCode,
    Country,
    PaymentMethod,
    AgreeToTerms,
}

impl Field {
    /// Form field name (e.g., `streetAddress`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::OrderType => "orderType",
            Self::StreetAddress => "streetAddress",
            Self::City => "city",
            Self::PostalCode => "postalCode",
            Self::Country => "country",
            Self::PaymentMethod => "paymentMethod",
            Self::AgreeToTerms => "agreeToTerms",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validation failure attributable to one named input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

impl FieldError {
    fn new(field: Field, message: &str) -> Self {
        Self {
            field,
            message: message.to_owned(),
        }
    }
}

/// Every field error found in one form, in form order.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{} checkout field(s) invalid: {}", .0.len(), field_list(.0))]
#[serde(transparent)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    /// The error for `field`, if it failed.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&FieldError> {
        self.0.iter().find(|error| error.field == field)
    }

    /// Fields that failed, in form order.
    #[must_use]
    pub fn fields(&self) -> Vec<Field> {
        self.0.iter().map(|error| error.field).collect()
    }

    /// Number of failing fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the errors.
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }
}

fn field_list(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|error| error.field.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

// =============================================================================
// Validation
// =============================================================================

/// Validate a submitted checkout form.
///
/// Rules are evaluated independently and every failing field is reported.
/// Text lengths are counted in characters after trimming. When the order
/// type itself is missing or unknown, the address fields and the
/// cash-on-pickup restriction are not checked.
///
/// # Errors
///
/// Returns [`ValidationErrors`] listing each invalid field once.
pub fn validate(form: &CheckoutForm) -> Result<OrderForm, ValidationErrors> {
    let mut errors = Vec::new();

    let name = min_len(
        form.name.as_deref(),
        MIN_NAME_LEN,
        Field::Name,
        "Name must be at least 2 characters. Nobita needs to know who you are!",
        &mut errors,
    );

    let email = Email::parse(form.email.as_deref().unwrap_or_default())
        .map_err(|_| {
            errors.push(FieldError::new(
                Field::Email,
                "Please enter a valid email. Doraemon might send a surprise!",
            ));
        })
        .ok();

    let phone = min_len(
        form.phone.as_deref(),
        MIN_PHONE_LEN,
        Field::Phone,
        "Phone number must be at least 10 digits. For quick updates!",
        &mut errors,
    );

    let order_type = parse_choice::<OrderType>(form.order_type.as_deref());
    if order_type.is_none() {
        errors.push(FieldError::new(
            Field::OrderType,
            "Delivery or Pickup? Choose your adventure!",
        ));
    }

    let fulfillment = match order_type {
        Some(OrderType::Delivery) => delivery_address(form, &mut errors).map(Fulfillment::Delivery),
        Some(OrderType::Pickup) => Some(Fulfillment::Pickup),
        None => None,
    };

    let payment_method = match parse_choice::<PaymentMethod>(form.payment_method.as_deref()) {
        None => {
            errors.push(FieldError::new(
                Field::PaymentMethod,
                "How will you pay for these amazing treats?",
            ));
            None
        }
        Some(method) if order_type.is_some_and(|t| !method.allowed_for(t)) => {
            errors.push(FieldError::new(
                Field::PaymentMethod,
                "Cash on Pickup is only available for pickup orders.",
            ));
            None
        }
        Some(method) => Some(method),
    };

    if !form.agree_to_terms {
        errors.push(FieldError::new(
            Field::AgreeToTerms,
            "You must agree to the terms. It's a promise!",
        ));
    }

    match (name, email, phone, fulfillment, payment_method) {
        (Some(name), Some(email), Some(phone), Some(fulfillment), Some(payment_method))
            if errors.is_empty() =>
        {
            Ok(OrderForm {
                name,
                email,
                phone,
                fulfillment,
                payment_method,
                special_instructions: trimmed(form.special_instructions.as_deref())
                    .map(str::to_owned),
            })
        }
        _ => Err(ValidationErrors(errors)),
    }
}

/// Check the four address fields, collecting an error for each failure.
fn delivery_address(form: &CheckoutForm, errors: &mut Vec<FieldError>) -> Option<DeliveryAddress> {
    let street_address = min_len(
        form.street_address.as_deref(),
        MIN_STREET_LEN,
        Field::StreetAddress,
        "Street address must be at least 5 characters for delivery.",
        errors,
    );
    let city = min_len(
        form.city.as_deref(),
        MIN_CITY_LEN,
        Field::City,
        "City must be at least 2 characters for delivery.",
        errors,
    );
    let postal_code = min_len(
        form.postal_code.as_deref(),
        MIN_POSTAL_CODE_LEN,
        Field::PostalCode,
        "Postal code must be at least 4 characters for delivery.",
        errors,
    );
    let country = min_len(
        form.country.as_deref(),
        MIN_COUNTRY_LEN,
        Field::Country,
        "Please pick a country for delivery.",
        errors,
    );

    Some(DeliveryAddress {
        street_address: street_address?,
        city: city?,
        postal_code: postal_code?,
        country: country?,
    })
}

fn trimmed(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn min_len(
    value: Option<&str>,
    min: usize,
    field: Field,
    message: &str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match trimmed(value) {
        Some(v) if v.chars().count() >= min => Some(v.to_owned()),
        _ => {
            errors.push(FieldError::new(field, message));
            None
        }
    }
}

fn parse_choice<T: FromStr>(value: Option<&str>) -> Option<T> {
    trimmed(value).and_then(|v| v.parse().ok())
}
