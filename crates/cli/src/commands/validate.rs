//! `validate` command: check a checkout form saved as JSON.

use std::path::Path;

use delights_core::{CheckoutForm, OrderForm, ValidationErrors, validate};

use super::CliError;

/// One `field: message` line per error.
pub fn render_errors(errors: &ValidationErrors) -> String {
    errors
        .iter()
        .map(|e| format!("  {}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Validate a JSON checkout form.
///
/// # Errors
///
/// Returns [`CliError::Json`] for malformed input and [`CliError::Invalid`]
/// with every field error otherwise.
pub fn check(json: &str) -> Result<OrderForm, CliError> {
    let form: CheckoutForm = serde_json::from_str(json)?;
    validate(&form).map_err(CliError::Invalid)
}

/// Read and validate `path`, rendering the typed order as JSON.
///
/// # Errors
///
/// See [`check`]; also [`CliError::Io`] if the file cannot be read.
pub fn run(path: &Path) -> Result<String, CliError> {
    let json = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let order = check(&json)?;
    tracing::info!(order_type = order.order_type().as_str(), "Checkout form is valid");
    Ok(serde_json::to_string_pretty(&order)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use delights_core::Field;

    use super::*;

    #[test]
    fn test_valid_pickup_form() {
        let order = check(
            r#"{
                "name": "Al",
                "email": "a@b.com",
                "phone": "1234567890",
                "orderType": "pickup",
                "paymentMethod": "cashOnPickup",
                "agreeToTerms": true
            }"#,
        )
        .unwrap();
        assert_eq!(order.name, "Al");
        assert!(order.fulfillment.address().is_none());
    }

    #[test]
    fn test_invalid_form_reports_every_field() {
        let err = check(r#"{"orderType": "delivery", "country": ""}"#).unwrap_err();
        let CliError::Invalid(errors) = &err else {
            panic!("expected validation errors, got {err:?}");
        };
        assert_eq!(
            errors.fields(),
            vec![
                Field::Name,
                Field::Email,
                Field::Phone,
                Field::StreetAddress,
                Field::City,
                Field::PostalCode,
                Field::Country,
                Field::PaymentMethod,
                Field::AgreeToTerms,
            ]
        );
        let report = err.to_string();
        assert!(report.starts_with("Checkout form is invalid:"));
        assert!(report.contains("  streetAddress: "));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(check("{"), Err(CliError::Json(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = run(Path::new("/nonexistent/order.json")).unwrap_err();
        assert!(matches!(err, CliError::Io { .. }));
    }
}
