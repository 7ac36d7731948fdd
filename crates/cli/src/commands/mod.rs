//! CLI subcommands.
//!
//! Each command returns its report as a `String`; `main` prints it.

pub mod menu;
pub mod quote;
pub mod validate;

use std::path::PathBuf;

use delights_core::{PriceError, UnknownCategory, ValidationErrors};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Category filter did not match a menu section.
    #[error("{0}. Valid categories: main-courses, side-dishes, desserts, drinks")]
    UnknownCategory(#[from] UnknownCategory),

    /// Item id not on the menu.
    #[error("Unknown menu item: {0}")]
    UnknownItem(String),

    /// A quote argument is not `ITEM_ID=QTY`.
    #[error("Invalid cart line {0:?}: expected ITEM_ID=QTY")]
    InvalidLine(String),

    /// Totals could not be computed.
    #[error("Pricing error: {0}")]
    Price(#[from] PriceError),

    /// Input file could not be read.
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Input is not a JSON checkout form.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The checkout form failed validation.
    #[error("Checkout form is invalid:\n{}", validate::render_errors(.0))]
    Invalid(ValidationErrors),
}
