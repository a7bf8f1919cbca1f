//! Error types for the Seller Fee Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while loading rate sheets and
//! resolving fees.

use thiserror::Error;

/// The main error type for the Seller Fee Engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use seller_fee_engine::error::EngineError;
///
/// let error = EngineError::MissingRateCell {
///     table: "weight_handling.easy_ship.standard".to_string(),
///     cell: "first_500g/standard/ixd".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Missing rate cell 'first_500g/standard/ixd' in table 'weight_handling.easy_ship.standard'"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A rate sheet does not have the rows or columns the parser expects.
    #[error("Rate sheet '{sheet}' has an unexpected layout: {message}")]
    RateSheetShape {
        /// The name of the sheet.
        sheet: String,
        /// A description of what was wrong with the layout.
        message: String,
    },

    /// A rate sheet cell held text that is neither a number nor a placeholder.
    #[error("Malformed cell in rate sheet '{sheet}' at row {row}, column {column}: '{value}'")]
    MalformedRateCell {
        /// The name of the sheet.
        sheet: String,
        /// Zero-based data row index (header excluded).
        row: usize,
        /// Zero-based column index.
        column: usize,
        /// The raw cell text.
        value: String,
    },

    /// A fee needed a rate cell that is absent from the table.
    #[error("Missing rate cell '{cell}' in table '{table}'")]
    MissingRateCell {
        /// The table the lookup was made against.
        table: String,
        /// The path of the absent cell within the table.
        cell: String,
    },

    /// A request value was out of range or otherwise unusable.
    #[error("Invalid input '{field}': {message}")]
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A label could not be mapped onto one of the known enum values.
    #[error("Unknown {kind}: '{value}'")]
    UnknownVariant {
        /// The kind of value being parsed (e.g. "shipping mode").
        kind: String,
        /// The label that was not recognised.
        value: String,
    },
}

impl EngineError {
    /// An amount derived from `field` does not fit in a `Decimal`.
    pub(crate) fn out_of_range(field: &str) -> Self {
        EngineError::InvalidInput {
            field: field.to_string(),
            message: "amount out of range".to_string(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
