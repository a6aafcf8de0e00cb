//! # Error Types
//!
//! Structured error types for matprop_core. Every formula and numeric utility
//! returns a [`CalcResult`], so a caller can render "Error" or "N/A" for one
//! value without aborting the rest of a computation pipeline. Nothing in this
//! crate panics on bad numeric input.
//!
//! ## Example
//!
//! ```rust
//! use matprop_core::errors::{CalcError, CalcResult};
//!
//! fn validate_area(area_mm2: f64) -> CalcResult<()> {
//!     if area_mm2 <= 0.0 {
//!         return Err(CalcError::invalid_input(
//!             "area_mm2",
//!             area_mm2.to_string(),
//!             "Area must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_area(-1.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for matprop_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for calculation operations.
///
/// Singular linear systems are deliberately absent: the solver degrades to a
/// zero vector and flags it on [`crate::numeric::LinearSolution`] instead.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (non-finite, wrong shape, out of range)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required formula input is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Input lies outside the mathematical domain of a formula
    #[error("Not computable: {formula} - {reason}")]
    Domain { formula: String, reason: String },

    /// Mean stress drives the fatigue correction denominator to zero or below
    #[error("Invalid mean stress ratio: {ratio}")]
    InvalidMeanStressRatio { ratio: f64 },

    /// Crack length ratio a/W outside the 0.1..=0.9 validity window
    #[error("Invalid a/W: {ratio} (valid range 0.1 to 0.9)")]
    InvalidCrackRatio { ratio: f64 },

    /// Not enough observations for the requested operation
    #[error("Insufficient data for {operation}: need at least {required}, got {actual}")]
    InsufficientData {
        operation: String,
        required: usize,
        actual: usize,
    },

    /// No formula registered under this id
    #[error("Unknown formula: {id}")]
    UnknownFormula { id: String },

    /// Material not found in the reference catalog
    #[error("Material not found: {material_name}")]
    MaterialNotFound { material_name: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create a Domain error
    pub fn domain(formula: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::Domain {
            formula: formula.into(),
            reason: reason.into(),
        }
    }

    /// Create an InsufficientData error
    pub fn insufficient_data(operation: impl Into<String>, required: usize, actual: usize) -> Self {
        CalcError::InsufficientData {
            operation: operation.into(),
            required,
            actual,
        }
    }

    /// Create an UnknownFormula error
    pub fn unknown_formula(id: impl Into<String>) -> Self {
        CalcError::UnknownFormula { id: id.into() }
    }

    /// Create a MaterialNotFound error
    pub fn material_not_found(material_name: impl Into<String>) -> Self {
        CalcError::MaterialNotFound {
            material_name: material_name.into(),
        }
    }

    /// Check whether the error comes from the numeric domain of a formula
    /// rather than from malformed input
    pub fn is_domain_error(&self) -> bool {
        matches!(
            self,
            CalcError::Domain { .. }
                | CalcError::InvalidMeanStressRatio { .. }
                | CalcError::InvalidCrackRatio { .. }
        )
    }

    /// Short label for a result cell that could not be computed
    pub fn display_label(&self) -> &'static str {
        match self {
            CalcError::InsufficientData { .. } | CalcError::MissingField { .. } => "N/A",
            _ => "Error",
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::Domain { .. } => "DOMAIN_ERROR",
            CalcError::InvalidMeanStressRatio { .. } => "INVALID_MEAN_STRESS_RATIO",
            CalcError::InvalidCrackRatio { .. } => "INVALID_CRACK_RATIO",
            CalcError::InsufficientData { .. } => "INSUFFICIENT_DATA",
            CalcError::UnknownFormula { .. } => "UNKNOWN_FORMULA",
            CalcError::MaterialNotFound { .. } => "MATERIAL_NOT_FOUND",
        }
    }
}

/// Reject a non-finite result so NaN and Infinity never leave a formula.
pub(crate) fn finite(formula: &str, value: f64) -> CalcResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::domain(formula, format!("result is not finite ({})", value)))
    }
}

/// Reject a non-finite input before it reaches a formula.
pub(crate) fn require_finite(field: &str, value: f64) -> CalcResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::invalid_input(field, value.to_string(), "Value must be a finite number"))
    }
}

/// Reject a zero or near-zero divisor.
pub(crate) fn nonzero(formula: &str, field: &str, value: f64) -> CalcResult<f64> {
    if value.abs() < f64::EPSILON {
        Err(CalcError::domain(formula, format!("division by zero ({} = {})", field, value)))
    } else {
        Ok(value)
    }
}

/// Reject a zero or negative value.
pub(crate) fn positive(formula: &str, field: &str, value: f64) -> CalcResult<f64> {
    if value > 0.0 {
        Ok(value)
    } else {
        Err(CalcError::domain(formula, format!("{} must be positive, got {}", field, value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_input("area_mm2", "-5.0", "Area must be positive");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::missing_field("test").error_code(), "MISSING_FIELD");
        assert_eq!(CalcError::unknown_formula("x").error_code(), "UNKNOWN_FORMULA");
        assert_eq!(CalcError::InvalidCrackRatio { ratio: 0.95 }.error_code(), "INVALID_CRACK_RATIO");
    }

    #[test]
    fn test_crack_ratio_message() {
        let msg = CalcError::InvalidCrackRatio { ratio: 0.05 }.to_string();
        assert!(msg.starts_with("Invalid a/W"), "got: {}", msg);
    }

    #[test]
    fn test_display_labels() {
        assert_eq!(CalcError::insufficient_data("fit", 2, 1).display_label(), "N/A");
        assert_eq!(CalcError::domain("stress", "division by zero").display_label(), "Error");
    }

    #[test]
    fn test_guards() {
        assert!(finite("x", f64::INFINITY).is_err());
        assert!(finite("x", f64::NAN).is_err());
        assert_eq!(finite("x", 2.0), Ok(2.0));
        assert!(nonzero("x", "a", 0.0).is_err());
        assert!(positive("x", "a", 0.0).is_err());
        assert!(require_finite("a", f64::NAN).is_err());
        assert!(CalcError::InvalidMeanStressRatio { ratio: 1.2 }.is_domain_error());
    }
}
