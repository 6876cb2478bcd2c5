//! # Error Types
//!
//! Domain-specific error types for dine-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  dine-core errors (this file)                                          │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  dine-session errors (separate crate)                                  │
//! │  └── SessionError     - Config loading, rejected inputs                │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → SessionError → UI                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What Is NOT an Error
//! An empty item list is *absence* (`None`), not a failure. A party size of
//! zero and an unknown location fall back to 1 and the default tax rate.
//! The calculator itself never returns an error.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Tip preset is not one of the offered buttons.
    ///
    /// ## When This Occurs
    /// - The UI sends a preset value that is not in `TIP_PRESETS`
    /// - Custom values go through `TipPolicy::custom` and never fail
    #[error("Unknown tip preset: {0}%")]
    UnknownTipPreset(u32),

    /// A percentage could not be interpreted.
    ///
    /// ## When This Occurs
    /// - Parsing "abc%" from a text field
    /// - Converting NaN or infinity from a numeric input
    #[error("Invalid percentage '{input}': {reason}")]
    InvalidPercentage { input: String, reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when UI input doesn't meet requirements.
/// Used at the session boundary before inputs are accepted.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Duplicate value (e.g., two line items sharing an id).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::UnknownTipPreset(17);
        assert_eq!(err.to_string(), "Unknown tip preset: 17%");

        let err = CoreError::InvalidPercentage {
            input: "abc".to_string(),
            reason: "not a number".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid percentage 'abc': not a number");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "item id".to_string(),
        };
        assert_eq!(err.to_string(), "item id is required");

        let err = ValidationError::Duplicate {
            field: "item id".to_string(),
            value: "burger-1".to_string(),
        };
        assert_eq!(err.to_string(), "item id 'burger-1' already exists");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "party size".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
