//! # Session Error Types
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Session Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Rejected      │  │     File                │ │
//! │  │                 │  │   Input         │  │                         │ │
//! │  │  InvalidConfig  │  │  Validation     │  │  Io                     │ │
//! │  │  ConfigSave...  │  │  Core           │  │  TomlDe / TomlSer       │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use dine_core::{CoreError, ValidationError};
use thiserror::Error;

/// Result type alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Configuration values are out of range or inconsistent.
    #[error("Invalid estimator configuration: {0}")]
    InvalidConfig(String),

    /// No path to save the configuration to.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Rejected Input
    // =========================================================================
    /// UI input failed a boundary check.
    #[error("Rejected input: {0}")]
    Validation(#[from] ValidationError),

    /// Domain error from dine-core (unknown preset, bad percentage).
    #[error(transparent)]
    Core(#[from] CoreError),

    // =========================================================================
    // File Errors
    // =========================================================================
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Config serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SessionError::InvalidConfig("tax.default_rate must be between 0 and 100".into());
        assert_eq!(
            err.to_string(),
            "Invalid estimator configuration: tax.default_rate must be between 0 and 100"
        );

        let err: SessionError = CoreError::UnknownTipPreset(30).into();
        assert_eq!(err.to_string(), "Unknown tip preset: 30%");
    }

    #[test]
    fn test_validation_converts() {
        let err: SessionError = ValidationError::Required {
            field: "item id".into(),
        }
        .into();
        assert!(matches!(err, SessionError::Validation(_)));
    }
}
