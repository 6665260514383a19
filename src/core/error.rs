//! Error types for fieldcheck.
//!
//! Errors fall into two families with different propagation rules:
//! - [`FieldError`]: a single field failed. Collected into the result,
//!   never returned as `Err`, so one pass gives feedback for the whole form.
//! - [`ConfigurationError`]: the rule set itself is broken. Returned
//!   immediately for the whole call since partial results would mislead.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message surfaced for a ruled field that has no value in the snapshot.
pub const MISSING_VALUE_MESSAGE: &str = "value missing";

/// Top-level error type for fieldcheck.
#[derive(Error, Debug)]
pub enum FieldcheckError {
    /// The rule set or snapshot is malformed
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// A rule or snapshot file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON document did not parse
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A TOML document did not parse
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Why a single field is invalid.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldError {
    /// The value failed a rule. The user can fix this.
    #[error("value failed the '{rule}' rule")]
    UserInput {
        /// Kind name of the failing rule
        rule: String,
    },

    /// The caller supplied no value for a ruled field.
    #[error("value missing")]
    MissingValue,
}

/// Defects in a rule set.
///
/// These point at a programming or configuration mistake, not at bad user
/// input, and abort the whole validation call.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConfigurationError {
    /// A rule names a kind the registry does not know
    #[error("Unknown rule kind '{kind}' for field '{field}'")]
    UnknownRuleKind {
        /// Field the rule applies to
        field: String,
        /// Unregistered kind name
        kind: String,
    },

    /// A rule lacks a parameter its kind needs
    #[error("Rule '{kind}' on field '{field}' is missing parameter '{parameter}'")]
    MissingParameter {
        /// Field the rule applies to
        field: String,
        /// Kind name of the rule
        kind: String,
        /// Name of the absent parameter
        parameter: String,
    },

    /// A pattern rule's regex does not compile
    #[error("Invalid pattern '{pattern}': {error}")]
    InvalidPattern {
        /// Pattern source text
        pattern: String,
        /// Compiler message
        error: String,
    },

    /// A numeric rule's lower bound exceeds its upper bound
    #[error("Invalid bounds on field '{field}': min {min} is greater than max {max}")]
    InvalidBounds {
        /// Field the rule applies to
        field: String,
        /// Lower bound
        min: f64,
        /// Upper bound
        max: f64,
    },

    /// A numeric rule has a NaN bound, which no number can satisfy
    #[error("Numeric bound on field '{field}' is NaN")]
    NanBound {
        /// Field the rule applies to
        field: String,
    },

    /// A rule has a blank field id
    #[error("Rule has an empty field id")]
    EmptyFieldId,

    /// A rule file has an extension other than `.toml` or `.json`
    #[error("Unsupported rule file format: {path}")]
    UnsupportedFormat {
        /// Offending file path
        path: String,
    },

    /// A snapshot value is neither a string nor a boolean
    #[error("Field '{field}' has an unsupported {found} value in the snapshot")]
    InvalidSnapshotValue {
        /// Field the value belongs to
        field: String,
        /// JSON type that was found
        found: String,
    },
}

// ============================================================================
// Error Utilities
// ============================================================================

impl FieldError {
    /// Whether the user can fix this by changing their input.
    pub fn is_user_input(&self) -> bool {
        matches!(self, FieldError::UserInput { .. })
    }

    /// Whether this points at a caller that forgot to capture a value.
    pub fn is_missing_value(&self) -> bool {
        matches!(self, FieldError::MissingValue)
    }
}

impl ConfigurationError {
    /// Get suggestion for fixing this error.
    pub fn suggested_fix(&self) -> Option<String> {
        match self {
            ConfigurationError::UnknownRuleKind { kind, .. } => Some(format!(
                "Use one of the registered rule kinds or register '{}' first",
                kind
            )),
            ConfigurationError::MissingParameter { parameter, kind, .. } => {
                Some(format!("Add '{}' to the '{}' rule", parameter, kind))
            }
            ConfigurationError::InvalidBounds { .. } => {
                Some("Swap the min and max values".to_string())
            }
            ConfigurationError::NanBound { .. } => {
                Some("Use a finite number or drop the bound".to_string())
            }
            ConfigurationError::UnsupportedFormat { .. } => {
                Some("Use a .toml or .json rule file".to_string())
            }
            ConfigurationError::InvalidSnapshotValue { field, .. } => Some(format!(
                "Capture '{}' as a string or a boolean",
                field
            )),
            _ => None,
        }
    }

    /// Field the error refers to, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            ConfigurationError::UnknownRuleKind { field, .. }
            | ConfigurationError::MissingParameter { field, .. }
            | ConfigurationError::InvalidBounds { field, .. }
            | ConfigurationError::NanBound { field }
            | ConfigurationError::InvalidSnapshotValue { field, .. } => Some(field),
            _ => None,
        }
    }
}

/// Result type alias for fieldcheck operations.
pub type FieldcheckResult<T> = Result<T, FieldcheckError>;

/// Result type alias for rule set configuration.
pub type ConfigResult<T> = Result<T, ConfigurationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_error_kinds() {
        let err = FieldError::UserInput {
            rule: "email".to_string(),
        };
        assert!(err.is_user_input());
        assert!(!err.is_missing_value());
        assert!(FieldError::MissingValue.is_missing_value());
        assert_eq!(FieldError::MissingValue.to_string(), MISSING_VALUE_MESSAGE);
    }

    #[test]
    fn test_configuration_error_suggestions() {
        let error = ConfigurationError::UnknownRuleKind {
            field: "email".to_string(),
            kind: "emial".to_string(),
        };
        assert!(error.suggested_fix().unwrap().contains("emial"));
        assert_eq!(error.field(), Some("email"));
        assert!(ConfigurationError::EmptyFieldId.suggested_fix().is_none());

        let nan = ConfigurationError::NanBound {
            field: "height".to_string(),
        };
        assert_eq!(nan.field(), Some("height"));
        assert!(nan.suggested_fix().unwrap().contains("finite"));
    }

    #[test]
    fn test_field_error_serialization() {
        let json = serde_json::to_string(&FieldError::MissingValue).unwrap();
        assert_eq!(json, r#"{"type":"missing_value"}"#);
    }

    #[test]
    fn test_top_level_conversion() {
        let err: FieldcheckError = ConfigurationError::EmptyFieldId.into();
        assert!(matches!(err, FieldcheckError::Configuration(_)));
        assert!(err.to_string().starts_with("Configuration error"));
    }
}
