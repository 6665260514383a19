//! Core types for the fieldcheck validation engine.
//!
//! This module contains the plain data the engine works on:
//! - Snapshot values (text or checkbox state)
//! - Field rules and rule kinds
//! - Error types
//! - Validation results

pub mod types;
pub mod rule;
pub mod error;
pub mod report;

// Re-export commonly used types
pub use types::{FieldValue, RawValue};
pub use rule::{FieldRule, RuleKind, RulePattern, RulePredicate};
pub use error::{ConfigurationError, FieldError, FieldcheckError};
pub use report::{FieldOutcome, ValidationResult};
