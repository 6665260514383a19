//! # fieldcheck - Declarative Form Field Validation
//!
//! fieldcheck validates a snapshot of form values against a declarative set
//! of field rules and reports validity per field, so a form can show all of
//! its feedback after a single pass.
//!
//! ## Features
//!
//! - **Declarative rules**: Required, length, email, checkbox, pattern and numeric rules
//! - **First failure wins**: Rules on a field run in declaration order
//! - **Full-form feedback**: Field failures are collected, never thrown
//! - **Extensible**: Register custom rule kinds in the [`RuleRegistry`](rules::RuleRegistry)
//! - **Rule files**: Load rule sets from TOML or JSON
//!
//! ## Quick Start
//!
//! ```rust
//! use fieldcheck::prelude::*;
//!
//! let rules = vec![
//!     FieldRule::required("name", "required"),
//!     FieldRule::required("email", "required"),
//!     FieldRule::email("email", "enter a valid email"),
//!     FieldRule::min_length("msg", 10, "at least 10 characters"),
//! ];
//!
//! let values = vec![
//!     FieldValue::text("name", ""),
//!     FieldValue::text("email", "x@x.com"),
//!     FieldValue::text("msg", "short"),
//! ];
//!
//! let result = validate(&rules, &values).unwrap();
//! assert!(!result.is_valid());
//! assert_eq!(result.get("name").unwrap().message.as_deref(), Some("required"));
//! assert!(result.get("email").unwrap().valid);
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: Snapshot values, rules, errors and results
//! - [`rules`]: Rule semantics, the kind registry and rule-set documents
//! - [`validation`]: The validation engine
//!
//! The engine is pure: extracting values from an input source and acting on
//! the result (showing messages, submitting) belong to the caller.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod core;
pub mod rules;
pub mod validation;

/// Prelude module for convenient imports.
///
/// Import everything commonly needed with:
/// ```rust
/// use fieldcheck::prelude::*;
/// ```
pub mod prelude {
    // Snapshot values
    pub use crate::core::types::{FieldValue, RawValue};

    // Rules
    pub use crate::core::rule::{FieldRule, RuleKind, RulePattern};

    // Errors
    pub use crate::core::error::{
        ConfigResult, ConfigurationError, FieldError, FieldcheckError, FieldcheckResult,
        MISSING_VALUE_MESSAGE,
    };

    // Results
    pub use crate::core::report::{FieldOutcome, ValidationResult};

    // Rule kinds and documents
    pub use crate::rules::document::{load_snapshot, parse_snapshot, RuleEntry, RuleSetDocument};
    pub use crate::rules::registry::RuleRegistry;

    // Engine
    pub use crate::validation::engine::{validate, ValidationEngine};
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
