//! Validation results.

use crate::core::error::{FieldError, MISSING_VALUE_MESSAGE};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Validity of a single field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOutcome {
    /// Whether the field passed all its rules
    pub valid: bool,
    /// Message to show next to the field, `None` when valid
    pub message: Option<String>,
    /// Kind of failure, `None` when valid
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<FieldError>,
}

impl FieldOutcome {
    /// A passing field.
    pub fn valid() -> Self {
        Self {
            valid: true,
            message: None,
            error: None,
        }
    }

    /// A field that failed a rule.
    pub fn invalid(message: impl Into<String>, rule: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: Some(message.into()),
            error: Some(FieldError::UserInput { rule: rule.into() }),
        }
    }

    /// A field the caller supplied no value for.
    pub fn missing() -> Self {
        Self {
            valid: false,
            message: Some(MISSING_VALUE_MESSAGE.to_string()),
            error: Some(FieldError::MissingValue),
        }
    }
}

/// Per-field validity report for one snapshot.
///
/// Fields are kept in the order they were first declared in the rule set,
/// so the first invalid entry is the one a form should focus. The aggregate
/// is only updated through [`ValidationResult::record`], so it always agrees
/// with the per-field outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// True iff every field is valid
    is_valid: bool,
    /// Outcome per ruled field
    fields: IndexMap<String, FieldOutcome>,
}

impl ValidationResult {
    /// Create a new empty result (valid).
    pub fn new() -> Self {
        Self {
            is_valid: true,
            fields: IndexMap::new(),
        }
    }

    /// Record the outcome of a field, replacing any earlier outcome for it.
    pub fn record(&mut self, field_id: impl Into<String>, outcome: FieldOutcome) {
        let valid = outcome.valid;
        if self.fields.insert(field_id.into(), outcome).is_some() {
            // a replaced outcome may have been the only failure
            self.is_valid = self.fields.values().all(|o| o.valid);
        } else {
            self.is_valid &= valid;
        }
    }

    /// Whether the whole snapshot may be submitted.
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// Outcome for one field.
    pub fn get(&self, field_id: &str) -> Option<&FieldOutcome> {
        self.fields.get(field_id)
    }

    /// All outcomes, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldOutcome)> {
        self.fields.iter().map(|(id, o)| (id.as_str(), o))
    }

    /// Reported field ids, in declaration order.
    pub fn field_ids(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(|s| s.as_str())
    }

    /// Number of fields in the report.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the report has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// All invalid fields, in declaration order.
    pub fn invalid_fields(&self) -> impl Iterator<Item = (&str, &FieldOutcome)> {
        self.iter().filter(|(_, o)| !o.valid)
    }

    /// First invalid field, if any.
    pub fn first_invalid(&self) -> Option<(&str, &FieldOutcome)> {
        self.invalid_fields().next()
    }

    /// Get a human-readable summary.
    pub fn summary(&self) -> String {
        if self.is_valid {
            format!("✓ All {} field(s) are valid", self.fields.len())
        } else {
            format!(
                "✗ {} of {} field(s) are invalid",
                self.invalid_fields().count(),
                self.fields.len()
            )
        }
    }

    /// Get one line per invalid field.
    pub fn detailed_errors(&self) -> Vec<String> {
        self.invalid_fields()
            .map(|(id, outcome)| {
                format!(
                    "{}: {}",
                    id,
                    outcome.message.as_deref().unwrap_or(MISSING_VALUE_MESSAGE)
                )
            })
            .collect()
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}
