//! Field rules.
//!
//! A rule is one atomic constraint attached to a field. Rules are plain
//! declarative data; the evaluator in [`crate::rules::evaluate`] gives them
//! meaning by dispatching on [`RuleKind`].

use crate::core::error::{ConfigResult, ConfigurationError};
use crate::core::types::RawValue;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Predicate backing a custom rule kind.
pub type RulePredicate = Arc<dyn Fn(&RawValue) -> bool + Send + Sync>;

/// The constraint a rule applies.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "params")]
pub enum RuleKind {
    /// Trimmed text must not be empty
    Required,
    /// Trimmed text must have at least this many characters
    MinLength(usize),
    /// Trimmed text must have at most this many characters
    MaxLength(usize),
    /// Text must look like `local@domain.tld`
    Email,
    /// Checkbox must be ticked
    Checked,
    /// Trimmed text must match a regular expression
    Pattern(RulePattern),
    /// Trimmed text must parse as a number within the inclusive bounds
    Numeric {
        /// Inclusive lower bound
        min: Option<f64>,
        /// Inclusive upper bound
        max: Option<f64>,
    },

    /// Rule kind registered at runtime.
    /// Note: The predicate is skipped during serialization
    #[serde(skip)]
    Custom {
        /// Registry name of the kind
        name: String,
        /// Returns true when the value passes
        predicate: RulePredicate,
    },
}

impl fmt::Debug for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleKind::Required => write!(f, "Required"),
            RuleKind::MinLength(n) => f.debug_tuple("MinLength").field(n).finish(),
            RuleKind::MaxLength(n) => f.debug_tuple("MaxLength").field(n).finish(),
            RuleKind::Email => write!(f, "Email"),
            RuleKind::Checked => write!(f, "Checked"),
            RuleKind::Pattern(p) => f.debug_tuple("Pattern").field(p).finish(),
            RuleKind::Numeric { min, max } => f
                .debug_struct("Numeric")
                .field("min", min)
                .field("max", max)
                .finish(),
            RuleKind::Custom { name, .. } => f
                .debug_struct("Custom")
                .field("name", name)
                .field("predicate", &"<closure>")
                .finish(),
        }
    }
}

impl RuleKind {
    /// Registry name of this kind.
    pub fn name(&self) -> &str {
        match self {
            RuleKind::Required => "required",
            RuleKind::MinLength(_) => "min_length",
            RuleKind::MaxLength(_) => "max_length",
            RuleKind::Email => "email",
            RuleKind::Checked => "checked",
            RuleKind::Pattern(_) => "pattern",
            RuleKind::Numeric { .. } => "numeric",
            RuleKind::Custom { name, .. } => name.as_str(),
        }
    }

    /// Get a human-readable description of this rule.
    pub fn description(&self) -> String {
        match self {
            RuleKind::Required => "Cannot be empty".to_string(),
            RuleKind::MinLength(n) => format!("Minimum length: {}", n),
            RuleKind::MaxLength(n) => format!("Maximum length: {}", n),
            RuleKind::Email => "Must be an email address".to_string(),
            RuleKind::Checked => "Must be checked".to_string(),
            RuleKind::Pattern(p) => format!("Must match pattern: {}", p.as_str()),
            RuleKind::Numeric { min, max } => match (min, max) {
                (Some(min), Some(max)) => format!("Must be a number between {} and {}", min, max),
                (Some(min), None) => format!("Must be a number of at least {}", min),
                (None, Some(max)) => format!("Must be a number of at most {}", max),
                (None, None) => "Must be a number".to_string(),
            },
            RuleKind::Custom { name, .. } => format!("Custom rule '{}'", name),
        }
    }

    /// Check the rule's own parameters for structural defects.
    pub fn check(&self, field_id: &str) -> ConfigResult<()> {
        if let RuleKind::Numeric { min, max } = self {
            if min.is_some_and(f64::is_nan) || max.is_some_and(f64::is_nan) {
                return Err(ConfigurationError::NanBound {
                    field: field_id.to_string(),
                });
            }
            if let (Some(min), Some(max)) = (min, max) {
                if min > max {
                    return Err(ConfigurationError::InvalidBounds {
                        field: field_id.to_string(),
                        min: *min,
                        max: *max,
                    });
                }
            }
        }
        Ok(())
    }
}

/// A compiled regular expression that serializes as its source text.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RulePattern {
    source: String,
    regex: Regex,
}

impl RulePattern {
    /// Compile a pattern.
    pub fn new(source: impl Into<String>) -> ConfigResult<Self> {
        let source = source.into();
        let regex = Regex::new(&source).map_err(|e| ConfigurationError::InvalidPattern {
            pattern: source.clone(),
            error: e.to_string(),
        })?;
        Ok(Self { source, regex })
    }

    /// Pattern source text.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether the text matches.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl TryFrom<String> for RulePattern {
    type Error = ConfigurationError;

    fn try_from(source: String) -> Result<Self, Self::Error> {
        Self::new(source)
    }
}

impl From<RulePattern> for String {
    fn from(pattern: RulePattern) -> Self {
        pattern.source
    }
}

impl fmt::Debug for RulePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.source)
    }
}

impl PartialEq for RulePattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// One rule attached to one field.
///
/// Several rules may share a `field_id`; they are evaluated in declaration
/// order and the first failure decides the field's message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldRule {
    /// Field the rule applies to
    pub field_id: String,
    /// Constraint to apply
    pub kind: RuleKind,
    /// Message shown when the rule fails
    pub message: String,
}

// ============================================================================
// FieldRule Builder Pattern
// ============================================================================

impl FieldRule {
    /// Create a rule.
    pub fn new(field_id: impl Into<String>, kind: RuleKind, message: impl Into<String>) -> Self {
        Self {
            field_id: field_id.into(),
            kind,
            message: message.into(),
        }
    }

    /// Field must not be blank.
    pub fn required(field_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(field_id, RuleKind::Required, message)
    }

    /// Field must have at least `len` characters.
    pub fn min_length(field_id: impl Into<String>, len: usize, message: impl Into<String>) -> Self {
        Self::new(field_id, RuleKind::MinLength(len), message)
    }

    /// Field must have at most `len` characters.
    pub fn max_length(field_id: impl Into<String>, len: usize, message: impl Into<String>) -> Self {
        Self::new(field_id, RuleKind::MaxLength(len), message)
    }

    /// Field must be an email address.
    pub fn email(field_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(field_id, RuleKind::Email, message)
    }

    /// Checkbox must be ticked.
    pub fn checked(field_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(field_id, RuleKind::Checked, message)
    }

    /// Field must match `pattern`. Fails if the pattern does not compile.
    pub fn pattern(
        field_id: impl Into<String>,
        pattern: &str,
        message: impl Into<String>,
    ) -> ConfigResult<Self> {
        Ok(Self::new(field_id, RuleKind::Pattern(RulePattern::new(pattern)?), message))
    }

    /// Field must be a number within the optional inclusive bounds.
    pub fn numeric(
        field_id: impl Into<String>,
        min: Option<f64>,
        max: Option<f64>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(field_id, RuleKind::Numeric { min, max }, message)
    }

    /// Check this rule for structural defects.
    pub fn check(&self) -> ConfigResult<()> {
        if self.field_id.trim().is_empty() {
            return Err(ConfigurationError::EmptyFieldId);
        }
        self.kind.check(&self.field_id)
    }
}
