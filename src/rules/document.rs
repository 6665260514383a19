//! Rule-set and snapshot documents.
//!
//! Rule sets are usually static per form and live in a TOML or JSON file:
//!
//! ```toml
//! name = "contact"
//!
//! [[rules]]
//! field = "email"
//! kind = "required"
//! message = "Email is required"
//!
//! [[rules]]
//! field = "email"
//! kind = "email"
//! message = "Please enter a valid email"
//! ```
//!
//! Entries name their kind as a string so that files can reference kinds
//! registered at runtime; [`RuleSetDocument::resolve`] turns them into typed
//! [`FieldRule`]s through a [`RuleRegistry`].

use crate::core::error::{ConfigResult, ConfigurationError, FieldcheckResult};
use crate::core::rule::FieldRule;
use crate::core::types::{FieldValue, RawValue};
use crate::rules::registry::RuleRegistry;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One declarative rule as written in a rule file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleEntry {
    /// Field the rule applies to
    pub field: String,
    /// Registered kind name
    pub kind: String,
    /// Message shown when the rule fails
    pub message: String,
    /// Length for `min_length` / `max_length`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    /// Regex for `pattern`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Lower bound for `numeric`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Upper bound for `numeric`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl RuleEntry {
    /// Create an entry with no parameters.
    pub fn new(
        field: impl Into<String>,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            kind: kind.into(),
            message: message.into(),
            length: None,
            pattern: None,
            min: None,
            max: None,
        }
    }

    /// Set the length parameter.
    pub fn with_length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }

    /// Set the pattern parameter.
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Set the numeric bounds.
    pub fn with_bounds(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// Get the length parameter or fail naming it.
    pub fn require_length(&self) -> ConfigResult<usize> {
        self.length.ok_or_else(|| self.missing("length"))
    }

    /// Get the pattern parameter or fail naming it.
    pub fn require_pattern(&self) -> ConfigResult<&str> {
        self.pattern.as_deref().ok_or_else(|| self.missing("pattern"))
    }

    fn missing(&self, parameter: &str) -> ConfigurationError {
        ConfigurationError::MissingParameter {
            field: self.field.clone(),
            kind: self.kind.clone(),
            parameter: parameter.to_string(),
        }
    }
}

/// A named, ordered list of rule entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleSetDocument {
    /// Optional form name, for reporting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Rules in declaration order
    #[serde(default)]
    pub rules: Vec<RuleEntry>,
}

impl RuleSetDocument {
    /// Parse a TOML rule set.
    pub fn from_toml_str(source: &str) -> FieldcheckResult<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Parse a JSON rule set.
    pub fn from_json_str(source: &str) -> FieldcheckResult<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// Load a rule set, picking the format from the file extension.
    pub fn load(path: impl AsRef<Path>) -> FieldcheckResult<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        let parse: fn(&str) -> FieldcheckResult<Self> = match extension.as_deref() {
            Some("toml") => Self::from_toml_str,
            Some("json") => Self::from_json_str,
            _ => {
                return Err(ConfigurationError::UnsupportedFormat {
                    path: path.display().to_string(),
                }
                .into())
            }
        };

        let source = std::fs::read_to_string(path)?;
        let document = parse(&source)?;
        debug!(
            "loaded {} rule(s) from {}",
            document.rules.len(),
            path.display()
        );
        Ok(document)
    }

    /// Turn every entry into a typed rule, stopping at the first defect.
    pub fn resolve(&self, registry: &RuleRegistry) -> ConfigResult<Vec<FieldRule>> {
        self.rules.iter().map(|entry| registry.resolve(entry)).collect()
    }
}

/// Parse a JSON snapshot object mapping field ids to strings or booleans.
pub fn parse_snapshot(source: &str) -> FieldcheckResult<Vec<FieldValue>> {
    let object: serde_json::Map<String, serde_json::Value> = serde_json::from_str(source)?;

    let mut values = Vec::with_capacity(object.len());
    for (field_id, value) in object {
        let raw = match value {
            serde_json::Value::String(s) => RawValue::Text(s),
            serde_json::Value::Bool(b) => RawValue::Flag(b),
            other => {
                return Err(ConfigurationError::InvalidSnapshotValue {
                    field: field_id,
                    found: json_type_name(&other).to_string(),
                }
                .into())
            }
        };
        values.push(FieldValue { field_id, raw });
    }
    Ok(values)
}

/// Load a JSON snapshot file.
pub fn load_snapshot(path: impl AsRef<Path>) -> FieldcheckResult<Vec<FieldValue>> {
    let source = std::fs::read_to_string(path)?;
    parse_snapshot(&source)
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::FieldcheckError;
    use crate::core::rule::RuleKind;
    use std::io::Write;

    const CONTACT_TOML: &str = r#"
name = "contact"

[[rules]]
field = "name"
kind = "required"
message = "required"

[[rules]]
field = "msg"
kind = "min_length"
length = 10
message = "at least 10 characters"

[[rules]]
field = "age"
kind = "numeric"
min = 0
max = 150
message = "enter a valid age"
"#;

    #[test]
    fn test_parse_toml_document() {
        let doc = RuleSetDocument::from_toml_str(CONTACT_TOML).unwrap();
        assert_eq!(doc.name.as_deref(), Some("contact"));
        assert_eq!(doc.rules.len(), 3);
        assert_eq!(doc.rules[1].length, Some(10));
        assert_eq!(doc.rules[2].max, Some(150.0));

        let rules = doc.resolve(&RuleRegistry::with_builtins()).unwrap();
        assert!(matches!(rules[1].kind, RuleKind::MinLength(10)));
    }

    #[test]
    fn test_parse_json_document() {
        let doc = RuleSetDocument::from_json_str(
            r#"{"rules":[{"field":"terms","kind":"checked","message":"accept the terms"}]}"#,
        )
        .unwrap();
        assert!(doc.name.is_none());
        assert_eq!(doc.rules[0].kind, "checked");
    }

    #[test]
    fn test_load_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(CONTACT_TOML.as_bytes()).unwrap();

        let doc = RuleSetDocument::load(file.path()).unwrap();
        assert_eq!(doc.rules.len(), 3);
    }

    #[test]
    fn test_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        let err = RuleSetDocument::load(file.path()).unwrap_err();
        assert!(matches!(
            err,
            FieldcheckError::Configuration(ConfigurationError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_unknown_kind_aborts_resolution() {
        let doc = RuleSetDocument {
            name: None,
            rules: vec![
                RuleEntry::new("name", "required", "required"),
                RuleEntry::new("phone", "phone_number", "bad phone"),
            ],
        };
        let err = doc.resolve(&RuleRegistry::with_builtins()).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::UnknownRuleKind {
                field: "phone".to_string(),
                kind: "phone_number".to_string(),
            }
        );
    }

    #[test]
    fn test_nan_bound_in_rule_file_rejected() {
        let doc = RuleSetDocument::from_toml_str(
            r#"
[[rules]]
field = "height"
kind = "numeric"
min = nan
message = "Please enter a valid height"
"#,
        )
        .unwrap();
        assert!(doc.rules[0].min.is_some_and(f64::is_nan));

        let err = doc.resolve(&RuleRegistry::with_builtins()).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::NanBound {
                field: "height".to_string()
            }
        );
    }

    #[test]
    fn test_parse_snapshot() {
        let values = parse_snapshot(r#"{"name": "Ada", "terms": true}"#).unwrap();
        assert_eq!(values.len(), 2);
        assert!(values.contains(&FieldValue::text("name", "Ada")));
        assert!(values.contains(&FieldValue::flag("terms", true)));
    }

    #[test]
    fn test_snapshot_rejects_numbers() {
        let err = parse_snapshot(r#"{"age": 42}"#).unwrap_err();
        match err {
            FieldcheckError::Configuration(ConfigurationError::InvalidSnapshotValue {
                field,
                found,
            }) => {
                assert_eq!(field, "age");
                assert_eq!(found, "number");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_snapshot_must_be_object() {
        assert!(matches!(
            parse_snapshot("[1, 2]"),
            Err(FieldcheckError::Json(_))
        ));
    }
}
