//! Validation engine implementation.

use crate::core::error::ConfigResult;
use crate::core::report::{FieldOutcome, ValidationResult};
use crate::core::rule::FieldRule;
use crate::core::types::{FieldValue, RawValue};
use crate::rules::document::RuleSetDocument;
use crate::rules::evaluate::{evaluate, RuleOutcome};
use crate::rules::registry::RuleRegistry;
use indexmap::IndexMap;
use log::{debug, warn};
use rayon::prelude::*;
use std::collections::HashMap;

/// Validate a snapshot against a rule set.
///
/// Returns exactly one entry per field id referenced by `rules`. Field-level
/// failures are collected into the result; a structurally broken rule set
/// fails the whole call.
pub fn validate(rules: &[FieldRule], values: &[FieldValue]) -> ConfigResult<ValidationResult> {
    Ok(ValidationEngine::new(rules.to_vec())?.validate(values))
}

/// Rule set checked once and reused for many snapshots.
///
/// The engine holds no mutable state, so one instance can serve concurrent
/// validations from any number of threads.
#[derive(Debug, Clone)]
pub struct ValidationEngine {
    /// Rules grouped by field, fields in first-declaration order.
    fields: IndexMap<String, Vec<FieldRule>>,
}

impl ValidationEngine {
    /// Create an engine, rejecting structurally broken rules.
    pub fn new(rules: Vec<FieldRule>) -> ConfigResult<Self> {
        let mut fields: IndexMap<String, Vec<FieldRule>> = IndexMap::new();
        for rule in rules {
            rule.check()?;
            fields.entry(rule.field_id.clone()).or_default().push(rule);
        }
        debug!("validation engine ready with {} field(s)", fields.len());
        Ok(Self { fields })
    }

    /// Create an engine from a rule-set document.
    pub fn from_document(
        document: &RuleSetDocument,
        registry: &RuleRegistry,
    ) -> ConfigResult<Self> {
        Self::new(document.resolve(registry)?)
    }

    /// Validate one snapshot.
    pub fn validate(&self, values: &[FieldValue]) -> ValidationResult {
        // later duplicates overwrite earlier ones
        let snapshot: HashMap<&str, &RawValue> = values
            .iter()
            .map(|v| (v.field_id.as_str(), &v.raw))
            .collect();

        let mut result = ValidationResult::new();
        for (field_id, rules) in &self.fields {
            let value = snapshot.get(field_id.as_str()).copied();
            let outcome = evaluate_field(field_id, rules, value);
            result.record(field_id.clone(), outcome);
        }
        result
    }

    /// Validate independent snapshots in parallel.
    ///
    /// Results are returned in the order of `snapshots`.
    pub fn validate_many(&self, snapshots: &[Vec<FieldValue>]) -> Vec<ValidationResult> {
        snapshots
            .par_iter()
            .map(|values| self.validate(values))
            .collect()
    }

    /// Ruled field ids in declaration order.
    pub fn field_ids(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(|s| s.as_str())
    }

    /// Rules attached to a field, in declaration order.
    pub fn rules_for(&self, field_id: &str) -> &[FieldRule] {
        self.fields.get(field_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of ruled fields.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

/// Apply a field's rules in order; the first failing rule decides.
fn evaluate_field(field_id: &str, rules: &[FieldRule], value: Option<&RawValue>) -> FieldOutcome {
    for rule in rules {
        match evaluate(&rule.kind, value) {
            RuleOutcome::Pass => continue,
            RuleOutcome::Fail => {
                debug!("field '{}' failed rule '{}'", field_id, rule.kind.name());
                return FieldOutcome::invalid(rule.message.clone(), rule.kind.name());
            }
            RuleOutcome::Missing => {
                warn!("no value captured for ruled field '{}'", field_id);
                return FieldOutcome::missing();
            }
        }
    }
    debug!("field '{}' passed {} rule(s)", field_id, rules.len());
    FieldOutcome::valid()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{ConfigurationError, FieldError, MISSING_VALUE_MESSAGE};
    use crate::core::rule::RuleKind;
    use proptest::prelude::*;

    fn contact_rules() -> Vec<FieldRule> {
        vec![
            FieldRule::required("name", "required"),
            FieldRule::required("email", "required"),
            FieldRule::email("email", "enter a valid email"),
            FieldRule::min_length("msg", 10, "at least 10 characters"),
        ]
    }

    #[test]
    fn test_contact_form_scenario() {
        let values = vec![
            FieldValue::text("name", ""),
            FieldValue::text("email", "x@x.com"),
            FieldValue::text("msg", "short"),
        ];
        let result = validate(&contact_rules(), &values).unwrap();

        assert!(!result.is_valid());
        assert_eq!(result.len(), 3);

        let name = result.get("name").unwrap();
        assert!(!name.valid);
        assert_eq!(name.message.as_deref(), Some("required"));

        let email = result.get("email").unwrap();
        assert!(email.valid);
        assert!(email.message.is_none());

        let msg = result.get("msg").unwrap();
        assert!(!msg.valid);
        assert_eq!(msg.message.as_deref(), Some("at least 10 characters"));
    }

    #[test]
    fn test_declaration_order_decides_message() {
        let rules = vec![
            FieldRule::required("msg", "required"),
            FieldRule::min_length("msg", 10, "at least 10 characters"),
        ];
        let result = validate(&rules, &[FieldValue::text("msg", "")]).unwrap();
        assert_eq!(result.get("msg").unwrap().message.as_deref(), Some("required"));

        let result = validate(&rules, &[FieldValue::text("msg", "hi")]).unwrap();
        assert_eq!(
            result.get("msg").unwrap().message.as_deref(),
            Some("at least 10 characters")
        );
    }

    #[test]
    fn test_empty_email_fails_required_first() {
        let result = validate(&contact_rules(), &[FieldValue::text("email", "")]).unwrap();
        assert_eq!(result.get("email").unwrap().message.as_deref(), Some("required"));
    }

    #[test]
    fn test_missing_value_does_not_stop_other_fields() {
        let values = vec![
            FieldValue::text("name", "Ada"),
            FieldValue::text("msg", "a long enough message"),
        ];
        let result = validate(&contact_rules(), &values).unwrap();

        assert!(!result.is_valid());
        assert!(result.get("name").unwrap().valid);
        assert!(result.get("msg").unwrap().valid);

        let email = result.get("email").unwrap();
        assert_eq!(email.message.as_deref(), Some(MISSING_VALUE_MESSAGE));
        assert_eq!(email.error, Some(FieldError::MissingValue));
    }

    #[test]
    fn test_checked_rule() {
        let rules = vec![FieldRule::checked("terms", "accept the terms")];

        let result = validate(&rules, &[FieldValue::flag("terms", true)]).unwrap();
        assert!(result.is_valid());

        let result = validate(&rules, &[FieldValue::flag("terms", false)]).unwrap();
        assert_eq!(
            result.get("terms").unwrap().message.as_deref(),
            Some("accept the terms")
        );

        let result = validate(&rules, &[]).unwrap();
        let terms = result.get("terms").unwrap();
        assert_eq!(terms.message.as_deref(), Some("accept the terms"));
        assert_eq!(
            terms.error,
            Some(FieldError::UserInput {
                rule: "checked".to_string()
            })
        );
    }

    #[test]
    fn test_unruled_values_ignored() {
        let rules = vec![FieldRule::required("name", "required")];
        let values = vec![
            FieldValue::text("name", "Ada"),
            FieldValue::text("nickname", ""),
        ];
        let result = validate(&rules, &values).unwrap();
        assert_eq!(result.len(), 1);
        assert!(result.get("nickname").is_none());
    }

    #[test]
    fn test_last_duplicate_value_wins() {
        let rules = vec![FieldRule::required("name", "required")];
        let values = vec![FieldValue::text("name", "Ada"), FieldValue::text("name", " ")];
        let result = validate(&rules, &values).unwrap();
        assert!(!result.is_valid());
    }

    #[test]
    fn test_broken_rule_fails_whole_call() {
        let rules = vec![
            FieldRule::required("name", "required"),
            FieldRule::numeric("height", Some(300.0), Some(0.0), "enter a valid height"),
        ];
        let err = validate(&rules, &[FieldValue::text("name", "Ada")]).unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidBounds { .. }));
    }

    #[test]
    fn test_field_order_follows_declaration() {
        let engine = ValidationEngine::new(contact_rules()).unwrap();
        assert_eq!(engine.field_ids().collect::<Vec<_>>(), vec!["name", "email", "msg"]);
        assert_eq!(engine.rules_for("email").len(), 2);
        assert!(engine.rules_for("unknown").is_empty());

        let result = engine.validate(&[]);
        assert_eq!(result.field_ids().collect::<Vec<_>>(), vec!["name", "email", "msg"]);
        assert_eq!(result.first_invalid().map(|(id, _)| id), Some("name"));
    }

    #[test]
    fn test_validate_many_preserves_order() {
        let engine = ValidationEngine::new(vec![FieldRule::required("name", "required")]).unwrap();
        let snapshots: Vec<Vec<FieldValue>> = (0..64)
            .map(|i| {
                let name = if i % 2 == 0 { "Ada" } else { "" };
                vec![FieldValue::text("name", name)]
            })
            .collect();

        let results = engine.validate_many(&snapshots);
        assert_eq!(results.len(), 64);
        for (i, result) in results.iter().enumerate() {
            assert_eq!(result.is_valid(), i % 2 == 0);
        }
    }

    #[test]
    fn test_from_document() {
        let document = RuleSetDocument::from_toml_str(
            r#"
[[rules]]
field = "height"
kind = "numeric"
min = 0
message = "Please enter a valid height"
"#,
        )
        .unwrap();
        let engine =
            ValidationEngine::from_document(&document, &RuleRegistry::with_builtins()).unwrap();

        assert!(engine.validate(&[FieldValue::text("height", "180")]).is_valid());
        let result = engine.validate(&[FieldValue::text("height", "-5")]);
        assert_eq!(
            result.get("height").unwrap().message.as_deref(),
            Some("Please enter a valid height")
        );
    }

    fn arb_rule() -> impl Strategy<Value = FieldRule> {
        let field = prop::sample::select(vec!["name", "email", "msg", "terms"]);
        let kind = prop_oneof![
            Just(RuleKind::Required),
            (0usize..20).prop_map(RuleKind::MinLength),
            (0usize..20).prop_map(RuleKind::MaxLength),
            Just(RuleKind::Email),
            Just(RuleKind::Checked),
        ];
        (field, kind, "[a-z ]{0,12}")
            .prop_map(|(field, kind, message)| FieldRule::new(field, kind, message))
    }

    fn arb_value() -> impl Strategy<Value = FieldValue> {
        let field = prop::sample::select(vec!["name", "email", "msg", "terms"]);
        let raw = prop_oneof![
            ".{0,24}".prop_map(RawValue::Text),
            any::<bool>().prop_map(RawValue::Flag),
        ];
        (field, raw).prop_map(|(field, raw)| FieldValue::new(field, raw))
    }

    proptest! {
        #[test]
        fn prop_one_entry_per_ruled_field(
            rules in prop::collection::vec(arb_rule(), 0..12),
            values in prop::collection::vec(arb_value(), 0..8),
        ) {
            let result = validate(&rules, &values).unwrap();
            let mut ruled: Vec<&str> = rules.iter().map(|r| r.field_id.as_str()).collect();
            ruled.sort_unstable();
            ruled.dedup();

            let mut reported: Vec<&str> = result.field_ids().collect();
            reported.sort_unstable();
            prop_assert_eq!(reported, ruled);
        }

        #[test]
        fn prop_validation_is_idempotent(
            rules in prop::collection::vec(arb_rule(), 0..12),
            values in prop::collection::vec(arb_value(), 0..8),
        ) {
            let first = validate(&rules, &values).unwrap();
            let second = validate(&rules, &values).unwrap();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_aggregate_matches_fields(
            rules in prop::collection::vec(arb_rule(), 0..12),
            values in prop::collection::vec(arb_value(), 0..8),
        ) {
            let result = validate(&rules, &values).unwrap();
            prop_assert_eq!(result.is_valid(), result.iter().all(|(_, o)| o.valid));
            for (_, outcome) in result.iter() {
                prop_assert_eq!(outcome.valid, outcome.message.is_none());
            }
        }
    }
}
