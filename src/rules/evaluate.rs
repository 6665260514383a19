//! Rule semantics.
//!
//! Every rule kind is evaluated through [`evaluate`], so adding a kind means
//! adding a match arm here and nothing in the engine.

use crate::core::rule::RuleKind;
use crate::core::types::RawValue;
use log::trace;
use once_cell::sync::Lazy;
use regex::Regex;

/// Email shape: dot-separated local atoms without `<>()[]\.,;:"`, whitespace
/// or `@`, then dot-separated `[A-Za-z0-9-]` domain labels ending in an
/// alphabetic TLD of at least two letters.
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^[^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*@([A-Za-z0-9-]+\.)+[A-Za-z]{2,}$"#,
    )
    .expect("email regex is valid")
});

/// Outcome of applying one rule to one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleOutcome {
    /// The value satisfies the rule
    Pass,
    /// The value violates the rule
    Fail,
    /// The rule needs a value and none was captured
    Missing,
}

impl RuleOutcome {
    fn from_bool(ok: bool) -> Self {
        if ok {
            RuleOutcome::Pass
        } else {
            RuleOutcome::Fail
        }
    }
}

/// Whether `text` has the shape of an email address.
pub fn is_email(text: &str) -> bool {
    EMAIL_REGEX.is_match(text)
}

/// Apply a rule to a captured value.
///
/// An absent value is `Missing` for every kind except `Checked`, where an
/// unticked checkbox simply does not show up in form data.
pub fn evaluate(kind: &RuleKind, value: Option<&RawValue>) -> RuleOutcome {
    let value = match (kind, value) {
        (RuleKind::Checked, None) => return RuleOutcome::Fail,
        (_, None) => return RuleOutcome::Missing,
        (_, Some(value)) => value,
    };

    let outcome = match kind {
        RuleKind::Required => match value {
            RawValue::Text(s) => RuleOutcome::from_bool(!s.trim().is_empty()),
            RawValue::Flag(_) => RuleOutcome::Pass,
        },
        RuleKind::Checked => RuleOutcome::from_bool(value.is_checked()),
        RuleKind::Custom { predicate, .. } => RuleOutcome::from_bool(predicate(value)),
        text_kind => match value.trimmed() {
            Some(text) => RuleOutcome::from_bool(evaluate_text(text_kind, text)),
            // text rules cannot hold for a checkbox
            None => RuleOutcome::Fail,
        },
    };

    trace!("rule {} on {} -> {:?}", kind.name(), value, outcome);
    outcome
}

fn evaluate_text(kind: &RuleKind, text: &str) -> bool {
    match kind {
        RuleKind::MinLength(min) => text.chars().count() >= *min,
        RuleKind::MaxLength(max) => text.chars().count() <= *max,
        RuleKind::Email => is_email(text),
        RuleKind::Pattern(pattern) => pattern.is_match(text),
        RuleKind::Numeric { min, max } => match text.parse::<f64>() {
            Ok(n) if n.is_finite() => {
                min.map_or(true, |min| n >= min) && max.map_or(true, |max| n <= max)
            }
            _ => false,
        },
        RuleKind::Required | RuleKind::Checked | RuleKind::Custom { .. } => true,
    }
}
