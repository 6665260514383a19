//! Snapshot value types.
//!
//! A snapshot is the set of raw input values captured for one validation
//! pass. Values are plain data: the engine never sees the input source
//! (DOM element, CLI prompt, API payload) they were extracted from.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw value captured from a single input.
///
/// Text inputs carry their contents untouched (trimming is the job of the
/// rules), checkboxes carry their checked state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// Contents of a text-like input
    Text(String),
    /// State of a checkbox-like input
    Flag(bool),
}

impl RawValue {
    /// Get the untrimmed text, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawValue::Text(s) => Some(s),
            RawValue::Flag(_) => None,
        }
    }

    /// Get the text with surrounding whitespace removed, if this is a text value.
    pub fn trimmed(&self) -> Option<&str> {
        self.as_text().map(str::trim)
    }

    /// Get the flag, if this is a boolean value.
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            RawValue::Flag(b) => Some(*b),
            RawValue::Text(_) => None,
        }
    }

    /// Whether this value counts as a ticked checkbox.
    ///
    /// Text values coming from HTML-style form data are accepted when they
    /// read `true`, `on` or `checked` (case-insensitive).
    pub fn is_checked(&self) -> bool {
        match self {
            RawValue::Flag(b) => *b,
            RawValue::Text(s) => {
                let s = s.trim();
                ["true", "on", "checked"]
                    .iter()
                    .any(|accepted| s.eq_ignore_ascii_case(accepted))
            }
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        RawValue::Flag(b)
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Text(s) => write!(f, "{:?}", s),
            RawValue::Flag(b) => write!(f, "{}", b),
        }
    }
}

/// Value of one field in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValue {
    /// Field this value belongs to
    pub field_id: String,
    /// Captured value
    pub raw: RawValue,
}

impl FieldValue {
    /// Create a field value.
    pub fn new(field_id: impl Into<String>, raw: impl Into<RawValue>) -> Self {
        Self {
            field_id: field_id.into(),
            raw: raw.into(),
        }
    }

    /// Create a text field value.
    pub fn text(field_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(field_id, RawValue::Text(text.into()))
    }

    /// Create a checkbox field value.
    pub fn flag(field_id: impl Into<String>, checked: bool) -> Self {
        Self::new(field_id, RawValue::Flag(checked))
    }
}
