//! Rule registry mapping kind names to rule builders.

use crate::core::error::{ConfigResult, ConfigurationError};
use crate::core::rule::{FieldRule, RuleKind, RulePattern};
use crate::core::types::RawValue;
use crate::rules::document::RuleEntry;
use indexmap::IndexMap;
use std::sync::Arc;

/// Builds a typed rule kind from a declarative entry.
pub type RuleBuilder = Arc<dyn Fn(&RuleEntry) -> ConfigResult<RuleKind> + Send + Sync>;

/// Registry entry containing the builder and its documentation.
#[derive(Clone)]
pub struct RegistryEntry {
    /// Builder turning entries into rule kinds.
    pub builder: RuleBuilder,
    /// One-line description, shown by `fieldcheck kinds`.
    pub description: String,
}

/// Registry for all available rule kinds.
///
/// Rule files name their kind as a string; the registry is the one place
/// that knows how to turn that name into a [`RuleKind`]. New kinds are added
/// by registering them here, without touching the engine.
pub struct RuleRegistry {
    kinds: IndexMap<String, RegistryEntry>,
}

impl RuleRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            kinds: IndexMap::new(),
        }
    }

    /// Create a registry pre-populated with the built-in kinds.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();

        registry.register("required", "Trimmed text must not be empty", |_| {
            Ok(RuleKind::Required)
        });
        registry.register(
            "min_length",
            "Trimmed text must have at least `length` characters",
            |entry| Ok(RuleKind::MinLength(entry.require_length()?)),
        );
        registry.register(
            "max_length",
            "Trimmed text must have at most `length` characters",
            |entry| Ok(RuleKind::MaxLength(entry.require_length()?)),
        );
        registry.register("email", "Text must look like local@domain.tld", |_| {
            Ok(RuleKind::Email)
        });
        registry.register("checked", "Checkbox must be ticked", |_| {
            Ok(RuleKind::Checked)
        });
        registry.register(
            "pattern",
            "Trimmed text must match the `pattern` regex",
            |entry| Ok(RuleKind::Pattern(RulePattern::new(entry.require_pattern()?)?)),
        );
        registry.register(
            "numeric",
            "Trimmed text must be a number within optional `min`/`max`",
            |entry| {
                Ok(RuleKind::Numeric {
                    min: entry.min,
                    max: entry.max,
                })
            },
        );

        registry
    }

    /// Register a rule kind.
    pub fn register<F>(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        builder: F,
    ) where
        F: Fn(&RuleEntry) -> ConfigResult<RuleKind> + Send + Sync + 'static,
    {
        self.kinds.insert(
            name.into(),
            RegistryEntry {
                builder: Arc::new(builder),
                description: description.into(),
            },
        );
    }

    /// Register a kind backed by a predicate over the raw value.
    pub fn register_custom<P>(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        predicate: P,
    ) where
        P: Fn(&RawValue) -> bool + Send + Sync + 'static,
    {
        let name = name.into();
        let kind_name = name.clone();
        let predicate: Arc<dyn Fn(&RawValue) -> bool + Send + Sync> = Arc::new(predicate);
        self.register(name, description, move |_| {
            Ok(RuleKind::Custom {
                name: kind_name.clone(),
                predicate: Arc::clone(&predicate),
            })
        });
    }

    /// Resolve an entry into a checked rule.
    pub fn resolve(&self, entry: &RuleEntry) -> ConfigResult<FieldRule> {
        let registered = self.kinds.get(&entry.kind).ok_or_else(|| {
            ConfigurationError::UnknownRuleKind {
                field: entry.field.clone(),
                kind: entry.kind.clone(),
            }
        })?;

        let rule = FieldRule::new(
            entry.field.clone(),
            (registered.builder)(entry)?,
            entry.message.clone(),
        );
        rule.check()?;
        Ok(rule)
    }

    /// Check if a kind is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.kinds.contains_key(name)
    }

    /// Get the description of a kind.
    pub fn description(&self, name: &str) -> Option<&str> {
        self.kinds.get(name).map(|e| e.description.as_str())
    }

    /// All registered kind names, in registration order.
    pub fn kind_names(&self) -> impl Iterator<Item = &str> {
        self.kinds.keys().map(|s| s.as_str())
    }

    /// Number of registered kinds.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
