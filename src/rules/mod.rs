//! Rule kinds: semantics, registry and rule-set documents.

pub mod document;
pub mod evaluate;
pub mod registry;

pub use document::{load_snapshot, parse_snapshot, RuleEntry, RuleSetDocument};
pub use evaluate::{evaluate, is_email, RuleOutcome};
pub use registry::{RegistryEntry, RuleBuilder, RuleRegistry};
