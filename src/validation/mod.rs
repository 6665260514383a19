//! Validation engine.
//!
//! The engine evaluates a static rule set against one snapshot at a time.
//! It is a pure function of its inputs: no I/O and no hidden state.

pub mod engine;

pub use engine::{validate, ValidationEngine};
