//! Deterministic, pure logic: status derivation and navigation resolution.
//!
//! Core modules must be free of I/O side effects. They operate on an
//! in-memory [`schema::Schema`] and a set of [`types::Answers`] and return
//! deterministic outputs suitable for tests.

pub mod compile;
pub mod inclusion;
pub mod invariants;
pub mod navigation;
pub mod schema;
pub mod status;
pub mod task_list;
pub mod types;
pub mod validation;
