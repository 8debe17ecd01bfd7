//! Answer validation engine.
//!
//! Provides value coercion helpers, the rule factory, and a per-question
//! evaluator, all pure logic with no I/O.

pub mod coercion;
pub mod evaluator;
pub mod rules;
