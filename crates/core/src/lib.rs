//! Quiz answer validation engine.
//!
//! - [`types`] -- answers and their untyped values.
//! - [`validation`] -- coercion helpers, the rule factory, and the evaluator.
//! - [`ci`] -- national-ID (cédula) checksum validation.

pub mod ci;
pub mod error;
pub mod types;
pub mod validation;

pub use error::CoreError;
pub use types::{Answer, AnswerValue, QuestionId};
pub use validation::evaluator::{FieldError, QuestionRules, QuestionValidator, ValidationResult};
pub use validation::rules::{RuleFactory, RuleSpec, RuleType, ValidationRule};
