//! Per-question evaluator: compiles rule specs once and runs them over a
//! whole submission, collecting every error.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::rules::{RuleFactory, RuleSpec, ValidationRule};
use crate::error::CoreError;
use crate::types::{Answer, QuestionId};

/// The rules bound to one question in the quiz configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRules {
    pub question_id: QuestionId,
    #[serde(default)]
    pub rules: Vec<RuleSpec>,
}

/// Aggregated result of evaluating every question of a submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<FieldError>,
}

/// A single question-level rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub question_id: QuestionId,
    pub rule_type: String,
    pub message: String,
}

/// Run every rule against one answer, in order, keeping each violation.
pub fn evaluate_rules(
    rules: &[ValidationRule],
    answer: &Answer,
) -> Result<Vec<FieldError>, CoreError> {
    let mut errors = Vec::new();
    for rule in rules {
        if let Some(message) = rule.apply(answer)? {
            errors.push(FieldError {
                question_id: answer.question_id.clone(),
                rule_type: rule.rule_type().to_string(),
                message,
            });
        }
    }
    Ok(errors)
}

/// Compiled rules for a whole quiz.
#[derive(Debug, Clone)]
pub struct QuestionValidator {
    questions: Vec<(QuestionId, Vec<ValidationRule>)>,
}

impl QuestionValidator {
    /// Build every rule up front. The first unknown type or bad argument
    /// aborts compilation.
    pub fn compile(factory: &RuleFactory, questions: &[QuestionRules]) -> Result<Self, CoreError> {
        let questions = questions
            .iter()
            .map(|q| -> Result<_, CoreError> {
                let rules = q
                    .rules
                    .iter()
                    .map(|spec| factory.create_from_spec(spec))
                    .collect::<Result<Vec<_>, _>>()
                    .inspect_err(|e| {
                        tracing::error!(question_id = %q.question_id, error = %e, "Invalid rule configuration");
                    })?;
                Ok((q.question_id.clone(), rules))
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(questions = questions.len(), "Compiled question rules");
        Ok(Self { questions })
    }

    /// Validate a submission. Questions without an answer are checked
    /// against a null value. Answers to unknown questions are ignored.
    pub fn validate(&self, answers: &[Answer]) -> Result<ValidationResult, CoreError> {
        let mut by_question: HashMap<&str, &Answer> = HashMap::new();
        for answer in answers {
            by_question.entry(answer.question_id.as_str()).or_insert(answer);
        }

        let mut errors = Vec::new();
        for (question_id, rules) in &self.questions {
            let missing;
            let answer = match by_question.get(question_id.as_str()) {
                Some(answer) => *answer,
                None => {
                    missing = Answer::empty(question_id.clone());
                    &missing
                }
            };

            errors.extend(evaluate_rules(rules, answer)?);
        }

        tracing::debug!(errors = errors.len(), "Evaluated submission");
        Ok(ValidationResult {
            is_valid: errors.is_empty(),
            errors,
        })
    }
}
