//! Answers submitted for quiz questions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a quiz question, as it appears in error messages.
pub type QuestionId = String;

/// An untyped answer value as it arrives from a form submission.
///
/// Deserializes untagged from JSON: `null`, a number, a string, or an array
/// of further values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Null,
    Number(f64),
    Text(String),
    List(Vec<AnswerValue>),
}

impl AnswerValue {
    pub fn is_null(&self) -> bool {
        matches!(self, AnswerValue::Null)
    }
}

/// Default textual form, used by length and pattern rules on non-text values.
///
/// Integral numbers render without a fraction (`5`, not `5.0`); lists render
/// as `[a, b]`.
impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Null => f.write_str("null"),
            AnswerValue::Number(n) => write!(f, "{n}"),
            AnswerValue::Text(s) => f.write_str(s),
            AnswerValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<f64> for AnswerValue {
    fn from(n: f64) -> Self {
        AnswerValue::Number(n)
    }
}

impl From<i64> for AnswerValue {
    fn from(n: i64) -> Self {
        AnswerValue::Number(n as f64)
    }
}

impl From<&str> for AnswerValue {
    fn from(s: &str) -> Self {
        AnswerValue::Text(s.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(s: String) -> Self {
        AnswerValue::Text(s)
    }
}

impl<T: Into<AnswerValue>> From<Vec<T>> for AnswerValue {
    fn from(items: Vec<T>) -> Self {
        AnswerValue::List(items.into_iter().map(Into::into).collect())
    }
}

/// A submitted value for one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub question_id: QuestionId,
    #[serde(default = "null_value")]
    pub value: AnswerValue,
}

fn null_value() -> AnswerValue {
    AnswerValue::Null
}

impl Answer {
    pub fn new(question_id: impl Into<QuestionId>, value: impl Into<AnswerValue>) -> Self {
        Self {
            question_id: question_id.into(),
            value: value.into(),
        }
    }

    /// An answer with no value at all.
    pub fn empty(question_id: impl Into<QuestionId>) -> Self {
        Self {
            question_id: question_id.into(),
            value: AnswerValue::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_every_value_shape() {
        let answer: Answer =
            serde_json::from_value(json!({"questionId": "q1", "value": [1, "a", null]})).unwrap();
        assert_eq!(answer.question_id, "q1");
        assert_eq!(
            answer.value,
            AnswerValue::List(vec![
                AnswerValue::Number(1.0),
                AnswerValue::Text("a".to_string()),
                AnswerValue::Null,
            ])
        );
    }

    #[test]
    fn missing_value_is_null() {
        let answer: Answer = serde_json::from_value(json!({"questionId": "q1"})).unwrap();
        assert!(answer.value.is_null());
    }

    #[test]
    fn integral_numbers_render_without_fraction() {
        assert_eq!(AnswerValue::Number(5.0).to_string(), "5");
        assert_eq!(AnswerValue::Number(2.5).to_string(), "2.5");
    }

    #[test]
    fn lists_render_bracketed() {
        let value = AnswerValue::from(vec!["a", "b"]);
        assert_eq!(value.to_string(), "[a, b]");
    }
}
