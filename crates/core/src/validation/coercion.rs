//! Shape predicates over untyped answer values.
//!
//! Every rule goes through these helpers instead of matching on
//! [`AnswerValue`] itself, so the fallback order stays the same everywhere.

use crate::types::AnswerValue;

/// Interpret a value as a number.
///
/// Numbers are taken as-is. Text counts only when it is a non-empty run of
/// ASCII digits: no sign, no decimal point.
pub fn as_number(value: &AnswerValue) -> Option<f64> {
    match value {
        AnswerValue::Number(n) => Some(*n),
        AnswerValue::Text(s) if is_digit_string(s) => s.parse().ok(),
        AnswerValue::Text(_) | AnswerValue::Null | AnswerValue::List(_) => None,
    }
}

/// Interpret a value as text, falling back to its default textual form.
///
/// Returns `None` only for `Null`, which has no textual form.
pub fn as_text(value: &AnswerValue) -> Option<String> {
    match value {
        AnswerValue::Null => None,
        AnswerValue::Text(s) => Some(s.clone()),
        AnswerValue::Number(_) | AnswerValue::List(_) => Some(value.to_string()),
    }
}

/// Interpret a value as a list. Scalars are never wrapped.
pub fn as_list(value: &AnswerValue) -> Option<&[AnswerValue]> {
    match value {
        AnswerValue::List(items) => Some(items),
        AnswerValue::Null | AnswerValue::Number(_) | AnswerValue::Text(_) => None,
    }
}

/// Guard used before every numeric comparison.
pub fn is_not_number(value: &AnswerValue) -> bool {
    as_number(value).is_none()
}

fn is_digit_string(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
