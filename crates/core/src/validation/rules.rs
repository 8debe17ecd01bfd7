//! Validation rules and the factory that builds them from a type name plus
//! positional string arguments.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::coercion::{as_list, as_number, as_text, is_not_number};
use crate::ci::{CedulaValidator, CiValidator};
use crate::error::CoreError;
use crate::types::{Answer, AnswerValue};

/// Prefix shared by every per-answer error message.
pub const INITIAL_MESSAGE: &str = "La respuesta de la pregunta";

const EMAIL_PATTERN: &str = r"^[A-Za-z0-9_.-]+@([A-Za-z0-9_-]+\.)+[A-Za-z0-9_-]{2,4}$";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("valid regex"));

// ---------------------------------------------------------------------------
// Rule types
// ---------------------------------------------------------------------------

/// Every rule type the factory knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleType {
    Required,
    MaxLength,
    MinLength,
    Email,
    Number,
    Ci,
    Positive,
    Negative,
    PositiveOrZero,
    NegativeOrZero,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
    InRange,
    InList,
}

impl RuleType {
    pub const ALL: [RuleType; 16] = [
        RuleType::Required,
        RuleType::MaxLength,
        RuleType::MinLength,
        RuleType::Email,
        RuleType::Number,
        RuleType::Ci,
        RuleType::Positive,
        RuleType::Negative,
        RuleType::PositiveOrZero,
        RuleType::NegativeOrZero,
        RuleType::GreaterThan,
        RuleType::LessThan,
        RuleType::GreaterThanOrEqual,
        RuleType::LessThanOrEqual,
        RuleType::InRange,
        RuleType::InList,
    ];

    /// The configuration name of this rule type.
    pub fn as_str(self) -> &'static str {
        match self {
            RuleType::Required => "required",
            RuleType::MaxLength => "maxLength",
            RuleType::MinLength => "minLength",
            RuleType::Email => "email",
            RuleType::Number => "number",
            RuleType::Ci => "ci",
            RuleType::Positive => "positive",
            RuleType::Negative => "negative",
            RuleType::PositiveOrZero => "positiveOrZero",
            RuleType::NegativeOrZero => "negativeOrZero",
            RuleType::GreaterThan => "greaterThan",
            RuleType::LessThan => "lessThan",
            RuleType::GreaterThanOrEqual => "greaterThanOrEqual",
            RuleType::LessThanOrEqual => "lessThanOrEqual",
            RuleType::InRange => "inRange",
            RuleType::InList => "inList",
        }
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RuleType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CoreError::UnknownRuleType(s.to_string()))
    }
}

/// A rule as written in quiz configuration: `{"type": "inRange", "args": ["1", "5"]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSpec {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl RuleSpec {
    pub fn new<S: Into<String>>(type_name: impl Into<String>, args: impl IntoIterator<Item = S>) -> Self {
        Self {
            type_name: type_name.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Numeric comparisons. All of them require a number-coercible value first.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Comparison {
    Positive,
    Negative,
    PositiveOrZero,
    NegativeOrZero,
    GreaterThan(i64),
    LessThan(i64),
    GreaterThanOrEqual(i64),
    LessThanOrEqual(i64),
    InRange(i64, i64),
}

impl Comparison {
    /// Compares the full value; fractional parts are not truncated, so
    /// `0.5` is positive and `5.5` is greater than `5`.
    fn accepts(self, n: f64) -> bool {
        match self {
            Comparison::Positive => n > 0.0,
            Comparison::Negative => n < 0.0,
            Comparison::PositiveOrZero => n >= 0.0,
            Comparison::NegativeOrZero => n <= 0.0,
            Comparison::GreaterThan(min) => n > min as f64,
            Comparison::LessThan(max) => n < max as f64,
            Comparison::GreaterThanOrEqual(min) => n >= min as f64,
            Comparison::LessThanOrEqual(max) => n <= max as f64,
            Comparison::InRange(min, max) => (min as f64..=max as f64).contains(&n),
        }
    }

    fn describe(self) -> String {
        match self {
            Comparison::Positive => "debe ser mayor a 0".to_string(),
            Comparison::Negative => "debe ser menor a 0".to_string(),
            Comparison::PositiveOrZero => "debe ser mayor o igual a 0".to_string(),
            Comparison::NegativeOrZero => "debe ser menor o igual a 0".to_string(),
            Comparison::GreaterThan(min) => format!("debe ser mayor a {min}"),
            Comparison::LessThan(max) => format!("debe ser menor a {max}"),
            Comparison::GreaterThanOrEqual(min) => format!("debe ser mayor o igual a {min}"),
            Comparison::LessThanOrEqual(max) => format!("debe ser menor o igual a {max}"),
            Comparison::InRange(min, max) => format!("debe estar entre {min} y {max}"),
        }
    }
}

#[derive(Clone)]
enum RuleKind {
    Required,
    MaxLength(i64),
    MinLength(i64),
    Email,
    Number,
    Ci(Arc<dyn CiValidator>),
    Numeric(Comparison),
    InList(Vec<String>),
}

/// A constructed rule. Immutable, and cheap to share across threads.
#[derive(Clone)]
pub struct ValidationRule {
    rule_type: RuleType,
    kind: RuleKind,
}

impl fmt::Debug for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationRule")
            .field("rule_type", &self.rule_type)
            .finish_non_exhaustive()
    }
}

impl ValidationRule {
    pub fn rule_type(&self) -> RuleType {
        self.rule_type
    }

    /// Evaluate the rule against one answer.
    ///
    /// `Ok(None)` means valid, `Ok(Some(message))` carries the localized
    /// error. `Err` is only returned when the national-ID validator is
    /// unavailable.
    pub fn apply(&self, answer: &Answer) -> Result<Option<String>, CoreError> {
        let value = &answer.value;
        let outcome = match &self.kind {
            RuleKind::Required => required_message(answer),
            RuleKind::MaxLength(length) => as_text(value)
                .filter(|s| s.chars().count() as i64 > *length)
                .map(|_| message(answer, &format!("no puede tener más de {length} caracteres"))),
            RuleKind::MinLength(length) => as_text(value)
                .filter(|s| (s.chars().count() as i64) < *length)
                .map(|_| message(answer, &format!("no puede tener menos de {length} caracteres"))),
            RuleKind::Email => match as_text(value) {
                Some(s) if EMAIL_RE.is_match(&s) => None,
                _ => Some(message(answer, "debe ser un correo electrónico válido")),
            },
            RuleKind::Number => is_not_number(value).then(|| not_a_number(answer)),
            RuleKind::Ci(validator) => {
                let valid = match as_text(value) {
                    Some(text) if required_message(answer).is_none() => validator.validate(&text)?,
                    _ => false,
                };
                (!valid).then(|| message(answer, "no es un número de cédula válido"))
            }
            RuleKind::Numeric(comparison) => match as_number(value) {
                None => Some(not_a_number(answer)),
                Some(n) if !comparison.accepts(n) => Some(message(answer, &comparison.describe())),
                Some(_) => None,
            },
            RuleKind::InList(allowed) => {
                let contained = as_list(value).is_some_and(|items| {
                    allowed
                        .iter()
                        .any(|option| items.iter().any(|item| element_matches(item, option)))
                });
                (!contained).then(|| {
                    message(
                        answer,
                        &format!("debe ser una de las opciones: [{}]", allowed.join(", ")),
                    )
                })
            }
        };
        Ok(outcome)
    }
}

fn message(answer: &Answer, suffix: &str) -> String {
    format!("{INITIAL_MESSAGE} {} {suffix}", answer.question_id)
}

fn not_a_number(answer: &Answer) -> String {
    message(answer, "debe ser un número")
}

fn required_message(answer: &Answer) -> Option<String> {
    let value = &answer.value;
    if value.is_null() {
        return Some(message(answer, "es requerida"));
    }
    if as_list(value).is_some_and(<[AnswerValue]>::is_empty) {
        return Some(format!(
            "Debe seleccionar al menos una opción en la pregunta {}",
            answer.question_id
        ));
    }
    if as_text(value).is_some_and(|s| s.is_empty()) {
        return Some(message(answer, "no puede estar vacía"));
    }
    None
}

/// Only text elements can equal an option; the number `2` never matches `"2"`.
fn element_matches(item: &AnswerValue, option: &str) -> bool {
    matches!(item, AnswerValue::Text(text) if text == option)
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

/// Positional arguments for one rule under construction.
struct RuleArgs<'a> {
    rule_type: RuleType,
    args: &'a [&'a str],
}

impl RuleArgs<'_> {
    fn invalid(&self, reason: String) -> CoreError {
        CoreError::InvalidArgument {
            rule: self.rule_type.as_str(),
            reason,
        }
    }

    fn expect_count(&self, count: usize) -> Result<(), CoreError> {
        if self.args.len() == count {
            Ok(())
        } else {
            Err(self.invalid(format!(
                "expected {count} argument(s), got {}",
                self.args.len()
            )))
        }
    }

    /// Parse a 32-bit decimal integer. Surrounding whitespace is rejected.
    fn int(&self, index: usize) -> Result<i64, CoreError> {
        let raw = self
            .args
            .get(index)
            .ok_or_else(|| self.invalid(format!("missing argument {index}")))?;
        raw.parse::<i32>().map(i64::from).map_err(|_| {
            self.invalid(format!("argument {index} must be a 32-bit integer, got '{raw}'"))
        })
    }
}

type Constructor = fn(&RuleFactory, &RuleArgs<'_>) -> Result<RuleKind, CoreError>;

/// Builds [`ValidationRule`]s from a type name and string arguments.
///
/// Constructors are registered per [`RuleType`] when the factory is created.
/// The factory also owns the national-ID validator handed to `ci` rules.
pub struct RuleFactory {
    constructors: HashMap<RuleType, Constructor>,
    ci_validator: Arc<dyn CiValidator>,
}

impl Default for RuleFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RuleFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleFactory")
            .field("rule_types", &self.constructors.len())
            .finish_non_exhaustive()
    }
}

impl RuleFactory {
    /// A factory using the offline cédula checksum for `ci` rules.
    pub fn new() -> Self {
        Self::with_ci_validator(Arc::new(CedulaValidator))
    }

    pub fn with_ci_validator(ci_validator: Arc<dyn CiValidator>) -> Self {
        Self {
            constructors: registry(),
            ci_validator,
        }
    }

    /// Build a rule from its configuration name and positional arguments.
    pub fn create<S: AsRef<str>>(
        &self,
        type_name: &str,
        args: &[S],
    ) -> Result<ValidationRule, CoreError> {
        let rule_type: RuleType = type_name.parse().inspect_err(|_| {
            tracing::warn!(type_name, "Unknown validation rule type");
        })?;
        let constructor = self
            .constructors
            .get(&rule_type)
            .ok_or_else(|| CoreError::UnknownRuleType(type_name.to_string()))?;

        let raw: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
        tracing::debug!(%rule_type, args = ?raw, "Building validation rule");
        let kind = constructor(
            self,
            &RuleArgs {
                rule_type,
                args: &raw,
            },
        )?;
        Ok(ValidationRule { rule_type, kind })
    }

    pub fn create_from_spec(&self, spec: &RuleSpec) -> Result<ValidationRule, CoreError> {
        self.create(&spec.type_name, &spec.args)
    }
}

fn registry() -> HashMap<RuleType, Constructor> {
    let mut constructors: HashMap<RuleType, Constructor> = HashMap::new();
    constructors.insert(RuleType::Required, |_, a| {
        a.expect_count(0)?;
        Ok(RuleKind::Required)
    });
    constructors.insert(RuleType::MaxLength, |_, a| {
        a.expect_count(1)?;
        Ok(RuleKind::MaxLength(a.int(0)?))
    });
    constructors.insert(RuleType::MinLength, |_, a| {
        a.expect_count(1)?;
        Ok(RuleKind::MinLength(a.int(0)?))
    });
    constructors.insert(RuleType::Email, |_, a| {
        a.expect_count(0)?;
        Ok(RuleKind::Email)
    });
    constructors.insert(RuleType::Number, |_, a| {
        a.expect_count(0)?;
        Ok(RuleKind::Number)
    });
    constructors.insert(RuleType::Ci, |factory, a| {
        a.expect_count(0)?;
        Ok(RuleKind::Ci(Arc::clone(&factory.ci_validator)))
    });
    constructors.insert(RuleType::Positive, |_, a| comparison(a, Comparison::Positive));
    constructors.insert(RuleType::Negative, |_, a| comparison(a, Comparison::Negative));
    constructors.insert(RuleType::PositiveOrZero, |_, a| {
        comparison(a, Comparison::PositiveOrZero)
    });
    constructors.insert(RuleType::NegativeOrZero, |_, a| {
        comparison(a, Comparison::NegativeOrZero)
    });
    constructors.insert(RuleType::GreaterThan, |_, a| {
        comparison(a, Comparison::GreaterThan(a.int(0)?))
    });
    constructors.insert(RuleType::LessThan, |_, a| {
        comparison(a, Comparison::LessThan(a.int(0)?))
    });
    constructors.insert(RuleType::GreaterThanOrEqual, |_, a| {
        comparison(a, Comparison::GreaterThanOrEqual(a.int(0)?))
    });
    constructors.insert(RuleType::LessThanOrEqual, |_, a| {
        comparison(a, Comparison::LessThanOrEqual(a.int(0)?))
    });
    constructors.insert(RuleType::InRange, |_, a| {
        comparison(a, Comparison::InRange(a.int(0)?, a.int(1)?))
    });
    constructors.insert(RuleType::InList, |_, a| {
        if a.args.is_empty() {
            return Err(a.invalid("at least one allowed value is required".to_string()));
        }
        Ok(RuleKind::InList(a.args.iter().map(|s| s.to_string()).collect()))
    });
    constructors
}

/// Wrap a comparison after checking its argument count.
fn comparison(args: &RuleArgs<'_>, comparison: Comparison) -> Result<RuleKind, CoreError> {
    let expected = match comparison {
        Comparison::Positive
        | Comparison::Negative
        | Comparison::PositiveOrZero
        | Comparison::NegativeOrZero => 0,
        Comparison::InRange(..) => 2,
        _ => 1,
    };
    args.expect_count(expected)?;
    Ok(RuleKind::Numeric(comparison))
}
