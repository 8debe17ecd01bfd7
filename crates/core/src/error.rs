/// Errors raised while building rules or evaluating answers.
///
/// `UnknownRuleType` and `InvalidArgument` are configuration errors and are
/// raised when rules are constructed, never while answers are validated.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Unknown rule type: {0}")]
    UnknownRuleType(String),

    #[error("Invalid argument for rule {rule}: {reason}")]
    InvalidArgument { rule: &'static str, reason: String },

    #[error("Validation unavailable: {0}")]
    ValidationUnavailable(String),
}
