//! Integration tests for building rules from configuration and applying
//! them to answers through the public API.

use assert_matches::assert_matches;
use quiz_core::{Answer, AnswerValue, CoreError, RuleFactory, RuleSpec, RuleType};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Rule types taking one integer argument, with a valid argument list.
const INTEGER_RULES: [&str; 6] = [
    "maxLength",
    "minLength",
    "greaterThan",
    "lessThan",
    "greaterThanOrEqual",
    "lessThanOrEqual",
];

fn sample_values() -> Vec<AnswerValue> {
    vec![
        AnswerValue::Null,
        AnswerValue::from(""),
        AnswerValue::from("abc"),
        AnswerValue::from("42"),
        AnswerValue::from(-7_i64),
        AnswerValue::from(3.5),
        AnswerValue::from(vec!["a", "b"]),
        AnswerValue::List(Vec::new()),
    ]
}

fn all_rules(factory: &RuleFactory) -> Vec<quiz_core::ValidationRule> {
    let specs = [
        RuleSpec::new("required", Vec::<String>::new()),
        RuleSpec::new("maxLength", ["3"]),
        RuleSpec::new("minLength", ["2"]),
        RuleSpec::new("email", Vec::<String>::new()),
        RuleSpec::new("number", Vec::<String>::new()),
        RuleSpec::new("ci", Vec::<String>::new()),
        RuleSpec::new("positive", Vec::<String>::new()),
        RuleSpec::new("negative", Vec::<String>::new()),
        RuleSpec::new("positiveOrZero", Vec::<String>::new()),
        RuleSpec::new("negativeOrZero", Vec::<String>::new()),
        RuleSpec::new("greaterThan", ["1"]),
        RuleSpec::new("lessThan", ["1"]),
        RuleSpec::new("greaterThanOrEqual", ["1"]),
        RuleSpec::new("lessThanOrEqual", ["1"]),
        RuleSpec::new("inRange", ["1", "5"]),
        RuleSpec::new("inList", ["a", "b"]),
    ];
    specs
        .iter()
        .map(|spec| factory.create_from_spec(spec).expect("rule should build"))
        .collect()
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

/// Every integer-argument rule rejects a missing or non-numeric argument.
#[test]
fn integer_rules_reject_bad_arguments() {
    let factory = RuleFactory::new();
    for type_name in INTEGER_RULES {
        assert_matches!(
            factory.create::<&str>(type_name, &[]),
            Err(CoreError::InvalidArgument { .. }),
            "{type_name} without argument"
        );
        assert_matches!(
            factory.create(type_name, &["1.5"]),
            Err(CoreError::InvalidArgument { .. }),
            "{type_name} with decimal argument"
        );
        assert_matches!(
            factory.create(type_name, &["x"]),
            Err(CoreError::InvalidArgument { .. }),
            "{type_name} with text argument"
        );
    }
    assert_matches!(
        factory.create("inRange", &["1", "b"]),
        Err(CoreError::InvalidArgument { .. })
    );
}

#[test]
fn unknown_type_is_rejected() {
    assert_matches!(
        RuleFactory::new().create::<&str>("bogus", &[]),
        Err(CoreError::UnknownRuleType(_))
    );
}

#[test]
fn rule_specs_deserialize_from_configuration() {
    let spec: RuleSpec =
        serde_json::from_value(serde_json::json!({"type": "inRange", "args": ["1", "5"]})).unwrap();
    let rule = RuleFactory::new().create_from_spec(&spec).unwrap();
    assert_eq!(rule.rule_type(), RuleType::InRange);

    let bare: RuleSpec = serde_json::from_value(serde_json::json!({"type": "email"})).unwrap();
    assert!(bare.args.is_empty());
}

// ---------------------------------------------------------------------------
// Application
// ---------------------------------------------------------------------------

/// Every message names the question the answer belongs to.
#[test]
fn messages_embed_the_question_id() {
    let factory = RuleFactory::new();
    for rule in all_rules(&factory) {
        for value in sample_values() {
            let answer = Answer::new("pregunta-123", value);
            if let Some(message) = rule.apply(&answer).unwrap() {
                assert!(
                    message.contains("pregunta-123"),
                    "{:?} produced {message}",
                    rule.rule_type()
                );
            }
        }
    }
}

/// Rules hold no state between calls.
#[test]
fn applying_a_rule_is_idempotent() {
    let factory = RuleFactory::new();
    for rule in all_rules(&factory) {
        for value in sample_values() {
            let answer = Answer::new("q", value);
            assert_eq!(rule.apply(&answer).unwrap(), rule.apply(&answer).unwrap());
        }
    }
}

#[test]
fn rules_can_be_shared_across_threads() {
    let rule = RuleFactory::new().create("inRange", &["1", "5"]).unwrap();
    let handles: Vec<_> = (0..4_i64)
        .map(|i| {
            let rule = rule.clone();
            std::thread::spawn(move || rule.apply(&Answer::new("q", i * 3)).unwrap())
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(results[0].is_some());
    assert_eq!(results[1], None);
    assert!(results[2].is_some());
    assert!(results[3].is_some());
}

#[test]
fn in_range_prefers_number_message() {
    let rule = RuleFactory::new().create("inRange", &["1", "5"]).unwrap();
    let message = rule.apply(&Answer::new("q9", "abc")).unwrap().unwrap();
    assert_eq!(message, "La respuesta de la pregunta q9 debe ser un número");
}
