//! Unit tests for the recursive matcher.

use rstest::rstest;
use serde_json::{Value, json};

use crate::error::MismatchReason;
use crate::kind::ValueKind;
use crate::schema::{Schema, TypeMarker};

#[rstest]
#[case::null(json!(null))]
#[case::boolean(json!(false))]
#[case::integer(json!(42))]
#[case::float(json!(1.5))]
#[case::string(json!("armor"))]
fn literal_matches_itself(#[case] value: Value) {
    let schema = match &value {
        Value::Null => Schema::Literal(crate::Literal::Null),
        Value::Bool(flag) => Schema::literal(*flag),
        Value::Number(number) => Schema::Literal(crate::Literal::Number(number.clone())),
        Value::String(text) => Schema::literal(text.as_str()),
        other => panic!("not a primitive: {other}"),
    };
    assert!(schema.matches(&value));
}

#[rstest]
#[case::bool_vs_bool(Schema::literal(true), json!(false))]
#[case::bool_vs_string(Schema::literal(true), json!("true"))]
#[case::bool_vs_number(Schema::literal(false), json!(0))]
#[case::string_vs_string(Schema::literal("a"), json!("b"))]
#[case::number_vs_number(Schema::literal(1_i64), json!(2))]
#[case::null_vs_bool(Schema::Literal(crate::Literal::Null), json!(false))]
fn literal_rejects_different_primitive(#[case] schema: Schema, #[case] instance: Value) {
    let mismatch = schema.check(&instance).expect_err("literal must not match");
    assert!(matches!(mismatch.reason(), MismatchReason::Literal { .. }));
    assert_eq!(mismatch.pointer(), "");
}

#[rstest]
#[case::boolean(TypeMarker::Boolean, json!(true), true)]
#[case::boolean_rejects_text(TypeMarker::Boolean, json!("true"), false)]
#[case::number(TypeMarker::Number, json!(3), true)]
#[case::number_rejects_bool(TypeMarker::Number, json!(true), false)]
#[case::string(TypeMarker::String, json!(""), true)]
#[case::string_rejects_null(TypeMarker::String, json!(null), false)]
#[case::list(TypeMarker::List, json!(["a", 1]), true)]
#[case::list_rejects_object(TypeMarker::List, json!({}), false)]
#[case::mapping(TypeMarker::Mapping, json!({"a": 1}), true)]
#[case::mapping_rejects_list(TypeMarker::Mapping, json!([]), false)]
fn type_marker_checks_membership(
    #[case] marker: TypeMarker,
    #[case] instance: Value,
    #[case] expected: bool,
) {
    assert_eq!(Schema::Type(marker).matches(&instance), expected);
}

#[test]
fn type_mismatch_reports_both_kinds() {
    let mismatch = Schema::Type(TypeMarker::Boolean)
        .check(&json!("true"))
        .expect_err("string is not a boolean");
    assert_eq!(
        mismatch.reason(),
        &MismatchReason::Type {
            expected: ValueKind::Boolean,
            found: ValueKind::String,
        }
    );
}

#[rstest]
#[case::too_many(json!(["a", "b"]), 1, 2)]
#[case::too_few(json!([]), 1, 0)]
fn sequence_length_mismatch_ignores_content(
    #[case] instance: Value,
    #[case] expected: usize,
    #[case] found: usize,
) {
    let schema = Schema::sequence([Schema::Type(TypeMarker::String)]);
    let mismatch = schema.check(&instance).expect_err("length differs");
    assert_eq!(
        mismatch.reason(),
        &MismatchReason::Length { expected, found }
    );
}

#[test]
fn sequence_matches_positionally() {
    let schema = Schema::sequence([
        Schema::Type(TypeMarker::String),
        Schema::Type(TypeMarker::Boolean),
    ]);
    assert!(schema.matches(&json!(["x", true])));

    let mismatch = schema
        .check(&json!([true, "x"]))
        .expect_err("order matters");
    assert_eq!(mismatch.pointer(), "/0");
}

#[test]
fn sequence_schema_rejects_non_list() {
    let schema = Schema::sequence([]);
    let mismatch = schema.check(&json!({})).expect_err("object is not a list");
    assert_eq!(
        mismatch.reason(),
        &MismatchReason::Type {
            expected: ValueKind::List,
            found: ValueKind::Mapping,
        }
    );
}

#[test]
fn empty_sequence_matches_empty_list() {
    assert!(Schema::sequence([]).matches(&json!([])));
}

fn options_schema() -> Schema {
    Schema::mapping([
        ("armor", Schema::literal(true)),
        ("minimal", Schema::Type(TypeMarker::Boolean)),
    ])
}

#[test]
fn mapping_matches_exact_key_set() {
    assert!(options_schema().matches(&json!({"armor": true, "minimal": false})));
}

#[test]
fn mapping_rejects_extra_key() {
    let mismatch = options_schema()
        .check(&json!({"armor": true, "minimal": false, "secret": true}))
        .expect_err("extra key must fail");
    assert_eq!(
        mismatch.reason(),
        &MismatchReason::UnexpectedKey {
            key: String::from("secret")
        }
    );
}

#[test]
fn mapping_rejects_missing_key() {
    let mismatch = options_schema()
        .check(&json!({"armor": true}))
        .expect_err("missing key must fail");
    assert_eq!(
        mismatch.reason(),
        &MismatchReason::MissingKey {
            key: String::from("minimal")
        }
    );
}

#[test]
fn nested_mismatch_reports_escaped_pointer() {
    let schema = Schema::sequence([Schema::mapping([(
        "a/b~c",
        Schema::sequence([Schema::literal(true)]),
    )])]);
    let mismatch = schema
        .check(&json!([{"a/b~c": [false]}]))
        .expect_err("nested literal differs");
    assert_eq!(mismatch.pointer(), "/0/a~1b~0c/0");
    assert_eq!(
        mismatch.to_string(),
        "expected literal true, found boolean at '/0/a~1b~0c/0'"
    );
}

#[test]
fn check_sequence_roots_pointer_at_slice() {
    let schemas = [Schema::Type(TypeMarker::String), Schema::Type(TypeMarker::String)];
    let mismatch = Schema::check_sequence(&schemas, &[json!("sig"), json!(7)])
        .expect_err("second element is not a string")
        .within("/args");
    assert_eq!(mismatch.pointer(), "/args/1");
}
