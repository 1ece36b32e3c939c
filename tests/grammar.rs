//! Grammar conformance tests: each malformed input must fail with the
//! specific error kind the grammar prescribes, not merely "some error".

use dynadata::{decode, Error};
use rstest::rstest;

mod common;

#[rstest]
#[case::bad_second_decimal_point("1.23456.7")]
#[case::dangling_exponent_sign("1e+")]
#[case::no_digit_after_decimal("1.")]
fn rejects_with_number_error(#[case] input: &str) {
    match decode(input) {
        Err(Error::Number { .. }) => {}
        other => panic!("expected NumberError for {input:?}, got {other:?}"),
    }
}

#[rstest]
#[case::unquoted_identifier("BadString")]
#[case::uppercase_literal("TRUE")]
#[case::trailing_comma_in_array(r#"[ "x", ]"#)]
#[case::trailing_comma_in_object("{ , }")]
fn rejects_with_parse_error(#[case] input: &str) {
    match decode(input) {
        Err(Error::Parse { .. }) => {}
        other => panic!("expected ParseError for {input:?}, got {other:?}"),
    }
}

#[rstest]
#[case::unknown_escape(r#""Bad Character \k""#)]
fn rejects_with_format_error(#[case] input: &str) {
    match decode(input) {
        Err(Error::Format { .. }) => {}
        other => panic!("expected FormatError for {input:?}, got {other:?}"),
    }
}

#[test]
fn unicode_escape_decodes_to_world() {
    let doc = decode(r#""\u0057orld""#).unwrap();
    assert_eq!(doc.as_string().unwrap(), "World");
}

#[test]
fn euro_sign_escape_round_trips_with_forced_ucs2() {
    use dynadata::{encode, EncodeOptions};

    let doc = decode(r#""Euro sign: \u20ac""#).unwrap();
    assert_eq!(doc.as_string().unwrap(), "Euro sign: \u{20AC}");

    let opts = EncodeOptions::pretty().with_force_ucs2(true);
    assert_eq!(encode(&doc, &opts).unwrap(), "\"Euro sign: \\u20ac\"");
}

#[test]
fn whitespace_is_tolerated_between_tokens() {
    let doc = decode("{\"whitespace\":  \n\t\nnull }\n").unwrap();
    assert_eq!(doc.member_names().unwrap(), vec!["whitespace"]);
    assert!(doc["whitespace"].is_null());
}

#[test]
fn object_round_trip_pretty_modulo_whitespace() {
    common::init_tracing();
    let input = r#"{
    "NullValue": null,
    "BooleanValue": true,
    "IntValue": 42,
    "ArrayValue": [32, "string", true, null]
}"#;
    let doc = decode(input).unwrap();
    let out = dynadata::encode(&doc, &dynadata::EncodeOptions::pretty()).unwrap();
    let reparsed = decode(&out).unwrap();
    assert_eq!(doc, reparsed);
}

#[test]
fn compact_encode_matches_scenario_s2() {
    use dynadata::DynamicData;

    let mut doc = DynamicData::object();
    doc.add_member("Member1", 1234i64.into()).unwrap();
    let mut nested = DynamicData::object();
    nested.add_member("NestedMember", "NestedValue".into()).unwrap();
    doc.add_member("Member2", nested).unwrap();

    let out = dynadata::encode(&doc, &dynadata::EncodeOptions::default()).unwrap();
    assert_eq!(out, r#"{"Member1":1234,"Member2":{"NestedMember":"NestedValue"}}"#);
}
