// crates/coding-scheme-core/tests/wire_format.rs
// ============================================================================
// Module: Wire Format Tests
// Description: JSON shapes of schemes and responses as authored by the editor.
// Purpose: Ensure serde attributes accept the camelCase documents in use.
// ============================================================================

//! JSON wire format tests.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use coding_scheme_core::ArrayAggregate;
use coding_scheme_core::CodingScheme;
use coding_scheme_core::DeriveOptions;
use coding_scheme_core::ProcessingDirective;
use coding_scheme_core::Response;
use coding_scheme_core::ResponseStatus;
use coding_scheme_core::RuleMethod;
use coding_scheme_core::SourceType;
use coding_scheme_core::ValueArrayPos;
use serde_json::json;

#[test]
fn scheme_document_deserializes() {
    let document = json!({
        "variableCodings": [
            {
                "id": "q1",
                "label": "Question 1",
                "sourceType": "BASE",
                "processing": ["IGNORE_CASE", "IGNORE_ALL_SPACES", "REPLAY_REQUIRED"],
                "fragmenting": "",
                "codes": [
                    {
                        "id": 1,
                        "score": 2,
                        "ruleSetOperatorAnd": false,
                        "ruleSets": [
                            {
                                "ruleOperatorAnd": true,
                                "valueArrayPos": "SUM",
                                "rules": [
                                    {"method": "NUMERIC_RANGE", "parameters": ["1", "5"]}
                                ]
                            }
                        ]
                    },
                    {"id": null, "ruleSets": [{"rules": [{"method": "ELSE"}]}]}
                ]
            },
            {"id": "q2", "sourceType": "FORMULA", "deriveSources": ["q1"]}
        ]
    });
    let scheme: CodingScheme = serde_json::from_value(document).unwrap();
    let first = &scheme.variable_codings[0];
    assert_eq!(first.processing[1], ProcessingDirective::RemoveAllSpaces);
    assert_eq!(first.fragment_pattern(), None);
    let rule_set = &first.codes[0].rule_sets[0];
    assert_eq!(rule_set.value_array_pos, Some(ValueArrayPos::Aggregate(ArrayAggregate::Sum)));
    assert_eq!(rule_set.rules[0].method, RuleMethod::NumericRange);
    assert!(first.codes[1].is_fallback());
    assert_eq!(first.codes[1].id, None);
    assert_eq!(scheme.variable_codings[1].source_type, SourceType::Unknown);
}

#[test]
fn responses_round_trip_through_coding() {
    let scheme: CodingScheme = serde_json::from_value(json!({
        "variableCodings": [{
            "id": "q1",
            "codes": [{"id": 3, "score": 1, "ruleSets": [{"rules": [
                {"method": "MATCH", "parameters": ["b"], "fragment": 1}
            ]}]}],
            "fragmenting": "(\\w)-(\\w)"
        }]
    }))
    .unwrap();
    let responses: Vec<Response> = serde_json::from_value(json!([
        {"id": "q1", "value": "a-b", "status": "VALUE_CHANGED"},
        {"id": "q9", "value": [1, "x", null], "state": "DISPLAYED"}
    ]))
    .unwrap();
    assert!(responses[1].value.is_list());

    let coded = scheme.code(&responses, &DeriveOptions::new("_")).unwrap();
    assert_eq!(coded[0].status, ResponseStatus::CodingComplete);
    assert_eq!(coded[0].code, Some(3));

    let rendered = serde_json::to_value(&coded).unwrap();
    assert_eq!(rendered[0]["status"], "CODING_COMPLETE");
    assert_eq!(rendered[0]["code"], 3);
    assert_eq!(rendered[1]["status"], "NO_CODING");
    assert_eq!(rendered[1]["value"], json!([1.0, "x", null]));
}
