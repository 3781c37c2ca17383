// crates/coding-scheme-core/tests/scheme.rs
// ============================================================================
// Module: Scheme Coder Tests
// Description: Response-set coding with derived variables.
// Purpose: Pin ordering, replacement, and failure handling of scheme coding.
// ============================================================================

//! Scheme coding tests.

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

mod support;

use coding_scheme_core::CodingScheme;
use coding_scheme_core::DeriveOptions;
use coding_scheme_core::Response;
use coding_scheme_core::ResponseStatus;
use coding_scheme_core::ResponseValue;
use coding_scheme_core::RuleMethod;
use coding_scheme_core::SchemeError;
use coding_scheme_core::SourceType;
use coding_scheme_core::VariableCodingData;
use support::any_of;
use support::code;
use support::coding;
use support::derived;
use support::rule;

fn yes_no(id: &str) -> VariableCodingData {
    coding(
        id,
        vec![
            code(1, 1.0, vec![any_of(vec![rule(RuleMethod::Match, &["yes"])])]),
            code(2, 0.0, vec![any_of(vec![rule(RuleMethod::Match, &["no"])])]),
        ],
    )
}

fn options() -> DeriveOptions {
    DeriveOptions::new("_")
}

fn find<'a>(responses: &'a [Response], id: &str) -> &'a Response {
    responses.iter().find(|response| response.id.as_str() == id).unwrap()
}

#[test]
fn base_responses_are_coded_in_input_order() {
    let scheme = CodingScheme::new(vec![yes_no("a"), yes_no("b")]);
    let responses = [
        Response::new("b", ResponseValue::text("no")),
        Response::new("a", ResponseValue::text("yes")),
    ];
    let coded = scheme.code(&responses, &options()).unwrap();
    let ids: Vec<&str> = coded.iter().map(|response| response.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a"]);
    assert_eq!(coded[0].code, Some(2));
    assert_eq!(coded[1].code, Some(1));
}

#[test]
fn responses_without_coding_are_marked() {
    let scheme = CodingScheme::new(vec![yes_no("a")]);
    let coded =
        scheme.code(&[Response::new("other", ResponseValue::text("x"))], &options()).unwrap();
    assert_eq!(coded[0].status, ResponseStatus::NoCoding);
}

#[test]
fn derived_sum_is_appended_and_coded() {
    let total = derived(
        "total",
        SourceType::SumCode,
        &["a", "b"],
        vec![code(10, 5.0, vec![any_of(vec![rule(RuleMethod::NumericMatch, &["3"])])])],
    );
    let scheme = CodingScheme::new(vec![total, yes_no("a"), yes_no("b")]);
    let responses = [
        Response::new("a", ResponseValue::text("yes")),
        Response::new("b", ResponseValue::text("no")),
    ];
    let coded = scheme.code(&responses, &options()).unwrap();
    assert_eq!(coded.len(), 3);
    let total = &coded[2];
    assert_eq!(total.id.as_str(), "total");
    assert_eq!(total.value, ResponseValue::number(3.0));
    assert_eq!(total.status, ResponseStatus::CodingComplete);
    assert_eq!((total.code, total.score), (Some(10), Some(5.0)));
}

#[test]
fn derived_variables_follow_dependency_order() {
    let outer = derived("outer", SourceType::ConcatCode, &["inner", "a"], Vec::new());
    let inner = derived(
        "inner",
        SourceType::CopyValue,
        &["a"],
        vec![code(7, 0.0, vec![any_of(vec![rule(RuleMethod::Match, &["yes"])])])],
    );
    let scheme = CodingScheme::new(vec![outer, inner, yes_no("a")]);
    let coded =
        scheme.code(&[Response::new("a", ResponseValue::text("yes"))], &options()).unwrap();
    let ids: Vec<&str> = coded.iter().map(|response| response.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "inner", "outer"]);
    assert_eq!(find(&coded, "inner").code, Some(7));
    assert_eq!(find(&coded, "outer").value, ResponseValue::text("7_1"));
    assert_eq!(find(&coded, "outer").status, ResponseStatus::NoCoding);
}

#[test]
fn derived_value_replaces_stale_input() {
    let copy = derived("copy", SourceType::CopyValue, &["a"], Vec::new());
    let scheme = CodingScheme::new(vec![yes_no("a"), copy]);
    let responses = [
        Response::new("copy", ResponseValue::text("stale")),
        Response::new("a", ResponseValue::text("no")),
    ];
    let coded = scheme.code(&responses, &options()).unwrap();
    assert_eq!(coded.len(), 2);
    assert_eq!(coded[0].id.as_str(), "copy");
    assert_eq!(coded[0].value, ResponseValue::text("no"));
}

#[test]
fn cycles_end_in_derive_error() {
    let first = derived("first", SourceType::CopyValue, &["second"], Vec::new());
    let second = derived("second", SourceType::CopyValue, &["first"], Vec::new());
    let dependent = derived("dependent", SourceType::CopyValue, &["first"], Vec::new());
    let scheme = CodingScheme::new(vec![first, second, dependent]);
    let coded = scheme.code(&[], &options()).unwrap();
    assert_eq!(coded.len(), 3);
    for response in &coded {
        assert_eq!(response.status, ResponseStatus::DeriveError);
        assert_eq!(response.value, ResponseValue::default());
    }
}

#[test]
fn failures_propagate_to_dependents() {
    let solver = derived("solver", SourceType::Solver, &["a"], Vec::new());
    let copy = derived("copy", SourceType::CopyValue, &["solver"], Vec::new());
    let scheme = CodingScheme::new(vec![yes_no("a"), solver, copy]);
    let coded =
        scheme.code(&[Response::new("a", ResponseValue::text("yes"))], &options()).unwrap();
    assert_eq!(find(&coded, "solver").status, ResponseStatus::DeriveError);
    assert_eq!(find(&coded, "copy").status, ResponseStatus::DeriveError);
    assert_eq!(find(&coded, "a").status, ResponseStatus::CodingComplete);
}

#[test]
fn duplicate_codings_are_rejected() {
    let scheme = CodingScheme::new(vec![yes_no("a"), yes_no("a")]);
    let error = scheme.code(&[], &options()).unwrap_err();
    assert_eq!(
        error,
        SchemeError::DuplicateVariable {
            variable: "a".into(),
        }
    );
    assert!(scheme.validate().is_err());
}
