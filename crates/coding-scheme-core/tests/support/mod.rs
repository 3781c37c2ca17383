// crates/coding-scheme-core/tests/support/mod.rs
// ============================================================================
// Module: Test Support
// Description: Builders for codings, codes, rule sets, and rules.
// Purpose: Keep integration tests focused on behavior instead of setup.
// Dependencies: coding-scheme-core
// ============================================================================

//! Shared builders for coding-scheme-core integration tests.

#![allow(dead_code, reason = "Each test binary uses a different subset of helpers.")]

use coding_scheme_core::CodeData;
use coding_scheme_core::CodingRule;
use coding_scheme_core::ProcessingDirective;
use coding_scheme_core::RuleMethod;
use coding_scheme_core::RuleSet;
use coding_scheme_core::SourceType;
use coding_scheme_core::ValueArrayPos;
use coding_scheme_core::VariableCodingData;
use coding_scheme_core::VariableId;

/// Builds a rule with text parameters.
pub fn rule(method: RuleMethod, parameters: &[&str]) -> CodingRule {
    CodingRule::new(method, parameters.iter().copied())
}

/// Builds an OR rule set.
pub fn any_of(rules: Vec<CodingRule>) -> RuleSet {
    RuleSet {
        rule_operator_and: false,
        value_array_pos: None,
        rules,
    }
}

/// Builds an AND rule set.
pub fn all_of(rules: Vec<CodingRule>) -> RuleSet {
    RuleSet {
        rule_operator_and: true,
        value_array_pos: None,
        rules,
    }
}

/// Scopes a rule set to a list position or aggregate.
pub fn at_position(mut rule_set: RuleSet, position: ValueArrayPos) -> RuleSet {
    rule_set.value_array_pos = Some(position);
    rule_set
}

/// Builds a code whose rule sets combine with OR.
pub fn code(id: i64, score: f64, rule_sets: Vec<RuleSet>) -> CodeData {
    CodeData {
        rule_sets,
        ..CodeData::new(Some(id), score)
    }
}

/// Builds a code with the given rule sets combined with AND.
pub fn code_all(id: i64, score: f64, rule_sets: Vec<RuleSet>) -> CodeData {
    CodeData {
        rule_set_operator_and: true,
        ..code(id, score, rule_sets)
    }
}

/// Builds an ELSE fallback code.
pub fn fallback(id: Option<i64>, score: f64) -> CodeData {
    CodeData {
        rule_sets: vec![any_of(vec![rule(RuleMethod::Else, &[])])],
        ..CodeData::new(id, score)
    }
}

/// Builds a base coding.
pub fn coding(id: &str, codes: Vec<CodeData>) -> VariableCodingData {
    VariableCodingData {
        codes,
        ..VariableCodingData::new(id)
    }
}

/// Adds processing directives to a coding.
pub fn with_processing(
    mut coding: VariableCodingData,
    directives: &[ProcessingDirective],
) -> VariableCodingData {
    coding.processing = directives.to_vec();
    coding
}

/// Adds a fragmenting pattern to a coding.
pub fn with_fragmenting(mut coding: VariableCodingData, pattern: &str) -> VariableCodingData {
    coding.fragmenting = Some(pattern.to_string());
    coding
}

/// Builds a derived coding.
pub fn derived(
    id: &str,
    source_type: SourceType,
    sources: &[&str],
    codes: Vec<CodeData>,
) -> VariableCodingData {
    VariableCodingData {
        source_type,
        derive_sources: sources.iter().map(|source| VariableId::new(*source)).collect(),
        codes,
        ..VariableCodingData::new(id)
    }
}
