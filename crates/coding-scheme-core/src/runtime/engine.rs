// crates/coding-scheme-core/src/runtime/engine.rs
// ============================================================================
// Module: Code Resolution Engine
// Description: First-match code resolution with ELSE fallback.
// Purpose: Assign status, code, and score to one response.
// Dependencies: crate::core, crate::runtime::{logic, normalize, ruleset, trace}, thiserror
// ============================================================================

//! ## Overview
//! Codes are scanned in authoring order. A code whose rule sets contain an
//! ELSE rule is only recorded as the fallback, replacing any earlier one;
//! any other code is compiled, validated against the normalized value, and
//! evaluated. The first matching code wins, a validation failure stops the
//! scan, and the last recorded fallback applies when nothing matched.
//!
//! The engine never mutates its input: [`code_response`] returns a copy of
//! the response carrying the outcome.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::ops::ControlFlow;

use thiserror::Error;

use crate::core::CodeData;
use crate::core::NormalizedValue;
use crate::core::ProcessingDirective;
use crate::core::Response;
use crate::core::ResponseStatus;
use crate::core::VariableCodingData;
use crate::runtime::logic::CombineMode;
use crate::runtime::normalize::NormalizationError;
use crate::runtime::normalize::normalize_value;
use crate::runtime::rule::RuleError;
use crate::runtime::ruleset::CompiledRuleSet;
use crate::runtime::trace::CodingTrace;
use crate::runtime::trace::NoopTrace;

// ============================================================================
// SECTION: Outcomes
// ============================================================================

/// Reason a response ended in `CODING_ERROR`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodingFailure {
    /// The value could not be normalized.
    #[error(transparent)]
    Normalization(#[from] NormalizationError),
    /// A rule of the code at `index` failed to compile or validate.
    #[error("code at position {index}: {error}")]
    Rule {
        /// Position of the failing code in the coding.
        index: usize,
        /// Underlying rule failure.
        #[source]
        error: RuleError,
    },
}

/// Result of resolving codes for a normalized value.
#[derive(Debug, Clone, PartialEq)]
pub enum CodeOutcome {
    /// Resolution failed; the response becomes `CODING_ERROR`.
    Error(CodingFailure),
    /// The matched (or fallback) code has no id; the response becomes `INVALID`.
    Invalid,
    /// A code was assigned.
    Matched {
        /// Assigned code id.
        code: i64,
        /// Assigned score.
        score: f64,
    },
    /// Nothing matched and no fallback exists.
    NoMatch,
}

impl CodeOutcome {
    /// Maps a code's id and score to an outcome.
    const fn assign(id: Option<i64>, score: f64) -> Self {
        match id {
            Some(code) => Self::Matched {
                code,
                score,
            },
            None => Self::Invalid,
        }
    }

    /// Returns the response status this outcome produces.
    #[must_use]
    pub const fn status(&self) -> ResponseStatus {
        match self {
            Self::Error(_) => ResponseStatus::CodingError,
            Self::Invalid => ResponseStatus::Invalid,
            Self::Matched { .. } => ResponseStatus::CodingComplete,
            Self::NoMatch => ResponseStatus::CodingIncomplete,
        }
    }

    /// Applies the outcome to a response.
    ///
    /// Errors and `INVALID` keep the incoming code and score; no match resets
    /// both to zero.
    #[must_use]
    pub fn apply(&self, response: Response) -> Response {
        let response = response.with_status(self.status());
        match self {
            Self::Matched { code, score } => response.with_code(*code, *score),
            Self::NoMatch => response.with_code(0, 0.0),
            Self::Error(_) | Self::Invalid => response,
        }
    }
}

// ============================================================================
// SECTION: Code Resolution
// ============================================================================

/// Fallback candidate recorded from an ELSE code.
#[derive(Debug, Clone, Copy)]
struct Fallback {
    /// Code id of the fallback.
    id: Option<i64>,
    /// Score of the fallback.
    score: f64,
}

/// Resolves the codes of `coding` against an already normalized value.
pub fn resolve_codes<T>(
    value: &NormalizedValue,
    coding: &VariableCodingData,
    trace: &mut T,
) -> CodeOutcome
where
    T: CodingTrace + ?Sized,
{
    let ignore_case = coding.has_directive(ProcessingDirective::IgnoreCase);
    let scan = coding.codes.iter().enumerate().try_fold(
        None::<Fallback>,
        |fallback, (index, code)| {
            if code.is_fallback() {
                trace.on_fallback_recorded(index, code);
                return ControlFlow::Continue(Some(Fallback {
                    id: code.id,
                    score: code.score,
                }));
            }
            match evaluate_code(code, value, ignore_case, trace) {
                Ok(true) => {
                    trace.on_code_evaluated(index, code, true);
                    ControlFlow::Break(CodeOutcome::assign(code.id, code.score))
                }
                Ok(false) => {
                    trace.on_code_evaluated(index, code, false);
                    ControlFlow::Continue(fallback)
                }
                Err(error) => ControlFlow::Break(CodeOutcome::Error(CodingFailure::Rule {
                    index,
                    error,
                })),
            }
        },
    );
    match scan {
        ControlFlow::Break(outcome) => outcome,
        ControlFlow::Continue(Some(fallback)) => CodeOutcome::assign(fallback.id, fallback.score),
        ControlFlow::Continue(None) => CodeOutcome::NoMatch,
    }
}

/// Compiles, validates, and evaluates one non-fallback code.
fn evaluate_code<T>(
    code: &CodeData,
    value: &NormalizedValue,
    ignore_case: bool,
    trace: &mut T,
) -> Result<bool, RuleError>
where
    T: CodingTrace + ?Sized,
{
    let rule_sets = code
        .rule_sets
        .iter()
        .map(CompiledRuleSet::compile)
        .collect::<Result<Vec<_>, _>>()?;
    rule_sets.iter().try_for_each(|rule_set| rule_set.validate(value))?;
    Ok(CombineMode::from_and_flag(code.rule_set_operator_and)
        .evaluate(&rule_sets, |rule_set| rule_set.matches(value, ignore_case, trace)))
}

// ============================================================================
// SECTION: Response Coding
// ============================================================================

/// Codes one response.
#[must_use]
pub fn code_response(response: &Response, coding: &VariableCodingData) -> Response {
    code_response_with_trace(response, coding, &mut NoopTrace)
}

/// Codes one response, reporting evaluation steps to `trace`.
///
/// A coding without codes yields `NO_CODING` and leaves code and score as
/// they were.
pub fn code_response_with_trace<T>(
    response: &Response,
    coding: &VariableCodingData,
    trace: &mut T,
) -> Response
where
    T: CodingTrace + ?Sized,
{
    if coding.codes.is_empty() {
        let coded = response.clone().with_status(ResponseStatus::NoCoding);
        trace.on_response_coded(&coded, None);
        return coded;
    }
    let normalized =
        normalize_value(&response.value, &coding.processing, coding.fragment_pattern());
    let outcome = match normalized {
        Ok(value) => resolve_codes(&value, coding, trace),
        Err(error) => CodeOutcome::Error(CodingFailure::Normalization(error)),
    };
    let coded = outcome.apply(response.clone());
    trace.on_response_coded(&coded, Some(&outcome));
    coded
}
