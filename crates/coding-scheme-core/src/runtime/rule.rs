// crates/coding-scheme-core/src/runtime/rule.rs
// ============================================================================
// Module: Rule Evaluator
// Description: Compiled single-rule matchers and applicability checks.
// Purpose: Decide whether one scalar satisfies one coding rule.
// Dependencies: crate::core, crate::runtime::normalize, regex, thiserror
// ============================================================================

//! ## Overview
//! A [`CodingRule`] is compiled once into a [`CompiledRule`]: numeric
//! parameters are parsed, newline-delimited candidate lists split, and
//! regular expressions built. Compilation errors and applicability errors
//! (a numeric rule on a non-numeric value) are [`RuleError`]s.
//!
//! Matching itself is total. Null and empty strings never satisfy MATCH or
//! MATCH_REGEX, and ELSE always matches.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::borrow::Cow;
use std::cmp::Ordering;

use regex::Regex;
use thiserror::Error;

use crate::core::CodingRule;
use crate::core::RuleMethod;
use crate::core::ScalarValue;
use crate::core::ValueRequirement;
use crate::runtime::normalize::coerce_number;
use crate::runtime::normalize::is_boolean_like;
use crate::runtime::normalize::parse_number_text;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Rule compilation and applicability failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuleError {
    /// A required numeric parameter is missing.
    #[error("{method} requires a numeric parameter")]
    MissingParameter {
        /// Rule method name.
        method: &'static str,
    },
    /// A numeric parameter does not parse.
    #[error("{method} parameter `{parameter}` is not numeric")]
    NonNumericParameter {
        /// Rule method name.
        method: &'static str,
        /// Offending parameter.
        parameter: String,
    },
    /// NUMERIC_RANGE bounds are not strictly increasing.
    #[error("NUMERIC_RANGE lower bound {lower} must be below upper bound {upper}")]
    InvertedRange {
        /// Exclusive lower bound.
        lower: f64,
        /// Inclusive upper bound.
        upper: f64,
    },
    /// A MATCH_REGEX line is not a valid regular expression.
    #[error("MATCH_REGEX pattern `{pattern}` is invalid: {reason}")]
    InvalidPattern {
        /// Offending pattern line.
        pattern: String,
        /// Compiler diagnostic.
        reason: String,
    },
    /// A numeric rule was applied to a non-numeric value.
    #[error("{method} cannot be applied to a non-numeric value")]
    NotNumeric {
        /// Rule method name.
        method: &'static str,
    },
    /// A boolean rule was applied to a non-boolean value.
    #[error("{method} cannot be applied to a non-boolean value")]
    NotBoolean {
        /// Rule method name.
        method: &'static str,
    },
    /// A fixed list position was addressed on a value that is not a list.
    #[error("rule set addresses list position {position} but the value is not a list")]
    PositionOnScalar {
        /// Addressed position.
        position: i64,
    },
}

// ============================================================================
// SECTION: Compiled Rules
// ============================================================================

/// Coding rule ready for repeated evaluation.
#[derive(Debug, Clone)]
pub struct CompiledRule<'r> {
    /// Source rule.
    rule: &'r CodingRule,
    /// Method-specific matcher.
    matcher: Matcher,
}

/// Method-specific matching state.
#[derive(Debug, Clone)]
enum Matcher {
    /// Text equality against candidate lines.
    Text(Vec<String>),
    /// Unanchored regex search against pattern lines.
    Pattern(Vec<Regex>),
    /// Numeric comparison against one operand.
    Compare {
        /// Accepted relation of value to operand.
        comparison: Comparison,
        /// Parsed operand.
        operand: f64,
    },
    /// Half-open numeric range `(lower, upper]`.
    Range {
        /// Exclusive lower bound.
        lower: f64,
        /// Inclusive upper bound.
        upper: f64,
    },
    /// Text value that is the empty string.
    Empty,
    /// Null value.
    Null,
    /// Truthy value.
    True,
    /// Falsy value.
    False,
    /// Unconditional match.
    Always,
}

/// Relation a numeric rule accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Comparison {
    /// `value == operand`.
    Equal,
    /// `value < operand`.
    Less,
    /// `value <= operand`.
    AtMost,
    /// `value > operand`.
    Greater,
    /// `value >= operand`.
    AtLeast,
}

impl Comparison {
    /// Returns true when the ordering of value to operand is accepted.
    const fn accepts(self, ordering: Ordering) -> bool {
        match self {
            Self::Equal => ordering.is_eq(),
            Self::Less => ordering.is_lt(),
            Self::AtMost => ordering.is_le(),
            Self::Greater => ordering.is_gt(),
            Self::AtLeast => ordering.is_ge(),
        }
    }
}

impl<'r> CompiledRule<'r> {
    /// Compiles a rule.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError`] for missing or non-numeric parameters, inverted
    /// ranges, and invalid regular expressions.
    pub fn compile(rule: &'r CodingRule) -> Result<Self, RuleError> {
        let method = rule.method;
        let matcher = match method {
            RuleMethod::Match => Matcher::Text(
                parameter_lines(&rule.parameters).map(str::to_string).collect(),
            ),
            RuleMethod::MatchRegex => Matcher::Pattern(
                parameter_lines(&rule.parameters)
                    .map(|line| {
                        Regex::new(line).map_err(|err| RuleError::InvalidPattern {
                            pattern: line.to_string(),
                            reason: err.to_string(),
                        })
                    })
                    .collect::<Result<_, _>>()?,
            ),
            RuleMethod::NumericMatch => compare(rule, Comparison::Equal)?,
            RuleMethod::NumericLessThan => compare(rule, Comparison::Less)?,
            RuleMethod::NumericMax => compare(rule, Comparison::AtMost)?,
            RuleMethod::NumericMoreThan => compare(rule, Comparison::Greater)?,
            RuleMethod::NumericMin => compare(rule, Comparison::AtLeast)?,
            RuleMethod::NumericRange => {
                let lower = numeric_parameter(rule, 0)?;
                let upper = numeric_parameter(rule, 1)?;
                if lower >= upper {
                    return Err(RuleError::InvertedRange {
                        lower,
                        upper,
                    });
                }
                Matcher::Range {
                    lower,
                    upper,
                }
            }
            RuleMethod::IsEmpty => Matcher::Empty,
            RuleMethod::IsNull => Matcher::Null,
            RuleMethod::IsTrue => Matcher::True,
            RuleMethod::IsFalse => Matcher::False,
            RuleMethod::Else => Matcher::Always,
        };
        Ok(Self {
            rule,
            matcher,
        })
    }

    /// Returns the source rule.
    #[must_use]
    pub const fn rule(&self) -> &'r CodingRule {
        self.rule
    }

    /// Returns the fragment position the rule is scoped to, if any.
    #[must_use]
    pub fn fragment(&self) -> Option<usize> {
        self.rule.fragment_index()
    }

    /// Checks that the rule can be applied to the value.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::NotNumeric`] or [`RuleError::NotBoolean`] when the
    /// value does not fit the method.
    pub fn check_applicable(&self, value: &ScalarValue) -> Result<(), RuleError> {
        let method = self.rule.method.as_str();
        match self.rule.method.value_requirement() {
            ValueRequirement::Any => Ok(()),
            ValueRequirement::Numeric => match coerce_number(value) {
                Some(_) => Ok(()),
                None => Err(RuleError::NotNumeric {
                    method,
                }),
            },
            ValueRequirement::Boolean => {
                if is_boolean_like(value) {
                    Ok(())
                } else {
                    Err(RuleError::NotBoolean {
                        method,
                    })
                }
            }
        }
    }

    /// Returns true when the value satisfies the rule.
    #[must_use]
    pub fn matches(&self, value: &ScalarValue, ignore_case: bool) -> bool {
        match &self.matcher {
            Matcher::Text(candidates) => match_text(value).is_some_and(|text| {
                candidates.iter().any(|candidate| text_equals(&text, candidate, ignore_case))
            }),
            Matcher::Pattern(patterns) => match_text(value)
                .is_some_and(|text| patterns.iter().any(|pattern| pattern.is_match(&text))),
            Matcher::Compare {
                comparison,
                operand,
            } => coerce_number(value)
                .and_then(|number| number.partial_cmp(operand))
                .is_some_and(|ordering| comparison.accepts(ordering)),
            Matcher::Range { lower, upper } => {
                coerce_number(value).is_some_and(|number| number > *lower && number <= *upper)
            }
            Matcher::Empty => value.as_text().is_some_and(str::is_empty),
            Matcher::Null => value.is_null(),
            Matcher::True => match value {
                ScalarValue::Boolean(flag) => *flag,
                ScalarValue::Text(text) => matches!(text.as_str(), "true" | "1"),
                ScalarValue::Null | ScalarValue::Number(_) => false,
            },
            Matcher::False => match value {
                ScalarValue::Boolean(flag) => !*flag,
                ScalarValue::Text(text) => matches!(text.as_str(), "false" | "0"),
                ScalarValue::Null | ScalarValue::Number(_) => false,
            },
            Matcher::Always => true,
        }
    }
}

/// Compiles a rule against a single scalar value and evaluates it.
///
/// # Errors
///
/// Returns [`RuleError`] when the rule does not compile or cannot be applied
/// to the value.
pub fn evaluate_rule(
    value: &ScalarValue,
    rule: &CodingRule,
    ignore_case: bool,
) -> Result<bool, RuleError> {
    let compiled = CompiledRule::compile(rule)?;
    compiled.check_applicable(value)?;
    Ok(compiled.matches(value, ignore_case))
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Yields the non-empty lines of all parameters.
fn parameter_lines(parameters: &[String]) -> impl Iterator<Item = &str> {
    parameters.iter().flat_map(|parameter| parameter.lines()).filter(|line| !line.is_empty())
}

/// Builds a comparison matcher from the first parameter.
fn compare(rule: &CodingRule, comparison: Comparison) -> Result<Matcher, RuleError> {
    let operand = numeric_parameter(rule, 0)?;
    Ok(Matcher::Compare {
        comparison,
        operand,
    })
}

/// Parses the numeric parameter at `index`.
fn numeric_parameter(rule: &CodingRule, index: usize) -> Result<f64, RuleError> {
    let method = rule.method.as_str();
    let parameter = rule
        .parameters
        .get(index)
        .filter(|parameter| !parameter.trim().is_empty())
        .ok_or(RuleError::MissingParameter {
            method,
        })?;
    parse_number_text(parameter).ok_or_else(|| RuleError::NonNumericParameter {
        method,
        parameter: parameter.clone(),
    })
}

/// Returns the matchable text of a value; null and empty text have none.
fn match_text(value: &ScalarValue) -> Option<Cow<'_, str>> {
    value.as_match_text().filter(|text| !text.is_empty())
}

/// Compares text, uppercasing both sides when case is ignored.
fn text_equals(value: &str, candidate: &str, ignore_case: bool) -> bool {
    if ignore_case {
        let upper = |text: &str| text.chars().flat_map(char::to_uppercase).collect::<String>();
        upper(value) == upper(candidate)
    } else {
        value == candidate
    }
}
