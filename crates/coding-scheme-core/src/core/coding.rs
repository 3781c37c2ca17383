// crates/coding-scheme-core/src/core/coding.rs
// ============================================================================
// Module: Coding Definitions
// Description: Variable codings, codes, rule sets, and coding rules.
// Purpose: Define the declarative coding rules evaluated per variable.
// Dependencies: crate::core::identifiers, serde
// ============================================================================

//! ## Overview
//! A [`VariableCodingData`] is the read-only configuration for one variable:
//! how to derive its value, how to preprocess it, and an ordered list of
//! [`CodeData`] entries. Each code holds rule sets, and each rule set holds
//! [`CodingRule`]s. Field names follow the camelCase JSON produced by the
//! scheme editor.
//!
//! Method and directive names are closed enumerations. Historical spellings
//! are accepted only through serde aliases so the evaluator never sees them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::VariableId;

// ============================================================================
// SECTION: Coding Scheme
// ============================================================================

/// Collection of variable codings for one instrument.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodingScheme {
    /// Codings in authoring order.
    #[serde(default)]
    pub variable_codings: Vec<VariableCodingData>,
}

impl CodingScheme {
    /// Creates a scheme from the given codings.
    #[must_use]
    pub const fn new(variable_codings: Vec<VariableCodingData>) -> Self {
        Self {
            variable_codings,
        }
    }
}

// ============================================================================
// SECTION: Variable Coding
// ============================================================================

/// Coding definition for a single variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableCodingData {
    /// Variable identifier.
    pub id: VariableId,
    /// Display label; not evaluated.
    #[serde(default)]
    pub label: String,
    /// How the variable's value is obtained.
    #[serde(default)]
    pub source_type: SourceType,
    /// Ordered source variables for derived variables.
    #[serde(default)]
    pub derive_sources: Vec<VariableId>,
    /// Processing directives applied before matching.
    #[serde(default)]
    pub processing: Vec<ProcessingDirective>,
    /// Optional fragmenting pattern (capture groups become fragments).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fragmenting: Option<String>,
    /// Instruction for human coders; not evaluated.
    #[serde(default)]
    pub manual_instruction: String,
    /// Codes in evaluation order.
    #[serde(default)]
    pub codes: Vec<CodeData>,
}

impl VariableCodingData {
    /// Creates an empty base coding for the given variable.
    #[must_use]
    pub fn new(id: impl Into<VariableId>) -> Self {
        Self {
            id: id.into(),
            label: String::new(),
            source_type: SourceType::Base,
            derive_sources: Vec::new(),
            processing: Vec::new(),
            fragmenting: None,
            manual_instruction: String::new(),
            codes: Vec::new(),
        }
    }

    /// Returns true when the directive is present.
    #[must_use]
    pub fn has_directive(&self, directive: ProcessingDirective) -> bool {
        self.processing.contains(&directive)
    }

    /// Returns the fragmenting pattern when one is configured and non-empty.
    #[must_use]
    pub fn fragment_pattern(&self) -> Option<&str> {
        self.fragmenting.as_deref().filter(|pattern| !pattern.is_empty())
    }
}

/// Source of a variable's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceType {
    /// Value recorded directly from the respondent.
    #[default]
    Base,
    /// Copy of the first source's value.
    CopyValue,
    /// Source codes joined by a delimiter.
    ConcatCode,
    /// Sum of source codes.
    SumCode,
    /// Sum of source scores.
    SumScore,
    /// Whether all source values are distinct.
    UniqueValues,
    /// Mathematical expression over source values (not evaluated here).
    Solver,
    /// Source type not known to this engine.
    #[serde(other)]
    Unknown,
}

impl SourceType {
    /// Returns the canonical wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Base => "BASE",
            Self::CopyValue => "COPY_VALUE",
            Self::ConcatCode => "CONCAT_CODE",
            Self::SumCode => "SUM_CODE",
            Self::SumScore => "SUM_SCORE",
            Self::UniqueValues => "UNIQUE_VALUES",
            Self::Solver => "SOLVER",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Returns true for variables whose value is computed from other variables.
    #[must_use]
    pub const fn is_derived(self) -> bool {
        !matches!(self, Self::Base)
    }
}

/// Preprocessing directive attached to a coding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessingDirective {
    /// Remove every whitespace character.
    #[serde(alias = "IGNORE_ALL_SPACES")]
    RemoveAllSpaces,
    /// Trim and collapse whitespace runs to one space.
    #[serde(alias = "IGNORE_DISPENSABLE_SPACES")]
    RemoveDispensableSpaces,
    /// Lowercase text before matching.
    ToLowerCase,
    /// Compare text case-insensitively.
    IgnoreCase,
    /// Sort list values before matching.
    SortArray,
    /// Human coders need the task replayed; no effect on evaluation.
    ReplayRequired,
    /// Human coders need an attachment; no effect on evaluation.
    Attachment,
}

// ============================================================================
// SECTION: Codes
// ============================================================================

/// One possible coding outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeData {
    /// Code assigned on match; `None` marks "recognized, not codable".
    pub id: Option<i64>,
    /// Display label; not evaluated.
    #[serde(default)]
    pub label: String,
    /// Score assigned on match.
    #[serde(default)]
    pub score: f64,
    /// Combine rule sets with AND (true) or OR (false).
    #[serde(default)]
    pub rule_set_operator_and: bool,
    /// Rule sets in evaluation order.
    #[serde(default)]
    pub rule_sets: Vec<RuleSet>,
    /// Instruction for human coders; not evaluated.
    #[serde(default)]
    pub manual_instruction: String,
}

impl CodeData {
    /// Creates a code with the given id and score and no rule sets.
    #[must_use]
    pub const fn new(id: Option<i64>, score: f64) -> Self {
        Self {
            id,
            label: String::new(),
            score,
            rule_set_operator_and: false,
            rule_sets: Vec::new(),
            manual_instruction: String::new(),
        }
    }

    /// Returns true when any rule set contains an ELSE rule.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.rule_sets
            .iter()
            .any(|rule_set| rule_set.rules.iter().any(|rule| rule.method == RuleMethod::Else))
    }
}

/// Group of rules combined by AND/OR, optionally scoped to one array position.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSet {
    /// Combine rules with AND (true) or OR (false).
    #[serde(default)]
    pub rule_operator_and: bool,
    /// Optional list position or aggregate the rules apply to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_array_pos: Option<ValueArrayPos>,
    /// Rules in evaluation order.
    #[serde(default)]
    pub rules: Vec<CodingRule>,
}

impl RuleSet {
    /// Returns the effective array addressing, dropping negative indexes.
    #[must_use]
    pub fn array_position(&self) -> Option<ValueArrayPos> {
        match self.value_array_pos {
            Some(ValueArrayPos::Index(index)) if index < 0 => None,
            other => other,
        }
    }
}

/// List addressing for a rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValueArrayPos {
    /// Zero-based list position.
    Index(i64),
    /// Aggregate over all list positions.
    Aggregate(ArrayAggregate),
}

/// Aggregate over list positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArrayAggregate {
    /// Sum of numeric values.
    #[serde(rename = "SUM")]
    Sum,
}

// ============================================================================
// SECTION: Rules
// ============================================================================

/// Single matching rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodingRule {
    /// Matching method.
    pub method: RuleMethod,
    /// Method parameters; text parameters may hold newline-delimited lists.
    #[serde(default)]
    pub parameters: Vec<String>,
    /// Optional fragment index the rule applies to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fragment: Option<i64>,
}

impl CodingRule {
    /// Creates a rule without fragment addressing.
    #[must_use]
    pub fn new<I, S>(method: RuleMethod, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method,
            parameters: parameters.into_iter().map(Into::into).collect(),
            fragment: None,
        }
    }

    /// Returns a copy of this rule addressing the given fragment.
    #[must_use]
    pub fn with_fragment(mut self, fragment: i64) -> Self {
        self.fragment = Some(fragment);
        self
    }

    /// Returns the fragment index when it is non-negative.
    #[must_use]
    pub fn fragment_index(&self) -> Option<usize> {
        self.fragment.and_then(|fragment| usize::try_from(fragment).ok())
    }
}

/// Rule matching method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleMethod {
    /// Text equals one candidate line.
    Match,
    /// Text matches one regular expression line.
    MatchRegex,
    /// Number equals the parameter.
    NumericMatch,
    /// Number is strictly less than the parameter.
    NumericLessThan,
    /// Number is at most the parameter.
    NumericMax,
    /// Number is strictly greater than the parameter.
    NumericMoreThan,
    /// Number is at least the parameter.
    NumericMin,
    /// Number lies in `(lower, upper]`.
    NumericRange,
    /// Value is the empty string.
    IsEmpty,
    /// Value is null.
    IsNull,
    /// Value is boolean true.
    IsTrue,
    /// Value is boolean false.
    IsFalse,
    /// Fallback when no other code matched.
    Else,
}

impl RuleMethod {
    /// Returns what the value must coerce to before this method can apply.
    #[must_use]
    pub const fn value_requirement(self) -> ValueRequirement {
        match self {
            Self::NumericMatch
            | Self::NumericLessThan
            | Self::NumericMax
            | Self::NumericMoreThan
            | Self::NumericMin
            | Self::NumericRange => ValueRequirement::Numeric,
            Self::IsTrue | Self::IsFalse => ValueRequirement::Boolean,
            Self::Match | Self::MatchRegex | Self::IsEmpty | Self::IsNull | Self::Else => {
                ValueRequirement::Any
            }
        }
    }

    /// Returns the canonical wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Match => "MATCH",
            Self::MatchRegex => "MATCH_REGEX",
            Self::NumericMatch => "NUMERIC_MATCH",
            Self::NumericLessThan => "NUMERIC_LESS_THAN",
            Self::NumericMax => "NUMERIC_MAX",
            Self::NumericMoreThan => "NUMERIC_MORE_THAN",
            Self::NumericMin => "NUMERIC_MIN",
            Self::NumericRange => "NUMERIC_RANGE",
            Self::IsEmpty => "IS_EMPTY",
            Self::IsNull => "IS_NULL",
            Self::IsTrue => "IS_TRUE",
            Self::IsFalse => "IS_FALSE",
            Self::Else => "ELSE",
        }
    }
}

/// Coercion a value must support before a rule can be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueRequirement {
    /// No requirement.
    Any,
    /// Value must coerce to a number.
    Numeric,
    /// Value must be boolean-like.
    Boolean,
}
