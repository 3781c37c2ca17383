// crates/coding-scheme-core/src/core/value.rs
// ============================================================================
// Module: Response Values
// Description: Raw and normalized response value shapes.
// Purpose: Model scalars, multi-answer lists, and fragment groups explicitly.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A response value is a scalar, a list of scalars (multi-answer), or a list
//! whose items are themselves fragment groups. Normalization may turn a
//! scalar into fragments, so the evaluator works on [`NormalizedValue`], which
//! keeps "fragmented scalar" and "list" apart because they address positions
//! differently.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::borrow::Cow;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Scalar Values
// ============================================================================

/// Single response value as recorded by the delivery system.
///
/// # Invariants
/// - Serializes untagged: `null`, `true`, `1.5`, `"text"`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    /// Explicit null (no answer).
    #[default]
    Null,
    /// Boolean answer.
    Boolean(bool),
    /// Numeric answer.
    Number(f64),
    /// Text answer.
    Text(String),
}

impl ScalarValue {
    /// Creates a text scalar.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Returns true for [`ScalarValue::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the text content when this is a text scalar.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the string form used by text matching.
    ///
    /// Numbers render without a trailing `.0`, booleans as `true`/`false`.
    /// Null has no string form.
    #[must_use]
    pub fn as_match_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Null => None,
            Self::Boolean(flag) => Some(Cow::Borrowed(if *flag { "true" } else { "false" })),
            Self::Number(number) => Some(Cow::Owned(format_number(*number))),
            Self::Text(text) => Some(Cow::Borrowed(text)),
        }
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        Self::text(value)
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for ScalarValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for ScalarValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

/// Renders a number the way the scheme editor displays it.
fn format_number(number: f64) -> String {
    if number == 0.0 {
        // Collapses negative zero.
        return "0".to_string();
    }
    number.to_string()
}

// ============================================================================
// SECTION: Raw Values
// ============================================================================

/// Item of a multi-answer list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValueItem {
    /// Plain answer at this list position.
    Scalar(ScalarValue),
    /// Fragment group produced for this list position.
    Fragments(Vec<ScalarValue>),
}

impl ValueItem {
    /// Returns the string form used to order list items.
    #[must_use]
    pub fn sort_key(&self) -> String {
        match self {
            Self::Scalar(scalar) => scalar.as_match_text().map(Cow::into_owned).unwrap_or_default(),
            Self::Fragments(parts) => parts
                .iter()
                .map(|part| part.as_match_text().map(Cow::into_owned).unwrap_or_default())
                .collect::<Vec<_>>()
                .join("\u{1f}"),
        }
    }
}

impl From<ScalarValue> for ValueItem {
    fn from(value: ScalarValue) -> Self {
        Self::Scalar(value)
    }
}

/// Raw response value.
///
/// # Invariants
/// - At most two levels of nesting (list of fragment groups).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseValue {
    /// Single answer.
    Scalar(ScalarValue),
    /// Multi-answer list.
    List(Vec<ValueItem>),
}

impl ResponseValue {
    /// Creates a text response value.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Scalar(ScalarValue::text(value))
    }

    /// Creates a numeric response value.
    #[must_use]
    pub const fn number(value: f64) -> Self {
        Self::Scalar(ScalarValue::Number(value))
    }

    /// Creates a list response value from scalars.
    #[must_use]
    pub fn list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ScalarValue>,
    {
        Self::List(values.into_iter().map(|value| ValueItem::Scalar(value.into())).collect())
    }

    /// Returns true when the raw value is a multi-answer list.
    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }
}

impl Default for ResponseValue {
    fn default() -> Self {
        Self::Scalar(ScalarValue::Null)
    }
}

impl From<ScalarValue> for ResponseValue {
    fn from(value: ScalarValue) -> Self {
        Self::Scalar(value)
    }
}

// ============================================================================
// SECTION: Normalized Values
// ============================================================================

/// Response value after whitespace processing and fragmenting.
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedValue {
    /// Scalar answer, unfragmented.
    Scalar(ScalarValue),
    /// Capture groups of a fragmented scalar answer.
    Fragments(Vec<ScalarValue>),
    /// Multi-answer list; items may be fragment groups.
    List(Vec<ValueItem>),
}

impl From<ValueItem> for NormalizedValue {
    fn from(item: ValueItem) -> Self {
        match item {
            ValueItem::Scalar(scalar) => Self::Scalar(scalar),
            ValueItem::Fragments(parts) => Self::Fragments(parts),
        }
    }
}
