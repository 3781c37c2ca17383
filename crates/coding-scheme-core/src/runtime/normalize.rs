// crates/coding-scheme-core/src/runtime/normalize.rs
// ============================================================================
// Module: Value Normalizer
// Description: Whitespace/case processing, fragmenting, and numeric coercion.
// Purpose: Turn raw response values into the comparable form rules expect.
// Dependencies: crate::core, regex, thiserror
// ============================================================================

//! ## Overview
//! Normalization applies the coding's processing directives to every text
//! component of a value and, when a fragmenting pattern is configured, splits
//! each non-empty text into the ordered list of its capture groups. A pattern
//! that fails to compile or to match is a [`NormalizationError`]; the engine
//! turns it into a terminal `CODING_ERROR`.
//!
//! Numeric coercion is a separate, infallible operation: it yields `None`
//! for values that are not numeric and leaves the decision to the caller.

// ============================================================================
// SECTION: Imports
// ============================================================================

use regex::Regex;
use thiserror::Error;

use crate::core::NormalizedValue;
use crate::core::ProcessingDirective;
use crate::core::ResponseValue;
use crate::core::ScalarValue;
use crate::core::ValueItem;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Normalization failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizationError {
    /// The fragmenting pattern is not a valid regular expression.
    #[error("fragmenting pattern `{pattern}` is invalid: {reason}")]
    InvalidPattern {
        /// Offending pattern.
        pattern: String,
        /// Compiler diagnostic.
        reason: String,
    },
    /// The fragmenting pattern did not match a text value.
    #[error("fragmenting pattern `{pattern}` did not match the value")]
    FragmentMismatch {
        /// Pattern that failed to match.
        pattern: String,
    },
}

// ============================================================================
// SECTION: Directives
// ============================================================================

/// Text processing flags resolved from a coding's directive list.
///
/// # Invariants
/// - Directives without text effect (replay, attachment) are not represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(clippy::struct_excessive_bools, reason = "Each flag mirrors one independent directive.")]
pub struct TextProcessing {
    /// Remove every whitespace character.
    pub remove_all_spaces: bool,
    /// Trim and collapse whitespace runs.
    pub remove_dispensable_spaces: bool,
    /// Lowercase text.
    pub to_lower_case: bool,
    /// Sort list items before processing.
    pub sort_array: bool,
}

impl TextProcessing {
    /// Resolves processing flags from directives.
    #[must_use]
    pub fn from_directives(directives: &[ProcessingDirective]) -> Self {
        directives.iter().fold(Self::default(), |mut flags, directive| {
            match directive {
                ProcessingDirective::RemoveAllSpaces => flags.remove_all_spaces = true,
                ProcessingDirective::RemoveDispensableSpaces => {
                    flags.remove_dispensable_spaces = true;
                }
                ProcessingDirective::ToLowerCase => flags.to_lower_case = true,
                ProcessingDirective::SortArray => flags.sort_array = true,
                ProcessingDirective::IgnoreCase
                | ProcessingDirective::ReplayRequired
                | ProcessingDirective::Attachment => {}
            }
            flags
        })
    }

    /// Applies whitespace and case processing to one text.
    #[must_use]
    pub fn apply(self, text: &str) -> String {
        let mut processed = if self.remove_all_spaces {
            text.chars().filter(|ch| !ch.is_whitespace()).collect()
        } else {
            text.to_string()
        };
        if self.remove_dispensable_spaces {
            processed = processed.split_whitespace().collect::<Vec<_>>().join(" ");
        }
        if self.to_lower_case {
            processed = processed.to_lowercase();
        }
        processed
    }
}

// ============================================================================
// SECTION: Normalization
// ============================================================================

/// Normalizes a raw response value for rule evaluation.
///
/// Text components are processed per directive; with a fragmenting pattern,
/// each non-empty text becomes its capture groups (groups that did not take
/// part in the match become null). Lists keep their structure.
///
/// # Errors
///
/// Returns [`NormalizationError`] when the pattern is invalid or does not
/// match one of the texts.
pub fn normalize_value(
    value: &ResponseValue,
    directives: &[ProcessingDirective],
    fragmenting: Option<&str>,
) -> Result<NormalizedValue, NormalizationError> {
    let processing = TextProcessing::from_directives(directives);
    let fragmenter = fragmenting.map(Fragmenter::compile).transpose()?;
    let normalizer = Normalizer {
        processing,
        fragmenter,
    };

    match value {
        ResponseValue::Scalar(scalar) => Ok(normalizer.scalar(scalar)?.into()),
        ResponseValue::List(items) => {
            let mut ordered: Vec<&ValueItem> = items.iter().collect();
            if processing.sort_array {
                ordered.sort_by_cached_key(|item| item.sort_key());
            }
            let items = ordered
                .into_iter()
                .map(|item| normalizer.item(item))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(NormalizedValue::List(items))
        }
    }
}

/// Compiled normalization settings for one call.
struct Normalizer {
    /// Text processing flags.
    processing: TextProcessing,
    /// Optional compiled fragmenting pattern.
    fragmenter: Option<Fragmenter>,
}

impl Normalizer {
    /// Normalizes one scalar, fragmenting non-empty text when configured.
    fn scalar(&self, scalar: &ScalarValue) -> Result<ValueItem, NormalizationError> {
        let ScalarValue::Text(text) = scalar else {
            return Ok(ValueItem::Scalar(scalar.clone()));
        };
        let processed = self.processing.apply(text);
        match &self.fragmenter {
            Some(fragmenter) if !processed.is_empty() => {
                fragmenter.split(&processed).map(ValueItem::Fragments)
            }
            _ => Ok(ValueItem::Scalar(ScalarValue::Text(processed))),
        }
    }

    /// Normalizes one list item; existing fragment groups are processed in place.
    fn item(&self, item: &ValueItem) -> Result<ValueItem, NormalizationError> {
        match item {
            ValueItem::Scalar(scalar) => self.scalar(scalar),
            ValueItem::Fragments(parts) => Ok(ValueItem::Fragments(
                parts.iter().map(|part| self.process_only(part)).collect(),
            )),
        }
    }

    /// Applies text processing without fragmenting.
    fn process_only(&self, scalar: &ScalarValue) -> ScalarValue {
        match scalar {
            ScalarValue::Text(text) => ScalarValue::Text(self.processing.apply(text)),
            other => other.clone(),
        }
    }
}

/// Compiled fragmenting pattern.
struct Fragmenter {
    /// Source pattern, kept for diagnostics.
    pattern: String,
    /// Compiled expression.
    regex: Regex,
}

impl Fragmenter {
    /// Compiles a fragmenting pattern.
    fn compile(pattern: &str) -> Result<Self, NormalizationError> {
        let regex = Regex::new(pattern).map_err(|err| NormalizationError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: err.to_string(),
        })?;
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    /// Splits text into its capture groups (first match anywhere in the text).
    fn split(&self, text: &str) -> Result<Vec<ScalarValue>, NormalizationError> {
        let captures =
            self.regex.captures(text).ok_or_else(|| NormalizationError::FragmentMismatch {
                pattern: self.pattern.clone(),
            })?;
        Ok(captures
            .iter()
            .skip(1)
            .map(|group| group.map_or(ScalarValue::Null, |found| ScalarValue::text(found.as_str())))
            .collect())
    }
}

// ============================================================================
// SECTION: Coercion
// ============================================================================

/// Coerces a scalar to a number.
///
/// Numbers pass through, booleans become 1/0, text is parsed with
/// [`parse_number_text`]. Null and unparsable text yield `None`.
#[must_use]
pub fn coerce_number(value: &ScalarValue) -> Option<f64> {
    match value {
        ScalarValue::Number(number) => Some(*number),
        ScalarValue::Boolean(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        ScalarValue::Text(text) => parse_number_text(text),
        ScalarValue::Null => None,
    }
}

/// Parses localized numeric text.
///
/// Whitespace is ignored. When a comma is present it is the decimal mark and
/// every dot is a thousands separator; otherwise several dots are thousands
/// separators and a single dot is the decimal point. The result must be finite.
#[must_use]
pub fn parse_number_text(text: &str) -> Option<f64> {
    let compact: String = text.chars().filter(|ch| !ch.is_whitespace()).collect();
    if compact.is_empty() {
        return None;
    }
    let canonical = if compact.contains(',') {
        compact.replace('.', "").replacen(',', ".", 1)
    } else if compact.matches('.').count() > 1 {
        compact.replace('.', "")
    } else {
        compact
    };
    // Rejects `inf`, `NaN` and similar spellings accepted by `f64::from_str`.
    if canonical.chars().any(|ch| ch.is_ascii_alphabetic() && !matches!(ch, 'e' | 'E')) {
        return None;
    }
    canonical.parse::<f64>().ok().filter(|number| number.is_finite())
}

/// Returns true for values IS_TRUE/IS_FALSE can be applied to.
#[must_use]
pub fn is_boolean_like(value: &ScalarValue) -> bool {
    match value {
        ScalarValue::Null | ScalarValue::Boolean(_) => true,
        ScalarValue::Text(text) => matches!(text.as_str(), "true" | "false" | "1" | "0"),
        ScalarValue::Number(_) => false,
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Test-only panic-based assertions are permitted.")]
mod tests {
    use super::*;

    #[test]
    fn dispensable_spaces_collapse_and_trim() {
        let processing = TextProcessing {
            remove_dispensable_spaces: true,
            ..TextProcessing::default()
        };
        assert_eq!(processing.apply("  a \t b\n c "), "a b c");
    }

    #[test]
    fn all_spaces_removed_before_lowercasing() {
        let processing = TextProcessing::from_directives(&[
            ProcessingDirective::ToLowerCase,
            ProcessingDirective::RemoveAllSpaces,
        ]);
        assert_eq!(processing.apply(" Ab C "), "abc");
    }

    #[test]
    fn number_text_handles_separators() {
        assert_eq!(parse_number_text("1.234,5"), Some(1234.5));
        assert_eq!(parse_number_text("2,5"), Some(2.5));
        assert_eq!(parse_number_text("2.5"), Some(2.5));
        assert_eq!(parse_number_text("1.000.000"), Some(1_000_000.0));
        assert_eq!(parse_number_text(" 12 "), Some(12.0));
        assert_eq!(parse_number_text("1e3"), Some(1000.0));
    }

    #[test]
    fn number_text_rejects_non_numbers() {
        assert_eq!(parse_number_text(""), None);
        assert_eq!(parse_number_text("abc"), None);
        assert_eq!(parse_number_text("inf"), None);
        assert_eq!(parse_number_text("NaN"), None);
        assert_eq!(parse_number_text("1,2,3"), None);
    }

    #[test]
    fn non_participating_groups_become_null() {
        let fragmenter = Fragmenter::compile(r"(\d+)(x)?").unwrap();
        let parts = fragmenter.split("42").unwrap();
        assert_eq!(parts, vec![ScalarValue::text("42"), ScalarValue::Null]);
    }
}
