// crates/coding-scheme-core/src/runtime/derive.rs
// ============================================================================
// Module: Derivation Engine
// Description: Compute derived variable values from source responses.
// Purpose: Implement COPY_VALUE, CONCAT_CODE, SUM_CODE, SUM_SCORE, UNIQUE_VALUES.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! Derivation reads the already coded source responses named by a variable's
//! `deriveSources`, in that order. A source without a response, code, or
//! score contributes the neutral element (empty text, zero). Source types this
//! engine cannot compute are reported as [`DerivationError`]s; the scheme
//! coder turns them into `DERIVE_ERROR`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::Response;
use crate::core::ResponseValue;
use crate::core::ScalarValue;
use crate::core::SourceType;
use crate::core::VariableCodingData;
use crate::core::VariableId;

// ============================================================================
// SECTION: Options
// ============================================================================

/// Derivation settings supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeriveOptions {
    /// Delimiter placed between codes by CONCAT_CODE.
    pub concat_delimiter: String,
}

impl DeriveOptions {
    /// Creates derivation options.
    #[must_use]
    pub fn new(concat_delimiter: impl Into<String>) -> Self {
        Self {
            concat_delimiter: concat_delimiter.into(),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Derivation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DerivationError {
    /// The variable is a base variable and has nothing to derive.
    #[error("variable {variable} is not a derived variable")]
    NotDerived {
        /// Variable identifier.
        variable: VariableId,
    },
    /// The source type has no derivation in this engine.
    #[error("variable {variable} uses unsupported source type {source_type}")]
    UnsupportedSource {
        /// Variable identifier.
        variable: VariableId,
        /// Source type wire name.
        source_type: &'static str,
    },
    /// A derived source could not be computed itself.
    #[error("variable {variable} depends on failed source {source_id}")]
    FailedSource {
        /// Variable identifier.
        variable: VariableId,
        /// Failed source identifier.
        source_id: VariableId,
    },
    /// The variable is part of a derivation cycle.
    #[error("variable {variable} is part of a derivation cycle")]
    Cycle {
        /// Variable identifier.
        variable: VariableId,
    },
}

// ============================================================================
// SECTION: Derivation
// ============================================================================

/// Derives a value from the source responses in `responses`.
///
/// # Errors
///
/// Returns [`DerivationError`] for base variables and unsupported source types.
pub fn derive_value(
    coding: &VariableCodingData,
    responses: &[Response],
    options: &DeriveOptions,
) -> Result<ResponseValue, DerivationError> {
    derive_value_with(
        coding,
        |source| responses.iter().find(|response| &response.id == source),
        options,
    )
}

/// Derives a value, resolving sources through `lookup`.
///
/// # Errors
///
/// Returns [`DerivationError`] for base variables and unsupported source types.
pub fn derive_value_with<'r, F>(
    coding: &VariableCodingData,
    lookup: F,
    options: &DeriveOptions,
) -> Result<ResponseValue, DerivationError>
where
    F: Fn(&VariableId) -> Option<&'r Response>,
{
    let sources = coding.derive_sources.iter().map(&lookup);
    match coding.source_type {
        SourceType::CopyValue => Ok(coding
            .derive_sources
            .first()
            .and_then(&lookup)
            .map(|response| response.value.clone())
            .unwrap_or_default()),
        SourceType::ConcatCode => {
            let codes: Vec<String> = sources
                .map(|response| {
                    response.and_then(|response| response.code).map(|code| code.to_string())
                })
                .map(Option::unwrap_or_default)
                .collect();
            Ok(ResponseValue::text(codes.join(&options.concat_delimiter)))
        }
        SourceType::SumCode => {
            let sum = sources
                .filter_map(|response| response.and_then(|response| response.code))
                .fold(0_i64, i64::saturating_add);
            #[allow(clippy::cast_precision_loss, reason = "Code sums stay far below 2^53.")]
            let sum = sum as f64;
            Ok(ResponseValue::number(sum))
        }
        SourceType::SumScore => {
            let sum: f64 =
                sources.filter_map(|response| response.and_then(|response| response.score)).sum();
            Ok(ResponseValue::number(sum))
        }
        SourceType::UniqueValues => {
            let values: Vec<&ResponseValue> = sources
                .flatten()
                .map(|response| &response.value)
                .filter(|value| **value != ResponseValue::Scalar(ScalarValue::Null))
                .collect();
            let unique = values
                .iter()
                .enumerate()
                .all(|(index, value)| !values[..index].contains(value));
            Ok(ResponseValue::Scalar(ScalarValue::Boolean(unique)))
        }
        SourceType::Base => Err(DerivationError::NotDerived {
            variable: coding.id.clone(),
        }),
        SourceType::Solver | SourceType::Unknown => Err(DerivationError::UnsupportedSource {
            variable: coding.id.clone(),
            source_type: coding.source_type.as_str(),
        }),
    }
}
