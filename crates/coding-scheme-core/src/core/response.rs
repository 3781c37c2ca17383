// crates/coding-scheme-core/src/core/response.rs
// ============================================================================
// Module: Responses
// Description: Recorded responses and their coding status.
// Purpose: Carry one respondent's value for one variable plus the coding outcome.
// Dependencies: crate::core::{identifiers, value}, serde
// ============================================================================

//! ## Overview
//! Responses are input to the engine and are never mutated; coding returns an
//! augmented copy with `status`, `code` and `score` filled in.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::VariableId;
use crate::core::value::ResponseValue;

// ============================================================================
// SECTION: Response
// ============================================================================

/// One respondent's value for one variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    /// Variable identifier.
    pub id: VariableId,
    /// Recorded (or derived) value.
    #[serde(default)]
    pub value: ResponseValue,
    /// Processing status.
    #[serde(default, alias = "state")]
    pub status: ResponseStatus,
    /// Assigned code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    /// Assigned score.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl Response {
    /// Creates a response with status [`ResponseStatus::ValueChanged`].
    #[must_use]
    pub fn new(id: impl Into<VariableId>, value: impl Into<ResponseValue>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
            status: ResponseStatus::ValueChanged,
            code: None,
            score: None,
        }
    }

    /// Returns a copy with the given status.
    #[must_use]
    pub const fn with_status(mut self, status: ResponseStatus) -> Self {
        self.status = status;
        self
    }

    /// Returns a copy with the given code and score.
    #[must_use]
    pub const fn with_code(mut self, code: i64, score: f64) -> Self {
        self.code = Some(code);
        self.score = Some(score);
        self
    }
}

// ============================================================================
// SECTION: Status
// ============================================================================

/// Response processing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseStatus {
    /// Nothing recorded yet.
    #[default]
    Unset,
    /// Respondent never reached the item.
    NotReached,
    /// Item was displayed without an answer.
    Displayed,
    /// Item was partly displayed.
    PartlyDisplayed,
    /// A value was recorded or derived.
    ValueChanged,
    /// Derived value is waiting for its sources.
    DerivePending,
    /// Derived value could not be computed.
    DeriveError,
    /// Variable has no codes.
    NoCoding,
    /// Coding failed (normalization or rule applicability).
    CodingError,
    /// Value recognized as not codable.
    Invalid,
    /// A code was assigned.
    CodingComplete,
    /// No rule matched and no fallback exists.
    CodingIncomplete,
}

impl ResponseStatus {
    /// Returns the canonical wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unset => "UNSET",
            Self::NotReached => "NOT_REACHED",
            Self::Displayed => "DISPLAYED",
            Self::PartlyDisplayed => "PARTLY_DISPLAYED",
            Self::ValueChanged => "VALUE_CHANGED",
            Self::DerivePending => "DERIVE_PENDING",
            Self::DeriveError => "DERIVE_ERROR",
            Self::NoCoding => "NO_CODING",
            Self::CodingError => "CODING_ERROR",
            Self::Invalid => "INVALID",
            Self::CodingComplete => "CODING_COMPLETE",
            Self::CodingIncomplete => "CODING_INCOMPLETE",
        }
    }

    /// Returns true for statuses produced by the coding engine.
    #[must_use]
    pub const fn is_coding_outcome(self) -> bool {
        matches!(
            self,
            Self::NoCoding
                | Self::CodingError
                | Self::Invalid
                | Self::CodingComplete
                | Self::CodingIncomplete
        )
    }
}
