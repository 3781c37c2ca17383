// crates/coding-scheme-core/src/runtime/scheme.rs
// ============================================================================
// Module: Scheme Coder
// Description: Code a respondent's full response set against a coding scheme.
// Purpose: Run base coding, then derive and code derived variables in dependency order.
// Dependencies: crate::core, crate::runtime::{derive, engine, trace}, thiserror
// ============================================================================

//! ## Overview
//! Coding a response set happens in two passes:
//!
//! 1. Every input response is coded against its variable's coding. Responses
//!    without a coding become `NO_CODING`.
//! 2. Derived variables are processed in topological order of their derived
//!    sources (authoring order breaks ties). Each derived value becomes a
//!    fresh `VALUE_CHANGED` response that is coded like any other and
//!    replaces a stale input response with the same id.
//!
//! A derived variable in a cycle, or depending on a derived variable that
//! failed, gets `DERIVE_ERROR` with a null value. Input order is preserved;
//! new derived responses are appended in processing order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::collections::HashMap;
use std::collections::VecDeque;

use thiserror::Error;

use crate::core::CodingScheme;
use crate::core::Response;
use crate::core::ResponseStatus;
use crate::core::ResponseValue;
use crate::core::VariableCodingData;
use crate::core::VariableId;
use crate::runtime::derive::DerivationError;
use crate::runtime::derive::DeriveOptions;
use crate::runtime::derive::derive_value_with;
use crate::runtime::engine::code_response_with_trace;
use crate::runtime::trace::CodingTrace;
use crate::runtime::trace::NoopTrace;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Scheme-level failures that prevent coding altogether.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemeError {
    /// Two codings share one variable id.
    #[error("variable {variable} is coded more than once")]
    DuplicateVariable {
        /// Duplicated identifier.
        variable: VariableId,
    },
}

// ============================================================================
// SECTION: Scheme Coding
// ============================================================================

impl CodingScheme {
    /// Checks that every variable is coded at most once.
    ///
    /// # Errors
    ///
    /// Returns [`SchemeError::DuplicateVariable`] for the first repeated id.
    pub fn validate(&self) -> Result<(), SchemeError> {
        self.index().map(|_| ())
    }

    /// Codes a response set.
    ///
    /// # Errors
    ///
    /// Returns [`SchemeError`] when the scheme itself is invalid.
    pub fn code(
        &self,
        responses: &[Response],
        options: &DeriveOptions,
    ) -> Result<Vec<Response>, SchemeError> {
        self.code_with_trace(responses, options, &mut NoopTrace)
    }

    /// Codes a response set, reporting evaluation steps to `trace`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemeError`] when the scheme itself is invalid.
    pub fn code_with_trace<T>(
        &self,
        responses: &[Response],
        options: &DeriveOptions,
        trace: &mut T,
    ) -> Result<Vec<Response>, SchemeError>
    where
        T: CodingTrace + ?Sized,
    {
        let codings = self.index()?;
        let mut sheet = ResponseSheet::new(responses.len());

        for response in responses {
            let coded = match codings.get(&response.id) {
                Some(coding) if !coding.source_type.is_derived() => {
                    code_response_with_trace(response, coding, trace)
                }
                Some(_) => response.clone(),
                None => response.clone().with_status(ResponseStatus::NoCoding),
            };
            sheet.push(coded);
        }

        let (order, cyclic) = derivation_order(&self.variable_codings, &codings);
        let mut failed: BTreeSet<&VariableId> = BTreeSet::new();
        for coding in order {
            let result = coding
                .derive_sources
                .iter()
                .find(|source| failed.contains(source))
                .map_or_else(
                    || derive_value_with(coding, |source| sheet.get(source), options),
                    |source| {
                        Err(DerivationError::FailedSource {
                            variable: coding.id.clone(),
                            source_id: source.clone(),
                        })
                    },
                );
            match result {
                Ok(value) => {
                    let derived = Response::new(coding.id.clone(), value);
                    sheet.upsert(code_response_with_trace(&derived, coding, trace));
                }
                Err(error) => {
                    trace.on_derivation_failed(&coding.id, &error);
                    failed.insert(&coding.id);
                    sheet.upsert(derive_error(&coding.id));
                }
            }
        }
        for coding in cyclic {
            let error = DerivationError::Cycle {
                variable: coding.id.clone(),
            };
            trace.on_derivation_failed(&coding.id, &error);
            sheet.upsert(derive_error(&coding.id));
        }

        Ok(sheet.into_responses())
    }

    /// Indexes codings by variable id.
    fn index(&self) -> Result<HashMap<&VariableId, &VariableCodingData>, SchemeError> {
        let mut codings = HashMap::with_capacity(self.variable_codings.len());
        for coding in &self.variable_codings {
            if codings.insert(&coding.id, coding).is_some() {
                return Err(SchemeError::DuplicateVariable {
                    variable: coding.id.clone(),
                });
            }
        }
        Ok(codings)
    }
}

/// Builds the `DERIVE_ERROR` response for a variable.
fn derive_error(id: &VariableId) -> Response {
    Response::new(id.clone(), ResponseValue::default()).with_status(ResponseStatus::DeriveError)
}

// ============================================================================
// SECTION: Derivation Order
// ============================================================================

/// Orders derived codings so every derived source precedes its dependents.
///
/// Returns the processable codings and, separately, those caught in cycles
/// (or depending on one), both in authoring order within a rank.
fn derivation_order<'s>(
    codings: &'s [VariableCodingData],
    index: &HashMap<&VariableId, &'s VariableCodingData>,
) -> (Vec<&'s VariableCodingData>, Vec<&'s VariableCodingData>) {
    let derived: Vec<&VariableCodingData> =
        codings.iter().filter(|coding| coding.source_type.is_derived()).collect();
    let is_derived_source = |source: &VariableId| {
        index.get(source).is_some_and(|coding| coding.source_type.is_derived())
    };

    let mut pending: BTreeMap<&VariableId, usize> = BTreeMap::new();
    let mut dependents: HashMap<&VariableId, Vec<&VariableCodingData>> = HashMap::new();
    for coding in &derived {
        let sources: BTreeSet<&VariableId> =
            coding.derive_sources.iter().filter(|&source| is_derived_source(source)).collect();
        pending.insert(&coding.id, sources.len());
        for source in sources {
            dependents.entry(source).or_default().push(coding);
        }
    }

    let mut ready: VecDeque<&VariableCodingData> =
        derived.iter().copied().filter(|coding| pending.get(&coding.id) == Some(&0)).collect();
    let mut order = Vec::with_capacity(derived.len());
    while let Some(coding) = ready.pop_front() {
        order.push(coding);
        for dependent in dependents.get(&coding.id).into_iter().flatten() {
            if let Some(count) = pending.get_mut(&dependent.id) {
                *count = count.saturating_sub(1);
                if *count == 0 {
                    ready.push_back(dependent);
                }
            }
        }
    }

    let ordered: BTreeSet<&VariableId> = order.iter().map(|coding| &coding.id).collect();
    let cyclic = derived.into_iter().filter(|coding| !ordered.contains(&coding.id)).collect();
    (order, cyclic)
}

// ============================================================================
// SECTION: Response Sheet
// ============================================================================

/// Ordered response collection with id lookup.
struct ResponseSheet {
    /// Responses in output order.
    responses: Vec<Response>,
    /// Position of the first response per id.
    positions: HashMap<VariableId, usize>,
}

impl ResponseSheet {
    /// Creates an empty sheet.
    fn new(capacity: usize) -> Self {
        Self {
            responses: Vec::with_capacity(capacity),
            positions: HashMap::with_capacity(capacity),
        }
    }

    /// Appends a response, keeping the first position per id.
    fn push(&mut self, response: Response) {
        self.positions.entry(response.id.clone()).or_insert(self.responses.len());
        self.responses.push(response);
    }

    /// Replaces the response with the same id, or appends it.
    fn upsert(&mut self, response: Response) {
        match self.positions.get(&response.id).and_then(|&index| self.responses.get_mut(index)) {
            Some(slot) => *slot = response,
            None => self.push(response),
        }
    }

    /// Returns the response for an id.
    fn get(&self, id: &VariableId) -> Option<&Response> {
        self.positions.get(id).and_then(|&index| self.responses.get(index))
    }

    /// Consumes the sheet.
    fn into_responses(self) -> Vec<Response> {
        self.responses
    }
}
