// crates/coding-scheme-core/src/runtime/trace.rs
// ============================================================================
// Module: Coding Trace Hooks
// Description: Observer hooks for rule, code, and outcome evaluation.
// Purpose: Let callers log or collect evaluation steps without coupling the engine.
// Dependencies: crate::core, crate::runtime::{derive, engine}
// ============================================================================

//! ## Overview
//! The engine reports every evaluated rule and code plus the final outcome
//! of each response. Hooks have empty default bodies so observers implement
//! only what they need; [`NoopTrace`] is the fast path.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::CodeData;
use crate::core::CodingRule;
use crate::core::Response;
use crate::core::VariableId;
use crate::runtime::derive::DerivationError;
use crate::runtime::engine::CodeOutcome;

// ============================================================================
// SECTION: Trace Hooks
// ============================================================================

/// Trace hook for coding evaluation.
pub trait CodingTrace {
    /// Called after a rule was evaluated against the addressed value.
    fn on_rule_evaluated(&mut self, _rule: &CodingRule, _matched: bool) {}

    /// Called after a non-fallback code was evaluated.
    fn on_code_evaluated(&mut self, _index: usize, _code: &CodeData, _matched: bool) {}

    /// Called when a fallback (ELSE) code is recorded.
    fn on_fallback_recorded(&mut self, _index: usize, _code: &CodeData) {}

    /// Called once per coded response with the resolution outcome.
    ///
    /// `outcome` is `None` when the variable has no codes.
    fn on_response_coded(&mut self, _response: &Response, _outcome: Option<&CodeOutcome>) {}

    /// Called when a derived variable could not be computed.
    fn on_derivation_failed(&mut self, _variable: &VariableId, _error: &DerivationError) {}
}

/// No-op trace hook for fast paths.
///
/// # Invariants
/// - Zero-sized marker type; carries no state.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTrace;

impl CodingTrace for NoopTrace {}
