// crates/coding-scheme-core/src/lib.rs
// ============================================================================
// Module: Coding Scheme Core Library
// Description: Public API surface for the response coding engine.
// Purpose: Expose the coding model types and the pure evaluation runtime.
// Dependencies: crate::{core, runtime}
// ============================================================================

//! ## Overview
//! Coding Scheme core assigns categorical codes and numeric scores to survey
//! and test responses by evaluating declarative coding rules per
//! variable. Evaluation is deterministic, synchronous and side-effect free:
//! every operation is a pure function over immutable inputs, so independent
//! responses can be coded concurrently without coordination.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use runtime::CodeOutcome;
pub use runtime::CodingFailure;
pub use runtime::CodingTrace;
pub use runtime::DerivationError;
pub use runtime::DeriveOptions;
pub use runtime::NoopTrace;
pub use runtime::NormalizationError;
pub use runtime::RuleError;
pub use runtime::SchemeError;
pub use runtime::code_response;
pub use runtime::code_response_with_trace;
pub use runtime::coerce_number;
pub use runtime::derive_value;
pub use runtime::evaluate_rule;
pub use runtime::evaluate_rule_set;
pub use runtime::normalize_value;
pub use runtime::resolve_codes;
