// crates/coding-scheme-core/src/runtime/mod.rs
// ============================================================================
// Module: Coding Runtime
// Description: Normalization, rule evaluation, code resolution, and derivation.
// Purpose: Group the pure evaluation pipeline behind one module boundary.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! The runtime is layered bottom-up: [`normalize`] prepares values, [`rule`]
//! and [`ruleset`] decide matches, [`engine`] resolves codes for one
//! response, [`derive`] computes derived values, and [`scheme`] drives a
//! whole response set. Nothing here performs I/O or holds shared state.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod derive;
pub mod engine;
pub mod logic;
pub mod normalize;
pub mod rule;
pub mod ruleset;
pub mod scheme;
pub mod trace;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use derive::DerivationError;
pub use derive::DeriveOptions;
pub use derive::derive_value;
pub use derive::derive_value_with;
pub use engine::CodeOutcome;
pub use engine::CodingFailure;
pub use engine::code_response;
pub use engine::code_response_with_trace;
pub use engine::resolve_codes;
pub use logic::CombineMode;
pub use normalize::NormalizationError;
pub use normalize::coerce_number;
pub use normalize::normalize_value;
pub use rule::CompiledRule;
pub use rule::RuleError;
pub use rule::evaluate_rule;
pub use ruleset::CompiledRuleSet;
pub use ruleset::evaluate_rule_set;
pub use scheme::SchemeError;
pub use trace::CodingTrace;
pub use trace::NoopTrace;
