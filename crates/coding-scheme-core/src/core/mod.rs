// crates/coding-scheme-core/src/core/mod.rs
// ============================================================================
// Module: Coding Scheme Core Types
// Description: Canonical coding definitions, response values, and responses.
// Purpose: Provide stable, serializable types shared by the runtime and callers.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Core types describe what a coding scheme looks like on the wire (camelCase
//! JSON, as authored by the scheme editor) and what the engine returns. They
//! carry no evaluation logic beyond small accessors; see [`crate::runtime`].

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod coding;
pub mod identifiers;
pub mod response;
pub mod value;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use coding::ArrayAggregate;
pub use coding::CodeData;
pub use coding::CodingRule;
pub use coding::CodingScheme;
pub use coding::ProcessingDirective;
pub use coding::RuleMethod;
pub use coding::RuleSet;
pub use coding::SourceType;
pub use coding::ValueArrayPos;
pub use coding::ValueRequirement;
pub use coding::VariableCodingData;
pub use identifiers::VariableId;
pub use response::Response;
pub use response::ResponseStatus;
pub use value::NormalizedValue;
pub use value::ResponseValue;
pub use value::ScalarValue;
pub use value::ValueItem;
