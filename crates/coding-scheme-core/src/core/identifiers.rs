// crates/coding-scheme-core/src/core/identifiers.rs
// ============================================================================
// Module: Coding Scheme Identifiers
// Description: Opaque identifiers for variables and their responses.
// Purpose: Provide a strongly typed, serializable ID with a stable string form.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Variables and responses share one identifier space: a response carries the
//! id of the variable it answers. Identifiers serialize as plain strings and
//! are not validated here.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::borrow::Borrow;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Identifier Types
// ============================================================================

/// Variable identifier, shared by codings and responses.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableId(String);

impl VariableId {
    /// Creates a new variable identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VariableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Borrow<str> for VariableId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for VariableId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for VariableId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
