// crates/coding-scheme-cli/src/lib.rs
// ============================================================================
// Module: Coding Scheme CLI Library
// Description: Shared helpers for the coding scheme command-line interface.
// Purpose: Provide reusable components (i18n, logging) for the binary and tests.
// Dependencies: coding-scheme-config, coding-scheme-core, tracing, tracing-subscriber
// ============================================================================

//! ## Overview
//! This library houses the CLI message catalog and the tracing setup. The
//! binary entry point (`src/main.rs`) imports these helpers to keep all
//! user-facing output consistent.

// ============================================================================
// SECTION: Modules
// ============================================================================

/// Internationalization helpers and message catalog.
pub mod i18n;
/// Tracing subscriber setup and the engine trace bridge.
pub mod logging;

#[cfg(test)]
mod tests;
