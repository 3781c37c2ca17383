// crates/coding-scheme-config/src/lib.rs
// ============================================================================
// Module: Coding Scheme Config Library
// Description: Canonical config model and validation.
// Purpose: Single source of truth for coding-scheme.toml semantics.
// Dependencies: coding-scheme-core, serde, toml
// ============================================================================

//! ## Overview
//! `coding-scheme-config` defines the configuration model shared by the
//! coding scheme tools. Parsing is strict and validation fails closed; a
//! loaded config hands the derivation settings straight to the engine.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use examples::config_toml_example;
