// crates/coding-scheme-cli/src/logging.rs
// ============================================================================
// Module: CLI Logging
// Description: Tracing subscriber setup and engine trace bridge.
// Purpose: Route coding evaluation steps into structured log events.
// Dependencies: coding-scheme-config, coding-scheme-core, serde_json, tracing, tracing-subscriber
// ============================================================================

//! ## Overview
//! Logs go to stderr so stdout stays reserved for coded output. `RUST_LOG`
//! overrides the configured level.
//!
//! # Log Levels
//!
//! - `warn`: coding errors and failed derivations
//! - `info`: run summary
//! - `debug`: per-response outcomes and per-code decisions
//! - `trace`: per-rule evaluation
//!
//! Response values are replaced by [`REDACTED_VALUE`] unless
//! `logging.log_values` is enabled.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io;
use std::io::IsTerminal;

use coding_scheme_config::LogFormat;
use coding_scheme_config::LogLevel;
use coding_scheme_config::LoggingConfig;
use coding_scheme_core::CodeData;
use coding_scheme_core::CodeOutcome;
use coding_scheme_core::CodingRule;
use coding_scheme_core::CodingTrace;
use coding_scheme_core::DerivationError;
use coding_scheme_core::Response;
use coding_scheme_core::ResponseValue;
use coding_scheme_core::VariableId;
use thiserror::Error;
use tracing::Subscriber;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;

// ============================================================================
// SECTION: Settings
// ============================================================================

/// Placeholder used when value logging is disabled.
pub const REDACTED_VALUE: &str = "[REDACTED]";

/// Effective logging settings after CLI verbosity is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogSettings {
    /// Level used when `RUST_LOG` is unset.
    pub level: LogLevel,
    /// Output format.
    pub format: LogFormat,
    /// Whether response values may appear in events.
    pub log_values: bool,
    /// Whether ANSI colors are emitted.
    pub with_ansi: bool,
}

impl LogSettings {
    /// Builds settings from config, raising the level once per `-v`.
    #[must_use]
    pub fn from_config(config: &LoggingConfig, verbosity: u8) -> Self {
        Self {
            level: config.level.raised(verbosity),
            format: config.format,
            log_values: config.log_values,
            with_ansi: io::stderr().is_terminal(),
        }
    }
}

/// Logging setup failures.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// A global subscriber could not be installed.
    #[error("tracing subscriber init failed: {0}")]
    Init(String),
}

// ============================================================================
// SECTION: Subscriber Setup
// ============================================================================

/// Installs the global tracing subscriber writing to stderr.
///
/// # Errors
///
/// Returns [`LoggingError::Init`] when a subscriber is already installed.
pub fn init_logging(settings: &LogSettings) -> Result<(), LoggingError> {
    tracing_subscriber::registry()
        .with(build_layer(settings, io::stderr))
        .with(build_env_filter(settings.level))
        .try_init()
        .map_err(|err| LoggingError::Init(err.to_string()))
}

/// Builds the formatting layer for the configured output format.
pub(crate) fn build_layer<S, W>(
    settings: &LogSettings,
    writer: W,
) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    match settings.format {
        LogFormat::Json => fmt::layer().json().with_writer(writer).with_target(false).boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_writer(writer)
            .with_ansi(settings.with_ansi)
            .with_target(false)
            .without_time()
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_writer(writer)
            .with_ansi(settings.with_ansi)
            .with_target(false)
            .without_time()
            .boxed(),
    }
}

/// Builds an `EnvFilter` from the given level, respecting `RUST_LOG`.
pub(crate) fn build_env_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = level.as_str();
        EnvFilter::new(format!(
            "warn,coding_scheme={level},coding_scheme_cli={level},coding_scheme_core={level}"
        ))
    })
}

// ============================================================================
// SECTION: Trace Bridge
// ============================================================================

/// Returns the rendered value when value logging is enabled, otherwise a redacted token.
#[must_use]
pub fn redact_value(value: &ResponseValue, log_values: bool) -> String {
    if !log_values {
        return REDACTED_VALUE.to_string();
    }
    serde_json::to_string(value).unwrap_or_else(|_| REDACTED_VALUE.to_string())
}

/// Coding trace that emits `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTrace {
    /// Whether response values may appear in events.
    log_values: bool,
}

impl TracingTrace {
    /// Creates a trace bridge.
    #[must_use]
    pub const fn new(log_values: bool) -> Self {
        Self {
            log_values,
        }
    }
}

impl CodingTrace for TracingTrace {
    fn on_rule_evaluated(&mut self, rule: &CodingRule, matched: bool) {
        tracing::trace!(method = rule.method.as_str(), matched, "rule evaluated");
    }

    fn on_code_evaluated(&mut self, index: usize, code: &CodeData, matched: bool) {
        tracing::debug!(index, code = code.id, matched, "code evaluated");
    }

    fn on_fallback_recorded(&mut self, index: usize, code: &CodeData) {
        tracing::debug!(index, code = code.id, "fallback code recorded");
    }

    fn on_response_coded(&mut self, response: &Response, outcome: Option<&CodeOutcome>) {
        let value = redact_value(&response.value, self.log_values);
        if let Some(CodeOutcome::Error(failure)) = outcome {
            tracing::warn!(
                variable = %response.id,
                value = %value,
                error = %failure,
                "response coding failed"
            );
            return;
        }
        tracing::debug!(
            variable = %response.id,
            status = response.status.as_str(),
            code = response.code,
            score = response.score,
            value = %value,
            "response coded"
        );
    }

    fn on_derivation_failed(&mut self, variable: &VariableId, error: &DerivationError) {
        tracing::warn!(variable = %variable, error = %error, "derivation failed");
    }
}
