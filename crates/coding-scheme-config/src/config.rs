// crates/coding-scheme-config/src/config.rs
// ============================================================================
// Module: Coding Scheme Configuration
// Description: Configuration loading and validation for the coding tools.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: coding-scheme-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Unknown keys and out-of-range values are rejected. When no path is named
//! and the default file does not exist, built-in defaults apply; a path named
//! on the command line or through [`CONFIG_ENV_VAR`] must exist.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs::File;
use std::io::ErrorKind;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use coding_scheme_core::DeriveOptions;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "coding-scheme.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "CODING_SCHEME_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum length of the concatenation delimiter in characters.
pub(crate) const MAX_CONCAT_DELIMITER_CHARS: usize = 16;
/// Default concatenation delimiter for CONCAT_CODE derivations.
pub(crate) const DEFAULT_CONCAT_DELIMITER: &str = "_";
/// Smallest accepted input file limit.
pub(crate) const MIN_INPUT_BYTES: u64 = 1024;
/// Largest accepted input file limit.
pub(crate) const MAX_INPUT_BYTES: u64 = 256 * 1024 * 1024;
/// Default input file limit.
pub(crate) const DEFAULT_MAX_INPUT_BYTES: u64 = 16 * 1024 * 1024;
/// Largest accepted response count limit.
pub(crate) const MAX_RESPONSES: usize = 10_000_000;
/// Default response count limit.
pub(crate) const DEFAULT_MAX_RESPONSES: usize = 100_000;

// ============================================================================
// SECTION: Config Model
// ============================================================================

/// Top-level configuration for the coding tools.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CodingSchemeConfig {
    /// Derivation settings.
    #[serde(default)]
    pub derive: DeriveConfig,
    /// Input size limits.
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Path the configuration was read from; `None` for built-in defaults.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl CodingSchemeConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let location = resolve_path(path)?;
        load_location(&location)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.derive.validate()?;
        self.limits.validate()?;
        Ok(())
    }

    /// Returns the derivation options handed to the engine.
    #[must_use]
    pub fn derive_options(&self) -> DeriveOptions {
        self.derive.options()
    }
}

/// Derivation configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeriveConfig {
    /// Delimiter placed between source codes by CONCAT_CODE.
    #[serde(default = "default_concat_delimiter")]
    pub concat_delimiter: String,
}

impl Default for DeriveConfig {
    fn default() -> Self {
        Self {
            concat_delimiter: default_concat_delimiter(),
        }
    }
}

impl DeriveConfig {
    /// Validates derivation configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.concat_delimiter.is_empty() {
            return Err(ConfigError::Invalid(
                "derive.concat_delimiter must be non-empty".to_string(),
            ));
        }
        if self.concat_delimiter.chars().count() > MAX_CONCAT_DELIMITER_CHARS {
            return Err(ConfigError::Invalid(format!(
                "derive.concat_delimiter exceeds {MAX_CONCAT_DELIMITER_CHARS} characters"
            )));
        }
        Ok(())
    }

    /// Builds engine derivation options.
    #[must_use]
    pub fn options(&self) -> DeriveOptions {
        DeriveOptions::new(self.concat_delimiter.clone())
    }
}

/// Input size limits applied before decoding documents.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    /// Maximum size of a scheme or response file in bytes.
    #[serde(default = "default_max_input_bytes")]
    pub max_input_bytes: u64,
    /// Maximum number of responses coded in one run.
    #[serde(default = "default_max_responses")]
    pub max_responses: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: default_max_input_bytes(),
            max_responses: default_max_responses(),
        }
    }
}

impl LimitsConfig {
    /// Validates limit configuration.
    fn validate(self) -> Result<(), ConfigError> {
        if !(MIN_INPUT_BYTES ..= MAX_INPUT_BYTES).contains(&self.max_input_bytes) {
            return Err(ConfigError::Invalid(format!(
                "limits.max_input_bytes must be between {MIN_INPUT_BYTES} and {MAX_INPUT_BYTES}"
            )));
        }
        if !(1 ..= MAX_RESPONSES).contains(&self.max_responses) {
            return Err(ConfigError::Invalid(format!(
                "limits.max_responses must be between 1 and {MAX_RESPONSES}"
            )));
        }
        Ok(())
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Minimum level emitted when `RUST_LOG` is unset.
    #[serde(default)]
    pub level: LogLevel,
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
    /// Include response values in trace events.
    #[serde(default)]
    pub log_values: bool,
}

/// Log verbosity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only.
    Error,
    /// Warnings and errors.
    Warn,
    /// Informational events.
    #[default]
    Info,
    /// Debug events.
    Debug,
    /// Everything, including per-rule evaluation.
    Trace,
}

impl LogLevel {
    /// Returns the filter directive name for this level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }

    /// Returns the level raised by `steps`, saturating at [`LogLevel::Trace`].
    #[must_use]
    pub const fn raised(self, steps: u8) -> Self {
        let mut level = self;
        let mut remaining = steps;
        while remaining > 0 {
            level = match level {
                Self::Error => Self::Warn,
                Self::Warn => Self::Info,
                Self::Info => Self::Debug,
                Self::Debug | Self::Trace => Self::Trace,
            };
            remaining -= 1;
        }
        level
    }
}

/// Log output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Single-line human-readable output.
    #[default]
    Compact,
    /// Multi-line human-readable output.
    Pretty,
    /// Newline-delimited JSON.
    Json,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Where the configuration path came from.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ConfigLocation {
    /// Path named by the caller or the environment; it must exist.
    Named(PathBuf),
    /// Default filename; absence means built-in defaults.
    Default(PathBuf),
}

/// Resolves the config path from CLI or environment.
fn resolve_path(path: Option<&Path>) -> Result<ConfigLocation, ConfigError> {
    if let Some(path) = path {
        return Ok(ConfigLocation::Named(path.to_path_buf()));
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(ConfigLocation::Named(PathBuf::from(env_path)));
    }
    Ok(ConfigLocation::Default(PathBuf::from(DEFAULT_CONFIG_NAME)))
}

/// Reads and validates the configuration at a resolved location.
fn load_location(location: &ConfigLocation) -> Result<CodingSchemeConfig, ConfigError> {
    let (path, named) = match location {
        ConfigLocation::Named(path) => (path.as_path(), true),
        ConfigLocation::Default(path) => (path.as_path(), false),
    };
    validate_path(path)?;
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if !named && err.kind() == ErrorKind::NotFound => {
            let config = CodingSchemeConfig::default();
            config.validate()?;
            return Ok(config);
        }
        Err(err) => return Err(ConfigError::Io(err.to_string())),
    };
    let size = file.metadata().map_err(|err| ConfigError::Io(err.to_string()))?.len();
    if size > u64::try_from(MAX_CONFIG_FILE_SIZE).unwrap_or(u64::MAX) {
        return Err(size_limit_error());
    }
    let bytes = read_limited(file, MAX_CONFIG_FILE_SIZE)?;
    let content = std::str::from_utf8(&bytes)
        .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
    let mut config = CodingSchemeConfig::from_toml_str(content)?;
    config.source = Some(path.to_path_buf());
    Ok(config)
}

/// Reads at most `limit` bytes, failing when the source holds more.
fn read_limited<R: Read>(reader: R, limit: usize) -> Result<Vec<u8>, ConfigError> {
    let mut bytes = Vec::new();
    let cap = u64::try_from(limit).unwrap_or(u64::MAX).saturating_add(1);
    reader.take(cap).read_to_end(&mut bytes).map_err(|err| ConfigError::Io(err.to_string()))?;
    if bytes.len() > limit {
        return Err(size_limit_error());
    }
    Ok(bytes)
}

/// Error for config files above [`MAX_CONFIG_FILE_SIZE`].
fn size_limit_error() -> ConfigError {
    ConfigError::Invalid("config file exceeds size limit".to_string())
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Default concatenation delimiter.
fn default_concat_delimiter() -> String {
    DEFAULT_CONCAT_DELIMITER.to_string()
}

/// Default input file limit.
const fn default_max_input_bytes() -> u64 {
    DEFAULT_MAX_INPUT_BYTES
}

/// Default response count limit.
const fn default_max_responses() -> usize {
    DEFAULT_MAX_RESPONSES
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test fixtures use explicit asserts and unwraps for clarity."
    )]

    use std::fs;
    use std::io;

    use super::*;

    #[test]
    fn missing_default_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let location = ConfigLocation::Default(dir.path().join(DEFAULT_CONFIG_NAME));
        let config = load_location(&location).unwrap();
        assert_eq!(config.derive.concat_delimiter, DEFAULT_CONCAT_DELIMITER);
        assert_eq!(config.limits.max_input_bytes, DEFAULT_MAX_INPUT_BYTES);
        assert_eq!(config.limits.max_responses, DEFAULT_MAX_RESPONSES);
        assert!(config.source.is_none());
    }

    #[test]
    fn missing_named_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let location = ConfigLocation::Named(dir.path().join("absent.toml"));
        let error = load_location(&location).unwrap_err();
        assert!(matches!(error, ConfigError::Io(_)), "unexpected error: {error}");
    }

    #[test]
    fn explicit_path_wins_over_environment() {
        let location = resolve_path(Some(Path::new("custom.toml"))).unwrap();
        assert_eq!(location, ConfigLocation::Named(PathBuf::from("custom.toml")));
    }

    #[test]
    fn default_file_is_read_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_NAME);
        fs::write(&path, "[derive]\nconcat_delimiter = \"|\"\n").unwrap();
        let config = load_location(&ConfigLocation::Default(path.clone())).unwrap();
        assert_eq!(config.derive.concat_delimiter, "|");
        assert_eq!(config.source, Some(path));
    }

    #[test]
    fn bounded_read_stops_at_the_limit() {
        let error = read_limited(io::repeat(b'a'), 16).unwrap_err();
        let ConfigError::Invalid(message) = error else {
            panic!("unexpected error: {error}");
        };
        assert!(message.contains("size limit"));
        let bytes = read_limited(&b"exact"[..], 5).unwrap();
        assert_eq!(bytes, b"exact");
    }

    #[test]
    fn delimiter_limit_counts_characters() {
        let config = DeriveConfig {
            concat_delimiter: "ü".repeat(MAX_CONCAT_DELIMITER_CHARS),
        };
        assert!(config.validate().is_ok());
        let config = DeriveConfig {
            concat_delimiter: "ü".repeat(MAX_CONCAT_DELIMITER_CHARS + 1),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn limits_accept_bounds() {
        let lower = LimitsConfig {
            max_input_bytes: MIN_INPUT_BYTES,
            max_responses: 1,
        };
        let upper = LimitsConfig {
            max_input_bytes: MAX_INPUT_BYTES,
            max_responses: MAX_RESPONSES,
        };
        assert!(lower.validate().is_ok());
        assert!(upper.validate().is_ok());
    }

    #[test]
    fn log_level_raises_and_saturates() {
        assert_eq!(LogLevel::Info.raised(0), LogLevel::Info);
        assert_eq!(LogLevel::Info.raised(1), LogLevel::Debug);
        assert_eq!(LogLevel::Warn.raised(5), LogLevel::Trace);
        assert_eq!(LogLevel::Trace.as_str(), "trace");
    }
}
