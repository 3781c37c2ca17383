//! Config load validation tests for coding-scheme-config.
// crates/coding-scheme-config/tests/load_validation.rs
// =============================================================================
// Module: Config Load Validation Tests
// Description: Validate config loading guards (path, size, encoding, ranges).
// Purpose: Ensure config input handling is strict and fail-closed.
// =============================================================================

use std::io::Write;
use std::path::Path;

use coding_scheme_config::CodingSchemeConfig;
use coding_scheme_config::ConfigError;
use coding_scheme_config::LogFormat;
use coding_scheme_config::LogLevel;
use coding_scheme_config::config_toml_example;
use tempfile::NamedTempFile;

type TestResult = Result<(), String>;

fn assert_invalid(result: Result<CodingSchemeConfig, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config load".to_string()),
    }
}

fn write_config(content: &str) -> Result<NamedTempFile, String> {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(content.as_bytes()).map_err(|err| err.to_string())?;
    Ok(file)
}

#[test]
fn load_rejects_path_too_long() -> TestResult {
    let long_path = "a".repeat(5_000);
    let path = Path::new(&long_path);
    assert_invalid(CodingSchemeConfig::load(Some(path)), "config path exceeds max length")?;
    Ok(())
}

#[test]
fn load_rejects_path_component_too_long() -> TestResult {
    let long_component = "a".repeat(300);
    let path = Path::new(&long_component);
    assert_invalid(CodingSchemeConfig::load(Some(path)), "config path component too long")?;
    Ok(())
}

#[test]
fn load_rejects_oversized_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    let payload = vec![b'#'; 1_048_577];
    file.write_all(&payload).map_err(|err| err.to_string())?;
    assert_invalid(CodingSchemeConfig::load(Some(file.path())), "config file exceeds size limit")?;
    Ok(())
}

#[test]
fn load_rejects_non_utf8_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(&[0xFF, 0xFE, 0xFF]).map_err(|err| err.to_string())?;
    assert_invalid(CodingSchemeConfig::load(Some(file.path())), "config file must be utf-8")?;
    Ok(())
}

#[test]
fn load_rejects_missing_named_file() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("missing.toml");
    assert_invalid(CodingSchemeConfig::load(Some(&path)), "config io error")?;
    Ok(())
}

#[test]
fn load_rejects_unknown_keys() -> TestResult {
    let file = write_config("[derive]\nconcat_delimiter = \"_\"\nseparator = \"-\"\n")?;
    assert_invalid(CodingSchemeConfig::load(Some(file.path())), "config parse error")?;
    let file = write_config("[storage]\npath = \"x\"\n")?;
    assert_invalid(CodingSchemeConfig::load(Some(file.path())), "config parse error")?;
    Ok(())
}

#[test]
fn load_rejects_empty_delimiter() -> TestResult {
    let file = write_config("[derive]\nconcat_delimiter = \"\"\n")?;
    assert_invalid(
        CodingSchemeConfig::load(Some(file.path())),
        "derive.concat_delimiter must be non-empty",
    )?;
    Ok(())
}

#[test]
fn load_rejects_long_delimiter() -> TestResult {
    let file = write_config("[derive]\nconcat_delimiter = \"-----------------\"\n")?;
    assert_invalid(CodingSchemeConfig::load(Some(file.path())), "derive.concat_delimiter exceeds")?;
    Ok(())
}

#[test]
fn load_rejects_out_of_range_limits() -> TestResult {
    let file = write_config("[limits]\nmax_input_bytes = 512\n")?;
    assert_invalid(CodingSchemeConfig::load(Some(file.path())), "limits.max_input_bytes")?;
    let file = write_config("[limits]\nmax_input_bytes = 1073741824\n")?;
    assert_invalid(CodingSchemeConfig::load(Some(file.path())), "limits.max_input_bytes")?;
    let file = write_config("[limits]\nmax_responses = 0\n")?;
    assert_invalid(CodingSchemeConfig::load(Some(file.path())), "limits.max_responses")?;
    Ok(())
}

#[test]
fn load_rejects_unknown_log_level() -> TestResult {
    let file = write_config("[logging]\nlevel = \"verbose\"\n")?;
    assert_invalid(CodingSchemeConfig::load(Some(file.path())), "config parse error")?;
    Ok(())
}

#[test]
fn load_accepts_partial_sections() -> TestResult {
    let file = write_config("[logging]\nformat = \"json\"\nlog_values = true\n")?;
    let config = CodingSchemeConfig::load(Some(file.path())).map_err(|err| err.to_string())?;
    if config.logging.format != LogFormat::Json || !config.logging.log_values {
        return Err("logging section not applied".to_string());
    }
    if config.logging.level != LogLevel::Info {
        return Err("default level not kept".to_string());
    }
    if config.derive_options().concat_delimiter != "_" {
        return Err("default delimiter not kept".to_string());
    }
    if config.source.as_deref() != Some(file.path()) {
        return Err("source path not recorded".to_string());
    }
    Ok(())
}

#[test]
fn example_config_is_valid() -> TestResult {
    let config =
        CodingSchemeConfig::from_toml_str(&config_toml_example()).map_err(|err| err.to_string())?;
    let defaults = CodingSchemeConfig::default();
    if config.derive.concat_delimiter != defaults.derive.concat_delimiter
        || config.limits.max_input_bytes != defaults.limits.max_input_bytes
        || config.limits.max_responses != defaults.limits.max_responses
        || config.logging.level != defaults.logging.level
        || config.logging.format != defaults.logging.format
    {
        return Err("example drifted from defaults".to_string());
    }
    Ok(())
}
