// crates/coding-scheme-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration payload.
// Purpose: Deterministic example for docs and `config example` output.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Canonical example for `coding-scheme.toml`. Every key is spelled out with
//! its default value so the output doubles as a reference.

/// Returns a canonical example `coding-scheme.toml` configuration.
#[must_use]
pub fn config_toml_example() -> String {
    String::from(
        r#"[derive]
# Placed between source codes by CONCAT_CODE variables.
concat_delimiter = "_"

[limits]
# Scheme and response files larger than this are rejected before parsing.
max_input_bytes = 16777216
max_responses = 100000

[logging]
# error | warn | info | debug | trace; RUST_LOG overrides.
level = "info"
# compact | pretty | json
format = "compact"
# Response values stay redacted in logs unless enabled.
log_values = false
"#,
    )
}
