// crates/coding-scheme-cli/src/tests/i18n.rs
// ============================================================================
// Module: CLI i18n Tests
// Description: Unit tests for catalog parity and locale parsing.
// Purpose: Ensure CLI localization remains consistent across supported locales.
// Dependencies: coding-scheme-cli i18n module
// ============================================================================

//! ## Overview
//! Verifies the CLI message catalogs stay in sync, locale parsing is tolerant,
//! and locale templates preserve placeholder parity with English.

use std::collections::BTreeSet;

use crate::i18n::Locale;
use crate::i18n::MessageArg;
use crate::i18n::SUPPORTED_LOCALES;
use crate::i18n::catalog_entries_for;
use crate::i18n::catalog_for;
use crate::i18n::translate;

fn parse_placeholder_names(template: &str) -> Result<BTreeSet<String>, String> {
    let mut placeholders = BTreeSet::new();
    let mut rest = template;
    while let Some(open) = rest.find(['{', '}']) {
        if rest[open ..].starts_with('}') {
            return Err(format!("unmatched '}}' in {template:?}"));
        }
        let after = &rest[open + 1 ..];
        let close = after.find('}').ok_or_else(|| format!("unclosed '{{' in {template:?}"))?;
        let name = &after[.. close];
        if name.contains('{') {
            return Err(format!("nested '{{' in {template:?}"));
        }
        let mut chars = name.chars();
        let Some(first) = chars.next() else {
            return Err(format!("empty placeholder in {template:?}"));
        };
        if !first.is_ascii_lowercase()
            || chars.any(|ch| !(ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_'))
        {
            return Err(format!("placeholder '{name}' must use [a-z][a-z0-9_]*"));
        }
        placeholders.insert(name.to_string());
        rest = &after[close + 1 ..];
    }
    Ok(placeholders)
}

#[test]
fn catalogs_have_matching_keys() {
    assert!(SUPPORTED_LOCALES.contains(&Locale::En), "English must remain the baseline locale");
    let en_keys: BTreeSet<&'static str> = catalog_for(Locale::En).keys().copied().collect();
    for locale in SUPPORTED_LOCALES {
        let locale_keys: BTreeSet<&'static str> = catalog_for(*locale).keys().copied().collect();
        assert_eq!(en_keys, locale_keys, "locale catalogs must stay in parity ({locale:?})");
    }
}

#[test]
fn catalogs_have_unique_keys_per_locale() {
    for locale in SUPPORTED_LOCALES {
        let entries = catalog_entries_for(*locale);
        let keys: BTreeSet<&str> = entries.iter().map(|(key, _)| *key).collect();
        assert_eq!(keys.len(), entries.len(), "duplicate catalog keys in locale {locale:?}");
    }
}

#[test]
fn catalogs_have_placeholder_shape_parity_with_english() {
    for (key, en_template) in catalog_entries_for(Locale::En) {
        let en_placeholders = parse_placeholder_names(en_template)
            .unwrap_or_else(|error| panic!("invalid placeholders for '{key}' in En: {error}"));
        for locale in SUPPORTED_LOCALES {
            let template = catalog_for(*locale)
                .get(key)
                .copied()
                .unwrap_or_else(|| panic!("missing key '{key}' in locale {locale:?}"));
            let placeholders = parse_placeholder_names(template).unwrap_or_else(|error| {
                panic!("invalid placeholders for '{key}' in {locale:?}: {error}")
            });
            assert_eq!(
                en_placeholders, placeholders,
                "placeholder set mismatch for key '{key}' in locale {locale:?}"
            );
        }
    }
}

#[test]
fn non_english_locales_differ_for_curated_keys() {
    const CURATED_KEYS: &[&str] =
        &["config.validate.ok", "code.ok", "i18n.disclaimer.machine_translated"];
    for locale in SUPPORTED_LOCALES.iter().filter(|locale| **locale != Locale::En) {
        for key in CURATED_KEYS {
            let en = catalog_for(Locale::En).get(key).copied().expect("en key exists");
            let localized = catalog_for(*locale).get(key).copied().expect("localized key exists");
            assert_ne!(en, localized, "curated key '{key}' must be translated ({locale:?})");
        }
    }
}

#[test]
fn locale_parse_accepts_region_tags_and_case() {
    assert_eq!(Locale::parse("en"), Some(Locale::En));
    assert_eq!(Locale::parse("EN"), Some(Locale::En));
    assert_eq!(Locale::parse("en-US"), Some(Locale::En));
    assert_eq!(Locale::parse("ca_ES"), Some(Locale::Ca));
    assert_eq!(Locale::parse(" ca "), Some(Locale::Ca));
    assert_eq!(Locale::parse(""), None);
    assert_eq!(Locale::parse("de"), None);
    assert_eq!(Locale::Ca.as_str(), "ca");
}

#[test]
fn translate_substitutes_placeholders() {
    let output = translate(
        "code.too_many_responses",
        vec![
            MessageArg::new("path", "answers.json"),
            MessageArg::new("count", "12"),
            MessageArg::new("limit", "10"),
        ],
    );
    assert!(output.contains("answers.json"));
    assert!(output.contains("12"));
    assert!(output.contains("10"));
}

#[test]
fn translate_extra_placeholder_ignored() {
    let output = translate("config.validate.ok", vec![MessageArg::new("extra", "value")]);
    assert!(!output.contains("value"));
}

#[test]
fn fallback_chain_en_to_key() {
    let nonexistent_key = "nonexistent.key.does.not.exist";
    assert_eq!(translate(nonexistent_key, vec![]), nonexistent_key);
}

#[test]
fn placeholder_parser_rejects_malformed_templates() {
    assert!(parse_placeholder_names("{open").is_err());
    assert!(parse_placeholder_names("close}").is_err());
    assert!(parse_placeholder_names("{}").is_err());
    assert!(parse_placeholder_names("{Upper}").is_err());
    assert_eq!(
        parse_placeholder_names("{a} and {b_2}").unwrap(),
        BTreeSet::from(["a".to_string(), "b_2".to_string()])
    );
}
