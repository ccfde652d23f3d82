//! Placeholder substitution over a parsed configuration tree.
//!
//! A string leaf whose entire content is `${NAME}` or `${NAME:-default}` is
//! replaced during resolution:
//!
//! 1. the overlay value, if `NAME` is set to a non-empty string;
//! 2. otherwise the literal default, if one is given;
//! 3. otherwise the placeholder is left untouched, so a missing required
//!    variable stays visible instead of collapsing to an empty string.
//!
//! Anything that is not a whole-string placeholder passes through unchanged.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_yaml::Value;

use super::env::EnvOverlay;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\$\{(.+?)(?::-([^}]+))?\}$").expect("placeholder regex is valid"));

/// Recursively resolve placeholders in a configuration tree. The walk covers
/// mappings and sequences and terminates on any finite tree; YAML cannot
/// express cycles.
pub fn resolve(value: Value, overlay: &EnvOverlay) -> Value {
    match value {
        Value::Mapping(mapping) => Value::Mapping(
            mapping
                .into_iter()
                .map(|(key, value)| (key, resolve(value, overlay)))
                .collect(),
        ),
        Value::Sequence(items) => Value::Sequence(
            items
                .into_iter()
                .map(|item| resolve(item, overlay))
                .collect(),
        ),
        Value::String(text) => Value::String(resolve_string(text, overlay)),
        other => other,
    }
}

fn resolve_string(text: String, overlay: &EnvOverlay) -> String {
    let Some(captures) = PLACEHOLDER.captures(&text) else {
        return text;
    };

    let name = &captures[1];
    if let Some(value) = overlay.get(name).filter(|value| !value.is_empty()) {
        return value.to_string();
    }
    if let Some(default) = captures.get(2) {
        return default.as_str().to_string();
    }

    text
}

/// True if a string still carries an unresolved placeholder. Credential
/// validation uses this to treat `${MINIMAX_API_KEY}` as absent.
pub fn is_unresolved(text: &str) -> bool {
    PLACEHOLDER.is_match(text)
}
