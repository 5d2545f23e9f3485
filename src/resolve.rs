//! Cross-field reference resolution.
//!
//! Expressions refer to other fields with dotted tokens (`mv1.sale_price`,
//! `bos.buyer_name.value`) and to the field under validation with the bare
//! word `value`. The resolver scans an expression for these tokens and looks
//! each one up in the document snapshot, normalizing the result. Resolution
//! never mutates the document and never errors: absent groups, fields, or
//! path segments resolve to null so that evaluation fails closed downstream.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

use crate::defaults::EngineDefaults;
use crate::normalize::{Normalized, normalize};

/// Dotted reference: `segment(.segment)+`, segments of letters, digits,
/// `_` and `-`, starting with a letter or underscore.
static REFERENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Za-z_][A-Za-z0-9_-]*(?:\.[A-Za-z_][A-Za-z0-9_-]*)+)\b").unwrap()
});

/// The bare word `value` (not part of a dotted reference).
static VALUE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bvalue\b").unwrap());

/// A resolved reference: the token as written plus its normalized value.
#[derive(Clone, Debug, PartialEq)]
pub struct Binding {
    pub token: String,
    pub value: Normalized,
}

/// Scan an expression for reference tokens.
///
/// Returns dotted tokens plus `value` when present, de-duplicated and
/// ordered longest-first so no token is a strict prefix of a later one
/// during substitution.
pub fn scan_references(expression: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();

    for m in REFERENCE_RE.find_iter(expression) {
        let tok = m.as_str().to_string();
        if !tokens.contains(&tok) {
            tokens.push(tok);
        }
    }

    // Dotted matches consume their `value` segments, so a leftover standalone
    // `value` is detected on the text with dotted tokens blanked out.
    let mut blanked = expression.to_string();
    for tok in &tokens {
        blanked = blanked.replace(tok.as_str(), &" ".repeat(tok.len()));
    }
    if VALUE_RE.is_match(&blanked) && !tokens.iter().any(|t| t == "value") {
        tokens.push("value".to_string());
    }

    tokens.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    tokens
}

/// Resolve every reference token in `expression` against the snapshot.
///
/// `current_field_value` is the stored value of the field owning the rule
/// under evaluation; the bare token `value` resolves to it. Bindings come
/// back in substitution order (longest token first).
pub fn resolve(
    expression: &str,
    current_field_value: &Value,
    document: &Value,
    defaults: &EngineDefaults,
) -> Vec<Binding> {
    scan_references(expression)
        .into_iter()
        .map(|token| {
            let value = if token == "value" {
                normalize(current_field_value, defaults)
            } else {
                normalize(lookup(&token, document), defaults)
            };
            Binding { token, value }
        })
        .collect()
}

/// Look up a dotted reference in the document snapshot.
///
/// The first segment names a group, the second a field. The field's stored
/// value is unwrapped through `{"value": ...}` envelopes; remaining segments
/// index further into nested mappings, unwrapping between steps. Any failure
/// along the path yields null. Group and field names are matched exact-case.
fn lookup<'a>(token: &str, document: &'a Value) -> &'a Value {
    let mut parts = token.split('.');
    let group = parts.next().unwrap_or_default();
    let field = match parts.next() {
        Some(f) => f,
        None => return &Value::Null,
    };

    let field_data = document
        .get("groups")
        .and_then(|g| g.get(group))
        .and_then(|g| g.get("fields"))
        .and_then(|f| f.get(field));
    let mut current = match field_data {
        Some(v) => unwrap_envelopes(v),
        None => return &Value::Null,
    };

    for segment in parts {
        current = match current.get(segment) {
            Some(v) => unwrap_envelopes(v),
            None => return &Value::Null,
        };
    }

    current
}

/// Unwrap nested `{"value": ...}` envelopes until a scalar or a mapping
/// without a `value` key is reached.
fn unwrap_envelopes(value: &Value) -> &Value {
    let mut current = value;
    while let Some(inner) = current.as_object().and_then(|o| o.get("value")) {
        current = inner;
    }
    current
}
