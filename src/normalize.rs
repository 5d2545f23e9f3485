//! Value normalization: extraction-metadata stripping, placeholder folding,
//! and exact decimal coercion.
//!
//! Extracted field values arrive as free text ("`$45,600.00`",
//! "`N/A [Id: f3]`"). Before a value participates in expression evaluation it
//! is normalized into one of four shapes so that cross-field comparisons are
//! deterministic. Normalization is total: no input errors, coercion failures
//! degrade to the next-looser shape.

use regex::Regex;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::defaults::EngineDefaults;

/// Trailing `[Id: ...]` annotation appended by the extraction pipeline.
static ID_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\[Id:.*?\]\s*$").unwrap());

/// A value normalized for evaluation.
#[derive(Clone, Debug, PartialEq)]
pub enum Normalized {
    Null,
    Bool(bool),
    Number(Decimal),
    /// Cleaned display text (metadata stripped, trimmed). Comparison folding
    /// is applied separately, at expression-binding time only.
    Text(String),
}

impl Normalized {
    pub fn is_null(&self) -> bool {
        matches!(self, Normalized::Null)
    }
}

/// Normalize a raw document value.
///
/// - Non-text scalars pass through: numbers, booleans, null.
/// - Text is stripped of one trailing `[Id: ...]` annotation and trimmed.
/// - A cleaned string matching a null placeholder (case-insensitive) is null.
/// - Otherwise `$` and `,` are removed and an exact decimal parse is
///   attempted.
/// - Anything else stays text, in display form.
///
/// Mappings and arrays normalize to null: a structured value has no scalar
/// meaning inside an expression, and absent data must fail closed.
pub fn normalize(raw: &Value, defaults: &EngineDefaults) -> Normalized {
    match raw {
        Value::Null => Normalized::Null,
        Value::Bool(b) => Normalized::Bool(*b),
        Value::Number(n) => match decimal_from_json(n) {
            Some(d) => Normalized::Number(d),
            None => Normalized::Null,
        },
        Value::String(s) => normalize_text(s, defaults),
        Value::Array(_) | Value::Object(_) => Normalized::Null,
    }
}

fn normalize_text(raw: &str, defaults: &EngineDefaults) -> Normalized {
    let cleaned = strip_metadata(raw);

    if is_null_placeholder(&cleaned, defaults) {
        return Normalized::Null;
    }

    let for_decimal: String = cleaned.chars().filter(|c| *c != '$' && *c != ',').collect();
    match Decimal::from_str(&for_decimal) {
        Ok(d) => Normalized::Number(d),
        Err(_) => Normalized::Text(cleaned),
    }
}

/// Strip the trailing `[Id: ...]` extraction annotation and trim whitespace.
pub fn strip_metadata(raw: &str) -> String {
    ID_SUFFIX_RE.replace(raw, "").trim().to_string()
}

fn is_null_placeholder(cleaned: &str, defaults: &EngineDefaults) -> bool {
    defaults
        .null_placeholders
        .iter()
        .any(|p| cleaned.eq_ignore_ascii_case(p))
}

/// Fold text for comparison: lowercase, non-alphanumerics removed.
///
/// Applied to text bindings as they enter the expression context, never to
/// the display form carried in [`Normalized::Text`].
pub fn comparison_form(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Exact decimal conversion of a JSON number. Unrepresentable values
/// (e.g. extreme floats) yield `None` and fail closed upstream.
fn decimal_from_json(n: &serde_json::Number) -> Option<Decimal> {
    if let Some(i) = n.as_i64() {
        return Some(Decimal::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Some(Decimal::from(u));
    }
    Decimal::from_str(&n.to_string()).ok()
}
