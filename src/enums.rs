//! Closed enumerations used throughout the rule configuration.
//!
//! These are "closed" enums: only the defined variants are valid. A rule
//! carrying any other string fails configuration parsing, which is fatal for
//! the whole run rather than a per-record failure.

use serde::{Deserialize, Serialize};

/// Kind of a validation rule: which validator interprets its list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleKind {
    /// Ordered regex patterns evaluated against the stringified field value.
    RegexList,
    /// Ordered boolean expressions evaluated against resolved references.
    ExpressionTypeList,
}

/// How the patterns/expressions within one rule combine.
///
/// The combination policy is intentionally asymmetric: `AND` short-circuits on
/// the first failing entry, `OR` always evaluates every entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConditionType {
    #[default]
    And,
    Or,
}
