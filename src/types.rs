use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::enums::*;

// ─── Rule configuration ─────────────────────────────────────────────────────

/// One configured validation test.
///
/// Serde field names follow the external rule store's JSON shape. A rule is
/// field-scoped iff `groups` is non-empty; its id then follows the
/// `<group>.<field>.<qualifier>` convention and the `<group>.<field>.` prefix
/// attaches it to the matching field during orchestration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Rule {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "validation_type")]
    pub kind: RuleKind,
    /// Ordered regex patterns (`REGEX_LIST` rules).
    #[serde(default)]
    pub regexes: Vec<String>,
    /// Ordered boolean expressions (`EXPRESSION_TYPE_LIST` rules).
    #[serde(default)]
    pub expressions: Vec<String>,
    /// Index-aligned with `regexes`/`expressions`; may be shorter, in which
    /// case missing positions fall back to the kind's default message.
    #[serde(default)]
    pub error_msgs: Vec<String>,
    /// Group names the rule applies to. Empty means whole-document scope.
    #[serde(default)]
    pub groups: Vec<String>,
    #[serde(default, rename = "conditionType", alias = "condition_type")]
    pub condition: ConditionType,
    /// Extra keys from the rule store (descriptions, audit fields) pass through.
    #[serde(flatten)]
    pub extensions: HashMap<String, Value>,
}

impl Rule {
    /// Whether this rule runs against the whole document snapshot.
    pub fn is_document_scope(&self) -> bool {
        self.groups.is_empty()
    }

    /// The error message for the entry at `index`, falling back to `default`
    /// when `error_msgs` is shorter.
    pub(crate) fn error_msg(&self, index: usize, default: &str) -> String {
        self.error_msgs
            .get(index)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }
}

/// An ordered group of rules as stored in the configuration document.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RuleGroup {
    #[serde(default, rename = "validation_rules")]
    pub rules: Vec<Rule>,
    #[serde(flatten)]
    pub extensions: HashMap<String, Value>,
}

/// The full rule configuration: an ordered list of rule groups.
///
/// Immutable for the duration of a run; loaded once by the external
/// collaborator and parsed via [`crate::parse::parse_config`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ValidationConfig {
    pub groups: Vec<RuleGroup>,
}

impl ValidationConfig {
    /// All rules in declared order (group order, then rule order).
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.groups.iter().flat_map(|g| g.rules.iter())
    }

    /// Rules with whole-document scope (empty `groups`).
    pub fn document_rules(&self) -> Vec<&Rule> {
        self.rules().filter(|r| r.is_document_scope()).collect()
    }

    /// Field-scoped rules attached to `<group>.<field>` by id prefix.
    pub fn field_rules(&self, group: &str, field: &str) -> Vec<&Rule> {
        let prefix = format!("{}.{}.", group, field);
        self.rules()
            .filter(|r| !r.is_document_scope() && r.id.starts_with(&prefix))
            .collect()
    }
}

// ─── Run outcome ────────────────────────────────────────────────────────────

/// Result of a validation run: the overall verdict plus the annotated
/// document copy (per-field `pass`/`message`, document-level `exceptions`).
#[derive(Clone, Debug)]
pub struct RunOutcome {
    pub all_valid: bool,
    pub document: Value,
}

// ─── Document accessors ─────────────────────────────────────────────────────

/// The `groups` mapping of a document snapshot, if present.
pub(crate) fn document_groups(doc: &Value) -> Option<&serde_json::Map<String, Value>> {
    doc.get("groups")?.as_object()
}

/// The `fields` mapping of a group node, if present.
pub(crate) fn group_fields(group: &Value) -> Option<&serde_json::Map<String, Value>> {
    group.get("fields")?.as_object()
}

/// The stored value of a field node: the `value` key when the field data is
/// a mapping, otherwise the field data itself.
pub(crate) fn field_value(field_data: &Value) -> &Value {
    match field_data.as_object() {
        Some(obj) => obj.get("value").unwrap_or(&Value::Null),
        None => field_data,
    }
}
