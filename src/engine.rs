//! The validation orchestrator.
//!
//! A run walks the rule configuration in two passes over an immutable
//! document snapshot. Document-scoped rules (empty `groups`) evaluate
//! against the whole snapshot and record failures in the document-level
//! `exceptions` map; field-scoped rules attach to fields by id prefix and
//! annotate `pass`/`message` on the output copy. All reference resolution
//! reads the original snapshot, so annotations are never visible to
//! subsequently evaluated rules and results are order-independent.

use serde_json::Value;

use crate::defaults::EngineDefaults;
use crate::error::ConfigError;
use crate::types::{
    Rule, RunOutcome, ValidationConfig, document_groups, field_value, group_fields,
};
use crate::validate::validate_field;

/// Validate a document snapshot against a rule configuration.
///
/// Returns the overall verdict and an annotated copy of the document; the
/// input snapshot is never mutated.
///
/// # Errors
///
/// Returns [`ConfigError`] when a rule definition is invalid (empty
/// pattern/expression list, unparsable regex). Configuration errors abort
/// the whole run; data failures never do.
pub fn run(
    document: &Value,
    config: &ValidationConfig,
    defaults: &EngineDefaults,
) -> Result<RunOutcome, ConfigError> {
    let mut output = document.clone();
    let mut all_valid = true;

    // Document-scoped rules see the whole snapshot as their field value.
    for rule in config.document_rules() {
        let messages = validate_field(document, &[rule], document, defaults)?;
        if !messages.is_empty() {
            all_valid = false;
            tracing::debug!(rule_id = %rule.id, "document-scope rule failed");
            record_exception(&mut output, rule, &messages.join("; "));
        }
    }

    // Field-scoped rules, in the document's own group/field order.
    let groups = document_groups(document);
    for (group_name, group_data) in groups.into_iter().flatten() {
        let fields = match group_fields(group_data) {
            Some(fields) => fields,
            None => continue,
        };

        for (field_name, field_data) in fields {
            let rules = config.field_rules(group_name, field_name);
            if rules.is_empty() {
                continue;
            }

            let value = field_value(field_data);
            let messages = validate_field(value, &rules, document, defaults)?;
            if !messages.is_empty() {
                all_valid = false;
            }

            // A field whose output slot is not a mapping cannot carry
            // annotations; it is skipped with its prior state unchanged.
            let Some(slot) = output_field(&mut output, group_name, field_name) else {
                continue;
            };

            if messages.is_empty() {
                if let Some(message) = slot.get_mut("message") {
                    *message = Value::String(String::new());
                }
            } else {
                slot.insert("pass".to_string(), Value::Bool(false));
                slot.insert(
                    "message".to_string(),
                    Value::String(messages.join("; ")),
                );
            }
        }
    }

    tracing::debug!(all_valid, "validation run finished");
    Ok(RunOutcome { all_valid, document: output })
}

/// Record a failed document-scoped rule in the output's `exceptions` map,
/// creating the map when absent.
fn record_exception(output: &mut Value, rule: &Rule, message: &str) {
    let Some(root) = output.as_object_mut() else {
        return;
    };
    let exceptions = root
        .entry("exceptions".to_string())
        .or_insert_with(|| Value::Object(serde_json::Map::new()));
    if let Some(map) = exceptions.as_object_mut() {
        let id = if rule.id.is_empty() { "unknown_rule" } else { &rule.id };
        map.insert(id.to_string(), Value::String(message.to_string()));
    }
}

/// Mutable access to a field's annotation slot in the output document.
fn output_field<'a>(
    output: &'a mut Value,
    group: &str,
    field: &str,
) -> Option<&'a mut serde_json::Map<String, Value>> {
    output
        .get_mut("groups")?
        .get_mut(group)?
        .get_mut("fields")?
        .get_mut(field)?
        .as_object_mut()
}
