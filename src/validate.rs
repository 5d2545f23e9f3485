//! Per-rule validators and the field-level dispatcher.
//!
//! A rule is either a regex-pattern list or an expression list; the
//! dispatcher selects the validator from the rule kind and applies
//! first-failure semantics across a field's rules. Within one rule the
//! entries combine under the rule's condition: `AND` short-circuits on the
//! first failing entry and reports that entry's message, `OR` evaluates
//! every entry and reports the first configured message when none passes.
//! The asymmetry is observable (partial vs. full evaluation) and kept
//! deliberately.

use regex::Regex;
use serde_json::Value;

use crate::defaults::EngineDefaults;
use crate::enums::{ConditionType, RuleKind};
use crate::error::{ConfigError, ConfigErrorKind};
use crate::evaluate::evaluate;
use crate::resolve::resolve;
use crate::types::Rule;

/// Validate a value against a `REGEX_LIST` rule.
///
/// Patterns match prefix-anchored against the trimmed, stringified value.
///
/// # Errors
///
/// Returns [`ConfigError`] for an empty pattern list or an unparsable
/// pattern. Both are invalid rule definitions, not data failures.
pub fn validate_regex_list(
    value: &Value,
    rule: &Rule,
    defaults: &EngineDefaults,
) -> Result<(bool, String), ConfigError> {
    if rule.regexes.is_empty() {
        return Err(ConfigError::for_rule(
            ConfigErrorKind::EmptyPatternList,
            "regex patterns list not specified",
            &rule.id,
        ));
    }

    let text = value_to_text(value);
    let text = text.trim();

    let mut any_matched = false;
    for (i, pattern) in rule.regexes.iter().enumerate() {
        let re = Regex::new(pattern).map_err(|e| {
            ConfigError::for_rule(
                ConfigErrorKind::InvalidRegex,
                format!("invalid regex pattern '{}': {}", pattern, e),
                &rule.id,
            )
        })?;
        let matched = re.find(text).is_some_and(|m| m.start() == 0);

        match rule.condition {
            ConditionType::And => {
                if !matched {
                    return Ok((false, rule.error_msg(i, defaults.regex_failed)));
                }
            }
            ConditionType::Or => any_matched = any_matched || matched,
        }
    }

    match rule.condition {
        ConditionType::And => Ok((true, String::new())),
        ConditionType::Or => {
            if any_matched {
                Ok((true, String::new()))
            } else {
                Ok((false, rule.error_msg(0, defaults.regex_failed)))
            }
        }
    }
}

/// Validate a value against an `EXPRESSION_TYPE_LIST` rule.
///
/// Each expression is resolved against the document snapshot and evaluated
/// fail-closed; `value` binds to the field owning the rule.
///
/// # Errors
///
/// Returns [`ConfigError`] when the rule declares no expressions.
pub fn validate_expression_list(
    value: &Value,
    rule: &Rule,
    document: &Value,
    defaults: &EngineDefaults,
) -> Result<(bool, String), ConfigError> {
    if rule.expressions.is_empty() {
        return Err(ConfigError::for_rule(
            ConfigErrorKind::EmptyExpressionList,
            "expressions list is required for EXPRESSION_TYPE_LIST validation",
            &rule.id,
        ));
    }

    let mut any_passed = false;
    for (i, expression) in rule.expressions.iter().enumerate() {
        let bindings = resolve(expression, value, document, defaults);
        let passed = evaluate(expression, &bindings);

        match rule.condition {
            ConditionType::And => {
                if !passed {
                    return Ok((false, rule.error_msg(i, defaults.expression_failed)));
                }
            }
            ConditionType::Or => any_passed = any_passed || passed,
        }
    }

    match rule.condition {
        ConditionType::And => Ok((true, String::new())),
        ConditionType::Or => {
            if any_passed {
                Ok((true, String::new()))
            } else {
                Ok((false, rule.error_msg(0, defaults.expression_failed)))
            }
        }
    }
}

/// Run a field's rules in declared order with first-failure semantics:
/// the first failing rule contributes its message and evaluation stops, so
/// at most one message is ever produced per field per run.
///
/// # Errors
///
/// Propagates [`ConfigError`] from either validator; configuration errors
/// abort the whole run.
pub fn validate_field(
    value: &Value,
    rules: &[&Rule],
    document: &Value,
    defaults: &EngineDefaults,
) -> Result<Vec<String>, ConfigError> {
    let mut messages = Vec::new();

    for rule in rules {
        let (passed, message) = match rule.kind {
            RuleKind::RegexList => validate_regex_list(value, rule, defaults)?,
            RuleKind::ExpressionTypeList => {
                validate_expression_list(value, rule, document, defaults)?
            }
        };

        if !passed {
            messages.push(message);
            break;
        }
    }

    Ok(messages)
}

/// Stringify a raw value for pattern matching. Null becomes the empty
/// string; structured values serialize to compact JSON.
fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
