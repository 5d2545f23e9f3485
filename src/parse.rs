use serde_json::Value;

use crate::error::{ConfigError, ConfigErrorKind};
use crate::types::{RuleGroup, ValidationConfig};

/// Parse a raw configuration document into a [`ValidationConfig`].
///
/// The rule store's shape is `{"properties": [{"validation_rules": [...]}]}`.
/// Performs deserialization and shape checks only; per-rule invariants that
/// depend on the rule kind (non-empty lists, compilable patterns) are
/// enforced when the rule is evaluated, so a broken rule is still reported
/// with its id.
///
/// # Errors
///
/// Returns [`ConfigError`] when `properties` is absent or empty, or when a
/// rule carries an unknown `validation_type`/`conditionType` or otherwise
/// fails to deserialize.
pub fn parse_config(raw: &Value) -> Result<ValidationConfig, ConfigError> {
    let properties = raw
        .get("properties")
        .ok_or_else(|| {
            ConfigError::new(
                ConfigErrorKind::MissingRules,
                "no validation rules found in the configuration",
            )
        })?;

    let groups: Vec<RuleGroup> =
        serde_json::from_value(properties.clone()).map_err(|e| {
            ConfigError::new(
                ConfigErrorKind::InvalidShape,
                format!("invalid rule configuration: {}", e),
            )
        })?;

    if groups.iter().all(|g| g.rules.is_empty()) {
        return Err(ConfigError::new(
            ConfigErrorKind::MissingRules,
            "no validation rules found in the configuration",
        ));
    }

    Ok(ValidationConfig { groups })
}
