//! Engine-wide constants: placeholder tokens and default error messages.
//!
//! Gathered into a single immutable value passed by reference into the
//! components, so there is no mutable global state anywhere in the engine.

/// Immutable engine constants.
#[derive(Clone, Debug)]
pub struct EngineDefaults {
    /// Tokens that normalize to null (compared ASCII case-insensitively
    /// after metadata stripping and trimming).
    pub null_placeholders: &'static [&'static str],
    /// Message for a failed pattern with no aligned `error_msgs` entry.
    pub regex_failed: &'static str,
    /// Message for a failed expression with no aligned `error_msgs` entry.
    pub expression_failed: &'static str,
}

impl EngineDefaults {
    /// The standard constants used by the stock engine.
    pub const fn standard() -> Self {
        EngineDefaults {
            null_placeholders: &["N/A", "NA", "NULL", "NONE", "-", "", "UNDEFINED"],
            regex_failed: "Value does not match required pattern",
            expression_failed: "Expression validation failed",
        }
    }
}

impl Default for EngineDefaults {
    fn default() -> Self {
        EngineDefaults::standard()
    }
}
