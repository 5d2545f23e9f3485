use serde::{Deserialize, Serialize};
use std::fmt;

/// Error kind for configuration failures.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigErrorKind {
    /// The configuration document has no usable rule definitions.
    MissingRules,
    /// A rule's shape could not be deserialized (unknown kind, bad types).
    InvalidShape,
    /// A `REGEX_LIST` rule declares no patterns.
    EmptyPatternList,
    /// An `EXPRESSION_TYPE_LIST` rule declares no expressions.
    EmptyExpressionList,
    /// A declared regex pattern failed to compile.
    InvalidRegex,
}

/// Produced when a rule definition is invalid.
///
/// Configuration errors indicate a broken rule store, not a data problem,
/// and abort the whole validation run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigError {
    pub kind: ConfigErrorKind,
    pub message: String,
    /// Id of the offending rule, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
}

impl ConfigError {
    pub(crate) fn new(kind: ConfigErrorKind, message: impl Into<String>) -> Self {
        ConfigError {
            kind,
            message: message.into(),
            rule_id: None,
        }
    }

    pub(crate) fn for_rule(
        kind: ConfigErrorKind,
        message: impl Into<String>,
        rule_id: &str,
    ) -> Self {
        ConfigError {
            kind,
            message: message.into(),
            rule_id: Some(rule_id.to_string()),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.rule_id {
            Some(id) => write!(f, "rule '{}': {}", id, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Error kind for expression-evaluation failures.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExprErrorKind {
    /// Lexing or parsing failed.
    Syntax,
    /// Operator or function applied to incompatible operand types.
    Type,
    /// `abs`/`safe_subtract` received a null operand.
    NullOperand,
    /// Identifier with no binding in the evaluation context.
    UnknownIdentifier,
    /// Function call outside the whitelist.
    UnknownFunction,
    /// Wrong number of arguments to a whitelisted function.
    Arity,
    /// Checked decimal arithmetic failed (division by zero, overflow).
    Arithmetic,
}

/// Internal evaluation error.
///
/// Never escapes [`crate::evaluate::evaluate`]: every `ExprError` is caught at
/// the evaluator boundary and folds into a `false` outcome (fail-closed).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExprError {
    pub kind: ExprErrorKind,
    pub message: String,
}

impl ExprError {
    pub(crate) fn new(kind: ExprErrorKind, message: impl Into<String>) -> Self {
        ExprError {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ExprError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExprError {}
