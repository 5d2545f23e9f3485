//! Rule-driven validation engine for structured document field data.
//!
//! `fieldcheck` validates field values extracted from business documents
//! against a data-driven rule configuration, producing a pass/fail verdict
//! and a human-readable message per field and per document-level condition:
//!
//! ```text
//! parse_config(json) → ValidationConfig
//! run(document, config) → RunOutcome { all_valid, annotated document }
//! ```
//!
//! A document is a tree of named groups, each holding named fields; a rule is
//! either an ordered regex-pattern list or an ordered boolean-expression
//! list, combined under an `AND`/`OR` condition. Expressions may reference
//! other fields with dotted tokens (`mv1.sale_price`) and the field under
//! validation with the bare word `value`; references are resolved against the
//! snapshot, normalized (metadata stripping, placeholder folding, exact
//! decimal coercion), and passed into a restricted expression grammar as
//! typed bindings, never spliced back into the source text. Evaluation is
//! sandboxed to the grammar plus five whitelisted functions and fails closed:
//! malformed input yields `false`, never an error.
//!
//! # Quick Start
//!
//! ```rust
//! use serde_json::json;
//!
//! let config = fieldcheck::parse_config(&json!({
//!     "properties": [{
//!         "validation_rules": [{
//!             "id": "bos.zip.value",
//!             "validation_type": "REGEX_LIST",
//!             "regexes": ["^[0-9]{5}$"],
//!             "error_msgs": ["bad zip"],
//!             "groups": ["bos"]
//!         }]
//!     }]
//! }))
//! .expect("valid configuration");
//!
//! let document = json!({
//!     "groups": {"bos": {"fields": {"zip": {"value": "30303", "pass": true, "message": ""}}}}
//! });
//!
//! let outcome = fieldcheck::check(&document, &config).expect("run succeeds");
//! assert!(outcome.all_valid);
//! ```

pub mod defaults;
pub mod engine;
pub mod enums;
pub mod error;
pub mod evaluate;
pub mod normalize;
pub mod parse;
pub mod resolve;
pub mod types;
pub mod validate;

pub(crate) mod ast;
pub(crate) mod lexer;
pub(crate) mod parser;

pub use defaults::EngineDefaults;
pub use enums::*;
pub use error::*;
pub use types::*;

// Re-export entry-point functions at the crate root for convenience.
pub use engine::run;
pub use parse::parse_config;

/// Convenience entry point: validate with the standard engine constants.
///
/// Equivalent to `run(document, config, &EngineDefaults::standard())`.
///
/// # Errors
///
/// Returns [`ConfigError`] when a rule definition is invalid; configuration
/// errors abort the whole run.
pub fn check(
    document: &serde_json::Value,
    config: &ValidationConfig,
) -> Result<RunOutcome, ConfigError> {
    engine::run(document, config, &EngineDefaults::standard())
}
