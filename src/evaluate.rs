//! Expression evaluation over typed bindings.
//!
//! Resolved reference values are never spliced into the expression source as
//! text. Each token is rewritten to a sanitized identifier (word-boundary,
//! longest token first) and its normalized value is installed in the
//! evaluation context under that name; the rewritten source is then parsed
//! and interpreted against the context. The only capabilities available are
//! the grammar itself and the five whitelisted functions.
//!
//! [`evaluate`] is fail-closed: any lexing, parsing, type, reference, or
//! arity error folds into `false` and is reported at debug level. It never
//! panics and never returns an error.

use regex::Regex;
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::str::FromStr;
use time::{Date, OffsetDateTime, macros::format_description};

use crate::ast::{BinOp, Expr, UnaryOp};
use crate::error::{ExprError, ExprErrorKind};
use crate::normalize::{Normalized, comparison_form};
use crate::parser::parse;
use crate::resolve::Binding;

/// Evaluate an expression against resolved bindings. Returns the truthiness
/// of the result; any internal failure yields `false`.
pub fn evaluate(expression: &str, bindings: &[Binding]) -> bool {
    if expression.trim().is_empty() {
        tracing::debug!(expression, "empty expression evaluates to false");
        return false;
    }

    let (rewritten, context) = bind(expression, bindings);

    match parse(&rewritten).and_then(|ast| interp(&ast, &context)) {
        Ok(value) => truthy(&value),
        Err(e) => {
            tracing::debug!(
                expression,
                rewritten = %rewritten,
                error = %e,
                "expression evaluation failed; folding to false"
            );
            false
        }
    }
}

/// Rewrite reference tokens to sanitized identifiers and build the
/// evaluation context. Bindings must arrive longest-token-first so that no
/// token is rewritten inside a longer one.
fn bind(expression: &str, bindings: &[Binding]) -> (String, HashMap<String, Normalized>) {
    let mut rewritten = expression.to_string();
    let mut context = HashMap::new();

    for binding in bindings {
        let name = sanitize_name(&binding.token);
        let pattern = format!(r"\b{}\b", regex::escape(&binding.token));
        if let Ok(re) = Regex::new(&pattern) {
            rewritten = re.replace_all(&rewritten, name.as_str()).into_owned();
        }
        let value = match &binding.value {
            // Text folds to comparison form at binding time only.
            Normalized::Text(t) => Normalized::Text(comparison_form(t)),
            other => other.clone(),
        };
        context.insert(name, value);
    }

    (rewritten, context)
}

/// Turn a dotted reference into an identifier the grammar accepts.
fn sanitize_name(token: &str) -> String {
    token
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Python-style truthiness over normalized values.
fn truthy(value: &Normalized) -> bool {
    match value {
        Normalized::Null => false,
        Normalized::Bool(b) => *b,
        Normalized::Number(n) => !n.is_zero(),
        Normalized::Text(t) => !t.is_empty(),
    }
}

fn type_err(message: impl Into<String>) -> ExprError {
    ExprError::new(ExprErrorKind::Type, message)
}

// ─── Interpreter ────────────────────────────────────────────────────────────

fn interp(expr: &Expr, context: &HashMap<String, Normalized>) -> Result<Normalized, ExprError> {
    match expr {
        Expr::Null => Ok(Normalized::Null),
        Expr::Bool(b) => Ok(Normalized::Bool(*b)),
        Expr::Number(n) => Ok(Normalized::Number(*n)),
        Expr::Str(s) => Ok(Normalized::Text(s.clone())),
        Expr::Ident(name) => context.get(name).cloned().ok_or_else(|| {
            ExprError::new(
                ExprErrorKind::UnknownIdentifier,
                format!("unknown identifier '{}'", name),
            )
        }),
        Expr::Unary(op, inner) => {
            let value = interp(inner, context)?;
            match op {
                UnaryOp::Not => Ok(Normalized::Bool(!truthy(&value))),
                UnaryOp::Neg => {
                    let n = as_decimal(&value)
                        .ok_or_else(|| type_err("unary '-' needs a numeric operand"))?;
                    Ok(Normalized::Number(-n))
                }
            }
        }
        Expr::Binary(BinOp::And, lhs, rhs) => {
            let left = interp(lhs, context)?;
            if truthy(&left) {
                interp(rhs, context)
            } else {
                Ok(left)
            }
        }
        Expr::Binary(BinOp::Or, lhs, rhs) => {
            let left = interp(lhs, context)?;
            if truthy(&left) {
                Ok(left)
            } else {
                interp(rhs, context)
            }
        }
        Expr::Binary(op, lhs, rhs) => {
            let left = interp(lhs, context)?;
            let right = interp(rhs, context)?;
            binary(*op, &left, &right)
        }
        Expr::Call(name, args) => {
            let values = args
                .iter()
                .map(|a| interp(a, context))
                .collect::<Result<Vec<_>, _>>()?;
            call(name, &values)
        }
    }
}

fn binary(op: BinOp, left: &Normalized, right: &Normalized) -> Result<Normalized, ExprError> {
    match op {
        BinOp::Eq => Ok(Normalized::Bool(values_equal(left, right))),
        BinOp::Ne => Ok(Normalized::Bool(!values_equal(left, right))),
        BinOp::Lt => Ok(Normalized::Bool(compare(left, right)? == Ordering::Less)),
        BinOp::Le => Ok(Normalized::Bool(compare(left, right)? != Ordering::Greater)),
        BinOp::Gt => Ok(Normalized::Bool(compare(left, right)? == Ordering::Greater)),
        BinOp::Ge => Ok(Normalized::Bool(compare(left, right)? != Ordering::Less)),
        BinOp::Add => match (as_decimal(left), as_decimal(right)) {
            (Some(a), Some(b)) => checked(a.checked_add(b), "addition overflow"),
            _ => match (left, right) {
                (Normalized::Text(a), Normalized::Text(b)) => {
                    Ok(Normalized::Text(format!("{}{}", a, b)))
                }
                _ => Err(type_err("'+' needs two numbers or two strings")),
            },
        },
        BinOp::Sub => arith(left, right, "-", |a, b| a.checked_sub(b)),
        BinOp::Mul => arith(left, right, "*", |a, b| a.checked_mul(b)),
        BinOp::Div => arith(left, right, "/", |a, b| a.checked_div(b)),
        BinOp::And | BinOp::Or => unreachable!("short-circuit operators handled in interp"),
    }
}

fn arith(
    left: &Normalized,
    right: &Normalized,
    symbol: &str,
    op: impl Fn(Decimal, Decimal) -> Option<Decimal>,
) -> Result<Normalized, ExprError> {
    let (a, b) = match (as_decimal(left), as_decimal(right)) {
        (Some(a), Some(b)) => (a, b),
        _ => return Err(type_err(format!("'{}' needs numeric operands", symbol))),
    };
    checked(op(a, b), &format!("'{}' failed (overflow or division by zero)", symbol))
}

fn checked(result: Option<Decimal>, message: &str) -> Result<Normalized, ExprError> {
    result
        .map(Normalized::Number)
        .ok_or_else(|| ExprError::new(ExprErrorKind::Arithmetic, message))
}

/// Numeric view of a value. Booleans coerce to 0/1; text never coerces
/// implicitly (only the `abs`/`safe_subtract` whitelist coerces text).
fn as_decimal(value: &Normalized) -> Option<Decimal> {
    match value {
        Normalized::Number(n) => Some(*n),
        Normalized::Bool(b) => Some(Decimal::from(u8::from(*b))),
        _ => None,
    }
}

fn values_equal(left: &Normalized, right: &Normalized) -> bool {
    match (left, right) {
        (Normalized::Null, Normalized::Null) => true,
        (Normalized::Text(a), Normalized::Text(b)) => a == b,
        _ => match (as_decimal(left), as_decimal(right)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
    }
}

fn compare(left: &Normalized, right: &Normalized) -> Result<Ordering, ExprError> {
    if let (Some(a), Some(b)) = (as_decimal(left), as_decimal(right)) {
        return Ok(a.cmp(&b));
    }
    match (left, right) {
        (Normalized::Text(a), Normalized::Text(b)) => Ok(a.as_str().cmp(b.as_str())),
        _ => Err(type_err("ordering needs two numbers or two strings")),
    }
}

// ─── Whitelisted functions ──────────────────────────────────────────────────

fn call(name: &str, args: &[Normalized]) -> Result<Normalized, ExprError> {
    match name {
        "abs" => {
            let [arg] = args else {
                return Err(arity_err("abs", 1, args.len()));
            };
            let n = strict_number(arg, "cannot take the absolute value of null")?;
            Ok(Normalized::Number(n.abs()))
        }
        "safe_subtract" => {
            let [a, b] = args else {
                return Err(arity_err("safe_subtract", 2, args.len()));
            };
            let a = strict_number(a, "cannot subtract null values")?;
            let b = strict_number(b, "cannot subtract null values")?;
            checked(a.checked_sub(b), "subtraction overflow")
        }
        "min" => fold_extremum("min", args, Ordering::Less),
        "max" => fold_extremum("max", args, Ordering::Greater),
        "date_is_future" => {
            let [arg] = args else {
                return Err(arity_err("date_is_future", 1, args.len()));
            };
            Ok(Normalized::Bool(date_is_future(arg)))
        }
        other => Err(ExprError::new(
            ExprErrorKind::UnknownFunction,
            format!("function '{}' is not allowed", other),
        )),
    }
}

fn arity_err(name: &str, expected: usize, got: usize) -> ExprError {
    ExprError::new(
        ExprErrorKind::Arity,
        format!("{}() takes {} argument(s), got {}", name, expected, got),
    )
}

/// Numeric coercion for `abs`/`safe_subtract`: numbers and booleans pass,
/// numeric text parses, null is a domain error, anything else a type error.
fn strict_number(value: &Normalized, null_message: &str) -> Result<Decimal, ExprError> {
    match value {
        Normalized::Null => Err(ExprError::new(ExprErrorKind::NullOperand, null_message)),
        Normalized::Text(t) => Decimal::from_str(t.trim())
            .map_err(|_| type_err(format!("'{}' is not numeric", t))),
        other => as_decimal(other).ok_or_else(|| type_err("expected a numeric operand")),
    }
}

/// `min`/`max` over all-numeric or all-text arguments.
fn fold_extremum(name: &str, args: &[Normalized], keep: Ordering) -> Result<Normalized, ExprError> {
    if args.is_empty() {
        return Err(arity_err(name, 1, 0));
    }

    if args.iter().all(|a| as_decimal(a).is_some()) {
        let mut best = as_decimal(&args[0]).unwrap_or_default();
        for arg in &args[1..] {
            let n = as_decimal(arg).unwrap_or_default();
            if n.cmp(&best) == keep {
                best = n;
            }
        }
        return Ok(Normalized::Number(best));
    }

    if args.iter().all(|a| matches!(a, Normalized::Text(_))) {
        let mut best = match &args[0] {
            Normalized::Text(t) => t.clone(),
            _ => unreachable!(),
        };
        for arg in &args[1..] {
            if let Normalized::Text(t) = arg
                && t.as_str().cmp(best.as_str()) == keep
            {
                best = t.clone();
            }
        }
        return Ok(Normalized::Text(best));
    }

    Err(type_err(format!("{}() needs all-numeric or all-string arguments", name)))
}

/// Parse `MM/DD/YYYY` and report whether the date is on or after today.
/// Non-text arguments and parse failures are `false`, not errors.
fn date_is_future(value: &Normalized) -> bool {
    let Normalized::Text(text) = value else {
        return false;
    };
    let format = format_description!("[month]/[day]/[year]");
    match Date::parse(text.trim(), format) {
        Ok(date) => date >= OffsetDateTime::now_utc().date(),
        Err(_) => false,
    }
}
