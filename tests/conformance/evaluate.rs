use fieldcheck::EngineDefaults;
use fieldcheck::evaluate::evaluate;
use fieldcheck::resolve::resolve;
use serde_json::json;

use super::common::doc_with;

/// Evaluate an expression with no references in scope.
fn eval_bare(expr: &str) -> bool {
    evaluate(expr, &[])
}

/// Resolve against a one-field document, then evaluate.
fn eval_with(expr: &str, current: serde_json::Value, doc: &serde_json::Value) -> bool {
    let bindings = resolve(expr, &current, doc, &EngineDefaults::standard());
    evaluate(expr, &bindings)
}

// ─── Literals, arithmetic, comparison ───────────────────────────────────────

#[test]
fn arithmetic_and_comparison() {
    assert!(eval_bare("1 + 2 == 3"));
    assert!(eval_bare("2 * 3 - 1 == 5"));
    assert!(eval_bare("10 / 4 == 2.5"));
    assert!(eval_bare("-5 < 0"));
    assert!(eval_bare("3 >= 3"));
    assert!(!eval_bare("1 > 2"));
}

#[test]
fn string_literals_and_concatenation() {
    assert!(eval_bare("'abc' == \"abc\""));
    assert!(eval_bare("'ab' + 'c' == 'abc'"));
    assert!(eval_bare("'abc' != 'abd'"));
    assert!(eval_bare("'a' < 'b'"));
}

#[test]
fn boolean_connectives_and_truthiness() {
    assert!(eval_bare("True and 1 < 2"));
    assert!(eval_bare("False or True"));
    assert!(eval_bare("not False"));
    assert!(!eval_bare("not 1"));
    assert!(!eval_bare("0 or ''"));
    assert!(eval_bare("None or 5"));
}

#[test]
fn none_semantics() {
    assert!(eval_bare("None == None"));
    assert!(!eval_bare("None == 0"));
    assert!(eval_bare("None != 'x'"));
    assert!(!eval_bare("None"));
}

#[test]
fn cross_type_equality_is_false() {
    assert!(!eval_bare("'1' == 1"));
    assert!(eval_bare("'1' != 1"));
}

// ─── Fail-closed behavior ───────────────────────────────────────────────────

#[test]
fn malformed_input_folds_to_false() {
    for garbage in [
        "",
        "   ",
        "1 +",
        "((",
        "a b c",
        "1 < 2 < 3",
        "value >",
        "import os",
        "@!#$",
    ] {
        assert!(!eval_bare(garbage), "{:?} should evaluate to false", garbage);
    }
}

#[test]
fn unknown_identifiers_fold_to_false() {
    assert!(!eval_bare("missing_binding > 0"));
}

#[test]
fn non_whitelisted_functions_fold_to_false() {
    assert!(!eval_bare("__import__('os')"));
    assert!(!eval_bare("len('abc') == 3"));
    assert!(!eval_bare("eval('1') == 1"));
}

#[test]
fn type_errors_fold_to_false() {
    assert!(!eval_bare("None < 1"));
    assert!(!eval_bare("'a' - 'b' == 0"));
    assert!(!eval_bare("1 / 0 == 0"));
}

// ─── Whitelisted functions ──────────────────────────────────────────────────

#[test]
fn abs_min_max_safe_subtract() {
    assert!(eval_bare("abs(-3) == 3"));
    assert!(eval_bare("abs(0 - 2.5) == 2.5"));
    assert!(eval_bare("min(3, 1, 2) == 1"));
    assert!(eval_bare("max(3, 1, 2) == 3"));
    assert!(eval_bare("safe_subtract(5, 3) == 2"));
}

#[test]
fn null_operands_to_math_functions_fold_to_false() {
    assert!(!eval_bare("abs(None) < 1"));
    assert!(!eval_bare("safe_subtract(None, 1) == 0"));
    assert!(!eval_bare("safe_subtract(1, None) == 0"));
}

#[test]
fn wrong_arity_folds_to_false() {
    assert!(!eval_bare("abs(1, 2) == 1"));
    assert!(!eval_bare("min() == 0"));
    assert!(!eval_bare("safe_subtract(1) == 1"));
}

#[test]
fn date_is_future_on_literals() {
    assert!(eval_bare("date_is_future('12/31/2099')"));
    assert!(!eval_bare("date_is_future('01/01/2000')"));
    assert!(!eval_bare("date_is_future('13/45/2020')"));
    assert!(!eval_bare("date_is_future('not a date')"));
    assert!(!eval_bare("date_is_future(5)"));
}

// ─── Reference binding ──────────────────────────────────────────────────────

#[test]
fn current_value_binds_as_data() {
    let doc = doc_with("bos", "price", json!("-5"));
    assert!(!eval_with("value > 0", json!("-5"), &doc));
    assert!(eval_with("value > 0", json!("5"), &doc));
}

#[test]
fn cross_field_decimal_comparison() {
    let doc = json!({
        "groups": {
            "mv1": {"fields": {"sale_price": {"value": "$45,600.00"}}},
            "bos": {"fields": {"sale_price": {"value": "45600"}}}
        }
    });
    assert!(eval_with(
        "abs(mv1.sale_price - bos.sale_price) < 1",
        json!(null),
        &doc
    ));
}

#[test]
fn placeholder_reference_in_arithmetic_folds_to_false() {
    let doc = doc_with("mv1", "sale_price", json!("N/A"));
    assert!(!eval_with("abs(mv1.sale_price - 5) < 100000", json!(null), &doc));
}

#[test]
fn text_bindings_use_comparison_form() {
    let doc = doc_with("bos", "buyer_name", json!("John Doe [Id: 4]"));
    assert!(eval_with("bos.buyer_name == 'johndoe'", json!(null), &doc));
    assert!(!eval_with("bos.buyer_name == 'John Doe'", json!(null), &doc));
}

#[test]
fn prefix_tokens_substitute_longest_first() {
    let doc = json!({
        "groups": {
            "bos": {"fields": {
                "price": {"value": "5"},
                "price_total": {"value": "50"}
            }}
        }
    });
    assert!(eval_with(
        "bos.price_total == 10 * bos.price",
        json!(null),
        &doc
    ));
}

#[test]
fn values_are_never_spliced_as_text() {
    // A value that would be an injection hazard under string substitution
    // is just an ordinary (non-numeric) text binding.
    let doc = doc_with("g", "f", json!("1) or __import__('os') or (1"));
    assert!(!eval_with("g.f == 1", json!(null), &doc));
    assert!(eval_with("g.f != 1", json!(null), &doc));
}
