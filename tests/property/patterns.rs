use fieldcheck::EngineDefaults;
use fieldcheck::enums::{ConditionType, RuleKind};
use fieldcheck::types::Rule;
use fieldcheck::validate::validate_regex_list;
use proptest::prelude::*;
use serde_json::json;
use std::collections::HashMap;

const DEFAULTS: &EngineDefaults = &EngineDefaults::standard();

fn pattern_rule(patterns: Vec<String>, condition: ConditionType) -> Rule {
    Rule {
        id: "g.f.value".to_string(),
        kind: RuleKind::RegexList,
        regexes: patterns,
        expressions: vec![],
        error_msgs: vec![],
        groups: vec!["g".to_string()],
        condition,
        extensions: HashMap::new(),
    }
}

fn passes(value: &str, patterns: &[String], condition: ConditionType) -> bool {
    let rule = pattern_rule(patterns.to_vec(), condition);
    let (ok, _) = validate_regex_list(&json!(value), &rule, DEFAULTS).unwrap();
    ok
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn exact_length_class_accepts_only_that_length(s in "[0-9]{1,8}") {
        let exact = format!("^[0-9]{{{}}}$", s.len());
        let longer = format!("^[0-9]{{{}}}$", s.len() + 1);
        prop_assert!(passes(&s, &[exact], ConditionType::And));
        prop_assert!(!passes(&s, &[longer], ConditionType::And));
    }

    // Unanchored patterns still match from the start of the value only.
    #[test]
    fn matching_is_prefix_anchored(prefix in "[a-z]{1,6}", digits in "[0-9]{1,4}") {
        let pattern = vec!["[0-9]+".to_string()];
        prop_assert!(!passes(&format!("{}{}", prefix, digits), &pattern, ConditionType::And), "assertion failed");
        prop_assert!(passes(&format!("{}{}", digits, prefix), &pattern, ConditionType::And), "assertion failed");
    }

    // A single-pattern rule behaves identically under both conditions.
    #[test]
    fn single_pattern_conditions_agree(s in "[a-z0-9]{0,8}", digits_only in any::<bool>()) {
        let pattern = if digits_only { "^[0-9]+$" } else { "^[a-z]+$" };
        let patterns = vec![pattern.to_string()];
        prop_assert_eq!(
            passes(&s, &patterns, ConditionType::And),
            passes(&s, &patterns, ConditionType::Or),
        );
    }

    #[test]
    fn and_requires_all_and_or_requires_any(s in "[0-9]{1,8}") {
        let matching = format!("^[0-9]{{{}}}$", s.len());
        let failing = "^[a-z]+$".to_string();

        prop_assert!(!passes(&s, &[matching.clone(), failing.clone()], ConditionType::And));
        prop_assert!(passes(&s, &[matching.clone(), failing.clone()], ConditionType::Or));
        prop_assert!(passes(&s, &[failing.clone(), matching.clone()], ConditionType::Or));
        prop_assert!(!passes(&s, &[failing.clone(), failing], ConditionType::Or));
        prop_assert!(passes(&s, &[matching.clone(), matching], ConditionType::And));
    }

    #[test]
    fn surrounding_whitespace_never_affects_the_verdict(s in "[0-9]{1,8}") {
        let pattern = vec![format!("^[0-9]{{{}}}$", s.len())];
        let padded = format!("  {}  ", s);
        prop_assert_eq!(
            passes(&s, &pattern, ConditionType::And),
            passes(&padded, &pattern, ConditionType::And),
        );
    }
}
