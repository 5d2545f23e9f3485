use fieldcheck::EngineDefaults;
use fieldcheck::normalize::{Normalized, comparison_form, normalize, strip_metadata};
use proptest::prelude::*;
use rust_decimal::Decimal;
use serde_json::json;

const DEFAULTS: &EngineDefaults = &EngineDefaults::standard();

/// Strategy over the recognized null placeholders.
fn arb_placeholder() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("n/a"),
        Just("na"),
        Just("null"),
        Just("none"),
        Just("-"),
        Just(""),
        Just("undefined"),
    ]
    .prop_map(|s| s.to_string())
}

/// Re-case a string from a bitmask so every casing variant gets exercised.
fn mixed_case(s: &str, mask: u32) -> String {
    s.chars()
        .enumerate()
        .map(|(i, c)| {
            if mask >> (i % 32) & 1 == 1 {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            }
        })
        .collect()
}

/// Render an integer with `$` and thousands separators, e.g. `-$45,600`.
fn currency_form(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if n < 0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn placeholders_fold_to_null_in_any_case(
        placeholder in arb_placeholder(),
        mask in any::<u32>(),
    ) {
        let variant = mixed_case(&placeholder, mask);
        prop_assert_eq!(normalize(&json!(variant), DEFAULTS), Normalized::Null);
    }

    #[test]
    fn currency_text_equals_the_plain_number(n in -999_999_999i64..=999_999_999) {
        let from_currency = normalize(&json!(currency_form(n)), DEFAULTS);
        let from_plain = normalize(&json!(n.to_string()), DEFAULTS);
        prop_assert_eq!(&from_currency, &from_plain);
        prop_assert_eq!(from_currency, Normalized::Number(Decimal::from(n)));
    }

    #[test]
    fn comparison_form_is_idempotent_and_lowercase_alphanumeric(s in ".{0,40}") {
        let folded = comparison_form(&s);
        prop_assert!(folded.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
        prop_assert_eq!(comparison_form(&folded), folded.clone());
    }

    #[test]
    fn trailing_id_annotation_is_stripped(
        base in "[a-z ]{0,10}",
        id in "[A-Za-z0-9 _-]{0,10}",
    ) {
        let raw = format!("{} [Id: {}]", base, id);
        prop_assert_eq!(strip_metadata(&raw), base.trim());
    }

    // A value that normalizes to text is already in display form:
    // normalizing that text again changes nothing.
    #[test]
    fn display_form_is_stable(raw in ".{0,30}") {
        if let Normalized::Text(t) = normalize(&json!(raw), DEFAULTS) {
            prop_assert_eq!(normalize(&json!(t.clone()), DEFAULTS), Normalized::Text(t));
        }
    }
}
