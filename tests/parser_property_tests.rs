#![allow(clippy::unwrap_used, clippy::expect_used)]

use crudforge::dsl::{parse_fields, split_top_level, FieldKind};
use proptest::prelude::*;

fn arb_simple_type() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("string".to_string()),
        Just("text".to_string()),
        Just("integer".to_string()),
        Just("boolean".to_string()),
        "[a-z]{1,8}",
    ]
}

fn arb_enum_type() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z]{1,6}", 1..5)
        .prop_map(|values| format!("enum({})", values.join(", ")))
}

fn arb_type() -> impl Strategy<Value = String> {
    prop_oneof![arb_simple_type(), arb_enum_type()]
}

/// Field tokens with unique names.
fn arb_tokens() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(("[a-z]{1,6}", arb_type()), 1..8).prop_map(|pairs| {
        pairs
            .into_iter()
            .enumerate()
            .map(|(i, (name, ty))| format!("{name}{i}:{ty}"))
            .collect()
    })
}

fn arb_separator() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just(","), Just(", "), Just(" ,"), Just(" , ")]
}

proptest! {
    #[test]
    fn prop_rejoined_tokens_reconstruct_input(tokens in arb_tokens()) {
        let input = tokens.join(",");
        let parsed = split_top_level(&input).unwrap();
        prop_assert_eq!(parsed.join(","), input);
    }

    #[test]
    fn prop_whitespace_around_top_level_commas_is_ignored(
        tokens in arb_tokens(),
        separator in arb_separator(),
    ) {
        let parsed = split_top_level(&tokens.join(separator)).unwrap();
        prop_assert_eq!(parsed, tokens);
    }

    #[test]
    fn prop_fields_keep_declaration_order(tokens in arb_tokens()) {
        let fields = parse_fields(&tokens.join(", ")).unwrap();
        prop_assert_eq!(fields.len(), tokens.len());
        for (field, token) in fields.iter().zip(&tokens) {
            let (name, ty) = token.split_once(':').unwrap();
            prop_assert_eq!(&field.name, name);
            if ty.starts_with("enum(") {
                prop_assert!(matches!(&field.kind, FieldKind::Enum(values) if !values.is_empty()));
            }
        }
    }

    #[test]
    fn prop_unclosed_enum_is_rejected(tokens in arb_tokens()) {
        let input = format!("{},broken:enum(a, b", tokens.join(","));
        prop_assert!(split_top_level(&input).is_err());
        prop_assert!(parse_fields(&input).is_err());
    }
}
