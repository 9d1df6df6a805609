//! Property tests for the invariants and boundary behaviors this crate
//! is specified against. Generates small random rulesets rather than
//! fixed fixtures, in the style of the pack's `web-csv-toolbox` crate's
//! own `proptest!` blocks.

use crate::{CssKeyArray, CssKeyType, CssString};
use proptest::prelude::*;

fn ident_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z_][a-zA-Z0-9_-]{0,12}".prop_map(|s| s)
}

fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,16}".prop_map(|s| s.trim().to_string()).prop_filter("non-empty value", |s| !s.is_empty())
}

fn declaration_strategy() -> impl Strategy<Value = (String, String)> {
    (ident_strategy(), value_strategy())
}

#[derive(Debug, Clone)]
struct Rule {
    selectors: Vec<(char, String)>, // (prefix, name); prefix '*' carries an empty name
    decls: Vec<(String, String)>,
}

fn selector_strategy() -> impl Strategy<Value = (char, String)> {
    prop_oneof![
        ident_strategy().prop_map(|n| ('.', n)),
        ident_strategy().prop_map(|n| ('#', n)),
        Just(('*', String::new())),
    ]
}

fn rule_strategy() -> impl Strategy<Value = Rule> {
    (
        prop::collection::vec(selector_strategy(), 1..4),
        prop::collection::vec(declaration_strategy(), 0..5),
    )
        .prop_map(|(selectors, decls)| Rule { selectors, decls })
}

fn sheet_strategy() -> impl Strategy<Value = Vec<Rule>> {
    prop::collection::vec(rule_strategy(), 1..5)
}

fn render(rules: &[Rule]) -> String {
    let mut out = String::new();
    for rule in rules {
        let names: Vec<String> = rule
            .selectors
            .iter()
            .map(|(prefix, name)| match prefix {
                '*' => "*".to_string(),
                p => format!("{}{}", p, name),
            })
            .collect();
        out.push_str(&names.join(", "));
        out.push_str(" {\n");
        for (k, v) in &rule.decls {
            out.push_str(&format!("  {}: {};\n", k, v));
        }
        out.push_str("}\n");
    }
    out
}

proptest! {
    /// Invariant 1: every entry's (offset, length) stays within bounds
    /// and lengths never reach the 256-byte cap.
    #[test]
    fn entries_stay_within_buffer_bounds(rules in sheet_strategy()) {
        let src = render(&rules);
        let buf = CssString::new_from_bytes(src.as_bytes()).unwrap();
        let table = CssKeyArray::parse(&buf).unwrap();
        for i in 0..table.used() {
            let node = table.node_at(i).unwrap();
            prop_assert!((node.offset() as usize) + (node.length() as usize) <= buf.len());
            prop_assert!((node.length() as usize) < 256);
        }
    }

    /// Invariant 2: a selector's link, when present, always names a
    /// `none`/length-0 sentinel entry.
    #[test]
    fn selector_links_point_at_sentinels(rules in sheet_strategy()) {
        let src = render(&rules);
        let buf = CssString::new_from_bytes(src.as_bytes()).unwrap();
        let table = CssKeyArray::parse(&buf).unwrap();
        for i in 0..table.used() {
            let node = table.node_at(i).unwrap();
            if node.is_class() {
                if let Some(link) = node.link() {
                    let group = table.node_at(link).unwrap();
                    prop_assert_eq!(group.ty(), CssKeyType::None);
                    prop_assert_eq!(group.length(), 0);
                }
            }
        }
    }

    /// Invariant 6: within one block, adjacent non-sentinel entries
    /// have strictly increasing offsets.
    #[test]
    fn offsets_are_monotone_within_a_block(rules in sheet_strategy()) {
        let src = render(&rules);
        let buf = CssString::new_from_bytes(src.as_bytes()).unwrap();
        let table = CssKeyArray::parse(&buf).unwrap();
        for i in 1..table.used() {
            let prev = table.node_at(i - 1).unwrap();
            let cur = table.node_at(i).unwrap();
            if cur.ty() != CssKeyType::None && prev.ty() != CssKeyType::None {
                prop_assert!(prev.offset() < cur.offset());
            }
        }
    }

    /// Invariant 4/5: printing a parsed table reparses to the same
    /// sequence of (type, bytes) tuples, and a second print/parse round
    /// trip is byte-for-byte identical to the first.
    #[test]
    fn print_round_trips_and_is_idempotent(rules in sheet_strategy()) {
        let src = render(&rules);
        let buf = CssString::new_from_bytes(src.as_bytes()).unwrap();
        let table = CssKeyArray::parse(&buf).unwrap();
        let once = table.print();

        let buf2 = CssString::new_from_bytes(once.as_bytes()).unwrap();
        let table2 = CssKeyArray::parse(&buf2).unwrap();

        prop_assert_eq!(table.used(), table2.used());
        for i in 0..table.used() {
            let a = table.node_at(i).unwrap();
            let b = table2.node_at(i).unwrap();
            prop_assert_eq!(a.ty(), b.ty());
            prop_assert_eq!(table.slice(a), table2.slice(b));
        }

        let twice = table2.print();
        prop_assert_eq!(once, twice);
    }
}

#[test]
fn boundary_input_of_exactly_max_len_parses() {
    let filler = " ".repeat(crate::css_string::MAX_LEN - 10);
    let src = format!(".a {{ k: v; }}{}", filler);
    let src = &src[..crate::css_string::MAX_LEN];
    let buf = CssString::new_from_bytes(src.as_bytes()).unwrap();
    assert_eq!(buf.len(), crate::css_string::MAX_LEN);
    CssKeyArray::parse(&buf).unwrap();
}

#[test]
fn boundary_input_one_byte_over_max_len_is_rejected() {
    let data = vec![b' '; crate::css_string::MAX_LEN + 1];
    let err = CssString::new_from_bytes(&data).unwrap_err();
    assert!(matches!(err, crate::CssError::InputTooLarge { .. }));
}
