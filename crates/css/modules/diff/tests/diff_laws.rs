#![cfg(test)]

use css_diff::{ChangeKind, SelectorChange, apply_changes, diff, merge};
use css_model::{PropertyMap, PropertyValue, StyleModel, properties};
use proptest::collection::vec;
use proptest::prelude::*;

fn value() -> impl Strategy<Value = PropertyValue> {
    prop_oneof![
        "[a-z]{1,8}".prop_map(PropertyValue::from),
        (-1000i32..1000i32).prop_map(PropertyValue::from),
        r#""[a-z;:{} ]{0,6}""#.prop_map(PropertyValue::from),
        r"url\(data:image/png;base64,[A-Za-z0-9]{1,6}\)".prop_map(PropertyValue::from),
        r"calc\([0-9]{1,3}px \+ [0-9]{1,3}%\)".prop_map(PropertyValue::from),
    ]
}

fn property() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z]{1,6}",
        "[a-m]{1,4}[A-M][a-m]{1,4}",
        "[n-z]{1,4}-[n-z]{1,4}",
        "(Webkit|Moz|ms)[A-Z][a-z]{1,5}",
        "--[a-z]{1,5}",
    ]
}

fn declarations() -> impl Strategy<Value = PropertyMap> {
    vec((property(), value()), 0..6).prop_map(properties)
}

fn model(selector_pattern: &'static str) -> impl Strategy<Value = StyleModel> {
    vec((selector_pattern, declarations()), 0..8)
        .prop_map(|entries| entries.into_iter().collect::<StyleModel>())
}

proptest! {
    #[test]
    fn diff_against_itself_is_empty(sheet in model(r"[.#][a-z]{1,4}( > [a-z]{1,2}| [a-z]{1,2}|:hover)?")) {
        prop_assert!(diff(&sheet, &sheet).is_empty());
    }

    #[test]
    fn merge_reaches_the_target(
        old in model(r"[.#][a-c]( > [a-c]| [a-c]| ~ [a-c])?"),
        new in model(r"[.#][a-c]( > [a-c]| [a-c]| ~ [a-c])?"),
    ) {
        let mut base = old.clone();
        let changes = merge(&mut base, &new);
        prop_assert_eq!(&base, &new);
        prop_assert_eq!(changes, diff(&old, &new));
    }

    #[test]
    fn replaying_a_diff_reaches_the_target(
        old in model(r"[.#][a-c]( > [a-c]| [a-c]| ~ [a-c])?"),
        new in model(r"[.#][a-c]( > [a-c]| [a-c]| ~ [a-c])?"),
    ) {
        let changes = diff(&old, &new);
        let mut replayed = old;
        apply_changes(&mut replayed, &new, &changes);
        prop_assert_eq!(replayed, new);
    }

    #[test]
    fn diff_from_empty_adds_every_selector(
        left in model(r"\.left-[a-z]{1,4}( > p| [a-z]{1,2})?"),
        right in model(r"\.right-[a-z]{1,4}( \+ p|\[data-[a-z]\])?"),
    ) {
        let mut union = left.clone();
        union.extend(right.iter().map(|(selector, declared)| (selector.clone(), declared.clone())));

        let changes = diff(&StyleModel::new(), &union);

        prop_assert_eq!(changes.len(), left.len() + right.len());
        prop_assert_eq!(changes.count(ChangeKind::Added), changes.len());
        let added: Vec<&str> = changes.iter().map(SelectorChange::key).collect();
        let expected: Vec<&str> = union.selectors().collect();
        prop_assert_eq!(added, expected);
    }

    #[test]
    fn changed_entries_always_carry_nested_changes(
        old in model(r"[.#][a-b]( [a-b])?"),
        new in model(r"[.#][a-b]( [a-b])?"),
    ) {
        for change in &diff(&old, &new) {
            if let Some(nested) = change.nested() {
                prop_assert!(!nested.is_empty());
            }
        }
    }
}
