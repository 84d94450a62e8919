//! Pure comparison of two models.

use crate::change::{ChangeSet, PropertyChange, SelectorChange};
use css_model::{PropertyMap, StyleModel};
use indexmap::IndexMap;
use log::trace;

/// Compute the changes that turn `old` into `new`.
///
/// - a selector only in `old` is `Removed`;
/// - a selector in both whose property maps differ is `Changed`, carrying the
///   property-level changes;
/// - a selector only in `new` is `Added`.
///
/// Removals and changes are emitted in `old` order, then additions in `new`
/// order. Neither argument is modified; see [`merge`](crate::merge) for the
/// mutating variant.
pub fn diff(old: &StyleModel, new: &StyleModel) -> ChangeSet {
    let mut changes = ChangeSet::new();
    for (selector, old_properties) in old {
        match new.get(selector) {
            None => changes.push(SelectorChange::Removed(selector.clone())),
            Some(new_properties) if new_properties != old_properties => {
                let properties = diff_properties(old_properties, new_properties);
                if !properties.is_empty() {
                    changes.push(SelectorChange::Changed {
                        selector: selector.clone(),
                        properties,
                    });
                }
            }
            Some(_) => {}
        }
    }
    for selector in new.selectors() {
        if !old.contains(selector) {
            changes.push(SelectorChange::Added(selector.to_owned()));
        }
    }
    trace!(target: "css::diff", "diff produced {changes}");
    changes
}

/// Compute property-level changes between two flat property maps.
///
/// Values are compared as scalars. Ordering follows [`diff`].
pub fn diff_properties(old: &PropertyMap, new: &PropertyMap) -> Vec<PropertyChange> {
    diff_flat(old, new, PropertyChange::Removed, PropertyChange::Changed, PropertyChange::Added)
}

/// Walk two flat maps in the order documented on [`diff`].
fn diff_flat<V: PartialEq, C>(
    old: &IndexMap<String, V>,
    new: &IndexMap<String, V>,
    removed: fn(String) -> C,
    changed: fn(String) -> C,
    added: fn(String) -> C,
) -> Vec<C> {
    let mut out = Vec::new();
    for (key, old_value) in old {
        match new.get(key) {
            None => out.push(removed(key.clone())),
            Some(new_value) if new_value != old_value => out.push(changed(key.clone())),
            Some(_) => {}
        }
    }
    for key in new.keys() {
        if !old.contains_key(key) {
            out.push(added(key.clone()));
        }
    }
    out
}
