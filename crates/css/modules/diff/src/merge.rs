//! Explicit in-place update of a base model.

use crate::change::{ChangeSet, PropertyChange, SelectorChange};
use crate::diff::diff;
use css_model::StyleModel;

/// Bring `base` to the state of `target` and return the changes applied.
///
/// Existing selectors and properties keep their position; new ones are
/// appended, which mirrors how a live rule list grows. After the call
/// `base == target`.
pub fn merge(base: &mut StyleModel, target: &StyleModel) -> ChangeSet {
    let changes = diff(base, target);
    apply_changes(base, target, &changes);
    changes
}

/// Replay `changes` onto `base`, reading new values from `target`.
///
/// Entries that `target` no longer has are skipped, so a stale change set
/// can never insert values that do not exist.
pub fn apply_changes(base: &mut StyleModel, target: &StyleModel, changes: &ChangeSet) {
    for change in changes {
        match change {
            SelectorChange::Removed(selector) => {
                base.remove_selector(selector);
            }
            SelectorChange::Added(selector) => {
                if let Some(properties) = target.get(selector) {
                    base.replace_selector(selector.clone(), properties.clone());
                }
            }
            SelectorChange::Changed {
                selector,
                properties,
            } => {
                let (Some(declared), Some(wanted)) = (base.get_mut(selector), target.get(selector))
                else {
                    continue;
                };
                for property_change in properties {
                    match property_change {
                        PropertyChange::Removed(property) => {
                            declared.shift_remove(property);
                        }
                        PropertyChange::Added(property) | PropertyChange::Changed(property) => {
                            if let Some(value) = wanted.get(property) {
                                declared.insert(property.clone(), value.clone());
                            }
                        }
                    }
                }
            }
        }
    }
}
