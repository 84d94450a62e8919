//! Replaying change sets onto a live rule list.
//!
//! The rule list is owned by the host and indexed by position. Deleting a
//! rule shifts every later index, so indices are never cached: each structural
//! or property operation looks its rule up by selector text right before it
//! runs.

use crate::error::{SheetError, SheetResult};
use crate::host::{RuleList, find_rule};
use css_diff::{ChangeSet, PropertyChange, SelectorChange};
use css_model::{PropertyMap, PropertyValue, StyleModel, rule_text, to_param_case};
use log::{debug, trace, warn};
use std::collections::HashMap;

/// What a call to [`reconcile`] did to the rule list.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ReconcileSummary {
    pub inserted: usize,
    pub deleted: usize,
    pub properties_set: usize,
    pub properties_removed: usize,
    /// The host could not edit incrementally and the whole sheet text was
    /// rewritten instead.
    pub rewritten: bool,
}

impl ReconcileSummary {
    /// Number of incremental operations issued.
    pub const fn operations(&self) -> usize {
        self.inserted + self.deleted + self.properties_set + self.properties_removed
    }
}

/// Replay `changes` against `rules` so that they match `current`.
///
/// - `Added(selector)` inserts `selector{...}` built from `current` at the end
///   of the list.
/// - `Removed(selector)` deletes the first rule with that selector text.
/// - `Changed` sets added and changed properties to their value in `current`
///   and removes removed properties, on the rule with that selector text.
///
/// Property names are written in param case. A removed property whose
/// hyphenated name is still declared under another spelling is set to that
/// value instead of being removed.
///
/// Every selector and property the change set refers to is checked before
/// the first mutation, following the selectors through the earlier changes
/// of the set, so a change set that does not fit the live list or the model
/// leaves the list untouched.
///
/// If the rule list cannot edit incrementally, a warning is logged and the
/// whole sheet is rewritten from `current` instead.
///
/// # Errors
/// - [`SheetError::RuleNotFound`] if a removed or changed selector has no rule
/// - [`SheetError::RuleExists`] if an added selector already has one
/// - [`SheetError::MissingSelector`] / [`SheetError::MissingProperty`] if an
///   added or changed entry is not in `current`
/// - [`SheetError::Host`] if the host rejects an operation
pub fn reconcile<R: RuleList + ?Sized>(
    rules: &mut R,
    current: &StyleModel,
    changes: &ChangeSet,
) -> SheetResult<ReconcileSummary> {
    let mut summary = ReconcileSummary::default();
    if changes.is_empty() {
        return Ok(summary);
    }

    let capabilities = rules.capabilities();
    if !capabilities.supports_incremental() {
        warn!(
            target: "css::reconcile",
            "rule list cannot edit incrementally ({capabilities:?}); rewriting the whole sheet"
        );
        rules.replace_text(&current.to_css(None))?;
        summary.rewritten = true;
        return Ok(summary);
    }

    validate(rules, current, changes)?;

    for change in changes {
        match change {
            SelectorChange::Added(selector) => {
                let properties = declared(current, selector)?;
                let index = rules.len();
                rules.insert_rule(&rule_text(selector, properties), index)?;
                summary.inserted += 1;
                trace!(target: "css::reconcile", "inserted `{selector}` at {index}");
            }
            SelectorChange::Removed(selector) => {
                let index = live_index(rules, selector)?;
                rules.delete_rule(index)?;
                summary.deleted += 1;
                trace!(target: "css::reconcile", "deleted `{selector}` at {index}");
            }
            SelectorChange::Changed {
                selector,
                properties,
            } => {
                let values = declared(current, selector)?;
                for property_change in properties {
                    let index = live_index(rules, selector)?;
                    let name = to_param_case(property_change.key());
                    if let Some(value) = written_value(values, &name) {
                        rules.set_property(index, &name, &value.to_string())?;
                        summary.properties_set += 1;
                    } else {
                        rules.remove_property(index, &name)?;
                        summary.properties_removed += 1;
                    }
                    trace!(
                        target: "css::reconcile",
                        "{} `{name}` on `{selector}` at {index}",
                        property_change.kind().as_str()
                    );
                }
            }
        }
    }

    debug!(target: "css::reconcile", "replayed {} changes: {summary:?}", changes.len());
    Ok(summary)
}

/// Check every lookup the replay will need without mutating anything.
///
/// Selectors are tracked as the replay would leave them, so a change that
/// only fits the list before an earlier change ran is rejected too.
fn validate<R: RuleList + ?Sized>(
    rules: &R,
    current: &StyleModel,
    changes: &ChangeSet,
) -> SheetResult<()> {
    let mut live: HashMap<String, usize> = HashMap::new();
    for index in 0..rules.len() {
        if let Some(selector) = rules.selector_text(index) {
            *live.entry(selector).or_default() += 1;
        }
    }

    for change in changes {
        match change {
            SelectorChange::Added(selector) => {
                declared(current, selector)?;
                let count = live.entry(selector.clone()).or_default();
                if *count > 0 {
                    return Err(SheetError::RuleExists {
                        selector: selector.clone(),
                    });
                }
                *count = 1;
            }
            SelectorChange::Removed(selector) => {
                *live_count(&mut live, selector)? -= 1;
            }
            SelectorChange::Changed {
                selector,
                properties,
            } => {
                live_count(&mut live, selector)?;
                let values = declared(current, selector)?;
                for property_change in properties {
                    if let PropertyChange::Added(property) | PropertyChange::Changed(property) =
                        property_change
                        && !values.contains_key(property)
                    {
                        return Err(missing_property(selector, property));
                    }
                }
            }
        }
    }
    Ok(())
}

fn live_count<'live>(
    live: &'live mut HashMap<String, usize>,
    selector: &str,
) -> SheetResult<&'live mut usize> {
    live.get_mut(selector)
        .filter(|count| **count > 0)
        .ok_or_else(|| SheetError::RuleNotFound {
            selector: selector.to_owned(),
        })
}

/// The value the live rule should hold for the hyphenated `name`: the last
/// entry in `values` that is written under that name. Spellings such as
/// `marginTop` and `margin-top` share one live property.
fn written_value<'model>(values: &'model PropertyMap, name: &str) -> Option<&'model PropertyValue> {
    values
        .iter()
        .rev()
        .find(|(property, _)| to_param_case(property) == name)
        .map(|(_, value)| value)
}

fn live_index<R: RuleList + ?Sized>(rules: &R, selector: &str) -> SheetResult<usize> {
    find_rule(rules, selector).ok_or_else(|| SheetError::RuleNotFound {
        selector: selector.to_owned(),
    })
}

fn declared<'model>(current: &'model StyleModel, selector: &str) -> SheetResult<&'model PropertyMap> {
    current.get(selector).ok_or_else(|| SheetError::MissingSelector {
        selector: selector.to_owned(),
    })
}

fn missing_property(selector: &str, property: &str) -> SheetError {
    SheetError::MissingProperty {
        selector: selector.to_owned(),
        property: property.to_owned(),
    }
}
