//! Tagged edit operations.

use core::fmt;
use core::slice::Iter;
use std::vec::IntoIter;

/// The tag shared by selector and property changes.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ChangeKind {
    Added,
    Removed,
    Changed,
}

impl ChangeKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Changed => "changed",
        }
    }
}

/// A change to one property of a selector.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PropertyChange {
    Added(String),
    Removed(String),
    /// The value differs; the new value lives in the current model.
    Changed(String),
}

impl PropertyChange {
    pub const fn kind(&self) -> ChangeKind {
        match self {
            Self::Added(_) => ChangeKind::Added,
            Self::Removed(_) => ChangeKind::Removed,
            Self::Changed(_) => ChangeKind::Changed,
        }
    }

    /// The property name this change refers to.
    pub fn key(&self) -> &str {
        match self {
            Self::Added(property) | Self::Removed(property) | Self::Changed(property) => property,
        }
    }
}

/// A change to one selector of a model.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SelectorChange {
    Added(String),
    Removed(String),
    /// At least one property changed. The nested list is never empty.
    Changed {
        selector: String,
        properties: Vec<PropertyChange>,
    },
}

impl SelectorChange {
    pub const fn kind(&self) -> ChangeKind {
        match self {
            Self::Added(_) => ChangeKind::Added,
            Self::Removed(_) => ChangeKind::Removed,
            Self::Changed { .. } => ChangeKind::Changed,
        }
    }

    /// The selector text this change refers to.
    pub fn key(&self) -> &str {
        match self {
            Self::Added(selector) | Self::Removed(selector) | Self::Changed { selector, .. } => {
                selector
            }
        }
    }

    /// Nested property changes, present only for [`SelectorChange::Changed`].
    pub fn nested(&self) -> Option<&[PropertyChange]> {
        match self {
            Self::Changed { properties, .. } => Some(properties),
            Self::Added(_) | Self::Removed(_) => None,
        }
    }
}

/// An ordered list of selector changes.
///
/// Removals and changes come first in old-model order, additions follow in
/// new-model order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ChangeSet {
    changes: Vec<SelectorChange>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, change: SelectorChange) {
        self.changes.push(change);
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, SelectorChange> {
        self.changes.iter()
    }

    pub fn as_slice(&self) -> &[SelectorChange] {
        &self.changes
    }

    /// Number of changes with the given tag at selector level.
    pub fn count(&self, kind: ChangeKind) -> usize {
        self.changes
            .iter()
            .filter(|change| change.kind() == kind)
            .count()
    }
}

impl From<Vec<SelectorChange>> for ChangeSet {
    fn from(changes: Vec<SelectorChange>) -> Self {
        Self { changes }
    }
}

impl FromIterator<SelectorChange> for ChangeSet {
    fn from_iter<I: IntoIterator<Item = SelectorChange>>(iter: I) -> Self {
        Self {
            changes: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ChangeSet {
    type Item = SelectorChange;
    type IntoIter = IntoIter<SelectorChange>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}

impl<'set> IntoIterator for &'set ChangeSet {
    type Item = &'set SelectorChange;
    type IntoIter = Iter<'set, SelectorChange>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.iter()
    }
}

impl fmt::Display for PropertyChange {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}({})", self.kind().as_str(), self.key())
    }
}

impl fmt::Display for SelectorChange {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}({}", self.kind().as_str(), self.key())?;
        if let Some(nested) = self.nested() {
            formatter.write_str(", [")?;
            write_list(formatter, nested)?;
            formatter.write_str("]")?;
        }
        formatter.write_str(")")
    }
}

impl fmt::Display for ChangeSet {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("[")?;
        write_list(formatter, &self.changes)?;
        formatter.write_str("]")
    }
}

fn write_list<T: fmt::Display>(formatter: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            formatter.write_str(", ")?;
        }
        write!(formatter, "{item}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_nests_property_changes() {
        let set = ChangeSet::from(vec![
            SelectorChange::Changed {
                selector: ".a".into(),
                properties: vec![PropertyChange::Changed("color".into())],
            },
            SelectorChange::Added(".b".into()),
        ]);
        assert_eq!(set.to_string(), "[changed(.a, [changed(color)]), added(.b)]");
    }

    #[test]
    fn kind_and_key_are_uniform() {
        let change = SelectorChange::Removed(".gone".into());
        assert_eq!(change.kind(), ChangeKind::Removed);
        assert_eq!(change.key(), ".gone");
        assert!(change.nested().is_none());
    }

    #[test]
    fn count_filters_by_kind() {
        let set: ChangeSet = [".a", ".b"]
            .into_iter()
            .map(|selector| SelectorChange::Added(selector.to_owned()))
            .chain([SelectorChange::Removed(".c".into())])
            .collect();
        assert_eq!(set.count(ChangeKind::Added), 2);
        assert_eq!(set.count(ChangeKind::Removed), 1);
        assert_eq!(set.count(ChangeKind::Changed), 0);
    }
}
