//! Host document interfaces.
//!
//! The document, its style elements and their live rule lists belong to the
//! host environment. These traits describe the small surface the sheet
//! handle and the reconciler need; [`memory`] implements them without a
//! browser.

use anyhow::Result;

pub mod memory;

/// Which rule list operations a host supports.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Capabilities {
    pub insert_rule: bool,
    pub delete_rule: bool,
    pub edit_properties: bool,
}

impl Capabilities {
    /// Every operation is available.
    pub const FULL: Self = Self {
        insert_rule: true,
        delete_rule: true,
        edit_properties: true,
    };

    /// Only whole-sheet text replacement is available.
    pub const TEXT_ONLY: Self = Self {
        insert_rule: false,
        delete_rule: false,
        edit_properties: false,
    };

    /// Whether a change set can be replayed operation by operation.
    pub const fn supports_incremental(self) -> bool {
        self.insert_rule && self.delete_rule && self.edit_properties
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::FULL
    }
}

/// The ordered, indexable list of live rules behind a style element.
///
/// Indices are positional and shift when rules are inserted or deleted.
pub trait RuleList {
    /// Number of rules currently in the list.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Selector text of the rule at `index`.
    fn selector_text(&self, index: usize) -> Option<String>;

    /// Parse `rule` (`selector{declarations}`) and insert it before `index`.
    /// Returns the index of the new rule.
    ///
    /// # Errors
    /// Returns an error if the index is out of range or the host rejects the rule.
    fn insert_rule(&mut self, rule: &str, index: usize) -> Result<usize>;

    /// Delete the rule at `index`.
    ///
    /// # Errors
    /// Returns an error if the index is out of range.
    fn delete_rule(&mut self, index: usize) -> Result<()>;

    /// Set a hyphenated property on the rule at `index`.
    ///
    /// # Errors
    /// Returns an error if the index is out of range.
    fn set_property(&mut self, index: usize, property: &str, value: &str) -> Result<()>;

    /// Remove a hyphenated property from the rule at `index`.
    ///
    /// # Errors
    /// Returns an error if the index is out of range.
    fn remove_property(&mut self, index: usize, property: &str) -> Result<()>;

    /// Replace every rule with the rules parsed from `css`.
    ///
    /// # Errors
    /// Returns an error if the host rejects the text.
    fn replace_text(&mut self, css: &str) -> Result<()>;

    fn is_disabled(&self) -> bool;

    fn set_disabled(&mut self, disabled: bool);

    /// Feature detection for the incremental operations.
    fn capabilities(&self) -> Capabilities {
        Capabilities::FULL
    }
}

/// Index of the first rule whose selector text equals `selector`.
pub fn find_rule<R: RuleList + ?Sized>(rules: &R, selector: &str) -> Option<usize> {
    (0..rules.len()).find(|&index| rules.selector_text(index).as_deref() == Some(selector))
}

/// A style element created by a [`Document`].
pub trait StyleElement {
    type Rules: RuleList;

    fn element_id(&self) -> &str;

    /// Append a text node with CSS content.
    ///
    /// # Errors
    /// Returns an error if the host rejects the node.
    fn append_text(&mut self, css: &str) -> Result<()>;

    /// Replace all text content of the element.
    ///
    /// # Errors
    /// Returns an error if the host rejects the text.
    fn set_text(&mut self, css: &str) -> Result<()>;

    /// The live rule list. `None` until the element is attached to a document,
    /// or when the host does not expose one.
    fn rules(&self) -> Option<&Self::Rules>;

    fn rules_mut(&mut self) -> Option<&mut Self::Rules>;
}

/// The document that owns style elements.
pub trait Document {
    type Element: StyleElement;

    /// Create a detached `<style>` element.
    ///
    /// # Errors
    /// Returns an error if the host cannot create the element.
    fn create_style_element(&mut self, element_id: &str, media: &str) -> Result<Self::Element>;

    /// Append the element to the document head, making its rules live.
    ///
    /// # Errors
    /// Returns an error if the element is already attached.
    fn append_to_head(&mut self, element: &mut Self::Element) -> Result<()>;

    /// Remove the element from the document head.
    ///
    /// # Errors
    /// Returns an error if the element is not attached.
    fn remove_from_head(&mut self, element: &mut Self::Element) -> Result<()>;
}
