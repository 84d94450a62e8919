//! The selector → property map model and its editing façade.

use crate::value::PropertyValue;
use indexmap::IndexMap;
use indexmap::map::{IntoIter, Iter, IterMut};
use serde::{Deserialize, Serialize};

/// Ordered mapping of property names to values for one selector.
pub type PropertyMap = IndexMap<String, PropertyValue>;

/// Build a [`PropertyMap`] from `(name, value)` pairs.
///
/// ```
/// # use css_model::properties;
/// let map = properties([("color", "red".into()), ("zIndex", 2.into())]);
/// assert_eq!(map.len(), 2);
/// ```
pub fn properties<I, K>(entries: I) -> PropertyMap
where
    I: IntoIterator<Item = (K, PropertyValue)>,
    K: Into<String>,
{
    entries
        .into_iter()
        .map(|(name, value)| (name.into(), value))
        .collect()
}

/// An ordered mapping from selector text to the properties declared for it.
///
/// Selectors are unique. Iteration follows insertion order, which makes the
/// compiled text reproducible; equality ignores order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleModel {
    selectors: IndexMap<String, PropertyMap>,
}

impl StyleModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion of a whole selector, replacing any previous entry.
    #[must_use]
    pub fn with_selector(mut self, selector: impl Into<String>, properties: PropertyMap) -> Self {
        self.selectors.insert(selector.into(), properties);
        self
    }

    /// Parse a model from a JSON object of objects.
    ///
    /// ```
    /// # use css_model::StyleModel;
    /// let model = StyleModel::from_json(r#"{".a": {"color": "red", "zIndex": 1}}"#)?;
    /// assert_eq!(model.to_css(None), ".a{color:red;z-index:1}");
    /// # Ok::<(), serde_json::Error>(())
    /// ```
    ///
    /// # Errors
    /// Returns an error if the text is not an object of objects with scalar values.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Serialize the model to a JSON object of objects.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    pub fn contains(&self, selector: &str) -> bool {
        self.selectors.contains_key(selector)
    }

    pub fn get(&self, selector: &str) -> Option<&PropertyMap> {
        self.selectors.get(selector)
    }

    pub fn get_mut(&mut self, selector: &str) -> Option<&mut PropertyMap> {
        self.selectors.get_mut(selector)
    }

    /// Iterate selectors with their properties in insertion order.
    pub fn iter(&self) -> Iter<'_, String, PropertyMap> {
        self.selectors.iter()
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, String, PropertyMap> {
        self.selectors.iter_mut()
    }

    /// Selector texts in insertion order.
    pub fn selectors(&self) -> impl Iterator<Item = &str> {
        self.selectors.keys().map(String::as_str)
    }

    /// Adds a set of selectors, extending selectors that already exist.
    pub fn add<I, S>(&mut self, selectors: I, overwrite: bool)
    where
        I: IntoIterator<Item = (S, PropertyMap)>,
        S: Into<String>,
    {
        for (selector, properties) in selectors {
            self.add_selector(selector, properties, overwrite);
        }
    }

    /// Adds a selector or extends an existing one.
    ///
    /// When the selector exists, properties it already declares keep their
    /// value unless `overwrite` is set; new properties are appended.
    pub fn add_selector(&mut self, selector: impl Into<String>, properties: PropertyMap, overwrite: bool) {
        let selector = selector.into();
        match self.selectors.get_mut(&selector) {
            Some(base) => extend_properties(base, properties, overwrite),
            None => {
                self.selectors.insert(selector, properties);
            }
        }
    }

    /// Adds a single property to an existing selector.
    ///
    /// Returns `true` if the model changed. Unknown selectors are ignored.
    pub fn add_property(
        &mut self,
        selector: &str,
        property: impl Into<String>,
        value: impl Into<PropertyValue>,
        overwrite: bool,
    ) -> bool {
        let Some(current) = self.selectors.get_mut(selector) else {
            return false;
        };
        let property = property.into();
        if current.contains_key(&property) && !overwrite {
            return false;
        }
        current.insert(property, value.into());
        true
    }

    /// Removes a set of selectors.
    pub fn remove<I, S>(&mut self, selectors: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for selector in selectors {
            self.remove_selector(selector.as_ref());
        }
    }

    /// Removes a selector, returning its properties.
    pub fn remove_selector(&mut self, selector: &str) -> Option<PropertyMap> {
        self.selectors.shift_remove(selector)
    }

    /// Removes one property from a selector, returning its value.
    pub fn remove_property(&mut self, selector: &str, property: &str) -> Option<PropertyValue> {
        self.selectors.get_mut(selector)?.shift_remove(property)
    }

    /// Removes a set of properties from a selector.
    pub fn remove_properties<I, S>(&mut self, selector: &str, properties: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if let Some(base) = self.selectors.get_mut(selector) {
            for property in properties {
                base.shift_remove(property.as_ref());
            }
        }
    }

    /// Removes all selectors.
    pub fn clear(&mut self) {
        self.selectors.clear();
    }

    /// Extends a set of selectors, overwriting existing properties.
    pub fn modify<I, S>(&mut self, selectors: I)
    where
        I: IntoIterator<Item = (S, PropertyMap)>,
        S: Into<String>,
    {
        self.add(selectors, true);
    }

    /// Extends one selector, overwriting existing properties.
    pub fn modify_selector(&mut self, selector: impl Into<String>, properties: PropertyMap) {
        self.add_selector(selector, properties, true);
    }

    /// Sets a property on an existing selector, adding it if missing.
    ///
    /// Returns `false` if the selector does not exist.
    pub fn modify_property(
        &mut self,
        selector: &str,
        property: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> bool {
        self.add_property(selector, property, value, true)
    }

    /// Replaces the properties of a set of selectors wholesale.
    pub fn replace<I, S>(&mut self, selectors: I)
    where
        I: IntoIterator<Item = (S, PropertyMap)>,
        S: Into<String>,
    {
        for (selector, properties) in selectors {
            self.replace_selector(selector, properties);
        }
    }

    /// Replaces the properties of one selector wholesale, keeping its position.
    pub fn replace_selector(&mut self, selector: impl Into<String>, properties: PropertyMap) {
        self.selectors.insert(selector.into(), properties);
    }
}

fn extend_properties(base: &mut PropertyMap, extend: PropertyMap, overwrite: bool) {
    for (property, value) in extend {
        if overwrite || !base.contains_key(&property) {
            base.insert(property, value);
        }
    }
}

impl<S: Into<String>> FromIterator<(S, PropertyMap)> for StyleModel {
    fn from_iter<I: IntoIterator<Item = (S, PropertyMap)>>(iter: I) -> Self {
        Self {
            selectors: iter
                .into_iter()
                .map(|(selector, properties)| (selector.into(), properties))
                .collect(),
        }
    }
}

impl<S: Into<String>> Extend<(S, PropertyMap)> for StyleModel {
    fn extend<I: IntoIterator<Item = (S, PropertyMap)>>(&mut self, iter: I) {
        self.replace(iter);
    }
}

impl IntoIterator for StyleModel {
    type Item = (String, PropertyMap);
    type IntoIter = IntoIter<String, PropertyMap>;

    fn into_iter(self) -> Self::IntoIter {
        self.selectors.into_iter()
    }
}

impl<'model> IntoIterator for &'model StyleModel {
    type Item = (&'model String, &'model PropertyMap);
    type IntoIter = Iter<'model, String, PropertyMap>;

    fn into_iter(self) -> Self::IntoIter {
        self.selectors.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StyleModel {
        StyleModel::new()
            .with_selector(".a", properties([("color", "red".into())]))
            .with_selector(".b", properties([("display", "block".into()), ("zIndex", 1.into())]))
    }

    #[test]
    fn add_selector_extends_without_overwriting() {
        let mut model = sample();
        model.add_selector(
            ".a",
            properties([("color", "blue".into()), ("margin", "0".into())]),
            false,
        );
        let props = model.get(".a");
        assert_eq!(props.and_then(|map| map.get("color")), Some(&"red".into()));
        assert_eq!(props.and_then(|map| map.get("margin")), Some(&"0".into()));
    }

    #[test]
    fn modify_selector_overwrites() {
        let mut model = sample();
        model.modify_selector(".a", properties([("color", "blue".into())]));
        assert_eq!(model.get(".a").and_then(|map| map.get("color")), Some(&"blue".into()));
    }

    #[test]
    fn add_property_respects_overwrite_and_unknown_selectors() {
        let mut model = sample();
        assert!(!model.add_property(".a", "color", "green", false));
        assert!(model.add_property(".a", "color", "green", true));
        assert!(!model.add_property(".missing", "color", "green", true));
        assert!(!model.contains(".missing"));
    }

    #[test]
    fn remove_keeps_remaining_order() {
        let mut model = sample().with_selector(".c", PropertyMap::new());
        model.remove([".b"]);
        assert_eq!(model.selectors().collect::<Vec<_>>(), vec![".a", ".c"]);
    }

    #[test]
    fn remove_properties_ignores_missing_names() {
        let mut model = sample();
        model.remove_properties(".b", ["zIndex", "missing"]);
        assert_eq!(model.get(".b").map(PropertyMap::len), Some(1));
        assert_eq!(model.remove_property(".b", "display"), Some("block".into()));
        assert_eq!(model.remove_property(".missing", "display"), None);
    }

    #[test]
    fn replace_selector_drops_previous_properties() {
        let mut model = sample();
        model.replace_selector(".b", properties([("float", "left".into())]));
        assert_eq!(model.get(".b").map(PropertyMap::len), Some(1));
        assert_eq!(model.selectors().collect::<Vec<_>>(), vec![".a", ".b"]);
    }

    #[test]
    fn equality_ignores_insertion_order() {
        let forward = sample();
        let reversed: StyleModel = forward.clone().into_iter().rev().collect();
        assert_eq!(forward, reversed);
    }

    #[test]
    fn json_round_trips_through_serde() -> Result<(), serde_json::Error> {
        let model = sample();
        let text = model.to_json()?;
        assert_eq!(StyleModel::from_json(&text)?, model);
        Ok(())
    }

    #[test]
    fn clear_empties_the_model() {
        let mut model = sample();
        model.clear();
        assert!(model.is_empty());
    }
}
