//! CSS text writer.
//!
//! Output format: `selector{property:value;property:value}` for each
//! selector, concatenated with no separators. Property names go through
//! [`to_param_case`].

use crate::case::to_param_case;
use crate::model::{PropertyMap, StyleModel};
use core::fmt::Write as _;
use indexmap::IndexMap;

/// Selector text mapped to its compiled declaration block (without braces).
pub type CompiledSheet = IndexMap<String, String>;

/// Write a property map as a declaration block body: `a:b;c:d`.
pub fn declarations(properties: &PropertyMap) -> String {
    let mut out = String::new();
    for (property, value) in properties {
        if !out.is_empty() {
            out.push(';');
        }
        let _ignored = write!(out, "{}:{value}", to_param_case(property));
    }
    out
}

/// Write one full rule: `selector{declarations}`.
pub fn rule_text(selector: &str, properties: &PropertyMap) -> String {
    format!("{selector}{{{}}}", declarations(properties))
}

impl StyleModel {
    /// Compile selectors into declaration strings.
    ///
    /// With `Some(selector)` only that selector is compiled; a selector that
    /// is not in the model yields an empty result.
    pub fn compile(&self, selector: Option<&str>) -> CompiledSheet {
        match selector {
            Some(wanted) => self
                .get(wanted)
                .map(|properties| (wanted.to_owned(), declarations(properties)))
                .into_iter()
                .collect(),
            None => self
                .iter()
                .map(|(name, properties)| (name.clone(), declarations(properties)))
                .collect(),
        }
    }

    /// Concatenated CSS text for the whole model or one selector.
    pub fn to_css(&self, selector: Option<&str>) -> String {
        let mut css = String::new();
        for (selector_text, body) in self.compile(selector) {
            let _ignored = write!(css, "{selector_text}{{{body}}}");
        }
        css
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::properties;

    #[test]
    fn to_css_is_deterministic() {
        let model = StyleModel::new().with_selector(
            ".a",
            properties([("color", "red".into()), ("display", "block".into())]),
        );
        assert_eq!(model.to_css(None), ".a{color:red;display:block}");
    }

    #[test]
    fn selectors_are_concatenated_without_separators() {
        let model = StyleModel::new()
            .with_selector(".a", properties([("color", "red".into())]))
            .with_selector("#b > p", properties([("marginTop", 4.into())]));
        assert_eq!(model.to_css(None), ".a{color:red}#b > p{margin-top:4}");
    }

    #[test]
    fn single_selector_compiles_alone() {
        let model = StyleModel::new()
            .with_selector(".a", properties([("color", "red".into())]))
            .with_selector(".b", properties([("WebkitTransition", "all 1s".into())]));
        assert_eq!(model.to_css(Some(".b")), ".b{-webkit-transition:all 1s}");
        assert_eq!(model.to_css(Some(".missing")), "");
    }

    #[test]
    fn compile_maps_selectors_to_bodies() {
        let model = StyleModel::new()
            .with_selector(".a", properties([("fontSize", "12px".into()), ("opacity", 0.5.into())]));
        let compiled = model.compile(None);
        assert_eq!(compiled.get(".a").map(String::as_str), Some("font-size:12px;opacity:0.5"));
    }

    #[test]
    fn empty_selector_has_empty_block() {
        assert_eq!(rule_text(".empty", &PropertyMap::new()), ".empty{}");
    }
}
