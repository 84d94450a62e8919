//! Model processors.
//!
//! A processor rewrites a [`StyleModel`] in place before it is written to a
//! document: adding units, adding vendor-prefixed copies of properties, and
//! similar transforms. Processors are registered explicitly on a
//! [`ProcessorChain`] and run in registration order.

use crate::case::{VendorPrefix, to_camel_case, to_param_case};
use crate::model::StyleModel;
use crate::value::PropertyValue;
use anyhow::Result;
use log::debug;
use std::collections::HashSet;

/// A transform over a whole style model.
pub trait Processor {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Rewrite the model in place.
    ///
    /// # Errors
    /// Implementations return an error when the model cannot be processed;
    /// the model may have been partially rewritten.
    fn process(&self, model: &mut StyleModel) -> Result<()>;
}

/// An ordered set of explicitly registered processors.
#[derive(Default)]
pub struct ProcessorChain {
    processors: Vec<Box<dyn Processor>>,
}

impl ProcessorChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style registration.
    #[must_use]
    pub fn with<P: Processor + 'static>(mut self, processor: P) -> Self {
        self.register(processor);
        self
    }

    pub fn register<P: Processor + 'static>(&mut self, processor: P) {
        self.processors.push(Box::new(processor));
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }
}

impl Processor for ProcessorChain {
    fn name(&self) -> &'static str {
        "chain"
    }

    /// Run every registered processor in order, stopping at the first error.
    fn process(&self, model: &mut StyleModel) -> Result<()> {
        for processor in &self.processors {
            debug!(target: "css::processor", "running processor `{}`", processor.name());
            processor.process(model)?;
        }
        Ok(())
    }
}

/// Properties whose numeric values are written without a unit.
const UNITLESS_PROPERTIES: [&str; 14] = [
    "animation-iteration-count",
    "column-count",
    "fill-opacity",
    "flex",
    "flex-grow",
    "flex-shrink",
    "font-weight",
    "line-height",
    "opacity",
    "order",
    "orphans",
    "widows",
    "z-index",
    "zoom",
];

/// Appends a unit to numeric values of length-like properties.
///
/// `{width: 10, opacity: 0.5}` becomes `{width: "10px", opacity: 0.5}`.
/// Custom properties are never touched.
pub struct UnitProcessor {
    unit: String,
    unitless: HashSet<String>,
}

impl Default for UnitProcessor {
    fn default() -> Self {
        Self::new("px")
    }
}

impl UnitProcessor {
    pub fn new(unit: impl Into<String>) -> Self {
        Self {
            unit: unit.into(),
            unitless: UNITLESS_PROPERTIES.iter().map(|name| (*name).to_owned()).collect(),
        }
    }

    /// Mark another property as unitless. Accepts camelCase or hyphenated names.
    #[must_use]
    pub fn unitless(mut self, property: &str) -> Self {
        self.unitless.insert(to_param_case(property));
        self
    }

    fn wants_unit(&self, property: &str) -> bool {
        if property.starts_with("--") {
            return false;
        }
        let hyphenated = to_param_case(property);
        let unprefixed = VendorPrefix::ALL
            .into_iter()
            .find_map(|prefix| {
                hyphenated.strip_prefix(&format!("-{}-", prefix.as_str().to_ascii_lowercase()))
            })
            .unwrap_or(&hyphenated);
        !self.unitless.contains(unprefixed)
    }
}

impl Processor for UnitProcessor {
    fn name(&self) -> &'static str {
        "units"
    }

    fn process(&self, model: &mut StyleModel) -> Result<()> {
        for (_, properties) in model.iter_mut() {
            for (property, value) in properties.iter_mut() {
                if let PropertyValue::Number(number) = *value
                    && self.wants_unit(property)
                {
                    *value = PropertyValue::Text(format!("{number}{}", self.unit));
                }
            }
        }
        Ok(())
    }
}

/// Adds vendor-prefixed copies of selected properties.
///
/// The prefixed copy is inserted directly before the standard property so
/// the standard declaration wins in the cascade. Properties are found under
/// their camelCase or hyphenated name, and prefixed values already present
/// under either spelling are left alone.
pub struct PrefixProcessor {
    prefixes: Vec<VendorPrefix>,
    properties: Vec<String>,
}

impl PrefixProcessor {
    /// Prefix the given properties (camelCase or hyphenated) with every vendor prefix.
    pub fn new<I, S>(properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            prefixes: VendorPrefix::ALL.to_vec(),
            properties: properties
                .into_iter()
                .map(|property| to_camel_case(property.as_ref()))
                .collect(),
        }
    }

    /// Restrict the prefixes that are added.
    #[must_use]
    pub fn with_prefixes(mut self, prefixes: &[VendorPrefix]) -> Self {
        self.prefixes = prefixes.to_vec();
        self
    }
}

impl Processor for PrefixProcessor {
    fn name(&self) -> &'static str {
        "prefixer"
    }

    fn process(&self, model: &mut StyleModel) -> Result<()> {
        for (_, declared) in model.iter_mut() {
            for property in &self.properties {
                let hyphenated = to_param_case(property);
                let Some((position, written)) = [property.as_str(), hyphenated.as_str()]
                    .into_iter()
                    .find_map(|name| declared.get_index_of(name).map(|position| (position, name)))
                else {
                    continue;
                };
                let Some(value) = declared.get_index(position).map(|(_, value)| value.clone()) else {
                    continue;
                };
                let mut insert_at = position;
                for prefix in &self.prefixes {
                    let prefixed = prefix.apply(property);
                    let prefixed_hyphenated = to_param_case(&prefixed);
                    if declared.contains_key(&prefixed) || declared.contains_key(&prefixed_hyphenated) {
                        continue;
                    }
                    // Copies follow the spelling of the declaration they were made from.
                    let name = if written == property.as_str() {
                        prefixed
                    } else {
                        prefixed_hyphenated
                    };
                    declared.shift_insert(insert_at, name, value.clone());
                    insert_at += 1;
                }
            }
        }
        Ok(())
    }
}
