//! In-memory stylesheet model.
//!
//! A [`StyleModel`] is an ordered mapping from selector text to a
//! [`PropertyMap`]. It is the source of truth that the `css` crate
//! synchronizes onto a live rule list. This crate also owns the text side of
//! that synchronization: property name case conversion ([`case`]) and the
//! `selector{property:value}` writer ([`serialize`]), plus the explicit
//! [`Processor`] extension point.

#![forbid(unsafe_code)]

pub mod case;
pub mod model;
pub mod processor;
pub mod serialize;
pub mod value;

pub use case::{VendorPrefix, is_prefixed_property, to_camel_case, to_param_case};
pub use model::{PropertyMap, StyleModel, properties};
pub use processor::{PrefixProcessor, Processor, ProcessorChain, UnitProcessor};
pub use serialize::{CompiledSheet, declarations, rule_text};
pub use value::PropertyValue;
