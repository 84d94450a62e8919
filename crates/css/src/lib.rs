//! Dynamic stylesheets.
//!
//! A [`DynamicStyleSheet`] owns a [`StyleModel`] and one `<style>` element of
//! a host [`Document`]. After the first [`apply`](DynamicStyleSheet::apply),
//! every [`update`](DynamicStyleSheet::update) diffs the model against the
//! snapshot of what was last written and replays only the difference onto
//! the element's live [`RuleList`]:
//!
//! ```
//! use css::{DynamicStyleSheet, MemoryDocument, StyleModel, properties};
//!
//! let mut document = MemoryDocument::new();
//! let model = StyleModel::new().with_selector(".a", properties([("color", "red".into())]));
//! let mut sheet = DynamicStyleSheet::with_id("doc", model);
//! sheet.apply(&mut document)?;
//!
//! sheet.model_mut().modify_property(".a", "color", "blue");
//! let changes = sheet.update()?;
//! assert_eq!(changes.to_string(), "[changed(.a, [changed(color)])]");
//!
//! let live = document.rules("dynamic-style-sheet-doc").map(|rules| rules.css_text());
//! assert_eq!(live.as_deref(), Some(".a{color:blue}"));
//! # Ok::<(), css::SheetError>(())
//! ```
//!
//! The model, case conversion and the CSS writer live in `css_model`; change
//! sets live in `css_diff`. Both are re-exported here.

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod host;
pub mod ids;
pub mod lifecycle;
pub mod reconcile;
pub mod sheet;

pub use config::{ApplyMode, DEFAULT_ID_PREFIX, SheetConfig};
pub use error::{SheetError, SheetResult};
pub use host::memory::{MemoryDocument, MemoryRuleList, MemoryStyleElement};
pub use host::{Capabilities, Document, RuleList, StyleElement, find_rule};
pub use ids::{DEFAULT_IDS, SheetId, SheetIdAllocator};
pub use lifecycle::{Lifecycle, Operation, SheetState};
pub use reconcile::{ReconcileSummary, reconcile};
pub use sheet::DynamicStyleSheet;

pub use css_diff::{
    ChangeKind, ChangeSet, PropertyChange, SelectorChange, apply_changes, diff, diff_properties,
    merge,
};
pub use css_model::{
    CompiledSheet, PrefixProcessor, Processor, ProcessorChain, PropertyMap, PropertyValue,
    StyleModel, UnitProcessor, VendorPrefix, properties, to_camel_case, to_param_case,
};
