//! Change sets between two style models.
//!
//! [`diff`] compares an old and a new [`StyleModel`](css_model::StyleModel)
//! and never mutates either side. [`merge`] is the explicit mutating
//! counterpart that brings a base model to a target state and reports what it
//! changed.
//!
//! Property-level changes travel inside [`SelectorChange::Changed`]; they are
//! never flattened next to selector entries.

#![forbid(unsafe_code)]

pub mod change;
pub mod diff;
pub mod merge;

pub use change::{ChangeKind, ChangeSet, PropertyChange, SelectorChange};
pub use diff::{diff, diff_properties};
pub use merge::{apply_changes, merge};
