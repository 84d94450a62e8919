//! Stylesheet configuration.
//!
//! Settings can be constructed programmatically or read from the
//! environment with [`SheetConfig::from_env`].

use crate::ids::SheetId;
use std::env;

/// Prefix put in front of a sheet id to form its style element id.
pub const DEFAULT_ID_PREFIX: &str = "dynamic-style-sheet-";

/// How the first write of a sheet reaches its style element.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ApplyMode {
    /// One text node per selector.
    #[default]
    Granular,
    /// All selectors in a single text node. Faster to write, but the
    /// element's text can no longer be edited per selector.
    Dirty,
}

/// Per-sheet settings.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SheetConfig {
    /// Prefix for the style element id (`{id_prefix}{sheet id}`)
    pub id_prefix: String,
    /// Media query the style element applies to; empty for all media
    pub media: String,
    /// Strategy for the initial write
    pub apply_mode: ApplyMode,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ID_PREFIX, "", ApplyMode::Granular)
    }
}

impl SheetConfig {
    pub fn new(id_prefix: impl Into<String>, media: impl Into<String>, apply_mode: ApplyMode) -> Self {
        Self {
            id_prefix: id_prefix.into(),
            media: media.into(),
            apply_mode,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// - `DSS_ID_PREFIX`: style element id prefix (default: `dynamic-style-sheet-`)
    /// - `DSS_MEDIA`: media query (default: empty)
    /// - `DSS_DIRTY_APPLY`: set to "1" to write the initial sheet as one text node
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup, using the same keys as
    /// [`from_env`](Self::from_env).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let id_prefix = lookup("DSS_ID_PREFIX")
            .filter(|prefix| !prefix.is_empty())
            .unwrap_or_else(|| DEFAULT_ID_PREFIX.to_owned());
        let media = lookup("DSS_MEDIA").unwrap_or_default();
        let apply_mode = if lookup("DSS_DIRTY_APPLY").as_deref() == Some("1") {
            ApplyMode::Dirty
        } else {
            ApplyMode::Granular
        };
        Self {
            id_prefix,
            media,
            apply_mode,
        }
    }

    #[must_use]
    pub fn with_media(mut self, media: impl Into<String>) -> Self {
        self.media = media.into();
        self
    }

    #[must_use]
    pub const fn with_apply_mode(mut self, apply_mode: ApplyMode) -> Self {
        self.apply_mode = apply_mode;
        self
    }

    /// The style element id for a sheet.
    pub fn element_id(&self, id: &SheetId) -> String {
        format!("{}{id}", self.id_prefix)
    }
}
