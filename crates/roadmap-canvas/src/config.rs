//! Engine configuration

use roadmap_entity::ParserOptions;
use roadmap_layout::{LayoutConfig, LayoutError};
use serde::{Deserialize, Serialize};

/// Everything a pass needs to know
///
/// Deserialises from a partial table; missing keys take their defaults:
///
/// ```toml
/// archive_folder = "done"
///
/// [parser]
/// lenient = false
///
/// [layout]
/// column_gutter = 80
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Record parser switches
    pub parser: ParserOptions,
    /// Layout geometry
    pub layout: LayoutConfig,
    /// Top-level folder archived records are moved into and never read from
    pub archive_folder: String,
}

impl EngineConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With parser options
    #[inline]
    #[must_use]
    pub fn with_parser(mut self, parser: ParserOptions) -> Self {
        self.parser = parser;
        self
    }

    /// With layout configuration
    #[inline]
    #[must_use]
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    /// With archive folder
    #[inline]
    #[must_use]
    pub fn with_archive_folder(mut self, folder: impl Into<String>) -> Self {
        self.archive_folder = folder.into();
        self
    }

    /// Whether `location` lies inside the archive folder
    #[must_use]
    pub fn in_archive(&self, location: &str) -> bool {
        let folder = self.archive_folder.trim_matches(|c| c == '/' || c == '\\');
        !folder.is_empty()
            && location
                .trim_start_matches("./")
                .split(['/', '\\'])
                .next()
                .is_some_and(|first| first == folder)
    }

    /// Check the layout part
    ///
    /// # Errors
    /// [`LayoutError::InvalidConfig`] for unusable geometry.
    pub fn validate(&self) -> Result<(), LayoutError> {
        self.layout.validate()
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parser: ParserOptions::default(),
            layout: LayoutConfig::default(),
            archive_folder: "archive".to_string(),
        }
    }
}
