//! In-memory collaborators
//!
//! Useful for tests and for embedding the engine where records and canvas
//! already live in memory.

use crate::collaborators::{ArchiveError, ArchiveSink, CanvasStore, RecordSource, SourceError, StoreError};
use crate::document::CanvasDocument;
use roadmap_entity::SourceLocation;
use std::collections::BTreeMap;

/// Records held in a map keyed by location
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordSource {
    items: BTreeMap<SourceLocation, String>,
}

impl MemoryRecordSource {
    /// Empty source
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With one more item
    #[must_use]
    pub fn with(mut self, location: &str, text: impl Into<String>) -> Self {
        self.insert(location, text);
        self
    }

    /// Add or replace an item
    pub fn insert(&mut self, location: &str, text: impl Into<String>) {
        self.items.insert(SourceLocation::new(location), text.into());
    }

    /// Remove an item, returning its text
    pub fn remove(&mut self, location: &str) -> Option<String> {
        self.items.remove(location)
    }

    /// Number of items
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether there are no items
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl RecordSource for MemoryRecordSource {
    fn records(&self) -> Result<Vec<(SourceLocation, String)>, SourceError> {
        Ok(self
            .items
            .iter()
            .map(|(location, text)| (location.clone(), text.clone()))
            .collect())
    }
}

/// Archive sink that remembers every call
#[derive(Debug, Clone)]
pub struct MemoryArchiveSink {
    folder: String,
    /// `(old, new)` location per successful call
    pub moves: Vec<(SourceLocation, SourceLocation)>,
}

impl MemoryArchiveSink {
    /// Sink that files everything under `folder/`
    #[must_use]
    pub fn new(folder: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            moves: Vec::new(),
        }
    }

    /// Locations archived so far, in call order
    #[must_use]
    pub fn archived(&self) -> Vec<&SourceLocation> {
        self.moves.iter().map(|(old, _)| old).collect()
    }
}

impl Default for MemoryArchiveSink {
    fn default() -> Self {
        Self::new("archive")
    }
}

impl ArchiveSink for MemoryArchiveSink {
    fn archive(&mut self, location: &SourceLocation) -> Result<SourceLocation, ArchiveError> {
        let name = location.as_str().rsplit('/').next().unwrap_or(location.as_str());
        let stem = name.strip_suffix(".md").unwrap_or(name);

        let mut target = format!("{}/{name}", self.folder);
        let mut n = 0;
        while self.moves.iter().any(|(_, taken)| taken.as_str() == target) {
            n += 1;
            target = format!("{}/{stem}-{n}.md", self.folder);
        }

        let target = SourceLocation::new(target);
        self.moves.push((location.clone(), target.clone()));
        Ok(target)
    }
}

/// Canvas kept in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryCanvasStore {
    /// Current document
    pub document: CanvasDocument,
    /// Number of successful saves
    pub saves: usize,
}

impl MemoryCanvasStore {
    /// Store holding `document`
    #[must_use]
    pub fn new(document: CanvasDocument) -> Self {
        Self { document, saves: 0 }
    }
}

impl CanvasStore for MemoryCanvasStore {
    fn load(&self) -> Result<CanvasDocument, StoreError> {
        Ok(self.document.clone())
    }

    fn save(&mut self, document: &CanvasDocument) -> Result<(), StoreError> {
        self.document = document.clone();
        self.saves += 1;
        Ok(())
    }
}
