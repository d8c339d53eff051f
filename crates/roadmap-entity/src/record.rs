//! Entity record model
//!
//! One [`EntityRecord`] per parsed source item. Records are rebuilt on every
//! scan and never mutated after parsing.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

/// Externally assigned entity identifier (e.g. `M-001`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Wrap an identifier string
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow as `&str`
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Alphabetic prefix before the first `-`, if any
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.0.split_once('-').map(|(prefix, _)| prefix)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for EntityId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Opaque handle naming where a record came from
///
/// Only ever handed back to the file-layer collaborator. Ordering is
/// lexicographic and is used as the duplicate-id tie-break.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceLocation(String);

impl SourceLocation {
    /// Wrap a location string
    #[inline]
    #[must_use]
    pub fn new(location: impl Into<String>) -> Self {
        Self(location.into())
    }

    /// Borrow as `&str`
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for SourceLocation {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SourceLocation {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for SourceLocation {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Kind of project-management entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    /// Delivery checkpoint grouping stories
    Milestone,
    /// User-facing slice of work
    Story,
    /// Unit of work
    Task,
    /// Recorded decision
    Decision,
    /// Reference document
    Document,
    /// Product feature
    Feature,
}

impl EntityType {
    /// Every type, in declaration order
    pub const ALL: [EntityType; 6] = [
        EntityType::Milestone,
        EntityType::Story,
        EntityType::Task,
        EntityType::Decision,
        EntityType::Document,
        EntityType::Feature,
    ];

    /// Lowercase name as written in records
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            EntityType::Milestone => "milestone",
            EntityType::Story => "story",
            EntityType::Task => "task",
            EntityType::Decision => "decision",
            EntityType::Document => "document",
            EntityType::Feature => "feature",
        }
    }

    /// Conventional id prefix for this type
    #[must_use]
    pub const fn id_prefix(self) -> &'static str {
        match self {
            EntityType::Milestone => "M",
            EntityType::Story => "S",
            EntityType::Task => "T",
            EntityType::Decision => "DEC",
            EntityType::Document => "DOC",
            EntityType::Feature => "F",
        }
    }

    /// Type conventionally implied by an id prefix
    #[must_use]
    pub fn from_id_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.id_prefix() == prefix)
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == lowered)
            .ok_or_else(|| format!("unknown entity type: '{s}'"))
    }
}

/// One parsed entity plus its raw relationship fields
///
/// Relationship fields are insertion-ordered sets: duplicates collapse, the
/// written order is kept for list display.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRecord {
    /// Unique identifier
    pub entity_id: EntityId,
    /// Entity kind (coerced to `task` when unrecognised in lenient mode)
    pub entity_type: EntityType,
    /// Display title
    pub title: Option<String>,
    /// Own workstream, if any
    pub workstream: Option<String>,
    /// Containment reference, the sole source of truth for parenthood
    pub parent: Option<EntityId>,
    /// Informational child list, never used to derive edges
    pub children: IndexSet<EntityId>,
    /// Dependencies, the sole source of truth for dependency edges
    pub depends_on: IndexSet<EntityId>,
    /// Informational inverse of `depends_on`
    pub blocks: IndexSet<EntityId>,
    /// Entities this one enables
    pub enables: IndexSet<EntityId>,
    /// Entities this one affects
    pub affects: IndexSet<EntityId>,
    /// Entities implementing this one
    pub implemented_by: IndexSet<EntityId>,
    /// Entities this one implements
    pub implements: IndexSet<EntityId>,
    /// Flagged for archival
    pub archived: bool,
    /// Where the record was read from
    pub location: SourceLocation,
    /// The full original frontmatter mapping, unknown keys included
    pub fields: serde_yaml::Mapping,
}

impl EntityRecord {
    /// Create a bare record with no relationships
    #[must_use]
    pub fn new(
        entity_id: impl Into<EntityId>,
        entity_type: EntityType,
        location: impl Into<SourceLocation>,
    ) -> Self {
        Self {
            entity_id: entity_id.into(),
            entity_type,
            title: None,
            workstream: None,
            parent: None,
            children: IndexSet::new(),
            depends_on: IndexSet::new(),
            blocks: IndexSet::new(),
            enables: IndexSet::new(),
            affects: IndexSet::new(),
            implemented_by: IndexSet::new(),
            implements: IndexSet::new(),
            archived: false,
            location: location.into(),
            fields: serde_yaml::Mapping::new(),
        }
    }

    /// With workstream
    #[must_use]
    pub fn with_workstream(mut self, workstream: impl Into<String>) -> Self {
        self.workstream = Some(workstream.into());
        self
    }

    /// With parent reference
    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<EntityId>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// With one more dependency
    #[must_use]
    pub fn depends_on(mut self, dependency: impl Into<EntityId>) -> Self {
        self.depends_on.insert(dependency.into());
        self
    }

    /// With one more informational `blocks` entry
    #[must_use]
    pub fn blocks(mut self, dependent: impl Into<EntityId>) -> Self {
        self.blocks.insert(dependent.into());
        self
    }

    /// With one more informational child
    #[must_use]
    pub fn with_child(mut self, child: impl Into<EntityId>) -> Self {
        self.children.insert(child.into());
        self
    }

    /// With title
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Mark as archived
    #[must_use]
    pub fn archived(mut self) -> Self {
        self.archived = true;
        self
    }

    /// Label shown on the canvas: title when present, id otherwise
    #[must_use]
    pub fn label(&self) -> &str {
        self.title.as_deref().unwrap_or(self.entity_id.as_str())
    }

    /// Re-serialize the original frontmatter block, every field preserved
    ///
    /// # Errors
    /// Returns the YAML emitter error if the mapping cannot be written.
    pub fn to_frontmatter(&self) -> Result<String, serde_yaml::Error> {
        let body = serde_yaml::to_string(&self.fields)?;
        Ok(format!("---\n{body}---\n"))
    }
}
