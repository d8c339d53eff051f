//! Structured warnings and notices
//!
//! Everything the resolver excludes, coerces, drops or merely notices is
//! emitted as a [`Report`]. Presentation is left to the caller.

use crate::record::{EntityId, SourceLocation};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Broad class of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportCategory {
    /// Record excluded or coerced while parsing
    Parse,
    /// Reference that does not resolve, or a duplicate id
    Reference,
    /// Cycle broken automatically
    Cycle,
    /// Informational fields disagree with their source of truth
    Consistency,
    /// Plain notice (archival and the like)
    Notice,
}

/// Specific report kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    /// Frontmatter could not be parsed
    Unparseable,
    /// `id` or `type` missing (or rejected in strict mode)
    MissingRequiredFields,
    /// A field had an unusable shape and was ignored
    MalformedField,
    /// Unknown type coerced to `task`
    UnknownType,
    /// Id does not follow the `PREFIX-NNN` convention
    NonCanonicalId,
    /// Id prefix and declared type disagree
    TypePrefixMismatch,
    /// Second record claiming an id already taken
    DuplicateId,
    /// `parent` does not resolve to any record
    MissingParent,
    /// `parent` resolves to an archived record
    ParentArchived,
    /// `depends_on` entry does not resolve
    MissingDependency,
    /// `depends_on` entry resolves to an archived record
    DependsOnArchived,
    /// Record references itself
    SelfReference,
    /// Edge dropped to break a cycle
    CycleBroken,
    /// Edge dropped because containment and dependency order disagree
    OrderingConflict,
    /// `children` disagrees with the records pointing back via `parent`
    ChildrenMismatch,
    /// `blocks` disagrees with `depends_on`
    BlocksMismatch,
    /// Record archived during the pass
    Archived,
    /// Canvas node left in place because its record failed to parse
    NodeKept,
}

impl ReportKind {
    /// Category of this kind
    #[must_use]
    pub const fn category(self) -> ReportCategory {
        match self {
            ReportKind::Unparseable
            | ReportKind::MissingRequiredFields
            | ReportKind::MalformedField
            | ReportKind::UnknownType
            | ReportKind::NonCanonicalId => ReportCategory::Parse,
            ReportKind::DuplicateId
            | ReportKind::MissingParent
            | ReportKind::ParentArchived
            | ReportKind::MissingDependency
            | ReportKind::DependsOnArchived
            | ReportKind::SelfReference => ReportCategory::Reference,
            ReportKind::CycleBroken | ReportKind::OrderingConflict => ReportCategory::Cycle,
            ReportKind::ChildrenMismatch
            | ReportKind::BlocksMismatch
            | ReportKind::TypePrefixMismatch => ReportCategory::Consistency,
            ReportKind::Archived | ReportKind::NodeKept => ReportCategory::Notice,
        }
    }

    /// Whether this kind is a warning rather than a notice
    #[must_use]
    pub const fn is_warning(self) -> bool {
        !matches!(self.category(), ReportCategory::Notice)
    }
}

/// One structured warning or notice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// What happened
    pub kind: ReportKind,
    /// Human-readable message
    pub message: String,
    /// Entities involved, in a stable order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entity_ids: Vec<EntityId>,
    /// Source item involved, when the report is about one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
}

impl Report {
    /// Create a report with no entities attached
    #[must_use]
    pub fn new(kind: ReportKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            entity_ids: Vec::new(),
            location: None,
        }
    }

    /// With affected entities
    #[must_use]
    pub fn with_entities<I, E>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<EntityId>,
    {
        self.entity_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    /// With the source item involved
    #[must_use]
    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Category of this report
    #[must_use]
    pub fn category(&self) -> ReportCategory {
        self.kind.category()
    }

    /// Whether the report names an entity
    #[must_use]
    pub fn mentions(&self, id: &str) -> bool {
        self.entity_ids.iter().any(|e| e.as_str() == id)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.kind, self.message)
    }
}
