//! Error types for record parsing
//!
//! A [`ParseError`] excludes one record from the pass; it never aborts the
//! batch. Each error converts into a [`Report`] so the exclusion is surfaced.

use crate::frontmatter::BlockError;
use crate::record::SourceLocation;
use crate::report::{Report, ReportKind};

/// Why a source item did not produce a record
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The frontmatter block could not be parsed at all
    #[error("unparseable record at {location}: {source}")]
    Unparseable {
        /// Offending item
        location: SourceLocation,
        /// What was wrong with the block
        #[source]
        source: BlockError,
    },

    /// The block parsed but lacks `id` and/or `type`
    #[error("missing required fields at {location}: {}", fields.join(", "))]
    MissingRequiredFields {
        /// Offending item
        location: SourceLocation,
        /// Names of the missing fields
        fields: Vec<&'static str>,
    },

    /// Unknown `type` value, rejected because lenient mode is off
    #[error("unknown entity type '{value}' at {location}")]
    InvalidType {
        /// Offending item
        location: SourceLocation,
        /// Raw type value
        value: String,
    },

    /// Non-canonical `id`, rejected because lenient mode is off
    #[error("non-canonical entity id '{value}' at {location}")]
    InvalidId {
        /// Offending item
        location: SourceLocation,
        /// Raw id value
        value: String,
    },
}

impl ParseError {
    /// Create an unparseable error for a location
    #[must_use]
    pub fn unparseable(location: &SourceLocation, source: BlockError) -> Self {
        Self::Unparseable {
            location: location.clone(),
            source,
        }
    }

    /// Location of the excluded item
    #[must_use]
    pub fn location(&self) -> &SourceLocation {
        match self {
            Self::Unparseable { location, .. }
            | Self::MissingRequiredFields { location, .. }
            | Self::InvalidType { location, .. }
            | Self::InvalidId { location, .. } => location,
        }
    }

    /// Report kind this error surfaces as
    #[must_use]
    pub fn kind(&self) -> ReportKind {
        match self {
            Self::Unparseable { .. } => ReportKind::Unparseable,
            Self::MissingRequiredFields { .. } | Self::InvalidType { .. } | Self::InvalidId { .. } => {
                ReportKind::MissingRequiredFields
            }
        }
    }
}

impl From<&ParseError> for Report {
    fn from(err: &ParseError) -> Self {
        Report::new(err.kind(), err.to_string()).at(err.location().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_display_lists_fields() {
        let err = ParseError::MissingRequiredFields {
            location: SourceLocation::new("notes/a.md"),
            fields: vec!["id", "type"],
        };
        assert_eq!(
            err.to_string(),
            "missing required fields at notes/a.md: id, type"
        );
    }

    #[test]
    fn error_converts_to_report() {
        let err = ParseError::unparseable(
            &SourceLocation::new("x.md"),
            BlockError::Syntax("bad indent".into()),
        );
        let report = Report::from(&err);
        assert_eq!(report.kind, ReportKind::Unparseable);
        assert_eq!(report.location, Some(SourceLocation::new("x.md")));
        assert!(report.message.contains("bad indent"));
    }

    #[test]
    fn unparseable_keeps_the_block_error_as_source() {
        use std::error::Error as _;

        let err = ParseError::unparseable(&SourceLocation::new("x.md"), BlockError::Unterminated);
        let source = err.source().and_then(|s| s.downcast_ref::<BlockError>());
        assert_eq!(source, Some(&BlockError::Unterminated));
        assert_eq!(
            err.to_string(),
            "unparseable record at x.md: frontmatter block is not closed"
        );
    }
}
