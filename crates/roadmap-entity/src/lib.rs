//! Roadmap Entity Layer
//!
//! The boundary between raw record text and the typed records the resolver
//! works on.
//!
//! # Core Operations
//!
//! - **Parse**: turn one frontmatter-carrying text into an [`EntityRecord`]
//! - **Batch**: parse a whole scan, dropping duplicate ids deterministically
//! - **Report**: every exclusion or coercion becomes a structured [`Report`]
//!
//! # Example
//!
//! ```rust
//! use roadmap_entity::{RecordParser, SourceLocation};
//!
//! let parser = RecordParser::new();
//! let batch = parser.parse_batch(vec![(
//!     SourceLocation::new("stories/S-001.md"),
//!     "---\nid: S-001\ntype: story\n---\n# Login\n".to_string(),
//! )]);
//!
//! assert_eq!(batch.records.len(), 1);
//! assert!(batch.reports.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod field;
pub mod frontmatter;
pub mod parser;
pub mod record;
pub mod report;

pub use error::ParseError;
pub use field::ParsedField;
pub use parser::{normalize_reference, ParsedBatch, ParserOptions, RecordParser};
pub use record::{EntityId, EntityRecord, EntityType, SourceLocation};
pub use report::{Report, ReportCategory, ReportKind};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with entity records
    pub use crate::error::ParseError;
    pub use crate::parser::{ParsedBatch, ParserOptions, RecordParser};
    pub use crate::record::{EntityId, EntityRecord, EntityType, SourceLocation};
    pub use crate::report::{Report, ReportCategory, ReportKind};
}
