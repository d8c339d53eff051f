//! Boundary contracts
//!
//! The engine never touches the filesystem or a UI. It reads records from a
//! [`RecordSource`], hands archival moves to an [`ArchiveSink`], loads and
//! saves the canvas through a [`CanvasStore`] and emits diagnostics into a
//! [`ReportSink`].

use crate::document::CanvasDocument;
use roadmap_entity::{Report, SourceLocation};
use thiserror::Error;

/// Record source failure
#[derive(Error, Debug)]
pub enum SourceError {
    /// A single item could not be read
    #[error("cannot read {location}: {source}")]
    Read {
        /// Item location
        location: SourceLocation,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The source as a whole is unavailable
    #[error("record source unavailable: {0}")]
    Unavailable(String),
}

/// Archive sink failure
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// The move itself failed
    #[error("cannot archive {location}: {source}")]
    Io {
        /// Item being archived
        location: SourceLocation,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The sink refused the item
    #[error("cannot archive {location}: {reason}")]
    Rejected {
        /// Item being archived
        location: SourceLocation,
        /// Why
        reason: String,
    },
}

/// Canvas store failure
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading or writing failed
    #[error("canvas store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored document is not a canvas
    #[error("malformed canvas document: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Any other store-specific failure
    #[error("canvas store error: {0}")]
    Other(String),
}

/// All in-scope records as `(location, raw text)` pairs
///
/// Items inside the archive area must already be filtered out.
#[cfg_attr(test, mockall::automock)]
pub trait RecordSource {
    /// Snapshot every in-scope item
    ///
    /// # Errors
    /// [`SourceError`] when the snapshot cannot be taken.
    fn records(&self) -> Result<Vec<(SourceLocation, String)>, SourceError>;
}

/// Moves archived records out of scope
#[cfg_attr(test, mockall::automock)]
pub trait ArchiveSink {
    /// Move the item at `location` into the archive area and return its new
    /// location. Name collisions at the destination are the sink's problem.
    ///
    /// # Errors
    /// [`ArchiveError`] if the item could not be moved.
    fn archive(&mut self, location: &SourceLocation) -> Result<SourceLocation, ArchiveError>;
}

/// Loads and saves the canvas document
#[cfg_attr(test, mockall::automock)]
pub trait CanvasStore {
    /// Current document
    ///
    /// # Errors
    /// [`StoreError`] if it cannot be read or parsed.
    fn load(&self) -> Result<CanvasDocument, StoreError>;

    /// Replace the stored document as a whole
    ///
    /// # Errors
    /// [`StoreError`] if it cannot be written.
    fn save(&mut self, document: &CanvasDocument) -> Result<(), StoreError>;
}

/// Receives every warning and notice of a pass
#[cfg_attr(test, mockall::automock)]
pub trait ReportSink {
    /// Handle one report
    fn emit(&mut self, report: &Report);
}

impl ReportSink for Vec<Report> {
    fn emit(&mut self, report: &Report) {
        self.push(report.clone());
    }
}
