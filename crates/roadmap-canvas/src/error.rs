//! Pass errors

use crate::collaborators::{ArchiveError, SourceError, StoreError};
use roadmap_layout::LayoutError;
use thiserror::Error;

/// Why a pass failed
///
/// A pass that returns any of these has not replaced the canvas.
#[derive(Error, Debug)]
pub enum PassError {
    /// Records could not be read
    #[error("failed to read records: {0}")]
    Source(#[from] SourceError),

    /// An archive move failed
    #[error("archival failed: {0}")]
    Archive(#[from] ArchiveError),

    /// Canvas could not be loaded or saved
    #[error("canvas store failed: {0}")]
    Store(#[from] StoreError),

    /// Layout could not be computed
    #[error("layout failed: {0}")]
    Layout(#[from] LayoutError),
}

/// Result type for pass operations
pub type Result<T> = std::result::Result<T, PassError>;
