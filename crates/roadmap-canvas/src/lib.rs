//! Roadmap Canvas Engine
//!
//! Keeps a canvas document in sync with a directory of roadmap records.
//! Each pass takes a snapshot of the records, resolves their relationships,
//! computes a layout and reconciles the result into a replacement canvas:
//!
//! - **Populate**: add nodes for new entities, archive flagged records and
//!   drop nodes for entities that no longer exist; existing nodes stay put
//! - **Reposition**: the same, then move every entity node to its computed
//!   position
//!
//! Nodes the engine does not own (text, groups, links, file nodes that are
//! not records) are carried over untouched, as are user-drawn edges between
//! surviving nodes.
//!
//! # Example
//!
//! ```
//! use roadmap_canvas::{CanvasDocument, CanvasEngine, MemoryArchiveSink, MemoryRecordSource};
//!
//! let source = MemoryRecordSource::new()
//!     .with("M-001.md", "---\nid: M-001\ntype: milestone\n---\n")
//!     .with("S-001.md", "---\nid: S-001\ntype: story\nparent: M-001\n---\n");
//!
//! let outcome = CanvasEngine::default().populate(
//!     &source,
//!     CanvasDocument::new(),
//!     &mut MemoryArchiveSink::default(),
//! )?;
//! assert_eq!(outcome.summary.added, 2);
//! assert_eq!(outcome.document.edges.len(), 1);
//! # Ok::<(), roadmap_canvas::PassError>(())
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod collaborators;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod memory;
pub mod reconcile;

pub use collaborators::{
    ArchiveError, ArchiveSink, CanvasStore, RecordSource, ReportSink, SourceError, StoreError,
};
pub use config::EngineConfig;
pub use document::{
    edge_id, node_id_for, type_color, CanvasDocument, CanvasEdge, CanvasNode, Coordinate, EdgeKind,
    NodeKind, Side,
};
pub use engine::{Analysis, CanvasEngine, PassMode, PassOutcome, PassSummary};
pub use error::{PassError, Result};
pub use memory::{MemoryArchiveSink, MemoryCanvasStore, MemoryRecordSource};
pub use reconcile::{reconcile, PlacementMode, Reconciliation, Removal};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
