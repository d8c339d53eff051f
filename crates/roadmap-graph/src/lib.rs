//! Roadmap Relationship Graphs
//!
//! Reconciles the containment (`parent`) and dependency (`depends_on`) fields
//! of many independently written records into two directed graphs, then
//! makes both acyclic and strips transitive dependency edges.
//!
//! # Architecture
//!
//! ```text
//! EntityRecord[] → GraphBuilder → RelationshipGraphs
//!                                   ├─ containment ─ resolve_cycles ──────────────────────┐
//!                                   └─ dependency ── resolve_cycles ─ transitive_reduction ┴→ ResolvedGraphs
//! ```
//!
//! All traversal is over [`NodeIx`] indices assigned in ascending entity-id
//! order, so every result is reproducible across runs.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod builder;
pub mod consistency;
pub mod cycles;
pub mod error;
pub mod graph;
pub mod index;
pub mod reduce;
pub mod resolve;

pub use builder::{GraphBuilder, RelationshipGraphs};
pub use consistency::check_consistency;
pub use cycles::{resolve_cycles, BrokenCycle, CycleResolution};
pub use error::GraphError;
pub use graph::{RelationGraph, RelationKind};
pub use index::{EntityIndex, NodeIx};
pub use reduce::{transitive_reduction, TransitiveReduction};
pub use resolve::{RenderedEdge, ResolvedGraphs};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
