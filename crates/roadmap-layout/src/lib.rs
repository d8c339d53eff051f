//! Roadmap Layout Engine
//!
//! Places every live entity of a resolved roadmap on a 2-D canvas: one
//! horizontal lane per workstream, columns by longest path so that children
//! and dependencies always sit to the left, and a separate grid below the
//! lanes for orphans.
//!
//! # Example
//!
//! ```
//! use roadmap_entity::{EntityRecord, EntityType};
//! use roadmap_graph::ResolvedGraphs;
//! use roadmap_layout::{LayoutConfig, LayoutEngine};
//!
//! let records = vec![
//!     EntityRecord::new("S-001", EntityType::Story, "S-001.md"),
//!     EntityRecord::new("S-002", EntityType::Story, "S-002.md").depends_on("S-001"),
//! ];
//! let graphs = ResolvedGraphs::resolve(&records);
//! let layout = LayoutEngine::new(LayoutConfig::default()).layout(&records, &graphs)?;
//! assert!(layout.column("S-001") < layout.column("S-002"));
//! # Ok::<(), roadmap_layout::LayoutError>(())
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod columns;
pub mod config;
pub mod engine;
pub mod error;
pub mod lanes;
pub mod orphans;
pub mod types;
pub mod workstream;

pub use columns::assign_columns;
pub use config::{LayoutConfig, NodeSize, NodeSizes};
pub use engine::LayoutEngine;
pub use error::{LayoutError, Result};
pub use types::{LaneBand, Layout, Placement, Rect, Region};
pub use workstream::effective_workstreams;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
