//! Roadmap Canvas command line
//!
//! Filesystem-backed collaborators for the canvas engine: a vault directory
//! of Markdown records, an archive folder inside it and a JSON canvas file.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod commands;
pub mod store;
pub mod vault;

pub use commands::{check, load_config, run_pass, CheckSummary, Invocation, DEFAULT_CANVAS};
pub use store::JsonCanvasStore;
pub use vault::{FsArchiveSink, FsRecordSource};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
