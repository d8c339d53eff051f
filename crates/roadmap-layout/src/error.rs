//! Layout errors

use roadmap_entity::EntityId;
use roadmap_graph::GraphError;
use thiserror::Error;

/// Layout errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// Configuration values that cannot produce an overlap-free layout
    #[error("invalid layout config: {0}")]
    InvalidConfig(String),

    /// The graphs reference an entity the record set does not contain
    #[error("no record for entity {0}")]
    UnknownEntity(EntityId),

    /// Ordering graph still cyclic
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Result type for layout operations
pub type Result<T> = std::result::Result<T, LayoutError>;
