//! Error types for graph operations

use crate::graph::RelationKind;
use crate::index::NodeIx;

/// Graph invariant violations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// Node index outside the entity index
    #[error("node {0} is not in the graph")]
    NodeNotFound(NodeIx),

    /// Edge from a node to itself
    #[error("self loop on node {0}")]
    SelfLoop(NodeIx),

    /// A graph that must be acyclic still has a cycle
    #[error("{0} graph still contains a cycle")]
    CycleDetected(RelationKind),
}
