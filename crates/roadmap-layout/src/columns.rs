//! Longest-path column assignment

use crate::error::Result;
use roadmap_graph::RelationGraph;

/// Column of every node of an acyclic ordering graph
///
/// A node with no incoming edge sits in column 0; every other node sits one
/// column right of its rightmost predecessor. Runs in O(V+E) over the
/// canonical topological order.
///
/// # Errors
/// Fails if `combined` still contains a cycle.
pub fn assign_columns(combined: &RelationGraph) -> Result<Vec<usize>> {
    let order = combined.topological_order()?;
    let mut columns = vec![0usize; combined.node_count()];
    for ix in order {
        for succ in combined.successors(ix) {
            columns[succ] = columns[succ].max(columns[ix] + 1);
        }
    }
    Ok(columns)
}
