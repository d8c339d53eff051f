//! Transitive reduction of the dependency graph
//!
//! An edge `A → B` is implied when `B` can also be reached from `A` through
//! some other successor of `A`, i.e. by a path of length two or more. Implied
//! edges are kept out of the rendered set; the graph itself is not modified,
//! so ordering still sees every declared relationship.

use crate::graph::RelationGraph;
use crate::index::NodeIx;

/// Rendered and suppressed edges of an acyclic graph
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitiveReduction {
    /// Direct, non-redundant edges, ascending by `(from, to)`
    pub rendered: Vec<(NodeIx, NodeIx)>,
    /// Edges implied by a longer path, ascending by `(from, to)`
    pub implied: Vec<(NodeIx, NodeIx)>,
}

impl TransitiveReduction {
    /// Whether `from → to` survives reduction
    #[must_use]
    pub fn is_rendered(&self, from: NodeIx, to: NodeIx) -> bool {
        self.rendered.binary_search(&(from, to)).is_ok()
    }
}

/// Split the edges of an acyclic `graph` into rendered and implied
///
/// On a graph that still has cycles the result is well-defined but of no
/// particular meaning; run [`crate::resolve_cycles`] first.
#[must_use]
pub fn transitive_reduction(graph: &RelationGraph) -> TransitiveReduction {
    let n = graph.node_count();
    let mut reduction = TransitiveReduction::default();
    let mut seen = vec![usize::MAX; n];
    let mut stack = Vec::new();

    for from in 0..n {
        let succs = graph.successors(from);
        if succs.is_empty() {
            continue;
        }

        // Everything reachable from `from` in two or more steps
        stack.clear();
        for &s in &succs {
            stack.extend(graph.successors(s));
        }
        while let Some(ix) = stack.pop() {
            if seen[ix] == from {
                continue;
            }
            seen[ix] = from;
            stack.extend(graph.successors(ix));
        }

        for to in succs {
            if seen[to] == from {
                reduction.implied.push((from, to));
            } else {
                reduction.rendered.push((from, to));
            }
        }
    }

    tracing::debug!(
        "transitive reduction kept {} of {} {} edges",
        reduction.rendered.len(),
        graph.edge_count(),
        graph.kind()
    );
    reduction
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::RelationKind;

    fn graph(n: usize, edges: &[(NodeIx, NodeIx)]) -> RelationGraph {
        let mut g = RelationGraph::new(RelationKind::Dependency, n);
        for &(a, b) in edges {
            g.add_edge(a, b).unwrap();
        }
        g
    }

    #[test]
    fn shortcut_edge_is_implied() {
        // S-002 depends on S-001, S-003 depends on S-001 and S-002
        let g = graph(3, &[(0, 1), (0, 2), (1, 2)]);
        let r = transitive_reduction(&g);
        assert_eq!(r.rendered, vec![(0, 1), (1, 2)]);
        assert_eq!(r.implied, vec![(0, 2)]);
        assert!(!r.is_rendered(0, 2));
        assert_eq!(g.edge_count(), 3);
    }

    #[test]
    fn diamond_keeps_all_four_edges() {
        let g = graph(4, &[(0, 1), (0, 2), (1, 3), (2, 3)]);
        let r = transitive_reduction(&g);
        assert_eq!(r.rendered.len(), 4);
        assert!(r.implied.is_empty());
    }

    #[test]
    fn long_shortcut_over_chain_is_implied() {
        let g = graph(5, &[(0, 1), (1, 2), (2, 3), (3, 4), (0, 4), (1, 3)]);
        let r = transitive_reduction(&g);
        assert_eq!(r.implied, vec![(0, 4), (1, 3)]);
        assert_eq!(r.rendered.len(), 4);
    }

    #[test]
    fn chain_is_already_reduced() {
        let edges: Vec<_> = (0..19).map(|i| (i, i + 1)).collect();
        let g = graph(20, &edges);
        assert_eq!(transitive_reduction(&g).rendered.len(), 19);
    }
}
