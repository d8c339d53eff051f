//! Directed relation graph over entity indices

use crate::error::GraphError;
use crate::index::{EntityIndex, NodeIx};
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;
use std::collections::BTreeSet;
use std::fmt;

/// Which relationship a graph carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    /// child → parent, from `parent`
    Containment,
    /// dependency → dependent, from `depends_on`
    Dependency,
    /// Containment and dependency merged for column assignment
    Combined,
}

impl RelationKind {
    /// Human phrasing of the relationship an edge `from → to` encodes
    #[must_use]
    pub fn describe_edge(self, index: &EntityIndex, from: NodeIx, to: NodeIx) -> String {
        let (from, to) = (index.id(from), index.id(to));
        match self {
            RelationKind::Containment => format!("{from} parent {to}"),
            RelationKind::Dependency => format!("{to} depends on {from}"),
            RelationKind::Combined => format!("{from} before {to}"),
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RelationKind::Containment => "containment",
            RelationKind::Dependency => "dependency",
            RelationKind::Combined => "combined",
        })
    }
}

/// Directed graph over `0..node_count` entity indices
///
/// Thin wrapper over a petgraph [`DiGraphMap`] that exposes neighbours and
/// edges in ascending index order regardless of insertion history.
#[derive(Debug, Clone)]
pub struct RelationGraph {
    kind: RelationKind,
    inner: DiGraphMap<NodeIx, ()>,
}

impl RelationGraph {
    /// Create a graph with `node_count` isolated nodes
    #[must_use]
    pub fn new(kind: RelationKind, node_count: usize) -> Self {
        let mut inner = DiGraphMap::with_capacity(node_count, node_count);
        for ix in 0..node_count {
            inner.add_node(ix);
        }
        Self { kind, inner }
    }

    /// Relationship carried
    #[inline]
    #[must_use]
    pub fn kind(&self) -> RelationKind {
        self.kind
    }

    /// Add an edge; returns `false` if it was already present
    ///
    /// # Errors
    /// Rejects self loops and indices outside the graph.
    pub fn add_edge(&mut self, from: NodeIx, to: NodeIx) -> Result<bool, GraphError> {
        for ix in [from, to] {
            if !self.inner.contains_node(ix) {
                return Err(GraphError::NodeNotFound(ix));
            }
        }
        if from == to {
            return Err(GraphError::SelfLoop(from));
        }
        Ok(self.inner.add_edge(from, to, ()).is_none())
    }

    /// Remove an edge; returns whether it existed
    pub fn remove_edge(&mut self, from: NodeIx, to: NodeIx) -> bool {
        self.inner.remove_edge(from, to).is_some()
    }

    /// Whether `from → to` exists
    #[inline]
    #[must_use]
    pub fn contains_edge(&self, from: NodeIx, to: NodeIx) -> bool {
        self.inner.contains_edge(from, to)
    }

    /// Number of nodes
    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Number of edges
    #[inline]
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Outgoing neighbours, ascending
    #[must_use]
    pub fn successors(&self, ix: NodeIx) -> Vec<NodeIx> {
        self.sorted_neighbors(ix, Direction::Outgoing)
    }

    /// Incoming neighbours, ascending
    #[must_use]
    pub fn predecessors(&self, ix: NodeIx) -> Vec<NodeIx> {
        self.sorted_neighbors(ix, Direction::Incoming)
    }

    fn sorted_neighbors(&self, ix: NodeIx, dir: Direction) -> Vec<NodeIx> {
        let mut out: Vec<NodeIx> = self.inner.neighbors_directed(ix, dir).collect();
        out.sort_unstable();
        out
    }

    /// All edges, ascending by `(from, to)`
    #[must_use]
    pub fn edges(&self) -> Vec<(NodeIx, NodeIx)> {
        let mut out: Vec<_> = self.inner.all_edges().map(|(a, b, ())| (a, b)).collect();
        out.sort_unstable();
        out
    }

    /// Whether the graph has no directed cycle
    ///
    /// Goes through [`Self::topological_order`] rather than a recursive
    /// search so that long chains cannot exhaust the stack.
    #[must_use]
    pub fn is_acyclic(&self) -> bool {
        self.topological_order().is_ok()
    }

    /// Check acyclicity
    ///
    /// # Errors
    /// [`GraphError::CycleDetected`] when a cycle remains.
    pub fn verify_acyclic(&self) -> Result<(), GraphError> {
        if self.is_acyclic() {
            Ok(())
        } else {
            Err(GraphError::CycleDetected(self.kind))
        }
    }

    /// Canonical topological order (Kahn, smallest ready index first)
    ///
    /// # Errors
    /// [`GraphError::CycleDetected`] if the graph is not acyclic.
    pub fn topological_order(&self) -> Result<Vec<NodeIx>, GraphError> {
        let n = self.node_count();
        let mut in_degree: Vec<usize> = (0..n)
            .map(|ix| self.inner.neighbors_directed(ix, Direction::Incoming).count())
            .collect();
        let mut ready: BTreeSet<NodeIx> = (0..n).filter(|&ix| in_degree[ix] == 0).collect();
        let mut order = Vec::with_capacity(n);

        while let Some(ix) = ready.pop_first() {
            order.push(ix);
            for succ in self.inner.neighbors_directed(ix, Direction::Outgoing) {
                in_degree[succ] -= 1;
                if in_degree[succ] == 0 {
                    ready.insert(succ);
                }
            }
        }

        if order.len() == n {
            Ok(order)
        } else {
            Err(GraphError::CycleDetected(self.kind))
        }
    }

    /// Merge another graph's edges into a new graph of kind `kind`
    ///
    /// # Panics
    /// Panics if the graphs have different node counts.
    #[must_use]
    pub fn union(&self, other: &RelationGraph, kind: RelationKind) -> RelationGraph {
        assert_eq!(self.node_count(), other.node_count(), "graphs index different entity sets");
        let mut merged = RelationGraph::new(kind, self.node_count());
        for (from, to) in self.edges().into_iter().chain(other.edges()) {
            merged.inner.add_edge(from, to, ());
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_self_loop_and_unknown_nodes() {
        let mut g = RelationGraph::new(RelationKind::Dependency, 2);
        assert_eq!(g.add_edge(0, 0), Err(GraphError::SelfLoop(0)));
        assert_eq!(g.add_edge(0, 5), Err(GraphError::NodeNotFound(5)));
        assert_eq!(g.add_edge(0, 1), Ok(true));
        assert_eq!(g.add_edge(0, 1), Ok(false));
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn neighbours_are_sorted_after_removals() {
        let mut g = RelationGraph::new(RelationKind::Dependency, 5);
        for to in [4, 2, 3, 1] {
            g.add_edge(0, to).unwrap();
        }
        g.remove_edge(0, 2);
        assert_eq!(g.successors(0), vec![1, 3, 4]);
        assert_eq!(g.predecessors(3), vec![0]);
    }

    #[test]
    fn topological_order_is_canonical() {
        let mut g = RelationGraph::new(RelationKind::Dependency, 4);
        g.add_edge(2, 0).unwrap();
        g.add_edge(3, 1).unwrap();
        assert_eq!(g.topological_order().unwrap(), vec![2, 0, 3, 1]);
    }

    #[test]
    fn topological_order_detects_cycles() {
        let mut g = RelationGraph::new(RelationKind::Containment, 2);
        g.add_edge(0, 1).unwrap();
        g.add_edge(1, 0).unwrap();
        assert!(!g.is_acyclic());
        assert_eq!(
            g.topological_order(),
            Err(GraphError::CycleDetected(RelationKind::Containment))
        );
    }

    #[test]
    fn union_merges_edges() {
        let mut a = RelationGraph::new(RelationKind::Containment, 3);
        let mut b = RelationGraph::new(RelationKind::Dependency, 3);
        a.add_edge(0, 1).unwrap();
        b.add_edge(0, 1).unwrap();
        b.add_edge(1, 2).unwrap();
        let merged = a.union(&b, RelationKind::Combined);
        assert_eq!(merged.edges(), vec![(0, 1), (1, 2)]);
        assert_eq!(merged.kind(), RelationKind::Combined);
    }
}
