//! Cycle resolution
//!
//! An iterative depth-first traversal with an explicit frame stack. Nodes are
//! visited in ascending index order and so are each node's successors, which
//! makes the choice of dropped edge reproducible. Every back edge met during
//! the traversal closes exactly one cycle and is removed on the spot; once
//! the traversal finishes only tree, forward and cross edges remain, so the
//! graph is acyclic after a single O(V+E) sweep.

use crate::graph::{RelationGraph, RelationKind};
use crate::index::{EntityIndex, NodeIx};
use roadmap_entity::{Report, ReportKind};

/// One cycle found and the edge removed to break it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokenCycle {
    /// Members in traversal order, starting at the target of the removed edge
    pub members: Vec<NodeIx>,
    /// The back edge `(from, to)` that was dropped
    pub removed: (NodeIx, NodeIx),
}

/// Outcome of [`resolve_cycles`] on one graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleResolution {
    /// Graph the cycles were found in
    pub kind: RelationKind,
    /// Cycles broken, in discovery order
    pub broken: Vec<BrokenCycle>,
}

impl CycleResolution {
    /// Whether the graph was already acyclic
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.broken.is_empty()
    }

    /// Number of cycles broken
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.broken.len()
    }

    /// Edges removed, in discovery order
    #[must_use]
    pub fn removed_edges(&self) -> Vec<(NodeIx, NodeIx)> {
        self.broken.iter().map(|c| c.removed).collect()
    }

    /// One report per broken cycle naming every member and the dropped edge
    #[must_use]
    pub fn reports(&self, index: &EntityIndex) -> Vec<Report> {
        let kind = match self.kind {
            RelationKind::Combined => ReportKind::OrderingConflict,
            RelationKind::Containment | RelationKind::Dependency => ReportKind::CycleBroken,
        };
        self.broken
            .iter()
            .map(|cycle| {
                let names: Vec<&str> = cycle.members.iter().map(|&ix| index.id(ix).as_str()).collect();
                let (from, to) = cycle.removed;
                let message = format!(
                    "{} cycle among {}; dropped '{}'",
                    self.kind,
                    names.join(", "),
                    self.kind.describe_edge(index, from, to)
                );
                Report::new(kind, message).with_entities(index.ids_of(&cycle.members))
            })
            .collect()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    Unseen,
    OnStack,
    Done,
}

struct Frame {
    node: NodeIx,
    succs: Vec<NodeIx>,
    pos: usize,
}

/// Remove one edge per cycle until `graph` is acyclic
///
/// Every node stays in the graph even if all its edges are cut.
pub fn resolve_cycles(graph: &mut RelationGraph) -> CycleResolution {
    let n = graph.node_count();
    let mut visit = vec![Visit::Unseen; n];
    let mut depth = vec![0usize; n];
    let mut path: Vec<NodeIx> = Vec::new();
    let mut frames: Vec<Frame> = Vec::new();
    let mut broken = Vec::new();

    for root in 0..n {
        if visit[root] != Visit::Unseen {
            continue;
        }
        visit[root] = Visit::OnStack;
        path.push(root);
        frames.push(Frame {
            node: root,
            succs: graph.successors(root),
            pos: 0,
        });

        while let Some(frame) = frames.last_mut() {
            let node = frame.node;
            let Some(&next) = frame.succs.get(frame.pos) else {
                frames.pop();
                path.pop();
                visit[node] = Visit::Done;
                continue;
            };
            frame.pos += 1;

            match visit[next] {
                Visit::Unseen => {
                    visit[next] = Visit::OnStack;
                    depth[next] = path.len();
                    path.push(next);
                    frames.push(Frame {
                        node: next,
                        succs: graph.successors(next),
                        pos: 0,
                    });
                }
                Visit::OnStack => {
                    graph.remove_edge(node, next);
                    broken.push(BrokenCycle {
                        members: path[depth[next]..].to_vec(),
                        removed: (node, next),
                    });
                }
                Visit::Done => {}
            }
        }
    }

    if !broken.is_empty() {
        tracing::debug!("broke {} {} cycle(s)", broken.len(), graph.kind());
    }
    // Debug builds only; release relies on the resolution proptests.
    debug_assert!(graph.is_acyclic());

    CycleResolution {
        kind: graph.kind(),
        broken,
    }
}
