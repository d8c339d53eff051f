//! Full graph resolution for one pass
//!
//! Build, check, break cycles, reconcile the two orderings, reduce. The
//! result is what layout and reconciliation consume.

use crate::builder::GraphBuilder;
use crate::consistency::check_consistency;
use crate::cycles::{resolve_cycles, CycleResolution};
use crate::graph::{RelationGraph, RelationKind};
use crate::index::{EntityIndex, NodeIx};
use crate::reduce::{transitive_reduction, TransitiveReduction};
use roadmap_entity::{EntityRecord, Report};
use std::collections::BTreeSet;

/// An edge that should be drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderedEdge {
    /// Containment or dependency
    pub kind: RelationKind,
    /// Left end: child or dependency
    pub from: NodeIx,
    /// Right end: parent or dependent
    pub to: NodeIx,
}

/// Acyclic, reduced relationship graphs plus everything reported on the way
#[derive(Debug, Clone)]
pub struct ResolvedGraphs {
    /// Live entities
    pub index: EntityIndex,
    /// child → parent, acyclic
    pub containment: RelationGraph,
    /// dependency → dependent, acyclic, including implied edges
    pub dependency: RelationGraph,
    /// Containment ∪ dependency, acyclic; drives column assignment
    pub combined: RelationGraph,
    /// Rendered/implied split of `dependency`
    pub reduction: TransitiveReduction,
    /// Entities whose declared parent is missing, archived or themselves
    pub orphans: BTreeSet<NodeIx>,
    /// Cycles broken in `containment`
    pub containment_cycles: CycleResolution,
    /// Cycles broken in `dependency`
    pub dependency_cycles: CycleResolution,
    /// Edges dropped because the two orderings contradicted each other
    pub ordering_conflicts: CycleResolution,
    /// Every reference, consistency and cycle report, in that order
    pub reports: Vec<Report>,
}

impl ResolvedGraphs {
    /// Resolve the relationship graphs of a record set
    ///
    /// Archived records may be included; they only serve to classify
    /// references to them.
    #[must_use]
    pub fn resolve(records: &[EntityRecord]) -> Self {
        let built = GraphBuilder::new().build(records);
        let index = built.index;
        let mut containment = built.containment;
        let mut dependency = built.dependency;
        let mut reports = built.reports;

        reports.extend(check_consistency(records));

        let containment_cycles = resolve_cycles(&mut containment);
        let dependency_cycles = resolve_cycles(&mut dependency);

        // A child must sit left of its parent and a dependency left of its
        // dependent. Each order is acyclic alone but together they can
        // disagree; whatever is dropped here is dropped from both graphs.
        let mut combined = containment.union(&dependency, RelationKind::Combined);
        let ordering_conflicts = resolve_cycles(&mut combined);
        for (from, to) in ordering_conflicts.removed_edges() {
            containment.remove_edge(from, to);
            dependency.remove_edge(from, to);
        }

        let reduction = transitive_reduction(&dependency);

        for resolution in [&containment_cycles, &dependency_cycles, &ordering_conflicts] {
            reports.extend(resolution.reports(&index));
        }

        tracing::debug!(
            "resolved {} entities: {} containment, {} rendered dependency ({} implied), {} orphans",
            index.len(),
            containment.edge_count(),
            reduction.rendered.len(),
            reduction.implied.len(),
            built.orphans.len()
        );

        Self {
            index,
            containment,
            dependency,
            combined,
            reduction,
            orphans: built.orphans,
            containment_cycles,
            dependency_cycles,
            ordering_conflicts,
            reports,
        }
    }

    /// Whether an entity is an orphan
    #[inline]
    #[must_use]
    pub fn is_orphan(&self, ix: NodeIx) -> bool {
        self.orphans.contains(&ix)
    }

    /// Total number of edges removed to make the graphs acyclic
    #[must_use]
    pub fn cycles_broken(&self) -> usize {
        self.containment_cycles.len() + self.dependency_cycles.len() + self.ordering_conflicts.len()
    }

    /// Edges to draw: every containment edge, then the reduced dependencies
    #[must_use]
    pub fn rendered_edges(&self) -> Vec<RenderedEdge> {
        let containment = self.containment.edges().into_iter().map(|(from, to)| RenderedEdge {
            kind: RelationKind::Containment,
            from,
            to,
        });
        let dependency = self.reduction.rendered.iter().map(|&(from, to)| RenderedEdge {
            kind: RelationKind::Dependency,
            from,
            to,
        });
        containment.chain(dependency).collect()
    }
}
