//! Relationship graph builder
//!
//! `parent` is the only source of containment edges and `depends_on` the only
//! source of dependency edges. The inverse fields (`children`, `blocks`) are
//! never read here; see [`crate::consistency`] for how their divergence is
//! surfaced.

use crate::graph::{RelationGraph, RelationKind};
use crate::index::{EntityIndex, NodeIx};
use roadmap_entity::{EntityRecord, Report, ReportKind};
use std::collections::{BTreeSet, HashSet};

/// Raw graphs for one pass, before cycle resolution
#[derive(Debug, Clone)]
pub struct RelationshipGraphs {
    /// Live entities
    pub index: EntityIndex,
    /// child → parent
    pub containment: RelationGraph,
    /// dependency → dependent
    pub dependency: RelationGraph,
    /// Entities whose declared parent did not resolve to a live record
    pub orphans: BTreeSet<NodeIx>,
    /// Reference problems found while building
    pub reports: Vec<Report>,
}

/// Builds [`RelationshipGraphs`] from a record set
#[derive(Debug, Default, Clone, Copy)]
pub struct GraphBuilder;

enum Target {
    Live(NodeIx),
    Archived,
    Missing,
}

impl GraphBuilder {
    /// Create a builder
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Build both graphs from every record of the pass
    ///
    /// Archived records are passed in too, so that references to them can be
    /// told apart from references to ids that do not exist at all; they never
    /// become graph nodes.
    #[must_use]
    pub fn build(&self, records: &[EntityRecord]) -> RelationshipGraphs {
        let index = EntityIndex::live(records);
        let archived: HashSet<&str> = records
            .iter()
            .filter(|r| r.archived)
            .map(|r| r.entity_id.as_str())
            .collect();
        let resolve = |id: &str| match index.get(id) {
            Some(ix) => Target::Live(ix),
            None if archived.contains(id) => Target::Archived,
            None => Target::Missing,
        };

        let mut containment = RelationGraph::new(RelationKind::Containment, index.len());
        let mut dependency = RelationGraph::new(RelationKind::Dependency, index.len());
        let mut orphans = BTreeSet::new();
        let mut reports = Vec::new();

        let mut live: Vec<&EntityRecord> = records.iter().filter(|r| !r.archived).collect();
        live.sort_by(|a, b| a.entity_id.cmp(&b.entity_id));
        live.dedup_by(|a, b| a.entity_id == b.entity_id);

        for record in live {
            let id = &record.entity_id;
            let Some(child) = index.get(id.as_str()) else {
                continue;
            };

            if let Some(parent) = &record.parent {
                let report = match resolve(parent.as_str()) {
                    Target::Live(ix) if ix == child => Some(Report::new(
                        ReportKind::SelfReference,
                        format!("{id} names itself as parent"),
                    )),
                    Target::Live(ix) => {
                        link(&mut containment, child, ix);
                        None
                    }
                    Target::Archived => Some(Report::new(
                        ReportKind::ParentArchived,
                        format!("orphan: parent {parent} of {id} is archived"),
                    )),
                    Target::Missing => Some(Report::new(
                        ReportKind::MissingParent,
                        format!("orphan: missing parent {parent} for {id}"),
                    )),
                };
                if let Some(report) = report {
                    orphans.insert(child);
                    reports.push(
                        report
                            .with_entities([id.clone(), parent.clone()])
                            .at(record.location.clone()),
                    );
                }
            }

            for dep in &record.depends_on {
                let report = match resolve(dep.as_str()) {
                    Target::Live(ix) if ix == child => Report::new(
                        ReportKind::SelfReference,
                        format!("{id} depends on itself"),
                    ),
                    Target::Live(ix) => {
                        link(&mut dependency, ix, child);
                        continue;
                    }
                    Target::Archived => Report::new(
                        ReportKind::DependsOnArchived,
                        format!("{id} depends on archived entity {dep}"),
                    ),
                    Target::Missing => Report::new(
                        ReportKind::MissingDependency,
                        format!("missing dependency {dep} for {id}"),
                    ),
                };
                reports.push(
                    report
                        .with_entities([id.clone(), dep.clone()])
                        .at(record.location.clone()),
                );
            }
        }

        tracing::debug!(
            "built graphs over {} entities: {} containment edges, {} dependency edges, {} orphans",
            index.len(),
            containment.edge_count(),
            dependency.edge_count(),
            orphans.len()
        );

        RelationshipGraphs {
            index,
            containment,
            dependency,
            orphans,
            reports,
        }
    }
}

/// Add an edge between two indexed nodes
///
/// Both ends come from the index the graph was sized for and self-references
/// are reported before this point, so an error here means the graph and the
/// index disagree. It is logged and the edge skipped.
fn link(graph: &mut RelationGraph, from: NodeIx, to: NodeIx) {
    if let Err(err) = graph.add_edge(from, to) {
        tracing::error!("skipped {} edge {from} -> {to}: {err}", graph.kind());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roadmap_entity::EntityType;

    #[test]
    fn link_skips_edges_the_graph_rejects() {
        let mut graph = RelationGraph::new(RelationKind::Dependency, 2);
        link(&mut graph, 0, 1);
        link(&mut graph, 0, 7);
        link(&mut graph, 1, 1);
        assert_eq!(graph.edges(), vec![(0, 1)]);
    }

    fn story(id: &str) -> EntityRecord {
        EntityRecord::new(id, EntityType::Story, format!("{id}.md").as_str())
    }

    #[test]
    fn parent_yields_child_to_parent_edge() {
        let records = vec![
            EntityRecord::new("M-001", EntityType::Milestone, "m.md"),
            story("S-001").with_parent("M-001"),
        ];
        let graphs = GraphBuilder::new().build(&records);
        let m = graphs.index.get("M-001").unwrap();
        let s = graphs.index.get("S-001").unwrap();
        assert!(graphs.containment.contains_edge(s, m));
        assert!(graphs.orphans.is_empty());
        assert!(graphs.reports.is_empty());
    }

    #[test]
    fn children_field_never_creates_edges() {
        let records = vec![
            EntityRecord::new("M-001", EntityType::Milestone, "m.md").with_child("S-001"),
            story("S-001"),
        ];
        let graphs = GraphBuilder::new().build(&records);
        assert_eq!(graphs.containment.edge_count(), 0);
    }

    #[test]
    fn missing_parent_makes_orphan() {
        let graphs = GraphBuilder::new().build(&[story("S-001").with_parent("M-404")]);
        assert_eq!(graphs.orphans.len(), 1);
        assert_eq!(graphs.reports[0].kind, ReportKind::MissingParent);
        assert_eq!(graphs.reports[0].message, "orphan: missing parent M-404 for S-001");
    }

    #[test]
    fn archived_parent_makes_orphan() {
        let records = vec![
            EntityRecord::new("M-001", EntityType::Milestone, "m.md").archived(),
            story("S-001").with_parent("M-001"),
        ];
        let graphs = GraphBuilder::new().build(&records);
        assert_eq!(graphs.index.len(), 1);
        assert_eq!(graphs.orphans.len(), 1);
        assert_eq!(graphs.reports[0].kind, ReportKind::ParentArchived);
    }

    #[test]
    fn depends_on_yields_dependency_to_dependent_edge() {
        let records = vec![story("S-001"), story("S-002").depends_on("S-001")];
        let graphs = GraphBuilder::new().build(&records);
        assert_eq!(graphs.dependency.edges(), vec![(0, 1)]);
    }

    #[test]
    fn blocks_field_never_creates_edges() {
        let records = vec![story("S-001").blocks("S-002"), story("S-002")];
        let graphs = GraphBuilder::new().build(&records);
        assert_eq!(graphs.dependency.edge_count(), 0);
    }

    #[test]
    fn unresolved_dependencies_are_reported() {
        let records = vec![
            story("S-001").archived(),
            story("S-002").depends_on("S-001").depends_on("S-404").depends_on("S-002"),
        ];
        let graphs = GraphBuilder::new().build(&records);
        let kinds: Vec<_> = graphs.reports.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ReportKind::DependsOnArchived,
                ReportKind::MissingDependency,
                ReportKind::SelfReference
            ]
        );
        assert_eq!(graphs.dependency.edge_count(), 0);
        assert_eq!(graphs.reports[0].message, "S-002 depends on archived entity S-001");
    }
}
