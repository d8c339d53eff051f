//! Property tests for graph resolution

use proptest::prelude::*;
use roadmap_graph::{RelationKind, ResolvedGraphs};
use roadmap_test_utils::{arb_records, chain, diamond, three_cycle};

proptest! {
    #[test]
    fn prop_resolved_graphs_are_acyclic(records in arb_records(40)) {
        let resolved = ResolvedGraphs::resolve(&records);
        prop_assert!(resolved.containment.is_acyclic());
        prop_assert!(resolved.dependency.is_acyclic());
        prop_assert!(resolved.combined.is_acyclic());
    }

    #[test]
    fn prop_one_report_per_broken_cycle(records in arb_records(30)) {
        let resolved = ResolvedGraphs::resolve(&records);
        let reported = resolved
            .reports
            .iter()
            .filter(|r| matches!(
                r.kind,
                roadmap_entity::ReportKind::CycleBroken | roadmap_entity::ReportKind::OrderingConflict
            ))
            .count();
        prop_assert_eq!(reported, resolved.cycles_broken());
    }

    #[test]
    fn prop_resolution_is_deterministic(records in arb_records(30)) {
        let a = ResolvedGraphs::resolve(&records);
        let mut shuffled = records.clone();
        shuffled.reverse();
        let b = ResolvedGraphs::resolve(&shuffled);
        prop_assert_eq!(a.rendered_edges(), b.rendered_edges());
        prop_assert_eq!(a.orphans, b.orphans);
    }

    #[test]
    fn prop_rendered_edges_respect_combined_order(records in arb_records(30)) {
        let resolved = ResolvedGraphs::resolve(&records);
        for edge in resolved.rendered_edges() {
            prop_assert!(resolved.combined.contains_edge(edge.from, edge.to));
        }
    }

    #[test]
    fn prop_orphans_have_no_containment_edge(records in arb_records(30)) {
        let resolved = ResolvedGraphs::resolve(&records);
        for &ix in &resolved.orphans {
            prop_assert!(resolved.containment.successors(ix).is_empty());
        }
    }
}

#[test]
fn twenty_chain_renders_nineteen_edges() {
    let resolved = ResolvedGraphs::resolve(&chain(20));
    assert_eq!(resolved.rendered_edges().len(), 19);
    assert!(resolved.reports.is_empty());
}

#[test]
fn diamond_renders_four_dependency_edges() {
    let resolved = ResolvedGraphs::resolve(&diamond());
    let deps = resolved
        .rendered_edges()
        .into_iter()
        .filter(|e| e.kind == RelationKind::Dependency)
        .count();
    assert_eq!(deps, 4);
}

#[test]
fn three_cycle_keeps_every_node() {
    let resolved = ResolvedGraphs::resolve(&three_cycle());
    assert_eq!(resolved.index.len(), 3);
    assert_eq!(resolved.rendered_edges().len(), 2);
    assert_eq!(resolved.dependency_cycles.len(), 1);
}
