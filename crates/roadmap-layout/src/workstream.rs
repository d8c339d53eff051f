//! Effective workstream resolution
//!
//! An entity's lane is its own `workstream` when set, otherwise the nearest
//! ancestor's along resolved containment edges, otherwise the unassigned
//! label. The walk is bounded by the entity count so a malformed graph can
//! only cost time, never loop.

use roadmap_graph::{NodeIx, RelationGraph};

/// Effective workstream per entity index
///
/// `own[ix]` is the entity's own value; blank strings count as absent.
#[must_use]
pub fn effective_workstreams(
    own: &[Option<&str>],
    containment: &RelationGraph,
    unassigned: &str,
) -> Vec<String> {
    let n = own.len();
    let mut resolved: Vec<Option<String>> = vec![None; n];

    for start in 0..n {
        if resolved[start].is_some() {
            continue;
        }

        let mut trail: Vec<NodeIx> = Vec::new();
        let mut cursor = Some(start);
        let mut found: Option<String> = None;

        while let Some(ix) = cursor {
            if trail.len() > n {
                break;
            }
            if let Some(known) = &resolved[ix] {
                found = Some(known.clone());
                break;
            }
            trail.push(ix);
            if let Some(ws) = own[ix].map(str::trim).filter(|w| !w.is_empty()) {
                found = Some(ws.to_string());
                break;
            }
            // containment has at most one outgoing edge per node
            cursor = containment.successors(ix).first().copied();
        }

        // Everyone on the trail below the match inherits it; a trail that
        // ran out is unassigned all the way down
        let label = found.unwrap_or_else(|| unassigned.to_string());
        for ix in trail {
            resolved[ix] = Some(label.clone());
        }
    }

    resolved
        .into_iter()
        .map(|ws| ws.unwrap_or_else(|| unassigned.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use roadmap_graph::RelationKind;

    fn containment(n: usize, edges: &[(NodeIx, NodeIx)]) -> RelationGraph {
        let mut g = RelationGraph::new(RelationKind::Containment, n);
        for &(child, parent) in edges {
            g.add_edge(child, parent).unwrap();
        }
        g
    }

    #[test]
    fn own_value_wins() {
        let g = containment(2, &[(1, 0)]);
        let ws = effective_workstreams(&[Some("core"), Some("ui")], &g, "unassigned");
        assert_eq!(ws, vec!["core", "ui"]);
    }

    #[test]
    fn inherits_from_nearest_ancestor() {
        // 2 → 1 → 0, only the root and the middle carry a value
        let g = containment(3, &[(2, 1), (1, 0)]);
        let ws = effective_workstreams(&[Some("root"), Some("mid"), None], &g, "unassigned");
        assert_eq!(ws[2], "mid");

        let ws = effective_workstreams(&[Some("root"), Some("  "), None], &g, "unassigned");
        assert_eq!(ws, vec!["root", "root", "root"]);
    }

    #[test]
    fn falls_back_to_unassigned() {
        let g = containment(2, &[(1, 0)]);
        let ws = effective_workstreams(&[None, None], &g, "none");
        assert_eq!(ws, vec!["none", "none"]);
    }

    #[test]
    fn every_entity_gets_exactly_one_label() {
        let g = containment(5, &[(1, 0), (2, 1), (4, 3)]);
        let ws = effective_workstreams(&[None, Some("a"), None, Some("b"), None], &g, "u");
        assert_eq!(ws, vec!["u", "a", "a", "b", "b"]);
    }
}
