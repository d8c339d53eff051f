//! Canvas reconciliation
//!
//! Diffs a canvas document against the records and layout of one pass and
//! produces the replacement document. The input document is consumed and a
//! new one returned; nothing is written anywhere.
//!
//! Node handling:
//!
//! - a file node is bound when it carries an `entityId` or its path is the
//!   location of a parsed record; every other node is carried over byte for
//!   byte, in place
//! - bound nodes whose record failed to parse this pass are kept as they are
//! - bound nodes of an archived record are dropped (archival)
//! - bound nodes of nothing live are dropped (stale)
//! - of several nodes bound to one entity, the smallest node id survives
//! - live entities without a node get one at their layout position
//!
//! Edges between entity nodes, and every edge carrying a `kind`, are
//! regenerated from the resolved graphs. Other edges survive unless one of
//! their ends disappeared.

use crate::document::{
    node_id_for, type_color, CanvasDocument, CanvasEdge, CanvasNode, EdgeKind, NodeKind,
};
use roadmap_entity::{EntityId, EntityRecord, SourceLocation};
use roadmap_graph::ResolvedGraphs;
use roadmap_layout::Layout;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Whether existing entity nodes are moved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlacementMode {
    /// Only new nodes receive layout positions
    KeepExisting,
    /// Every entity node is moved to its layout position
    Relayout,
}

/// Why a node was removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Removal {
    /// Bound to an archived record
    Archived,
    /// Bound to nothing live
    Stale,
    /// Another node already represents the entity
    Duplicate,
}

/// Result of [`reconcile`]
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    /// Replacement document
    pub document: CanvasDocument,
    /// Entities that received a new node, by id
    pub added: Vec<EntityId>,
    /// Removed node ids and why
    pub removed: Vec<(String, Removal)>,
    /// Entities whose existing node was moved or resized
    pub repositioned: Vec<EntityId>,
    /// Bound nodes left in place because their record failed to parse,
    /// with that record's location
    pub kept: Vec<(String, SourceLocation)>,
    /// Engine edges written
    pub edges: usize,
}

impl Reconciliation {
    /// Number of removed nodes for one reason
    #[must_use]
    pub fn removed_for(&self, reason: Removal) -> usize {
        self.removed.iter().filter(|(_, r)| *r == reason).count()
    }
}

enum Binding<'a> {
    Live(&'a EntityRecord),
    Archived,
    Unparsed(&'a SourceLocation),
    Stale,
    Unbound,
}

/// Reconcile `document` with the records, graphs and layout of a pass
///
/// `records` may include archived records; they are what makes a bound node
/// count as archived instead of stale. `unparsed` holds the locations that
/// failed to parse this pass; nodes pointing at them are kept unchanged.
#[must_use]
pub fn reconcile(
    document: CanvasDocument,
    records: &[EntityRecord],
    unparsed: &[SourceLocation],
    graphs: &ResolvedGraphs,
    layout: &Layout,
    mode: PlacementMode,
) -> Reconciliation {
    let mut live: HashMap<&str, &EntityRecord> = HashMap::new();
    let mut archived: HashSet<&str> = HashSet::new();
    let mut by_file: HashMap<&str, &EntityId> = HashMap::new();
    for record in records {
        by_file.insert(record.location.as_str(), &record.entity_id);
        if record.archived {
            archived.insert(record.entity_id.as_str());
        } else if graphs.index.contains(record.entity_id.as_str()) {
            live.insert(record.entity_id.as_str(), record);
        }
    }

    let unparsed: HashMap<&str, &SourceLocation> =
        unparsed.iter().map(|l| (l.as_str(), l)).collect();

    let bind = |node: &CanvasNode| {
        if node.kind != NodeKind::Entity {
            return Binding::Unbound;
        }
        let file = node.file.as_deref();
        let id = node
            .entity_id
            .as_ref()
            .map(EntityId::as_str)
            .or_else(|| file.and_then(|f| by_file.get(f)).map(|e| e.as_str()));
        match id {
            Some(id) if live.contains_key(id) => Binding::Live(live[id]),
            Some(id) if archived.contains(id) => Binding::Archived,
            Some(_) => match file.and_then(|f| unparsed.get(f)) {
                Some(&location) => Binding::Unparsed(location),
                None => Binding::Stale,
            },
            None => Binding::Unbound,
        }
    };

    // First pass: decide which node represents each live entity
    let mut keeper: BTreeMap<&str, &str> = BTreeMap::new();
    for node in &document.nodes {
        if let Binding::Live(record) = bind(node) {
            let slot = keeper.entry(record.entity_id.as_str()).or_insert(node.id.as_str());
            if node.id.as_str() < *slot {
                *slot = node.id.as_str();
            }
        }
    }
    let keeper: HashMap<String, String> = keeper
        .into_iter()
        .map(|(entity, node)| (entity.to_string(), node.to_string()))
        .collect();

    let mut nodes = Vec::with_capacity(document.nodes.len());
    let mut removed = Vec::new();
    let mut repositioned = Vec::new();
    let mut kept = Vec::new();
    let mut entity_nodes: HashSet<String> = HashSet::new();
    let mut node_of: HashMap<EntityId, String> = HashMap::new();

    for node in &document.nodes {
        match bind(node) {
            Binding::Unbound => nodes.push(node.clone()),
            Binding::Unparsed(location) => {
                kept.push((node.id.clone(), location.clone()));
                nodes.push(node.clone());
            }
            Binding::Archived => removed.push((node.id.clone(), Removal::Archived)),
            Binding::Stale => removed.push((node.id.clone(), Removal::Stale)),
            Binding::Live(record) if keeper.get(record.entity_id.as_str()) != Some(&node.id) => {
                removed.push((node.id.clone(), Removal::Duplicate));
            }
            Binding::Live(record) => {
                let mut node = node.clone();
                node.entity_id = Some(record.entity_id.clone());
                if node.file.is_none() {
                    node.file = Some(record.location.to_string());
                }
                if mode == PlacementMode::Relayout {
                    if let Some(p) = layout.get(record.entity_id.as_str()) {
                        let target = (p.rect.x, p.rect.y, p.rect.width, p.rect.height);
                        if node.geometry() != Some(target) {
                            node = node.at(target.0, target.1, target.2, target.3);
                            repositioned.push(record.entity_id.clone());
                        }
                    }
                }
                entity_nodes.insert(node.id.clone());
                node_of.insert(record.entity_id.clone(), node.id.clone());
                nodes.push(node);
            }
        }
    }

    // New nodes, in id order
    let mut taken: HashSet<String> = document.nodes.iter().map(|n| n.id.clone()).collect();
    let mut added = Vec::new();
    for placement in layout.iter() {
        let entity_id = &placement.entity_id;
        if node_of.contains_key(entity_id) {
            continue;
        }
        let Some(record) = live.get(entity_id.as_str()) else {
            continue;
        };
        let id = node_id_for(entity_id, &taken);
        taken.insert(id.clone());
        let r = placement.rect;
        let node = CanvasNode::entity(id.clone(), entity_id.clone(), record.location.as_str())
            .at(r.x, r.y, r.width, r.height)
            .with_color(type_color(record.entity_type));
        entity_nodes.insert(id.clone());
        node_of.insert(entity_id.clone(), id);
        added.push(entity_id.clone());
        nodes.push(node);
    }

    // Edges: user edges first, engine edges after
    let dropped: HashSet<&str> = removed.iter().map(|(id, _)| id.as_str()).collect();
    let present: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    let mut edges: Vec<CanvasEdge> = document
        .edges
        .iter()
        .filter(|e| e.kind.is_none())
        .filter(|e| {
            let engine_owned = |id: &str| entity_nodes.contains(id) || dropped.contains(id);
            !(engine_owned(e.from_node.as_str()) && engine_owned(e.to_node.as_str()))
        })
        .filter(|e| present.contains(e.from_node.as_str()) && present.contains(e.to_node.as_str()))
        .cloned()
        .collect();

    let mut generated = 0;
    for edge in graphs.rendered_edges() {
        let Some(kind) = EdgeKind::from_relation(edge.kind) else {
            continue;
        };
        let from = node_of.get(graphs.index.id(edge.from));
        let to = node_of.get(graphs.index.id(edge.to));
        if let (Some(from), Some(to)) = (from, to) {
            edges.push(CanvasEdge::relation(kind, from, to));
            generated += 1;
        }
    }

    tracing::debug!(
        "reconciled canvas: {} added, {} removed, {} repositioned, {} kept, {} engine edges",
        added.len(),
        removed.len(),
        repositioned.len(),
        kept.len(),
        generated
    );

    Reconciliation {
        document: CanvasDocument {
            nodes,
            edges,
            extra: document.extra,
        },
        added,
        removed,
        repositioned,
        kept,
        edges: generated,
    }
}
