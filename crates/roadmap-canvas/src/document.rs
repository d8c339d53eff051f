//! JSON Canvas document model
//!
//! Field names follow the JSON Canvas format. Keys this model does not know
//! are kept in `extra` and written back untouched, so a round trip through
//! the engine never loses anything another tool stored on a node or edge.

use roadmap_entity::{EntityId, EntityType};
use roadmap_graph::RelationKind;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fmt;

/// Node type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A record file (`"file"` on disk)
    #[serde(rename = "file")]
    Entity,
    /// Free text
    Text,
    /// Visual group
    Group,
    /// Web link
    Link,
}

/// Which side of a node an edge attaches to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Top
    Top,
    /// Right
    Right,
    /// Bottom
    Bottom,
    /// Left
    Left,
}

/// Relationship an engine-generated edge stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// child → parent
    Containment,
    /// dependency → dependent
    Dependency,
}

impl EdgeKind {
    /// Edge kind for a graph relation; `None` for the combined ordering
    #[must_use]
    pub fn from_relation(kind: RelationKind) -> Option<Self> {
        match kind {
            RelationKind::Containment => Some(EdgeKind::Containment),
            RelationKind::Dependency => Some(EdgeKind::Dependency),
            RelationKind::Combined => None,
        }
    }

    /// Lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            EdgeKind::Containment => "containment",
            EdgeKind::Dependency => "dependency",
        }
    }
}

/// Position or size value, kept exactly as it was read
///
/// Other tools write fractional coordinates; those are written back
/// unchanged. Only nodes the engine places get integer values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Coordinate(Number);

impl Coordinate {
    /// Integer value, `None` when the value is fractional
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.0.as_i64()
    }
}

impl From<i64> for Coordinate {
    fn from(value: i64) -> Self {
        Self(Number::from(value))
    }
}

impl PartialEq<i64> for Coordinate {
    fn eq(&self, other: &i64) -> bool {
        self.as_i64() == Some(*other)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// One node of the canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasNode {
    /// Unique node id
    pub id: String,
    /// Node type
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Left edge
    pub x: Coordinate,
    /// Top edge
    pub y: Coordinate,
    /// Width
    pub width: Coordinate,
    /// Height
    pub height: Coordinate,
    /// Color preset (`"1"`..`"6"`) or hex
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Vault-relative path, for file nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Entity the node stands for
    #[serde(default, rename = "entityId", skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<EntityId>,
    /// Everything else, preserved verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CanvasNode {
    /// File node bound to an entity
    #[must_use]
    pub fn entity(id: impl Into<String>, entity_id: EntityId, file: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::Entity,
            x: 0.into(),
            y: 0.into(),
            width: 0.into(),
            height: 0.into(),
            color: None,
            file: Some(file.into()),
            entity_id: Some(entity_id),
            extra: Map::new(),
        }
    }

    /// Text node
    #[must_use]
    pub fn text(id: impl Into<String>, text: impl Into<String>) -> Self {
        let mut extra = Map::new();
        extra.insert("text".to_string(), Value::String(text.into()));
        Self {
            id: id.into(),
            kind: NodeKind::Text,
            x: 0.into(),
            y: 0.into(),
            width: 250.into(),
            height: 60.into(),
            color: None,
            file: None,
            entity_id: None,
            extra,
        }
    }

    /// With geometry
    #[must_use]
    pub fn at(mut self, x: i64, y: i64, width: i64, height: i64) -> Self {
        self.x = x.into();
        self.y = y.into();
        self.width = width.into();
        self.height = height.into();
        self
    }

    /// With color
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// `(x, y, width, height)`, or `None` when any of them is fractional
    #[must_use]
    pub fn geometry(&self) -> Option<(i64, i64, i64, i64)> {
        Some((
            self.x.as_i64()?,
            self.y.as_i64()?,
            self.width.as_i64()?,
            self.height.as_i64()?,
        ))
    }

    /// Whether the node is bound to an entity
    ///
    /// Only file nodes carrying an `entityId` count. A file node without one
    /// is bound during reconciliation when its path is a record's location;
    /// any other file node (notes, images, PDFs) is left alone.
    #[must_use]
    pub fn is_entity(&self) -> bool {
        self.kind == NodeKind::Entity && self.entity_id.is_some()
    }
}

/// One edge of the canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasEdge {
    /// Unique edge id
    pub id: String,
    /// Source node id
    #[serde(rename = "fromNode")]
    pub from_node: String,
    /// Target node id
    #[serde(rename = "toNode")]
    pub to_node: String,
    /// Attachment side on the source
    #[serde(default, rename = "fromSide", skip_serializing_if = "Option::is_none")]
    pub from_side: Option<Side>,
    /// Attachment side on the target
    #[serde(default, rename = "toSide", skip_serializing_if = "Option::is_none")]
    pub to_side: Option<Side>,
    /// Relationship, for engine-generated edges
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<EdgeKind>,
    /// Color preset or hex
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Everything else, preserved verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CanvasEdge {
    /// Engine edge reading left to right
    #[must_use]
    pub fn relation(kind: EdgeKind, from_node: &str, to_node: &str) -> Self {
        Self {
            id: edge_id(kind, from_node, to_node),
            from_node: from_node.to_string(),
            to_node: to_node.to_string(),
            from_side: Some(Side::Right),
            to_side: Some(Side::Left),
            kind: Some(kind),
            color: None,
            label: None,
            extra: Map::new(),
        }
    }

    /// Hand-drawn edge with no relationship attached
    #[must_use]
    pub fn annotation(id: impl Into<String>, from_node: &str, to_node: &str) -> Self {
        Self {
            id: id.into(),
            from_node: from_node.to_string(),
            to_node: to_node.to_string(),
            from_side: None,
            to_side: None,
            kind: None,
            color: None,
            label: None,
            extra: Map::new(),
        }
    }

    /// Whether the edge touches `node_id`
    #[inline]
    #[must_use]
    pub fn touches(&self, node_id: &str) -> bool {
        self.from_node == node_id || self.to_node == node_id
    }
}

/// A whole canvas
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanvasDocument {
    /// Nodes in file order
    #[serde(default)]
    pub nodes: Vec<CanvasNode>,
    /// Edges in file order
    #[serde(default)]
    pub edges: Vec<CanvasEdge>,
    /// Top-level keys other than `nodes` and `edges`
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CanvasDocument {
    /// Empty canvas
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse canvas JSON
    ///
    /// # Errors
    /// The JSON error when the text is not a canvas document.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::new());
        }
        serde_json::from_str(text)
    }

    /// Pretty-printed canvas JSON
    ///
    /// # Errors
    /// The JSON error if serialisation fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Node by id
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&CanvasNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Nodes bound to an entity id
    pub fn nodes_for<'a>(&'a self, entity_id: &'a str) -> impl Iterator<Item = &'a CanvasNode> + 'a {
        self.nodes
            .iter()
            .filter(move |n| n.entity_id.as_ref().is_some_and(|e| e.as_str() == entity_id))
    }

    /// Nodes bound to an entity
    pub fn entity_nodes(&self) -> impl Iterator<Item = &CanvasNode> {
        self.nodes.iter().filter(|n| n.is_entity())
    }

    /// Edges of one relationship kind
    pub fn edges_of(&self, kind: EdgeKind) -> impl Iterator<Item = &CanvasEdge> {
        self.edges.iter().filter(move |e| e.kind == Some(kind))
    }
}

/// Canvas color preset per entity type
#[must_use]
pub const fn type_color(entity_type: EntityType) -> &'static str {
    match entity_type {
        EntityType::Milestone => "6",
        EntityType::Story => "4",
        EntityType::Task => "5",
        EntityType::Decision => "2",
        EntityType::Document => "3",
        EntityType::Feature => "1",
    }
}

fn short_hash(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    hex::encode(&digest[..8])
}

/// Deterministic node id for an entity, avoiding every id in `taken`
#[must_use]
pub fn node_id_for(entity_id: &EntityId, taken: &HashSet<String>) -> String {
    let mut candidate = short_hash(entity_id.as_str());
    let mut salt = 1u32;
    while taken.contains(&candidate) {
        candidate = short_hash(&format!("{entity_id}#{salt}"));
        salt += 1;
    }
    candidate
}

/// Deterministic edge id from kind and endpoints
#[must_use]
pub fn edge_id(kind: EdgeKind, from_node: &str, to_node: &str) -> String {
    short_hash(&format!("{}:{from_node}->{to_node}", kind.as_str()))
}
