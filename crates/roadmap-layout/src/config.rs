//! Layout configuration

use crate::error::{LayoutError, Result};
use roadmap_entity::EntityType;
use serde::{Deserialize, Serialize};

/// Fixed size of a node on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSize {
    /// Width in canvas units
    pub width: i64,
    /// Height in canvas units
    pub height: i64,
}

impl NodeSize {
    /// Create a size
    #[inline]
    #[must_use]
    pub const fn new(width: i64, height: i64) -> Self {
        Self { width, height }
    }
}

/// Node size per entity type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeSizes {
    /// Milestones
    pub milestone: NodeSize,
    /// Stories
    pub story: NodeSize,
    /// Tasks
    pub task: NodeSize,
    /// Decisions
    pub decision: NodeSize,
    /// Documents
    pub document: NodeSize,
    /// Features
    pub feature: NodeSize,
}

impl NodeSizes {
    /// Size for an entity type
    #[must_use]
    pub fn get(&self, entity_type: EntityType) -> NodeSize {
        match entity_type {
            EntityType::Milestone => self.milestone,
            EntityType::Story => self.story,
            EntityType::Task => self.task,
            EntityType::Decision => self.decision,
            EntityType::Document => self.document,
            EntityType::Feature => self.feature,
        }
    }

    fn set(&mut self, entity_type: EntityType, size: NodeSize) {
        let slot = match entity_type {
            EntityType::Milestone => &mut self.milestone,
            EntityType::Story => &mut self.story,
            EntityType::Task => &mut self.task,
            EntityType::Decision => &mut self.decision,
            EntityType::Document => &mut self.document,
            EntityType::Feature => &mut self.feature,
        };
        *slot = size;
    }
}

impl Default for NodeSizes {
    fn default() -> Self {
        Self {
            milestone: NodeSize::new(320, 200),
            story: NodeSize::new(280, 160),
            task: NodeSize::new(240, 120),
            decision: NodeSize::new(260, 140),
            document: NodeSize::new(240, 120),
            feature: NodeSize::new(300, 180),
        }
    }
}

/// Layout engine configuration
///
/// Every field has a default, so a partial TOML table is enough:
///
/// ```
/// use roadmap_layout::LayoutConfig;
///
/// let config = LayoutConfig::new().with_origin(0, 40).with_orphan_columns(3);
/// assert_eq!(config.orphan_columns, 3);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// X of column 0
    pub origin_x: i64,
    /// Y of the first lane
    pub origin_y: i64,
    /// Horizontal gap between columns
    pub column_gutter: i64,
    /// Vertical gap between rows inside a lane
    pub row_gutter: i64,
    /// Vertical gap between lanes, and between the last lane and the orphan grid
    pub lane_margin: i64,
    /// Orphans per grid row
    pub orphan_columns: usize,
    /// Lane label for entities with no workstream anywhere up their parent chain
    pub unassigned_label: String,
    /// Node size per entity type
    pub node_sizes: NodeSizes,
}

impl LayoutConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With origin
    #[inline]
    #[must_use]
    pub fn with_origin(mut self, x: i64, y: i64) -> Self {
        self.origin_x = x;
        self.origin_y = y;
        self
    }

    /// With column and row gutters
    #[inline]
    #[must_use]
    pub fn with_gutters(mut self, column: i64, row: i64) -> Self {
        self.column_gutter = column;
        self.row_gutter = row;
        self
    }

    /// With lane margin
    #[inline]
    #[must_use]
    pub fn with_lane_margin(mut self, margin: i64) -> Self {
        self.lane_margin = margin;
        self
    }

    /// With orphan grid width
    #[inline]
    #[must_use]
    pub fn with_orphan_columns(mut self, columns: usize) -> Self {
        self.orphan_columns = columns;
        self
    }

    /// With unassigned lane label
    #[inline]
    #[must_use]
    pub fn with_unassigned_label(mut self, label: impl Into<String>) -> Self {
        self.unassigned_label = label.into();
        self
    }

    /// With node size for one entity type
    #[inline]
    #[must_use]
    pub fn with_node_size(mut self, entity_type: EntityType, size: NodeSize) -> Self {
        self.node_sizes.set(entity_type, size);
        self
    }

    /// Size of a node of `entity_type`
    #[inline]
    #[must_use]
    pub fn node_size(&self, entity_type: EntityType) -> NodeSize {
        self.node_sizes.get(entity_type)
    }

    /// Reject values that would let nodes overlap or collapse
    ///
    /// # Errors
    /// [`LayoutError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        for entity_type in EntityType::ALL {
            let size = self.node_size(entity_type);
            if size.width <= 0 || size.height <= 0 {
                return Err(LayoutError::InvalidConfig(format!(
                    "node size for {} must be positive, got {}x{}",
                    entity_type.as_str(),
                    size.width,
                    size.height
                )));
            }
        }
        for (name, value) in [
            ("column_gutter", self.column_gutter),
            ("row_gutter", self.row_gutter),
            ("lane_margin", self.lane_margin),
        ] {
            if value < 0 {
                return Err(LayoutError::InvalidConfig(format!("{name} must not be negative")));
            }
        }
        if self.orphan_columns == 0 {
            return Err(LayoutError::InvalidConfig("orphan_columns must be at least 1".into()));
        }
        if self.unassigned_label.trim().is_empty() {
            return Err(LayoutError::InvalidConfig("unassigned_label must not be empty".into()));
        }
        Ok(())
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            origin_x: 100,
            origin_y: 100,
            column_gutter: 120,
            row_gutter: 40,
            lane_margin: 120,
            orphan_columns: 5,
            unassigned_label: "unassigned".to_string(),
            node_sizes: NodeSizes::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(LayoutConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_zero_sized_nodes() {
        let config = LayoutConfig::new().with_node_size(EntityType::Task, NodeSize::new(0, 10));
        assert!(matches!(config.validate(), Err(LayoutError::InvalidConfig(m)) if m.contains("task")));
    }

    #[test]
    fn rejects_empty_orphan_grid() {
        let config = LayoutConfig::new().with_orphan_columns(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config: LayoutConfig = toml::from_str(
            r#"
            column_gutter = 60

            [node_sizes.story]
            width = 100
            height = 50
            "#,
        )
        .unwrap();
        assert_eq!(config.column_gutter, 60);
        assert_eq!(config.row_gutter, 40);
        assert_eq!(config.node_size(EntityType::Story), NodeSize::new(100, 50));
        assert_eq!(config.node_size(EntityType::Task), NodeSize::new(240, 120));
    }
}
