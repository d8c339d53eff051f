//! Layout output types

use roadmap_entity::{EntityId, EntityType};
use serde::Serialize;
use std::collections::BTreeMap;

/// Axis-aligned rectangle in canvas units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rect {
    /// Left edge
    pub x: i64,
    /// Top edge
    pub y: i64,
    /// Width
    pub width: i64,
    /// Height
    pub height: i64,
}

impl Rect {
    /// Create a rectangle
    #[inline]
    #[must_use]
    pub const fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self { x, y, width, height }
    }

    /// Right edge (exclusive)
    #[inline]
    #[must_use]
    pub const fn right(&self) -> i64 {
        self.x + self.width
    }

    /// Bottom edge (exclusive)
    #[inline]
    #[must_use]
    pub const fn bottom(&self) -> i64 {
        self.y + self.height
    }

    /// Whether the interiors of two rectangles overlap
    #[must_use]
    pub const fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right() && other.x < self.right() && self.y < other.bottom() && other.y < self.bottom()
    }
}

/// Where an entity ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    /// Inside a workstream lane
    Lane {
        /// Index into [`Layout::lanes`]
        lane: usize,
        /// Row inside the lane, from the top
        row: usize,
    },
    /// In the orphan grid below all lanes
    Orphan {
        /// Row-major slot in the grid
        slot: usize,
    },
}

/// Computed position of one entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placement {
    /// Entity placed
    pub entity_id: EntityId,
    /// Its type, which fixed the size
    pub entity_type: EntityType,
    /// Position and size
    pub rect: Rect,
    /// Longest-path column in the combined ordering
    pub column: usize,
    /// Lane or orphan grid
    pub region: Region,
}

/// A horizontal workstream band
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaneBand {
    /// Effective workstream shared by the members
    pub label: String,
    /// Top of the band
    pub top: i64,
    /// Height of the band
    pub height: i64,
    /// Members in placement order (column, then id)
    pub members: Vec<EntityId>,
}

impl LaneBand {
    /// Bottom of the band (exclusive)
    #[inline]
    #[must_use]
    pub fn bottom(&self) -> i64 {
        self.top + self.height
    }
}

/// Complete layout of one pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Layout {
    /// Placement per entity, ordered by id
    pub placements: BTreeMap<EntityId, Placement>,
    /// Lanes top to bottom
    pub lanes: Vec<LaneBand>,
    /// Bounding box of the orphan grid, if any orphan was placed
    pub orphan_area: Option<Rect>,
}

impl Layout {
    /// Placement of an entity
    #[inline]
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Placement> {
        self.placements.get(id)
    }

    /// Column of an entity
    #[must_use]
    pub fn column(&self, id: &str) -> Option<usize> {
        self.get(id).map(|p| p.column)
    }

    /// Whether an entity was placed in the orphan grid
    #[must_use]
    pub fn is_orphan(&self, id: &str) -> bool {
        matches!(self.get(id), Some(p) if matches!(p.region, Region::Orphan { .. }))
    }

    /// Number of placed entities
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    /// Whether nothing was placed
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Placements in id order
    pub fn iter(&self) -> impl Iterator<Item = &Placement> {
        self.placements.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_rects_do_not_intersect() {
        let a = Rect::new(0, 0, 10, 10);
        assert!(!a.intersects(&Rect::new(10, 0, 10, 10)));
        assert!(!a.intersects(&Rect::new(0, 10, 10, 10)));
        assert!(a.intersects(&Rect::new(9, 9, 10, 10)));
    }
}
