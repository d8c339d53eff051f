//! Dense indexing of live entities
//!
//! Graphs work on small integer indices rather than ids. Indices are handed
//! out in ascending id order, which makes "iterate by index" the canonical
//! traversal order everywhere.

use roadmap_entity::{EntityId, EntityRecord};
use std::collections::HashMap;

/// Index of an entity inside an [`EntityIndex`]
pub type NodeIx = usize;

/// Bidirectional id ↔ index mapping over the live records of one pass
#[derive(Debug, Clone, Default)]
pub struct EntityIndex {
    ids: Vec<EntityId>,
    lookup: HashMap<EntityId, NodeIx>,
}

impl EntityIndex {
    /// Index the given ids (duplicates collapse)
    #[must_use]
    pub fn new<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = EntityId>,
    {
        let mut ids: Vec<EntityId> = ids.into_iter().collect();
        ids.sort();
        ids.dedup();
        let lookup = ids.iter().cloned().enumerate().map(|(i, id)| (id, i)).collect();
        Self { ids, lookup }
    }

    /// Index the non-archived records
    #[must_use]
    pub fn live(records: &[EntityRecord]) -> Self {
        Self::new(
            records
                .iter()
                .filter(|r| !r.archived)
                .map(|r| r.entity_id.clone()),
        )
    }

    /// Index of an id
    #[inline]
    #[must_use]
    pub fn get(&self, id: &str) -> Option<NodeIx> {
        self.lookup.get(id).copied()
    }

    /// Id at an index
    ///
    /// # Panics
    /// Panics if `ix` is out of range.
    #[inline]
    #[must_use]
    pub fn id(&self, ix: NodeIx) -> &EntityId {
        &self.ids[ix]
    }

    /// Whether an id is indexed
    #[inline]
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.lookup.contains_key(id)
    }

    /// Number of indexed entities
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing is indexed
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Ids in index order
    #[must_use]
    pub fn ids(&self) -> &[EntityId] {
        &self.ids
    }

    /// Ids for a list of indices
    #[must_use]
    pub fn ids_of(&self, ixs: &[NodeIx]) -> Vec<EntityId> {
        ixs.iter().map(|&ix| self.ids[ix].clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roadmap_entity::EntityType;

    #[test]
    fn indices_follow_id_order() {
        let index = EntityIndex::new(["S-003", "S-001", "S-002", "S-001"].map(EntityId::from));
        assert_eq!(index.len(), 3);
        assert_eq!(index.get("S-001"), Some(0));
        assert_eq!(index.get("S-003"), Some(2));
        assert_eq!(index.id(1).as_str(), "S-002");
        assert_eq!(index.get("S-404"), None);
    }

    #[test]
    fn live_skips_archived_records() {
        let records = vec![
            EntityRecord::new("M-001", EntityType::Milestone, "m.md").archived(),
            EntityRecord::new("S-001", EntityType::Story, "s.md"),
        ];
        let index = EntityIndex::live(&records);
        assert!(!index.contains("M-001"));
        assert!(index.contains("S-001"));
    }
}
