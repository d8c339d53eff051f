//! Layout engine
//!
//! Turns resolved relationship graphs into canvas coordinates:
//!
//! 1. effective workstream per entity, grouped into lanes sorted by name
//! 2. longest-path column over the combined ordering DAG
//! 3. X from cumulative column widths, Y from greedy row packing per lane
//! 4. orphans into a grid below the last lane

use crate::columns::assign_columns;
use crate::config::LayoutConfig;
use crate::error::{LayoutError, Result};
use crate::lanes::pack_rows;
use crate::orphans::grid;
use crate::types::{LaneBand, Layout, Placement, Region};
use crate::workstream::effective_workstreams;
use roadmap_entity::EntityRecord;
use roadmap_graph::{NodeIx, ResolvedGraphs};
use std::collections::{BTreeMap, HashMap};

/// Deterministic lane/column layout
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    /// Create an engine
    #[inline]
    #[must_use]
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lay out every live entity of `graphs`
    ///
    /// `records` supplies type and own workstream; it may contain archived
    /// records, which are ignored.
    ///
    /// # Errors
    /// Invalid configuration, a record missing for an indexed entity, or an
    /// ordering graph that is still cyclic.
    pub fn layout(&self, records: &[EntityRecord], graphs: &ResolvedGraphs) -> Result<Layout> {
        self.config.validate()?;
        let cfg = &self.config;
        let index = &graphs.index;

        let by_id: HashMap<&str, &EntityRecord> = records
            .iter()
            .filter(|r| !r.archived)
            .map(|r| (r.entity_id.as_str(), r))
            .collect();
        let entities: Vec<&EntityRecord> = index
            .ids()
            .iter()
            .map(|id| {
                by_id
                    .get(id.as_str())
                    .copied()
                    .ok_or_else(|| LayoutError::UnknownEntity(id.clone()))
            })
            .collect::<Result<_>>()?;

        let own: Vec<Option<&str>> = entities.iter().map(|r| r.workstream.as_deref()).collect();
        let workstreams = effective_workstreams(&own, &graphs.containment, &cfg.unassigned_label);
        let columns = assign_columns(&graphs.combined)?;
        let size_of = |ix: NodeIx| cfg.node_size(entities[ix].entity_type);

        let mut lanes: BTreeMap<&str, Vec<NodeIx>> = BTreeMap::new();
        let mut orphans: Vec<NodeIx> = Vec::new();
        for ix in 0..index.len() {
            if graphs.is_orphan(ix) {
                orphans.push(ix);
            } else {
                lanes.entry(workstreams[ix].as_str()).or_default().push(ix);
            }
        }

        // Column widths come from lane nodes only; a column holding nothing
        // but orphans takes no horizontal space.
        let column_count = columns.iter().copied().max().map_or(0, |c| c + 1);
        let mut widths = vec![0i64; column_count];
        for members in lanes.values() {
            for &ix in members {
                widths[columns[ix]] = widths[columns[ix]].max(size_of(ix).width);
            }
        }
        let mut column_x = Vec::with_capacity(column_count);
        let mut x = cfg.origin_x;
        for &w in &widths {
            column_x.push(x);
            if w > 0 {
                x += w + cfg.column_gutter;
            }
        }

        let mut layout = Layout::default();
        let mut top = cfg.origin_y;

        for (lane_no, (label, mut members)) in lanes.into_iter().enumerate() {
            members.sort_by_key(|&ix| (columns[ix], ix));
            let items: Vec<(i64, i64, i64)> = members
                .iter()
                .map(|&ix| {
                    let size = size_of(ix);
                    (column_x[columns[ix]], size.width, size.height)
                })
                .collect();
            let packed = pack_rows(&items, top, cfg.row_gutter);

            for (&ix, &(rect, row)) in members.iter().zip(&packed.placed) {
                layout.placements.insert(
                    index.id(ix).clone(),
                    Placement {
                        entity_id: index.id(ix).clone(),
                        entity_type: entities[ix].entity_type,
                        rect,
                        column: columns[ix],
                        region: Region::Lane { lane: lane_no, row },
                    },
                );
            }
            layout.lanes.push(LaneBand {
                label: label.to_string(),
                top,
                height: packed.height,
                members: index.ids_of(&members),
            });
            top += packed.height + cfg.lane_margin;
        }

        let sizes: Vec<(i64, i64)> = orphans
            .iter()
            .map(|&ix| {
                let size = size_of(ix);
                (size.width, size.height)
            })
            .collect();
        if let Some((cells, bounds)) = grid(
            &sizes,
            cfg.origin_x,
            top,
            cfg.orphan_columns,
            cfg.column_gutter,
            cfg.row_gutter,
        ) {
            for (slot, (&ix, rect)) in orphans.iter().zip(cells).enumerate() {
                layout.placements.insert(
                    index.id(ix).clone(),
                    Placement {
                        entity_id: index.id(ix).clone(),
                        entity_type: entities[ix].entity_type,
                        rect,
                        column: columns[ix],
                        region: Region::Orphan { slot },
                    },
                );
            }
            layout.orphan_area = Some(bounds);
        }

        tracing::debug!(
            "laid out {} entities in {} lanes over {} columns, {} orphans",
            layout.len(),
            layout.lanes.len(),
            column_count,
            orphans.len()
        );
        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roadmap_entity::EntityType;

    fn story(id: &str) -> EntityRecord {
        EntityRecord::new(id, EntityType::Story, id)
    }

    fn run(records: &[EntityRecord]) -> Layout {
        let graphs = ResolvedGraphs::resolve(records);
        LayoutEngine::default().layout(records, &graphs).unwrap()
    }

    #[test]
    fn dependency_sits_left_of_dependent() {
        let layout = run(&[story("S-001"), story("S-002").depends_on("S-001")]);
        let (a, b) = (layout.get("S-001").unwrap(), layout.get("S-002").unwrap());
        assert!(a.column < b.column);
        assert!(a.rect.right() < b.rect.x);
        assert_eq!(a.rect.y, b.rect.y);
    }

    #[test]
    fn child_sits_left_of_parent() {
        let layout = run(&[
            EntityRecord::new("M-001", EntityType::Milestone, "m"),
            story("S-001").with_parent("M-001"),
        ]);
        assert!(layout.column("S-001") < layout.column("M-001"));
    }

    #[test]
    fn lanes_are_sorted_and_disjoint() {
        let layout = run(&[
            story("S-001").with_workstream("zeta"),
            story("S-002").with_workstream("alpha"),
            story("S-003"),
        ]);
        let labels: Vec<_> = layout.lanes.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, vec!["alpha", "unassigned", "zeta"]);
        for pair in layout.lanes.windows(2) {
            assert!(pair[0].bottom() < pair[1].top);
        }
    }

    #[test]
    fn children_inherit_the_parent_lane() {
        let layout = run(&[
            EntityRecord::new("M-001", EntityType::Milestone, "m").with_workstream("core"),
            story("S-001").with_parent("M-001"),
        ]);
        assert_eq!(layout.lanes.len(), 1);
        assert_eq!(layout.lanes[0].members.len(), 2);
    }

    #[test]
    fn orphans_go_below_every_lane() {
        let layout = run(&[
            story("S-001"),
            story("S-002").depends_on("S-001"),
            story("S-003").with_parent("M-404"),
        ]);
        let orphan = layout.get("S-003").unwrap();
        assert!(layout.is_orphan("S-003"));
        assert!(layout
            .iter()
            .filter(|p| !layout.is_orphan(p.entity_id.as_str()))
            .all(|p| p.rect.bottom() < orphan.rect.y));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let records = [story("S-001")];
        let graphs = ResolvedGraphs::resolve(&records);
        let engine = LayoutEngine::new(LayoutConfig::new().with_orphan_columns(0));
        assert!(matches!(
            engine.layout(&records, &graphs),
            Err(LayoutError::InvalidConfig(_))
        ));
    }

    #[test]
    fn missing_record_is_an_error() {
        let graphs = ResolvedGraphs::resolve(&[story("S-001")]);
        assert_eq!(
            LayoutEngine::default().layout(&[], &graphs),
            Err(LayoutError::UnknownEntity("S-001".into()))
        );
    }
}
