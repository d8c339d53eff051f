//! Read-only consistency report
//!
//! `children` and `blocks` are informational mirrors of `parent` and
//! `depends_on`. When a record maintains a mirror and it disagrees with the
//! source of truth, the disagreement is reported. Nothing is corrected.

use roadmap_entity::{EntityId, EntityRecord, Report, ReportKind};
use std::collections::HashMap;

/// Compare informational fields against their source of truth
///
/// Only live records are considered. A mirror field is checked only on
/// records that actually fill it in.
#[must_use]
pub fn check_consistency(records: &[EntityRecord]) -> Vec<Report> {
    let mut live: Vec<&EntityRecord> = records.iter().filter(|r| !r.archived).collect();
    live.sort_by(|a, b| a.entity_id.cmp(&b.entity_id));
    let by_id: HashMap<&str, &EntityRecord> =
        live.iter().map(|r| (r.entity_id.as_str(), *r)).collect();

    let mut reports = Vec::new();
    for record in &live {
        check_children(record, &by_id, &live, &mut reports);
        check_blocks(record, &by_id, &mut reports);
    }
    reports
}

fn check_children(
    record: &EntityRecord,
    by_id: &HashMap<&str, &EntityRecord>,
    live: &[&EntityRecord],
    reports: &mut Vec<Report>,
) {
    if record.children.is_empty() {
        return;
    }
    let id = &record.entity_id;

    for child in &record.children {
        let problem = match by_id.get(child.as_str()) {
            None => Some(format!("{id} lists child {child}, which is not a live record")),
            Some(c) if c.parent.as_ref() != Some(id) => Some(match &c.parent {
                Some(other) => format!("{id} lists child {child}, but its parent is {other}"),
                None => format!("{id} lists child {child}, but it has no parent"),
            }),
            Some(_) => None,
        };
        if let Some(message) = problem {
            reports.push(mismatch(ReportKind::ChildrenMismatch, message, id, child));
        }
    }

    for other in live {
        if other.parent.as_ref() == Some(id) && !record.children.contains(&other.entity_id) {
            let child = &other.entity_id;
            reports.push(mismatch(
                ReportKind::ChildrenMismatch,
                format!("{child} names {id} as parent, but {id} does not list it as a child"),
                id,
                child,
            ));
        }
    }
}

fn check_blocks(
    record: &EntityRecord,
    by_id: &HashMap<&str, &EntityRecord>,
    reports: &mut Vec<Report>,
) {
    let id = &record.entity_id;

    for blocked in &record.blocks {
        if let Some(target) = by_id.get(blocked.as_str()) {
            if !target.depends_on.contains(id) {
                reports.push(mismatch(
                    ReportKind::BlocksMismatch,
                    format!("{id} blocks {blocked}, but {blocked} does not depend on {id}"),
                    id,
                    blocked,
                ));
            }
        }
    }

    for dep in &record.depends_on {
        if let Some(source) = by_id.get(dep.as_str()) {
            if !source.blocks.is_empty() && !source.blocks.contains(id) {
                reports.push(mismatch(
                    ReportKind::BlocksMismatch,
                    format!("{id} depends on {dep}, but {dep} does not list it under blocks"),
                    id,
                    dep,
                ));
            }
        }
    }
}

fn mismatch(kind: ReportKind, message: String, a: &EntityId, b: &EntityId) -> Report {
    Report::new(kind, message).with_entities([a.clone(), b.clone()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use roadmap_entity::EntityType;

    fn rec(id: &str) -> EntityRecord {
        EntityRecord::new(id, EntityType::Story, id)
    }

    #[test]
    fn agreeing_mirrors_are_silent() {
        let records = vec![
            rec("M-001").with_child("S-001"),
            rec("S-001").with_parent("M-001").blocks("S-002"),
            rec("S-002").depends_on("S-001"),
        ];
        assert!(check_consistency(&records).is_empty());
    }

    #[test]
    fn absent_mirrors_are_not_checked() {
        let records = vec![
            rec("M-001"),
            rec("S-001").with_parent("M-001"),
            rec("S-002").depends_on("S-001"),
        ];
        assert!(check_consistency(&records).is_empty());
    }

    #[test]
    fn children_disagreement_is_reported_both_ways() {
        let records = vec![
            rec("M-001").with_child("S-001").with_child("S-404"),
            rec("S-001"),
            rec("S-002").with_parent("M-001"),
        ];
        let reports = check_consistency(&records);
        assert_eq!(reports.len(), 3);
        assert!(reports.iter().all(|r| r.kind == ReportKind::ChildrenMismatch));
        assert!(reports.iter().any(|r| r.mentions("S-404")));
        assert!(reports.iter().any(|r| r.mentions("S-002")));
    }

    #[test]
    fn blocks_disagreement_is_reported() {
        let records = vec![
            rec("S-001").blocks("S-003"),
            rec("S-002").depends_on("S-001"),
            rec("S-003"),
        ];
        let reports = check_consistency(&records);
        assert_eq!(reports.len(), 2);
        assert!(reports.iter().all(|r| r.kind == ReportKind::BlocksMismatch));
    }

    #[test]
    fn records_are_never_mutated() {
        let records = vec![rec("S-001").blocks("S-002"), rec("S-002")];
        let before = records.clone();
        let _ = check_consistency(&records);
        assert_eq!(records, before);
    }
}
