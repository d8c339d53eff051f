//! Testing utilities for the roadmap canvas workspace
//!
//! Record builders, Markdown record text, graph-shaped fixtures and a
//! proptest strategy for arbitrary record sets.

#![allow(missing_docs)]

use proptest::prelude::*;
use roadmap_entity::{EntityRecord, EntityType, SourceLocation};

/// Zero-padded story id, `story_id(7) == "S-007"`
pub fn story_id(n: usize) -> String {
    format!("S-{n:03}")
}

pub fn record(id: &str, entity_type: EntityType) -> EntityRecord {
    EntityRecord::new(id, entity_type, format!("{id}.md").as_str())
}

pub fn story(id: &str) -> EntityRecord {
    record(id, EntityType::Story)
}

pub fn milestone(id: &str) -> EntityRecord {
    record(id, EntityType::Milestone)
}

pub fn task(id: &str) -> EntityRecord {
    record(id, EntityType::Task)
}

/// `S-001 ← S-002 ← … ← S-n`, each story depending on the previous one
pub fn chain(n: usize) -> Vec<EntityRecord> {
    (1..=n)
        .map(|i| {
            let s = story(&story_id(i));
            if i == 1 {
                s
            } else {
                s.depends_on(story_id(i - 1))
            }
        })
        .collect()
}

/// S-001 at the top, S-002 and S-003 depending on it, S-004 on both
pub fn diamond() -> Vec<EntityRecord> {
    vec![
        story("S-001"),
        story("S-002").depends_on("S-001"),
        story("S-003").depends_on("S-001"),
        story("S-004").depends_on("S-002").depends_on("S-003"),
    ]
}

/// S-001 depends on S-003, S-002 on S-001, S-003 on S-002
pub fn three_cycle() -> Vec<EntityRecord> {
    vec![
        story("S-001").depends_on("S-003"),
        story("S-002").depends_on("S-001"),
        story("S-003").depends_on("S-002"),
    ]
}

/// Markdown text of a record with the given frontmatter lines
///
/// ```
/// let text = roadmap_test_utils::md(&["id: S-001", "type: story"]);
/// assert!(text.starts_with("---\nid: S-001\n"));
/// ```
pub fn md(lines: &[&str]) -> String {
    let mut out = String::from("---\n");
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
    out.push_str("---\n\nBody text.\n");
    out
}

/// Rendered Markdown for a minimal record of `entity_type`
pub fn md_record(id: &str, entity_type: EntityType, extra: &[&str]) -> String {
    let id_line = format!("id: {id}");
    let type_line = format!("type: {}", entity_type.as_str());
    let mut lines = vec![id_line.as_str(), type_line.as_str()];
    lines.extend_from_slice(extra);
    md(&lines)
}

/// `(location, text)` item as a record source yields it
pub fn source_item(path: &str, text: String) -> (SourceLocation, String) {
    (SourceLocation::new(path), text)
}

/// Arbitrary record sets of up to `max` stories
///
/// Parents and dependencies point at ids in `S-001..=S-{max+2}`, so some
/// references dangle, some are self references and cycles are common.
pub fn arb_records(max: usize) -> impl Strategy<Value = Vec<EntityRecord>> {
    let reference = 1..=max + 2;
    let shape = (
        proptest::option::of(reference.clone()),
        proptest::collection::vec(reference, 0..4),
        proptest::option::of(prop_oneof![Just("alpha"), Just("beta"), Just("gamma")]),
        proptest::bool::weighted(0.1),
    );
    proptest::collection::vec(shape, 1..=max).prop_map(|shapes| {
        shapes
            .into_iter()
            .enumerate()
            .map(|(i, (parent, deps, workstream, archived))| {
                let mut r = story(&story_id(i + 1));
                if let Some(p) = parent {
                    r = r.with_parent(story_id(p));
                }
                for d in deps {
                    r = r.depends_on(story_id(d));
                }
                if let Some(w) = workstream {
                    r = r.with_workstream(w);
                }
                if archived {
                    r = r.archived();
                }
                r
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_links_consecutive_stories() {
        let c = chain(3);
        assert!(c[0].depends_on.is_empty());
        assert!(c[2].depends_on.contains("S-002"));
    }
}
