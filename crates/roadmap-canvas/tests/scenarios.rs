//! End-to-end passes over in-memory collaborators

use pretty_assertions::assert_eq;
use roadmap_canvas::{
    CanvasDocument, CanvasEdge, CanvasEngine, CanvasNode, EdgeKind, MemoryArchiveSink,
    MemoryCanvasStore, MemoryRecordSource, PassMode, PassOutcome,
};
use roadmap_entity::{EntityType, Report, ReportKind, SourceLocation};
use roadmap_test_utils::{md_record, story_id};

fn story(id: &str, extra: &[&str]) -> String {
    md_record(id, EntityType::Story, extra)
}

fn populate(source: &MemoryRecordSource, document: CanvasDocument) -> PassOutcome {
    CanvasEngine::default()
        .populate(source, document, &mut MemoryArchiveSink::default())
        .unwrap()
}

fn reposition(source: &MemoryRecordSource, document: CanvasDocument) -> PassOutcome {
    CanvasEngine::default()
        .reposition(source, document, &mut MemoryArchiveSink::default())
        .unwrap()
}

fn node_of<'a>(document: &'a CanvasDocument, entity: &'a str) -> &'a CanvasNode {
    let mut nodes = document.nodes_for(entity);
    let node = nodes.next().unwrap_or_else(|| panic!("no node for {entity}"));
    assert!(nodes.next().is_none(), "two nodes for {entity}");
    node
}

/// `(x, y, width, height)` of the entity's node
fn placed(document: &CanvasDocument, entity: &str) -> (i64, i64, i64, i64) {
    node_of(document, entity)
        .geometry()
        .unwrap_or_else(|| panic!("{entity} has fractional geometry"))
}

/// `(from entity, to entity)` of every engine edge of `kind`
fn edges(document: &CanvasDocument, kind: EdgeKind) -> Vec<(String, String)> {
    let entity = |node_id: &str| {
        document
            .node(node_id)
            .and_then(|n| n.entity_id.clone())
            .map(|id| id.to_string())
            .unwrap_or_default()
    };
    let mut out: Vec<_> = document
        .edges_of(kind)
        .map(|e| (entity(&e.from_node), entity(&e.to_node)))
        .collect();
    out.sort();
    out
}

fn pair(from: &str, to: &str) -> (String, String) {
    (from.to_string(), to.to_string())
}

#[test]
fn scenario_single_dependency() {
    let source = MemoryRecordSource::new()
        .with("S-001.md", story("S-001", &[]))
        .with("S-002.md", story("S-002", &["depends_on: [S-001]"]));

    let outcome = populate(&source, CanvasDocument::new());
    let doc = &outcome.document;

    assert!(placed(doc, "S-001").0 < placed(doc, "S-002").0);
    assert_eq!(edges(doc, EdgeKind::Dependency), vec![pair("S-001", "S-002")]);
    assert_eq!(doc.edges.len(), 1);
}

#[test]
fn scenario_transitive_edge_is_not_rendered() {
    let source = MemoryRecordSource::new()
        .with("S-001.md", story("S-001", &[]))
        .with("S-002.md", story("S-002", &["depends_on: [S-001]"]))
        .with("S-003.md", story("S-003", &["depends_on:", "  - S-001", "  - S-002"]));

    let doc = populate(&source, CanvasDocument::new()).document;
    assert_eq!(
        edges(&doc, EdgeKind::Dependency),
        vec![pair("S-001", "S-002"), pair("S-002", "S-003")]
    );
}

#[test]
fn scenario_three_cycle_is_broken_once() {
    let source = MemoryRecordSource::new()
        .with("S-001.md", story("S-001", &["depends_on: [S-003]"]))
        .with("S-002.md", story("S-002", &["depends_on: [S-001]"]))
        .with("S-003.md", story("S-003", &["depends_on: [S-002]"]));

    let outcome = populate(&source, CanvasDocument::new());
    let doc = &outcome.document;

    assert_eq!(doc.edges.len(), 2);
    for id in ["S-001", "S-002", "S-003"] {
        let (x, y, _, _) = placed(doc, id);
        assert!(x > 0 && y > 0, "{id} at ({x}, {y})");
    }
    let cycles: Vec<_> = outcome
        .summary
        .warnings
        .iter()
        .filter(|r| r.kind == ReportKind::CycleBroken)
        .collect();
    assert_eq!(cycles.len(), 1);
    assert!(["S-001", "S-002", "S-003"].iter().all(|id| cycles[0].mentions(id)));
}

#[test]
fn scenario_twenty_story_chain() {
    let mut source = MemoryRecordSource::new();
    for i in 1..=20 {
        let id = story_id(i);
        let dep = format!("depends_on: [{}]", story_id(i.max(2) - 1));
        let extra: Vec<&str> = if i == 1 { vec![] } else { vec![dep.as_str()] };
        source.insert(&format!("{id}.md"), story(&id, &extra));
    }

    let doc = populate(&source, CanvasDocument::new()).document;
    assert_eq!(edges(&doc, EdgeKind::Dependency).len(), 19);
    let xs: Vec<i64> = (1..=20).map(|i| placed(&doc, &story_id(i)).0).collect();
    assert!(xs.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn scenario_diamond_shares_a_column() {
    let source = MemoryRecordSource::new()
        .with("S-001.md", story("S-001", &[]))
        .with("S-002.md", story("S-002", &["depends_on: [S-001]"]))
        .with("S-003.md", story("S-003", &["depends_on: [S-001]"]))
        .with("S-004.md", story("S-004", &["depends_on: [S-002, S-003]"]));

    let doc = populate(&source, CanvasDocument::new()).document;
    let x = |id| placed(&doc, id).0;
    assert_eq!(x("S-002"), x("S-003"));
    assert!(x("S-001") < x("S-002"));
    assert!(x("S-002") < x("S-004"));
    assert_eq!(edges(&doc, EdgeKind::Dependency).len(), 4);
}

#[test]
fn scenario_archived_milestone_leaves_orphaned_children() {
    let mut source = MemoryRecordSource::new()
        .with("M-001.md", md_record("M-001", EntityType::Milestone, &[]))
        .with("S-001.md", story("S-001", &["parent: M-001"]))
        .with("S-002.md", story("S-002", &["parent: M-001"]));

    let before = populate(&source, CanvasDocument::new()).document;
    assert_eq!(
        edges(&before, EdgeKind::Containment),
        vec![pair("S-001", "M-001"), pair("S-002", "M-001")]
    );
    let milestone_node = node_of(&before, "M-001").id.clone();

    source.insert("M-001.md", md_record("M-001", EntityType::Milestone, &["archived: true"]));
    let mut archive = MemoryArchiveSink::default();
    let outcome = CanvasEngine::default()
        .populate(&source, before.clone(), &mut archive)
        .unwrap();
    let doc = &outcome.document;

    assert!(doc.node(&milestone_node).is_none());
    assert_eq!(node_of(doc, "S-001").id, node_of(&before, "S-001").id);
    assert_eq!(node_of(doc, "S-002").id, node_of(&before, "S-002").id);
    assert!(edges(doc, EdgeKind::Containment).is_empty());
    assert!(doc.edges.iter().all(|e| !e.touches(&milestone_node)));

    assert_eq!(archive.archived(), vec![&SourceLocation::new("M-001.md")]);
    assert_eq!(outcome.summary.archived, 1);
    assert_eq!(outcome.summary.added, 0);
}

#[test]
fn orphaned_children_move_below_the_lanes_on_reposition() {
    let source = MemoryRecordSource::new()
        .with("S-001.md", story("S-001", &["parent: M-404"]))
        .with("S-002.md", story("S-002", &["workstream: core"]));

    let doc = reposition(&source, CanvasDocument::new()).document;
    assert!(placed(&doc, "S-001").1 > placed(&doc, "S-002").1);
    assert!(doc.edges.is_empty());
}

#[test]
fn populate_twice_adds_nothing_the_second_time() {
    let source = MemoryRecordSource::new()
        .with("M-001.md", md_record("M-001", EntityType::Milestone, &["workstream: core"]))
        .with("S-001.md", story("S-001", &["parent: M-001"]))
        .with("S-002.md", story("S-002", &["parent: M-001", "depends_on: [S-001]"]))
        .with("T-001.md", md_record("T-001", EntityType::Task, &["parent: S-404"]));

    let first = populate(&source, CanvasDocument::new());
    assert_eq!(first.summary.added, 4);

    let second = populate(&source, first.document.clone());
    assert_eq!(second.summary.added, 0);
    assert_eq!(second.summary.removed, 0);
    assert_eq!(second.document, first.document);
}

#[test]
fn populate_never_moves_placed_nodes() {
    let source = MemoryRecordSource::new()
        .with("S-001.md", story("S-001", &[]))
        .with("S-002.md", story("S-002", &["depends_on: [S-001]"]));
    let mut doc = populate(&source, CanvasDocument::new()).document;
    for node in &mut doc.nodes {
        node.x = (-500).into();
        node.y = 7.into();
    }

    let outcome = populate(&source, doc.clone());
    assert_eq!(outcome.summary.repositioned, 0);
    assert_eq!(outcome.document.nodes, doc.nodes);
}

#[test]
fn reposition_touches_only_entity_nodes() {
    let source = MemoryRecordSource::new()
        .with("S-001.md", story("S-001", &[]))
        .with("S-002.md", story("S-002", &["depends_on: [S-001]"]));
    let mut doc = populate(&source, CanvasDocument::new()).document;
    let laid_out = doc.clone();

    let note = CanvasNode::text("note-1", "Remember the release").at(-40, -40, 200, 60);
    let mut image = CanvasNode::entity("pic", "unused".into(), "assets/diagram.png").at(900, 900, 50, 50);
    image.entity_id = None;
    for node in doc.nodes.iter_mut() {
        let (x, y, width, height) = node.geometry().unwrap();
        *node = node.clone().at(x + 1000, y, width, height);
    }
    doc.nodes.push(note.clone());
    doc.nodes.push(image.clone());
    let s1 = node_of(&doc, "S-001").id.clone();
    doc.edges.push(CanvasEdge::annotation("a-1", "note-1", &s1));

    let outcome = reposition(&source, doc);
    let out = &outcome.document;

    assert_eq!(outcome.summary.repositioned, 2);
    for id in ["S-001", "S-002"] {
        assert_eq!(node_of(out, id).geometry(), node_of(&laid_out, id).geometry());
    }
    assert_eq!(out.node("note-1"), Some(&note));
    assert_eq!(out.node("pic"), Some(&image));
    assert!(out.edges.iter().any(|e| e.id == "a-1"));
}

#[test]
fn stale_and_duplicate_nodes_are_pruned() {
    let source = MemoryRecordSource::new().with("S-001.md", story("S-001", &[]));
    let mut doc = CanvasDocument::new();
    doc.nodes.push(CanvasNode::entity("b", "S-001".into(), "S-001.md").at(0, 0, 10, 10));
    doc.nodes.push(CanvasNode::entity("a", "S-001".into(), "S-001.md").at(0, 0, 10, 10));
    doc.nodes.push(CanvasNode::entity("z", "S-999".into(), "S-999.md").at(0, 0, 10, 10));

    let outcome = populate(&source, doc);
    let ids: Vec<&str> = outcome.document.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["a"]);
    assert_eq!(outcome.summary.removed, 2);
    assert_eq!(outcome.summary.added, 0);
}

#[test]
fn failed_pass_leaves_the_store_untouched() {
    struct Refusing;
    impl roadmap_canvas::ArchiveSink for Refusing {
        fn archive(
            &mut self,
            location: &SourceLocation,
        ) -> Result<SourceLocation, roadmap_canvas::ArchiveError> {
            Err(roadmap_canvas::ArchiveError::Rejected {
                location: location.clone(),
                reason: "read-only vault".into(),
            })
        }
    }

    let mut source = MemoryRecordSource::new().with("S-001.md", story("S-001", &[]));
    let mut store = MemoryCanvasStore::default();
    let engine = CanvasEngine::default();
    engine
        .run(
            PassMode::Populate,
            &source,
            &mut store,
            &mut MemoryArchiveSink::default(),
            &mut Vec::<Report>::new(),
        )
        .unwrap();
    let saved = store.document.clone();

    source.insert("S-001.md", story("S-001", &["archived: true"]));
    source.insert("S-002.md", story("S-002", &[]));
    let result = engine.run(PassMode::Reposition, &source, &mut store, &mut Refusing, &mut Vec::<Report>::new());

    assert!(matches!(result, Err(roadmap_canvas::PassError::Archive(_))));
    assert_eq!(store.saves, 1);
    assert_eq!(store.document, saved);
}

#[test]
fn canvas_json_survives_a_pass() {
    let text = r#"{
        "nodes": [
            {"id": "g1", "type": "group", "x": 0, "y": 0, "width": 400, "height": 400, "label": "Q3"},
            {"id": "n1", "type": "file", "file": "S-001.md", "x": 10.6, "y": 20, "width": 280, "height": 160}
        ],
        "edges": []
    }"#;
    let source = MemoryRecordSource::new().with("S-001.md", story("S-001", &[]));
    let doc = CanvasDocument::from_json(text).unwrap();

    let outcome = populate(&source, doc);
    let json: serde_json::Value = serde_json::from_str(&outcome.document.to_json().unwrap()).unwrap();

    assert_eq!(outcome.summary.added, 0);
    assert_eq!(json["nodes"][0]["label"], "Q3");
    assert_eq!(json["nodes"][1]["entityId"], "S-001");
    assert_eq!(json["nodes"][1]["x"], 10.6);
}

const HAND_MADE: &str = r#"{
    "nodes": [
        {"id": "t1", "type": "text", "x": 10.5, "y": -20.25, "width": 250.4, "height": 60.6, "text": "Kickoff"},
        {"id": "g1", "type": "group", "x": -0.5, "y": 1e3, "width": 400.75, "height": 300, "label": "Q3"},
        {"id": "m1", "type": "file", "x": 33.3, "y": 44.4, "width": 300, "height": 200.5, "file": "notes/meeting.md"},
        {"id": "l1", "type": "link", "x": 7, "y": 8.125, "width": 90, "height": 45, "url": "https://example.com"}
    ],
    "edges": [
        {"id": "u1", "fromNode": "t1", "toNode": "m1"}
    ]
}"#;

fn hand_made_nodes(document: &CanvasDocument) -> Vec<serde_json::Value> {
    document
        .nodes
        .iter()
        .filter(|n| ["t1", "g1", "m1", "l1"].contains(&n.id.as_str()))
        .map(|n| serde_json::to_value(n).unwrap())
        .collect()
}

#[test]
fn fractional_geometry_of_unowned_nodes_survives_both_passes() {
    let source = MemoryRecordSource::new()
        .with("S-001.md", story("S-001", &[]))
        .with("S-002.md", story("S-002", &["depends_on: [S-001]"]))
        .with("notes/meeting.md", "# Meeting\n\nNo frontmatter here.\n");
    let input = CanvasDocument::from_json(HAND_MADE).unwrap();
    let expected = hand_made_nodes(&input);

    let populated = populate(&source, input);
    assert_eq!(populated.summary.added, 2);
    assert_eq!(populated.summary.removed, 0);
    assert_eq!(hand_made_nodes(&populated.document), expected);

    let repositioned = reposition(&source, populated.document);
    assert_eq!(repositioned.summary.removed, 0);
    assert_eq!(hand_made_nodes(&repositioned.document), expected);

    let text = repositioned.document.to_json().unwrap();
    assert!(text.contains(r#""x": 10.5"#));
    assert!(text.contains(r#""y": -20.25"#));
    assert!(text.contains(r#""width": 250.4"#));
    assert!(text.contains(r#""height": 60.6"#));
    assert!(repositioned.document.edges.iter().any(|e| e.id == "u1"));
}

#[test]
fn markdown_note_that_is_not_a_record_survives_both_passes() {
    let source = MemoryRecordSource::new()
        .with("S-001.md", story("S-001", &[]))
        .with("notes/meeting.md", "# Meeting\n");
    let note = CanvasNode {
        entity_id: None,
        ..CanvasNode::entity("m1", "unused".into(), "notes/meeting.md").at(-300, 40, 250, 120)
    };
    let mut doc = CanvasDocument::new();
    doc.nodes.push(note.clone());

    let populated = populate(&source, doc);
    assert_eq!(populated.summary.removed, 0);
    assert_eq!(populated.document.node("m1"), Some(&note));

    let repositioned = reposition(&source, populated.document);
    assert_eq!(repositioned.summary.removed, 0);
    assert_eq!(repositioned.summary.repositioned, 0);
    assert_eq!(repositioned.document.node("m1"), Some(&note));
    assert_eq!(repositioned.document.entity_nodes().count(), 1);
}
