use chrono::NaiveDate;
use nexus_core::db::open_db_in_memory;
use nexus_core::{
    FixedClock, GraphEdge, GraphService, NewNoteRequest, NoteService, NoteServiceError,
    NoteUpdate, SqliteWorkspaceStore, WorkspaceService, WorkspaceStore,
};

const LINKED_PAIR: &str = r#"{
  "notes": [
    {"id": "a", "title": "A", "content": "Depends on [[B]]"},
    {"id": "b", "title": "B", "content": "Leaf"}
  ]
}"#;

fn clock() -> FixedClock {
    FixedClock(NaiveDate::from_ymd_opt(2026, 10, 15).unwrap())
}

fn edge(source: &str, target: &str) -> GraphEdge {
    GraphEdge {
        source: source.to_string(),
        target: target.to_string(),
    }
}

#[test]
fn create_prepends_with_defaults_and_timestamps() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteWorkspaceStore::new(&conn);
    WorkspaceService::new(&store)
        .import_snapshot(LINKED_PAIR)
        .unwrap();
    let service = NoteService::new(&store, clock());

    let created = service.create_note(&NewNoteRequest::default()).unwrap();
    assert_eq!(created.title, "Untitled Insight");
    assert_eq!(created.folder, "General");
    let midnight = clock().0.and_hms_opt(0, 0, 0).unwrap();
    assert_eq!(created.created_at, midnight.and_utc().timestamp_millis());
    assert_eq!(created.updated_at, created.created_at);

    let stored = store.load_notes().unwrap();
    assert_eq!(stored.len(), 3);
    assert_eq!(stored[0], created);
    assert_eq!(service.get_note(&created.id).unwrap(), Some(created));
}

#[test]
fn renaming_a_stored_target_drops_its_edge_on_rebuild() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteWorkspaceStore::new(&conn);
    WorkspaceService::new(&store)
        .import_snapshot(LINKED_PAIR)
        .unwrap();
    let graphs = GraphService::new(&store);
    assert_eq!(graphs.knowledge_graph().unwrap().edges, vec![edge("a", "b")]);

    let renamed = NoteService::new(&store, clock())
        .update_note(
            "b",
            NoteUpdate {
                title: Some("B2".to_string()),
                ..NoteUpdate::default()
            },
        )
        .unwrap();
    assert_eq!(renamed.title, "B2");
    assert_eq!(renamed.content, "Leaf");
    assert!(renamed.updated_at > 0);

    let graph = graphs.knowledge_graph().unwrap();
    assert!(graph.edges.is_empty());
    assert_eq!(graph.degree_of("a"), 0);
    assert_eq!(graph.degree_of("b"), 0);
}

#[test]
fn editing_content_adds_edges_on_rebuild() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteWorkspaceStore::new(&conn);
    WorkspaceService::new(&store)
        .import_snapshot(LINKED_PAIR)
        .unwrap();

    NoteService::new(&store, clock())
        .update_note(
            "b",
            NoteUpdate {
                content: Some("Back to [[A]] and [[B]]".to_string()),
                ..NoteUpdate::default()
            },
        )
        .unwrap();

    let graph = GraphService::new(&store).knowledge_graph().unwrap();
    assert_eq!(
        graph.edges,
        vec![edge("a", "b"), edge("b", "a"), edge("b", "b")]
    );
    assert_eq!(graph.degree_of("b"), 4);
}

#[test]
fn delete_purges_note_and_its_edges() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteWorkspaceStore::new(&conn);
    WorkspaceService::new(&store)
        .import_snapshot(LINKED_PAIR)
        .unwrap();
    let service = NoteService::new(&store, clock());

    service.delete_note("b").unwrap();
    assert_eq!(service.list_notes().unwrap().len(), 1);
    assert!(GraphService::new(&store)
        .knowledge_graph()
        .unwrap()
        .edges
        .is_empty());
}

#[test]
fn unknown_note_is_reported_and_store_is_untouched() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteWorkspaceStore::new(&conn);
    WorkspaceService::new(&store)
        .import_snapshot(LINKED_PAIR)
        .unwrap();
    let service = NoteService::new(&store, clock());

    let err = service
        .update_note("missing", NoteUpdate::default())
        .unwrap_err();
    assert!(matches!(err, NoteServiceError::NoteNotFound(ref id) if id == "missing"));
    assert!(matches!(
        service.delete_note("missing"),
        Err(NoteServiceError::NoteNotFound(_))
    ));
    assert_eq!(store.load_notes().unwrap().len(), 2);
}
