use nexus_core::db::open_db_in_memory;
use nexus_core::repo::workspace_store::{HABITS_KEY, NOTES_KEY};
use nexus_core::{
    Habit, NewHabitRequest, Note, SqliteWorkspaceStore, StoreError, WorkspaceStore,
};
use rusqlite::params;

#[test]
fn missing_keys_load_as_empty_collections() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteWorkspaceStore::new(&conn);

    assert!(store.load_notes().unwrap().is_empty());
    assert!(store.load_habits().unwrap().is_empty());
}

#[test]
fn saved_collections_round_trip_in_order() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteWorkspaceStore::new(&conn);

    let notes = vec![
        Note::new("2", "Roadmap", "See [[Vision]]").in_folder("Engineering"),
        Note::new("1", "Vision", "[[Roadmap]]").in_folder("Product"),
    ];
    store.save_notes(&notes).unwrap();
    assert_eq!(store.load_notes().unwrap(), notes);

    let habits = vec![Habit::with_id("h1", &NewHabitRequest::named("Deep Work")).unwrap()];
    store.save_habits(&habits).unwrap();
    assert_eq!(store.load_habits().unwrap(), habits);
}

#[test]
fn saving_again_replaces_previous_value() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteWorkspaceStore::new(&conn);

    store.save_notes(&[Note::new("1", "A", "")]).unwrap();
    store.save_notes(&[]).unwrap();
    assert!(store.load_notes().unwrap().is_empty());

    let rows: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM kv_store WHERE key = ?1;",
            params![NOTES_KEY],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn corrupt_value_is_reported_with_its_key() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO kv_store (key, value) VALUES (?1, ?2);",
        params![HABITS_KEY, "{broken"],
    )
    .unwrap();

    let store = SqliteWorkspaceStore::new(&conn);
    let err = store.load_habits().unwrap_err();
    assert!(matches!(&err, StoreError::InvalidData { key, .. } if key == HABITS_KEY));
    assert!(store.load_notes().unwrap().is_empty());
}
