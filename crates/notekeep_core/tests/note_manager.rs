use notekeep_core::db::open_db_in_memory;
use notekeep_core::{
    CoreError, FailureKind, NoteInput, NoteRepository, NoteService, PrincipalId, Profile,
    ProfileInput, ProfileService, SqliteStore,
};
use rusqlite::Connection;

const ALICE: PrincipalId = PrincipalId::new(10);
const NOBODY: PrincipalId = PrincipalId::new(99);

fn with_profile(conn: &Connection, principal: PrincipalId, nickname: &str) -> Profile {
    let profiles = ProfileService::new(SqliteStore::try_new(conn).unwrap());
    profiles
        .create(principal, &ProfileInput::new(nickname))
        .unwrap()
}

#[test]
fn create_sets_owner_trims_title_and_keeps_body_verbatim() {
    let conn = open_db_in_memory().unwrap();
    let profile = with_profile(&conn, ALICE, "alice");
    let notes = NoteService::new(SqliteStore::try_new(&conn).unwrap());

    let created = notes
        .create(ALICE, &NoteInput::new("  shopping ", "  milk\n"))
        .unwrap();
    assert!(created.note_id > 0);
    assert_eq!(created.owner_profile_id, profile.profile_id);
    assert_eq!(created.title, "shopping");
    assert_eq!(created.body, "  milk\n");
    assert!(created.is_active());
}

#[test]
fn create_ignores_ownership_fields_in_payload() {
    let conn = open_db_in_memory().unwrap();
    let profile = with_profile(&conn, ALICE, "alice");
    let notes = NoteService::new(SqliteStore::try_new(&conn).unwrap());

    let payload = format!(
        r#"{{"title":"t","body":"b","ownerProfileID":{},"IDUser":{},"noteID":777}}"#,
        profile.profile_id + 1,
        profile.profile_id + 1
    );
    let input: NoteInput = serde_json::from_str(&payload).unwrap();
    let created = notes.create(ALICE, &input).unwrap();
    assert_eq!(created.owner_profile_id, profile.profile_id);
    assert_ne!(created.note_id, 777);
}

#[test]
fn operations_without_profile_report_profile_required() {
    let conn = open_db_in_memory().unwrap();
    let notes = NoteService::new(SqliteStore::try_new(&conn).unwrap());

    let failures = [
        notes.list(NOBODY).unwrap_err(),
        notes.get(NOBODY, 1).unwrap_err(),
        notes.create(NOBODY, &NoteInput::new("t", "b")).unwrap_err(),
        notes
            .update(NOBODY, 1, &NoteInput::new("t", "b"))
            .unwrap_err(),
        notes.delete(NOBODY, 1).unwrap_err(),
    ];
    for err in failures {
        assert!(matches!(err, CoreError::ProfileRequired));
        assert_eq!(err.kind(), FailureKind::ProfileNotFound);
        assert_eq!(err.message(), "no user profile found");
    }
}

#[test]
fn create_rejects_blank_title() {
    let conn = open_db_in_memory().unwrap();
    with_profile(&conn, ALICE, "alice");
    let notes = NoteService::new(SqliteStore::try_new(&conn).unwrap());

    let err = notes.create(ALICE, &NoteInput::new("   ", "body")).unwrap_err();
    assert_eq!(err.kind(), FailureKind::Validation);
    assert_eq!(err.message(), "title is required");
}

#[test]
fn list_returns_insertion_order_and_empty_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    with_profile(&conn, ALICE, "alice");
    let notes = NoteService::new(SqliteStore::try_new(&conn).unwrap());

    let empty = notes.list(ALICE).unwrap_err();
    assert!(matches!(empty, CoreError::NoNotes));
    assert_eq!(empty.kind(), FailureKind::NoteNotFound);
    assert_eq!(empty.message(), "no note found");

    let first = notes.create(ALICE, &NoteInput::new("first", "")).unwrap();
    let second = notes.create(ALICE, &NoteInput::new("second", "")).unwrap();
    notes
        .update(ALICE, first.note_id, &NoteInput::new("first edited", ""))
        .unwrap();

    let listed = notes.list(ALICE).unwrap();
    let ids: Vec<_> = listed.iter().map(|note| note.note_id).collect();
    assert_eq!(ids, vec![first.note_id, second.note_id]);
}

#[test]
fn get_unknown_note_is_note_not_found() {
    let conn = open_db_in_memory().unwrap();
    with_profile(&conn, ALICE, "alice");
    let notes = NoteService::new(SqliteStore::try_new(&conn).unwrap());

    let err = notes.get(ALICE, 4242).unwrap_err();
    assert!(matches!(err, CoreError::NoteNotFound(4242)));
    assert_eq!(err.message(), "note not found");
}

#[test]
fn update_replaces_fields_then_rejects_identical_repeat() {
    let conn = open_db_in_memory().unwrap();
    with_profile(&conn, ALICE, "alice");
    let notes = NoteService::new(SqliteStore::try_new(&conn).unwrap());
    let created = notes
        .create(ALICE, &NoteInput::new("shopping", "milk"))
        .unwrap();

    let change = NoteInput::new("shopping", "milk, eggs");
    let updated = notes.update(ALICE, created.note_id, &change).unwrap();
    assert_eq!(updated.body, "milk, eggs");
    assert_eq!(updated.owner_profile_id, created.owner_profile_id);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);

    let repeat = notes.update(ALICE, created.note_id, &change).unwrap_err();
    assert!(matches!(repeat, CoreError::NoChange));
}

#[test]
fn update_compares_trimmed_title_and_raw_body() {
    let conn = open_db_in_memory().unwrap();
    with_profile(&conn, ALICE, "alice");
    let notes = NoteService::new(SqliteStore::try_new(&conn).unwrap());
    let created = notes
        .create(ALICE, &NoteInput::new("shopping", "milk"))
        .unwrap();

    let same_after_trim = notes
        .update(ALICE, created.note_id, &NoteInput::new(" shopping ", "milk"))
        .unwrap_err();
    assert_eq!(same_after_trim.kind(), FailureKind::NoChange);

    let body_whitespace = notes
        .update(ALICE, created.note_id, &NoteInput::new("shopping", "milk "))
        .unwrap();
    assert_eq!(body_whitespace.body, "milk ");
}

#[test]
fn update_with_blank_title_is_validation_error() {
    let conn = open_db_in_memory().unwrap();
    with_profile(&conn, ALICE, "alice");
    let notes = NoteService::new(SqliteStore::try_new(&conn).unwrap());
    let created = notes
        .create(ALICE, &NoteInput::new("shopping", "milk"))
        .unwrap();

    let err = notes
        .update(ALICE, created.note_id, &NoteInput::new("", "milk"))
        .unwrap_err();
    assert_eq!(err.kind(), FailureKind::Validation);
    assert_eq!(notes.get(ALICE, created.note_id).unwrap().title, "shopping");
}

#[test]
fn update_missing_note_is_reported_before_validation() {
    let conn = open_db_in_memory().unwrap();
    with_profile(&conn, ALICE, "alice");
    let notes = NoteService::new(SqliteStore::try_new(&conn).unwrap());

    let err = notes.update(ALICE, 31, &NoteInput::new("", "")).unwrap_err();
    assert!(matches!(err, CoreError::NoteNotFound(31)));
}

#[test]
fn delete_tombstones_note_and_hides_it() {
    let conn = open_db_in_memory().unwrap();
    let profile = with_profile(&conn, ALICE, "alice");
    let store = SqliteStore::try_new(&conn).unwrap();
    let notes = NoteService::new(store);
    let created = notes
        .create(ALICE, &NoteInput::new("shopping", "milk"))
        .unwrap();

    let confirmation = notes.delete(ALICE, created.note_id).unwrap();
    assert_eq!(confirmation.note_id, created.note_id);
    assert_eq!(
        confirmation.message,
        format!("note ID# {} deleted!", created.note_id)
    );

    assert!(matches!(notes.list(ALICE).unwrap_err(), CoreError::NoNotes));
    assert_eq!(
        notes.get(ALICE, created.note_id).unwrap_err().kind(),
        FailureKind::NoteNotFound
    );

    let tombstone = store.get_note_any_state(created.note_id).unwrap().unwrap();
    assert!(tombstone.deleted_at.is_some());
    assert_eq!(tombstone.owner_profile_id, profile.profile_id);
    assert_eq!(tombstone.title, "shopping");
}

#[test]
fn deleted_note_cannot_be_deleted_or_updated_again() {
    let conn = open_db_in_memory().unwrap();
    with_profile(&conn, ALICE, "alice");
    let notes = NoteService::new(SqliteStore::try_new(&conn).unwrap());
    let created = notes.create(ALICE, &NoteInput::new("once", "")).unwrap();
    notes.delete(ALICE, created.note_id).unwrap();

    let second_delete = notes.delete(ALICE, created.note_id).unwrap_err();
    assert!(matches!(second_delete, CoreError::NoteNotFound(id) if id == created.note_id));

    let revive = notes
        .update(ALICE, created.note_id, &NoteInput::new("again", ""))
        .unwrap_err();
    assert_eq!(revive.kind(), FailureKind::NoteNotFound);
}

#[test]
fn create_rolls_back_when_store_rejects_insert() {
    let conn = open_db_in_memory().unwrap();
    with_profile(&conn, ALICE, "alice");
    conn.execute_batch(
        "CREATE TRIGGER notes_reject_insert AFTER INSERT ON notes
         BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
    )
    .unwrap();
    let notes = NoteService::new(SqliteStore::try_new(&conn).unwrap());

    let err = notes
        .create(ALICE, &NoteInput::new("shopping", "milk"))
        .unwrap_err();
    assert_eq!(err.kind(), FailureKind::Internal);
    assert_eq!(err.message(), "internal server error");

    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM notes;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 0);
    assert!(conn.is_autocommit());
}

#[test]
fn update_and_delete_roll_back_when_store_rejects_write() {
    let conn = open_db_in_memory().unwrap();
    with_profile(&conn, ALICE, "alice");
    let store = SqliteStore::try_new(&conn).unwrap();
    let notes = NoteService::new(store);
    let created = notes
        .create(ALICE, &NoteInput::new("shopping", "milk"))
        .unwrap();
    conn.execute_batch(
        "CREATE TRIGGER notes_reject_update AFTER UPDATE ON notes
         BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
    )
    .unwrap();

    let err = notes
        .update(ALICE, created.note_id, &NoteInput::new("groceries", "eggs"))
        .unwrap_err();
    assert_eq!(err.kind(), FailureKind::Internal);
    assert_eq!(err.message(), "internal server error");
    assert!(conn.is_autocommit());
    assert_eq!(
        store.get_note_any_state(created.note_id).unwrap(),
        Some(created.clone())
    );

    let err = notes.delete(ALICE, created.note_id).unwrap_err();
    assert_eq!(err.kind(), FailureKind::Internal);
    assert_eq!(err.message(), "internal server error");
    assert!(conn.is_autocommit());
    assert_eq!(
        store.get_note_any_state(created.note_id).unwrap(),
        Some(created)
    );
}
