use notely_core::db::open_db_in_memory;
use notely_core::{
    ModelValidationError, Note, NoteCollection, RepoError, Repository,
    SqliteNoteCollectionRepository, SqliteNoteRepository, SqliteUserRepository, User,
};
use rusqlite::Connection;

fn seed_collection(conn: &Connection) -> NoteCollection {
    let user = SqliteUserRepository::new(conn).save(&User::new()).unwrap();
    SqliteNoteCollectionRepository::new(conn)
        .save(&NoteCollection::new(user.user_id().unwrap(), "inbox"))
        .unwrap()
}

#[test]
fn save_assigns_identity_and_audit() {
    let conn = open_db_in_memory().unwrap();
    let users = SqliteUserRepository::new(&conn);

    let saved = users.save(&User::new()).unwrap();

    assert!(saved.user_id().unwrap() > 0);
    assert!(saved.audit().created_at() > 0);
    assert_eq!(saved.audit().created_at(), saved.audit().updated_at());
}

#[test]
fn identities_are_monotonic_per_entity() {
    let conn = open_db_in_memory().unwrap();
    let users = SqliteUserRepository::new(&conn);

    let first = users.save(&User::new()).unwrap().user_id().unwrap();
    let second = users.save(&User::new()).unwrap().user_id().unwrap();
    users.delete_by_id(second).unwrap();
    let third = users.save(&User::new()).unwrap().user_id().unwrap();

    assert!(first < second);
    assert!(second < third, "deleted identities must not be reused");
}

#[test]
fn save_then_find_by_id_roundtrips_every_field() {
    let conn = open_db_in_memory().unwrap();
    let collection = seed_collection(&conn);
    let notes = SqliteNoteRepository::new(&conn);

    let saved = notes
        .save(&Note::new(
            collection.note_collection_id().unwrap(),
            "meeting",
            "discuss roadmap",
            Some("roadmap".to_string()),
        ))
        .unwrap();
    let loaded = notes.find_by_id(saved.note_id().unwrap()).unwrap().unwrap();

    assert_eq!(loaded, saved);
    assert_eq!(loaded.note_ai_abridgement(), Some("roadmap"));

    let collections = SqliteNoteCollectionRepository::new(&conn);
    let loaded_collection = collections
        .find_by_id(collection.note_collection_id().unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(loaded_collection, collection);
}

#[test]
fn saving_todo_note_returns_new_identity_and_unchanged_fields() {
    let conn = open_db_in_memory().unwrap();
    let collection = seed_collection(&conn);
    assert_eq!(collection.note_collection_id(), Some(1));
    let notes = SqliteNoteRepository::new(&conn);

    let saved = notes.save(&Note::new(1, "todo", "buy milk", None)).unwrap();

    assert!(saved.note_id().unwrap() > 0);
    assert_eq!(saved.note_collection_id(), 1);
    assert_eq!(saved.note_name(), "todo");
    assert_eq!(saved.note_all_content(), "buy milk");
    assert_eq!(saved.note_ai_abridgement(), None);
}

#[test]
fn save_with_identity_replaces_full_row() {
    let conn = open_db_in_memory().unwrap();
    let collection = seed_collection(&conn);
    let notes = SqliteNoteRepository::new(&conn);
    let collection_id = collection.note_collection_id().unwrap();

    let original = notes
        .save(&Note::new(collection_id, "draft", "first", Some("sum".to_string())))
        .unwrap();
    let note_id = original.note_id().unwrap();
    std::thread::sleep(std::time::Duration::from_millis(5));

    let replaced = notes
        .save(&Note::with_id(
            note_id,
            collection_id,
            "final",
            "second",
            None,
            original.audit(),
        ))
        .unwrap();

    assert_eq!(replaced.note_id(), Some(note_id));
    assert_eq!(replaced.note_name(), "final");
    assert_eq!(replaced.note_all_content(), "second");
    assert_eq!(replaced.note_ai_abridgement(), None, "replacement clears omitted fields");
    assert_eq!(replaced.audit().created_at(), original.audit().created_at());
    assert!(replaced.audit().updated_at() > original.audit().updated_at());
    assert_eq!(notes.count().unwrap(), 1);
}

#[test]
fn save_with_unknown_identity_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let collection = seed_collection(&conn);
    let notes = SqliteNoteRepository::new(&conn);

    let ghost = Note::with_id(
        42,
        collection.note_collection_id().unwrap(),
        "ghost",
        "boo",
        None,
        Default::default(),
    );
    let err = notes.save(&ghost).unwrap_err();

    assert!(matches!(err, RepoError::NotFound { entity: "note", id: 42 }));
    assert_eq!(notes.count().unwrap(), 0);
}

#[test]
fn save_rejects_invalid_entity_before_sql() {
    let conn = open_db_in_memory().unwrap();
    let collection = seed_collection(&conn);
    let notes = SqliteNoteRepository::new(&conn);

    let err = notes
        .save(&Note::new(
            collection.note_collection_id().unwrap(),
            " ",
            "content",
            None,
        ))
        .unwrap_err();

    assert!(matches!(
        err,
        RepoError::Validation(ModelValidationError::BlankName { entity: "note" })
    ));
    assert_eq!(notes.count().unwrap(), 0);
}

#[test]
fn delete_by_id_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let collection = seed_collection(&conn);
    let notes = SqliteNoteRepository::new(&conn);

    let saved = notes
        .save(&Note::new(
            collection.note_collection_id().unwrap(),
            "todo",
            "buy milk",
            None,
        ))
        .unwrap();
    let note_id = saved.note_id().unwrap();

    notes.delete_by_id(note_id).unwrap();
    assert!(notes.find_by_id(note_id).unwrap().is_none());

    notes.delete_by_id(note_id).unwrap();
    notes.delete_by_id(9_999).unwrap();
    assert!(notes.find_by_id(9_999).unwrap().is_none());
}

#[test]
fn find_all_and_count_cover_every_row_in_identity_order() {
    let conn = open_db_in_memory().unwrap();
    let users = SqliteUserRepository::new(&conn);
    assert_eq!(users.count().unwrap(), 0);
    assert!(users.find_all().unwrap().is_empty());

    for _ in 0..3 {
        users.save(&User::new()).unwrap();
    }

    let all = users.find_all().unwrap();
    let ids: Vec<i64> = all.iter().filter_map(User::user_id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(users.count().unwrap(), 3);
}
