use notely_core::db::open_db_in_memory;
use notely_core::{
    Note, NoteCollection, NoteCollectionRepository, NoteRepository, RepoError, RepoResult,
    Repository, SqliteNoteCollectionRepository, SqliteNoteRepository, SqliteUserRepository, User,
};
use std::cell::Cell;

/// Counts lookups so tests can tell cache hits from store reads.
struct CountingUsers<'conn> {
    inner: SqliteUserRepository<'conn>,
    lookups: Cell<u32>,
}

impl Repository<User> for CountingUsers<'_> {
    fn save(&self, entity: &User) -> RepoResult<User> {
        self.inner.save(entity)
    }

    fn find_by_id(&self, id: i64) -> RepoResult<Option<User>> {
        self.lookups.set(self.lookups.get() + 1);
        self.inner.find_by_id(id)
    }

    fn find_all(&self) -> RepoResult<Vec<User>> {
        self.inner.find_all()
    }

    fn delete_by_id(&self, id: i64) -> RepoResult<()> {
        self.inner.delete_by_id(id)
    }

    fn count(&self) -> RepoResult<u64> {
        self.inner.count()
    }
}

#[test]
fn collection_with_unknown_owner_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let collections = SqliteNoteCollectionRepository::new(&conn);

    let err = collections
        .save(&NoteCollection::new(77, "orphan"))
        .unwrap_err();

    assert!(matches!(
        err,
        RepoError::MissingParent {
            entity: "note_collection",
            parent: "user",
            parent_id: 77,
        }
    ));
    assert_eq!(collections.count().unwrap(), 0);
}

#[test]
fn note_with_unknown_collection_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let notes = SqliteNoteRepository::new(&conn);

    let err = notes.save(&Note::new(5, "todo", "buy milk", None)).unwrap_err();

    assert!(matches!(
        err,
        RepoError::MissingParent {
            parent: "note_collection",
            parent_id: 5,
            ..
        }
    ));
}

#[test]
fn owner_is_loaded_on_demand_and_cached() {
    let conn = open_db_in_memory().unwrap();
    let users = CountingUsers {
        inner: SqliteUserRepository::new(&conn),
        lookups: Cell::new(0),
    };
    let owner = users.save(&User::new()).unwrap();
    let collections = SqliteNoteCollectionRepository::new(&conn);
    let saved = collections
        .save(&NoteCollection::new(owner.user_id().unwrap(), "inbox"))
        .unwrap();

    let loaded = collections
        .find_by_id(saved.note_collection_id().unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(loaded.user_id(), owner.user_id().unwrap());
    assert!(loaded.cached_user().is_none());
    assert_eq!(users.lookups.get(), 0);

    let resolved = loaded.user(&users).unwrap();
    assert_eq!(resolved, &owner);
    assert_eq!(users.lookups.get(), 1);

    loaded.user(&users).unwrap();
    assert_eq!(users.lookups.get(), 1, "second access must hit the cache");
    assert_eq!(loaded.cached_user(), Some(&owner));
}

#[test]
fn resolving_a_note_collection_chain_reaches_the_user() {
    let conn = open_db_in_memory().unwrap();
    let users = SqliteUserRepository::new(&conn);
    let collections = SqliteNoteCollectionRepository::new(&conn);
    let notes = SqliteNoteRepository::new(&conn);

    let owner = users.save(&User::new()).unwrap();
    let collection = collections
        .save(&NoteCollection::new(owner.user_id().unwrap(), "work"))
        .unwrap();
    let note = notes
        .save(&Note::new(
            collection.note_collection_id().unwrap(),
            "todo",
            "ship it",
            None,
        ))
        .unwrap();

    let parent = note.note_collection(&collections).unwrap();
    assert_eq!(parent.note_collection_name(), "work");
    assert_eq!(parent.user(&users).unwrap(), &owner);
}

#[test]
fn owner_cannot_be_reassigned_through_replacement() {
    let conn = open_db_in_memory().unwrap();
    let users = SqliteUserRepository::new(&conn);
    let collections = SqliteNoteCollectionRepository::new(&conn);

    let alice = users.save(&User::new()).unwrap().user_id().unwrap();
    let bob = users.save(&User::new()).unwrap().user_id().unwrap();
    let saved = collections.save(&NoteCollection::new(alice, "inbox")).unwrap();
    let id = saved.note_collection_id().unwrap();

    let err = collections
        .save(&NoteCollection::with_id(id, bob, "inbox", saved.audit()))
        .unwrap_err();

    assert!(matches!(
        err,
        RepoError::OwnerReassignment {
            entity: "note_collection",
            ..
        }
    ));
    let stored = collections.find_by_id(id).unwrap().unwrap();
    assert_eq!(stored.user_id(), alice);
}

#[test]
fn referenced_parents_cannot_be_deleted() {
    let conn = open_db_in_memory().unwrap();
    let users = SqliteUserRepository::new(&conn);
    let collections = SqliteNoteCollectionRepository::new(&conn);

    let user_id = users.save(&User::new()).unwrap().user_id().unwrap();
    collections.save(&NoteCollection::new(user_id, "inbox")).unwrap();

    let err = users.delete_by_id(user_id).unwrap_err();

    assert!(matches!(
        err,
        RepoError::StillReferenced { entity: "user", id } if id == user_id
    ));
    assert!(users.find_by_id(user_id).unwrap().is_some());
    assert_eq!(collections.count().unwrap(), 1, "no cascade happens");
}

#[test]
fn resolving_a_deleted_parent_reports_not_found() {
    let conn = open_db_in_memory().unwrap();
    let users = SqliteUserRepository::new(&conn);

    let detached = NoteCollection::with_id(1, 404, "stale", Default::default());
    let err = detached.user(&users).unwrap_err();

    assert!(matches!(err, RepoError::NotFound { entity: "user", id: 404 }));
    assert!(detached.cached_user().is_none());
}

#[test]
fn criteria_queries_filter_by_parent() {
    let conn = open_db_in_memory().unwrap();
    let users = SqliteUserRepository::new(&conn);
    let collections = SqliteNoteCollectionRepository::new(&conn);
    let notes = SqliteNoteRepository::new(&conn);

    let alice = users.save(&User::new()).unwrap().user_id().unwrap();
    let bob = users.save(&User::new()).unwrap().user_id().unwrap();
    let work = collections.save(&NoteCollection::new(alice, "work")).unwrap();
    collections.save(&NoteCollection::new(alice, "home")).unwrap();
    let travel = collections.save(&NoteCollection::new(bob, "travel")).unwrap();

    let alice_collections = collections.find_by_user_id(alice).unwrap();
    let names: Vec<&str> = alice_collections
        .iter()
        .map(NoteCollection::note_collection_name)
        .collect();
    assert_eq!(names, vec!["work", "home"]);
    assert_eq!(collections.count_by_user_id(bob).unwrap(), 1);
    assert!(collections.find_by_user_id(999).unwrap().is_empty());

    let work_id = work.note_collection_id().unwrap();
    notes.save(&Note::new(work_id, "a", "one", None)).unwrap();
    notes.save(&Note::new(work_id, "b", "two", None)).unwrap();
    notes
        .save(&Note::new(travel.note_collection_id().unwrap(), "c", "three", None))
        .unwrap();

    assert_eq!(notes.find_by_collection_id(work_id).unwrap().len(), 2);
    assert_eq!(notes.count_by_collection_id(work_id).unwrap(), 2);
    assert_eq!(notes.count().unwrap(), 3);
}
