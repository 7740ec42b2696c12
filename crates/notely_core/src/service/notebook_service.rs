//! Notebook use-case service.
//!
//! # Invariants
//! - Parent existence is checked before child writes and child listings.
//! - Updates are full replacements built from the stored row; owners are
//!   carried over unchanged.
//! - Deletes succeed whether or not the identity existed.

use crate::dto::Envelope;
use crate::model::note::{Note, NoteId};
use crate::model::note_collection::{NoteCollection, NoteCollectionId};
use crate::model::user::{User, UserId};
use crate::model::Entity;
use crate::repo::note_collection_repo::NoteCollectionRepository;
use crate::repo::note_repo::NoteRepository;
use crate::repo::{RepoError, RepoResult, Repository};
use serde::Serialize;

/// Row counts across the notebook tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotebookStats {
    pub users: u64,
    pub note_collections: u64,
    pub notes: u64,
}

/// Facade over the user, collection and note repositories.
pub struct NotebookService<U, C, N> {
    users: U,
    collections: C,
    notes: N,
}

impl<U, C, N> NotebookService<U, C, N>
where
    U: Repository<User>,
    C: NoteCollectionRepository,
    N: NoteRepository,
{
    pub fn new(users: U, collections: C, notes: N) -> Self {
        Self {
            users,
            collections,
            notes,
        }
    }

    pub fn register_user(&self) -> Envelope<User> {
        Envelope::from_result(self.users.save(&User::new()))
    }

    pub fn get_user(&self, user_id: UserId) -> Envelope<User> {
        Envelope::from_result(self.require_user(user_id))
    }

    pub fn list_users(&self) -> Envelope<Vec<User>> {
        Envelope::from_result(self.users.find_all())
    }

    /// Fails with `ENTITY_STILL_REFERENCED` while the user owns collections.
    pub fn delete_user(&self, user_id: UserId) -> Envelope<()> {
        void(self.users.delete_by_id(user_id))
    }

    pub fn create_collection(
        &self,
        user_id: UserId,
        name: impl Into<String>,
    ) -> Envelope<NoteCollection> {
        let name = name.into();
        Envelope::from_result(self.require_user(user_id).and_then(|_| {
            self.collections
                .save(&NoteCollection::new(user_id, name))
        }))
    }

    pub fn get_collection(&self, collection_id: NoteCollectionId) -> Envelope<NoteCollection> {
        Envelope::from_result(self.require_collection(collection_id))
    }

    pub fn list_collections(&self, user_id: UserId) -> Envelope<Vec<NoteCollection>> {
        Envelope::from_result(
            self.require_user(user_id)
                .and_then(|_| self.collections.find_by_user_id(user_id)),
        )
    }

    pub fn rename_collection(
        &self,
        collection_id: NoteCollectionId,
        name: impl Into<String>,
    ) -> Envelope<NoteCollection> {
        let name = name.into();
        Envelope::from_result(self.require_collection(collection_id).and_then(|stored| {
            self.collections.save(&NoteCollection::with_id(
                collection_id,
                stored.user_id(),
                name,
                stored.audit(),
            ))
        }))
    }

    /// Fails with `ENTITY_STILL_REFERENCED` while the collection holds notes.
    pub fn delete_collection(&self, collection_id: NoteCollectionId) -> Envelope<()> {
        void(self.collections.delete_by_id(collection_id))
    }

    pub fn create_note(
        &self,
        collection_id: NoteCollectionId,
        name: impl Into<String>,
        content: impl Into<String>,
        abridgement: Option<String>,
    ) -> Envelope<Note> {
        let note = Note::new(collection_id, name, content, abridgement);
        Envelope::from_result(
            self.require_collection(collection_id)
                .and_then(|_| self.notes.save(&note)),
        )
    }

    pub fn get_note(&self, note_id: NoteId) -> Envelope<Note> {
        Envelope::from_result(self.require_note(note_id))
    }

    pub fn list_notes(&self, collection_id: NoteCollectionId) -> Envelope<Vec<Note>> {
        Envelope::from_result(
            self.require_collection(collection_id)
                .and_then(|_| self.notes.find_by_collection_id(collection_id)),
        )
    }

    /// Replaces name, content and abridgement of an existing note.
    pub fn replace_note(
        &self,
        note_id: NoteId,
        name: impl Into<String>,
        content: impl Into<String>,
        abridgement: Option<String>,
    ) -> Envelope<Note> {
        let (name, content) = (name.into(), content.into());
        Envelope::from_result(self.require_note(note_id).and_then(|stored| {
            self.notes.save(&Note::with_id(
                note_id,
                stored.note_collection_id(),
                name,
                content,
                abridgement,
                stored.audit(),
            ))
        }))
    }

    pub fn delete_note(&self, note_id: NoteId) -> Envelope<()> {
        void(self.notes.delete_by_id(note_id))
    }

    /// Walks note -> collection -> user through the lazy parent links.
    pub fn note_owner(&self, note_id: NoteId) -> Envelope<User> {
        Envelope::from_result(self.require_note(note_id).and_then(|note| {
            let collection = note.note_collection(&self.collections)?;
            collection.user(&self.users).cloned()
        }))
    }

    pub fn stats(&self) -> Envelope<NotebookStats> {
        Envelope::from_result(self.count_all())
    }

    fn count_all(&self) -> RepoResult<NotebookStats> {
        Ok(NotebookStats {
            users: self.users.count()?,
            note_collections: self.collections.count()?,
            notes: self.notes.count()?,
        })
    }

    fn require_user(&self, user_id: UserId) -> RepoResult<User> {
        require(self.users.find_by_id(user_id)?, user_id)
    }

    fn require_collection(&self, collection_id: NoteCollectionId) -> RepoResult<NoteCollection> {
        require(self.collections.find_by_id(collection_id)?, collection_id)
    }

    fn require_note(&self, note_id: NoteId) -> RepoResult<Note> {
        require(self.notes.find_by_id(note_id)?, note_id)
    }
}

fn require<E: Entity>(found: Option<E>, id: E::Id) -> RepoResult<E> {
    found.ok_or(RepoError::NotFound {
        entity: E::NAME,
        id: id.into(),
    })
}

fn void(result: RepoResult<()>) -> Envelope<()> {
    match result {
        Ok(()) => Envelope::void_success(),
        Err(err) => Envelope::from_error(&err),
    }
}
