//! Note collection entity.
//!
//! # Invariants
//! - Exactly one owning user per collection, fixed at creation.
//! - `note_collection_name` is never blank.

use crate::model::lazy_ref::LazyRef;
use crate::model::user::{User, UserId};
use crate::model::{check_id, check_name, Audit, Entity, ModelValidationError};
use crate::repo::{RepoResult, Repository};
use serde::{Deserialize, Serialize};

pub type NoteCollectionId = i64;

/// Named group of notes owned by one user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NoteCollection {
    note_collection_id: Option<NoteCollectionId>,
    #[serde(rename = "userId")]
    user: LazyRef<User>,
    note_collection_name: String,
    #[serde(flatten)]
    audit: Audit,
}

impl NoteCollection {
    /// Creates an unsaved collection owned by `user_id`.
    pub fn new(user_id: UserId, note_collection_name: impl Into<String>) -> Self {
        Self {
            note_collection_id: None,
            user: LazyRef::new(user_id),
            note_collection_name: note_collection_name.into(),
            audit: Audit::default(),
        }
    }

    /// Full-argument constructor used for reconstruction and replacement.
    pub fn with_id(
        note_collection_id: NoteCollectionId,
        user_id: UserId,
        note_collection_name: impl Into<String>,
        audit: Audit,
    ) -> Self {
        Self {
            note_collection_id: Some(note_collection_id),
            user: LazyRef::new(user_id),
            note_collection_name: note_collection_name.into(),
            audit,
        }
    }

    pub fn note_collection_id(&self) -> Option<NoteCollectionId> {
        self.note_collection_id
    }

    /// Owner id as stored; does not touch the store.
    pub fn user_id(&self) -> UserId {
        self.user.id()
    }

    /// Loads the owning user on first call and caches it.
    pub fn user<R>(&self, users: &R) -> RepoResult<&User>
    where
        R: Repository<User> + ?Sized,
    {
        self.user.resolve(users)
    }

    /// Owner if an earlier `user()` call already resolved it.
    pub fn cached_user(&self) -> Option<&User> {
        self.user.get()
    }

    pub fn note_collection_name(&self) -> &str {
        &self.note_collection_name
    }

    pub fn audit(&self) -> Audit {
        self.audit
    }
}

impl Entity for NoteCollection {
    type Id = NoteCollectionId;
    const NAME: &'static str = "note_collection";

    fn id(&self) -> Option<NoteCollectionId> {
        self.note_collection_id
    }

    fn validate(&self) -> Result<(), ModelValidationError> {
        check_id::<Self>(self.note_collection_id)?;
        self.user.validate(Self::NAME)?;
        check_name(Self::NAME, &self.note_collection_name)
    }
}
