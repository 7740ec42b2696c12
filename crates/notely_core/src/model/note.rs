//! Note entity.
//!
//! # Invariants
//! - Exactly one owning collection per note, fixed at creation.
//! - `note_ai_abridgement` is optional and produced outside this crate.

use crate::model::lazy_ref::LazyRef;
use crate::model::note_collection::{NoteCollection, NoteCollectionId};
use crate::model::{check_id, check_name, Audit, Entity, ModelValidationError};
use crate::repo::{RepoResult, Repository};
use serde::{Deserialize, Serialize};

pub type NoteId = i64;

/// Note body plus an optional machine-generated summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Note {
    note_id: Option<NoteId>,
    #[serde(rename = "noteCollectionId")]
    note_collection: LazyRef<NoteCollection>,
    note_name: String,
    note_all_content: String,
    note_ai_abridgement: Option<String>,
    #[serde(flatten)]
    audit: Audit,
}

impl Note {
    /// Creates an unsaved note inside `note_collection_id`.
    pub fn new(
        note_collection_id: NoteCollectionId,
        note_name: impl Into<String>,
        note_all_content: impl Into<String>,
        note_ai_abridgement: Option<String>,
    ) -> Self {
        Self {
            note_id: None,
            note_collection: LazyRef::new(note_collection_id),
            note_name: note_name.into(),
            note_all_content: note_all_content.into(),
            note_ai_abridgement,
            audit: Audit::default(),
        }
    }

    /// Full-argument constructor used for reconstruction and replacement.
    pub fn with_id(
        note_id: NoteId,
        note_collection_id: NoteCollectionId,
        note_name: impl Into<String>,
        note_all_content: impl Into<String>,
        note_ai_abridgement: Option<String>,
        audit: Audit,
    ) -> Self {
        Self {
            note_id: Some(note_id),
            note_collection: LazyRef::new(note_collection_id),
            note_name: note_name.into(),
            note_all_content: note_all_content.into(),
            note_ai_abridgement,
            audit,
        }
    }

    pub fn note_id(&self) -> Option<NoteId> {
        self.note_id
    }

    pub fn note_collection_id(&self) -> NoteCollectionId {
        self.note_collection.id()
    }

    /// Loads the owning collection on first call and caches it.
    pub fn note_collection<R>(&self, collections: &R) -> RepoResult<&NoteCollection>
    where
        R: Repository<NoteCollection> + ?Sized,
    {
        self.note_collection.resolve(collections)
    }

    pub fn cached_note_collection(&self) -> Option<&NoteCollection> {
        self.note_collection.get()
    }

    pub fn note_name(&self) -> &str {
        &self.note_name
    }

    pub fn note_all_content(&self) -> &str {
        &self.note_all_content
    }

    pub fn note_ai_abridgement(&self) -> Option<&str> {
        self.note_ai_abridgement.as_deref()
    }

    pub fn audit(&self) -> Audit {
        self.audit
    }
}

impl Entity for Note {
    type Id = NoteId;
    const NAME: &'static str = "note";

    fn id(&self) -> Option<NoteId> {
        self.note_id
    }

    fn validate(&self) -> Result<(), ModelValidationError> {
        check_id::<Self>(self.note_id)?;
        self.note_collection.validate(Self::NAME)?;
        check_name(Self::NAME, &self.note_name)
    }
}
