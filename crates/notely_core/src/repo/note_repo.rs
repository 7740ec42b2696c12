//! Note table mapping and collection queries.
//!
//! # Invariants
//! - `note_collection_id` must reference an existing collection.
//! - `note_ai_abridgement` round-trips `NULL` as `None`.

use crate::model::note::Note;
use crate::model::note_collection::NoteCollectionId;
use crate::model::Entity;
use crate::repo::sqlite_repo::{audit_from_row, ParentColumn, SqliteRepository, SqliteTable};
use crate::repo::{RepoError, RepoResult, Repository};
use rusqlite::types::Value;
use rusqlite::Row;

pub type SqliteNoteRepository<'conn> = SqliteRepository<'conn, Note>;

/// Note repository with collection-based criteria queries.
pub trait NoteRepository: Repository<Note> {
    fn find_by_collection_id(&self, collection_id: NoteCollectionId) -> RepoResult<Vec<Note>>;
    fn count_by_collection_id(&self, collection_id: NoteCollectionId) -> RepoResult<u64>;
}

impl SqliteTable for Note {
    const TABLE: &'static str = "note";
    const ID_COLUMN: &'static str = "note_id";
    const COLUMNS: &'static [&'static str] = &[
        "note_collection_id",
        "note_name",
        "note_all_content",
        "note_ai_abridgement",
    ];
    const PARENT: Option<ParentColumn> = Some(ParentColumn {
        column: "note_collection_id",
        entity: "note_collection",
    });

    fn column_values(&self) -> Vec<Value> {
        vec![
            Value::Integer(self.note_collection_id()),
            Value::Text(self.note_name().to_string()),
            Value::Text(self.note_all_content().to_string()),
            self.note_ai_abridgement()
                .map_or(Value::Null, |text| Value::Text(text.to_string())),
        ]
    }

    fn parent_id(&self) -> Option<i64> {
        Some(self.note_collection_id())
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        let note = Note::with_id(
            row.get("note_id")?,
            row.get("note_collection_id")?,
            row.get::<_, String>("note_name")?,
            row.get::<_, String>("note_all_content")?,
            row.get("note_ai_abridgement")?,
            audit_from_row(row)?,
        );
        note.validate()
            .map_err(|err| RepoError::InvalidData(err.to_string()))?;
        Ok(note)
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn find_by_collection_id(&self, collection_id: NoteCollectionId) -> RepoResult<Vec<Note>> {
        self.find_where("note_collection_id", collection_id)
    }

    fn count_by_collection_id(&self, collection_id: NoteCollectionId) -> RepoResult<u64> {
        self.count_where("note_collection_id", collection_id)
    }
}
