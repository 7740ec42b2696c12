//! Note collection table mapping and owner queries.
//!
//! # Invariants
//! - `user_id` must reference an existing user (enforced by the store).
//! - Owner queries return rows in ascending identity order.

use crate::model::note_collection::NoteCollection;
use crate::model::user::UserId;
use crate::model::Entity;
use crate::repo::sqlite_repo::{audit_from_row, ParentColumn, SqliteRepository, SqliteTable};
use crate::repo::{RepoError, RepoResult, Repository};
use rusqlite::types::Value;
use rusqlite::Row;

pub type SqliteNoteCollectionRepository<'conn> = SqliteRepository<'conn, NoteCollection>;

/// Collection repository with owner-based criteria queries.
pub trait NoteCollectionRepository: Repository<NoteCollection> {
    /// Collections owned by `user_id`; empty when the user has none or does not exist.
    fn find_by_user_id(&self, user_id: UserId) -> RepoResult<Vec<NoteCollection>>;
    fn count_by_user_id(&self, user_id: UserId) -> RepoResult<u64>;
}

impl SqliteTable for NoteCollection {
    const TABLE: &'static str = "note_collection";
    const ID_COLUMN: &'static str = "note_collection_id";
    const COLUMNS: &'static [&'static str] = &["user_id", "note_collection_name"];
    const PARENT: Option<ParentColumn> = Some(ParentColumn {
        column: "user_id",
        entity: "user",
    });

    fn column_values(&self) -> Vec<Value> {
        vec![
            Value::Integer(self.user_id()),
            Value::Text(self.note_collection_name().to_string()),
        ]
    }

    fn parent_id(&self) -> Option<i64> {
        Some(self.user_id())
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        let collection = NoteCollection::with_id(
            row.get("note_collection_id")?,
            row.get("user_id")?,
            row.get::<_, String>("note_collection_name")?,
            audit_from_row(row)?,
        );
        collection
            .validate()
            .map_err(|err| RepoError::InvalidData(err.to_string()))?;
        Ok(collection)
    }
}

impl NoteCollectionRepository for SqliteNoteCollectionRepository<'_> {
    fn find_by_user_id(&self, user_id: UserId) -> RepoResult<Vec<NoteCollection>> {
        self.find_where("user_id", user_id)
    }

    fn count_by_user_id(&self, user_id: UserId) -> RepoResult<u64> {
        self.count_where("user_id", user_id)
    }
}
