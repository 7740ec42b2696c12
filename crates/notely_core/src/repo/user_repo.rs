//! User table mapping.

use crate::model::user::User;
use crate::repo::sqlite_repo::{audit_from_row, SqliteRepository, SqliteTable};
use crate::repo::RepoResult;
use rusqlite::types::Value;
use rusqlite::Row;

/// SQLite repository for users.
pub type SqliteUserRepository<'conn> = SqliteRepository<'conn, User>;

impl SqliteTable for User {
    const TABLE: &'static str = "\"user\"";
    const ID_COLUMN: &'static str = "user_id";
    const COLUMNS: &'static [&'static str] = &[];

    fn column_values(&self) -> Vec<Value> {
        Vec::new()
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        Ok(User::with_id(row.get("user_id")?, audit_from_row(row)?))
    }
}
