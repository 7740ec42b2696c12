//! Repository layer: data-access contracts and their SQLite implementation.
//!
//! # Responsibility
//! - Define the generic CRUD contract shared by every entity.
//! - Keep SQL and constraint translation inside this module.
//!
//! # Invariants
//! - Writes call `Entity::validate()` before touching SQL.
//! - `save` returns the read-back row, never the caller's input.
//! - `delete_by_id` is idempotent; no cascade is performed.

use crate::db::DbError;
use crate::model::{Entity, ModelValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod note_collection_repo;
pub mod note_repo;
pub mod sqlite_repo;
pub mod user_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Failures raised by repository operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ModelValidationError),
    Db(DbError),
    /// Row with this identity does not exist.
    NotFound { entity: &'static str, id: i64 },
    /// Write referenced a parent row that does not exist.
    MissingParent {
        entity: &'static str,
        parent: &'static str,
        parent_id: i64,
    },
    /// Full replacement tried to move a row to another parent.
    OwnerReassignment { entity: &'static str, id: i64 },
    /// Delete blocked because child rows still reference this one.
    StillReferenced { entity: &'static str, id: i64 },
    /// Persisted row cannot be mapped back to a valid entity.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::MissingParent {
                entity,
                parent,
                parent_id,
            } => write!(f, "{entity} references missing {parent}: {parent_id}"),
            Self::OwnerReassignment { entity, id } => {
                write!(f, "{entity} {id} cannot change its owner")
            }
            Self::StillReferenced { entity, id } => {
                write!(f, "{entity} {id} is still referenced by child rows")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ModelValidationError> for RepoError {
    fn from(value: ModelValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Generic CRUD contract implemented once per entity type.
pub trait Repository<E: Entity> {
    /// Inserts when `entity.id()` is `None`, otherwise replaces the full row.
    fn save(&self, entity: &E) -> RepoResult<E>;
    fn find_by_id(&self, id: E::Id) -> RepoResult<Option<E>>;
    /// Returns every row in ascending identity order.
    fn find_all(&self) -> RepoResult<Vec<E>>;
    /// Removes the row; a missing identity is not an error.
    fn delete_by_id(&self, id: E::Id) -> RepoResult<()>;
    fn count(&self) -> RepoResult<u64>;
}
