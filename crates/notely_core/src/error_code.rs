//! Error code registry.
//!
//! # Responsibility
//! - Hold the `(code, name, message)` triples identifying failure categories.
//! - Translate repository failures into registry entries at the boundary.
//!
//! # Invariants
//! - Entries are `static` and shared by reference; they are never mutated.
//! - Codes are correct by convention; nothing checks them at runtime.

use crate::model::note::Note;
use crate::model::note_collection::NoteCollection;
use crate::model::user::User;
use crate::model::Entity;
use crate::repo::RepoError;

/// One registered failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorCode {
    code: i32,
    name: &'static str,
    message: &'static str,
}

impl ErrorCode {
    pub const fn new(code: i32, name: &'static str, message: &'static str) -> Self {
        Self {
            code,
            name,
            message,
        }
    }

    pub fn code(&self) -> i32 {
        self.code
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn message(&self) -> &'static str {
        self.message
    }

    /// Registry entry describing `err`.
    pub fn for_repo_error(err: &RepoError) -> &'static ErrorCode {
        match err {
            RepoError::Validation(_) => &INVALID_ENTITY,
            RepoError::NotFound { entity, .. } => not_found(entity),
            RepoError::MissingParent { parent, .. } => not_found(parent),
            RepoError::OwnerReassignment { .. } => &OWNER_REASSIGNMENT,
            RepoError::StillReferenced { .. } => &ENTITY_STILL_REFERENCED,
            RepoError::Db(_) => &DATABASE_ERROR,
            RepoError::InvalidData(_) => &INVALID_PERSISTED_DATA,
        }
    }
}

pub static INVALID_ENTITY: ErrorCode =
    ErrorCode::new(400, "INVALID_ENTITY", "request entity failed validation");
pub static OWNER_REASSIGNMENT: ErrorCode = ErrorCode::new(
    400,
    "OWNER_REASSIGNMENT",
    "owner of an existing record cannot be changed",
);
pub static USER_NOT_FOUND: ErrorCode =
    ErrorCode::new(404, "USER_NOT_FOUND", "user does not exist");
pub static NOTE_COLLECTION_NOT_FOUND: ErrorCode = ErrorCode::new(
    404,
    "NOTE_COLLECTION_NOT_FOUND",
    "note collection does not exist",
);
pub static NOTE_NOT_FOUND: ErrorCode =
    ErrorCode::new(404, "NOTE_NOT_FOUND", "note does not exist");
pub static ENTITY_STILL_REFERENCED: ErrorCode = ErrorCode::new(
    409,
    "ENTITY_STILL_REFERENCED",
    "record still has dependent records",
);
pub static DATABASE_ERROR: ErrorCode =
    ErrorCode::new(500, "DATABASE_ERROR", "storage operation failed");
pub static INVALID_PERSISTED_DATA: ErrorCode = ErrorCode::new(
    500,
    "INVALID_PERSISTED_DATA",
    "stored record could not be read",
);

/// Not-found entry for an entity name; unknown names fall back to storage.
pub fn not_found(entity: &str) -> &'static ErrorCode {
    if entity == User::NAME {
        &USER_NOT_FOUND
    } else if entity == NoteCollection::NAME {
        &NOTE_COLLECTION_NOT_FOUND
    } else if entity == Note::NAME {
        &NOTE_NOT_FOUND
    } else {
        &DATABASE_ERROR
    }
}
