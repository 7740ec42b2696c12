//! Core persistence and response plumbing for notely.
//! Users own note collections, collections own notes; every use-case outcome
//! is returned in one uniform envelope.

pub mod db;
pub mod dto;
pub mod error_code;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use dto::{BaseResponse, Envelope, ErrorResponse};
pub use error_code::ErrorCode;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::lazy_ref::LazyRef;
pub use model::note::{Note, NoteId};
pub use model::note_collection::{NoteCollection, NoteCollectionId};
pub use model::user::{User, UserId};
pub use model::{Audit, Entity, ModelValidationError};
pub use repo::note_collection_repo::{NoteCollectionRepository, SqliteNoteCollectionRepository};
pub use repo::note_repo::{NoteRepository, SqliteNoteRepository};
pub use repo::sqlite_repo::SqliteRepository;
pub use repo::user_repo::SqliteUserRepository;
pub use repo::{RepoError, RepoResult, Repository};
pub use service::notebook_service::{NotebookService, NotebookStats};

/// Health-check probe used by the CLI.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
