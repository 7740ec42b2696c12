//! Notebook entity model: users own collections, collections own notes.
//!
//! # Responsibility
//! - Define the persisted records and their read-only accessors.
//! - Carry parent links as foreign ids with on-demand resolution.
//!
//! # Invariants
//! - Identities are server-assigned positive integers; `None` means unsaved.
//! - Audit timestamps are owned by the store and never written by callers.
//! - Parent links cannot be changed through the entity surface.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

pub mod lazy_ref;
pub mod note;
pub mod note_collection;
pub mod user;

/// A persisted record with a server-assigned identity.
pub trait Entity: Sized {
    /// Identity type. Every notebook table uses SQLite rowids.
    type Id: Copy + Eq + Debug + Display + Into<i64>;

    /// Stable entity name used in errors and log events.
    const NAME: &'static str;

    /// Returns the identity, or `None` when the record was never persisted.
    fn id(&self) -> Option<Self::Id>;

    /// Checks field-level invariants before a write.
    fn validate(&self) -> Result<(), ModelValidationError>;
}

/// Store-managed audit metadata, in epoch milliseconds.
///
/// Both fields read as `0` until the row is persisted, so payloads for
/// unsaved entities may omit them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Audit {
    created_at: i64,
    updated_at: i64,
}

impl Audit {
    pub fn new(created_at: i64, updated_at: i64) -> Self {
        Self {
            created_at,
            updated_at,
        }
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn updated_at(&self) -> i64 {
        self.updated_at
    }
}

/// Field-level invariant violations raised before persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValidationError {
    /// A name field is empty or whitespace only.
    BlankName { entity: &'static str },
    /// A present identity is zero or negative.
    NonPositiveId { entity: &'static str, id: i64 },
    /// A parent reference is zero or negative.
    NonPositiveReference {
        entity: &'static str,
        parent: &'static str,
        id: i64,
    },
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName { entity } => write!(f, "{entity} name must not be blank"),
            Self::NonPositiveId { entity, id } => {
                write!(f, "{entity} id must be positive, got {id}")
            }
            Self::NonPositiveReference { entity, parent, id } => {
                write!(f, "{entity} must reference a positive {parent} id, got {id}")
            }
        }
    }
}

impl Error for ModelValidationError {}

pub(crate) fn check_id<E: Entity>(id: Option<E::Id>) -> Result<(), ModelValidationError> {
    let id: Option<i64> = id.map(Into::into);
    match id {
        Some(value) if value <= 0 => Err(ModelValidationError::NonPositiveId {
            entity: E::NAME,
            id: value,
        }),
        _ => Ok(()),
    }
}

pub(crate) fn check_name(entity: &'static str, name: &str) -> Result<(), ModelValidationError> {
    if name.trim().is_empty() {
        return Err(ModelValidationError::BlankName { entity });
    }
    Ok(())
}
