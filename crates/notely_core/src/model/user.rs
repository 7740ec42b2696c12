//! User entity.

use crate::model::{check_id, Audit, Entity, ModelValidationError};
use serde::{Deserialize, Serialize};

pub type UserId = i64;

/// Owner of note collections. Carries identity and audit metadata only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    user_id: Option<UserId>,
    #[serde(flatten)]
    audit: Audit,
}

impl User {
    /// Creates an unsaved user; the store assigns its id on first save.
    pub fn new() -> Self {
        Self::default()
    }

    /// Full-argument constructor used for reconstruction and replacement.
    pub fn with_id(user_id: UserId, audit: Audit) -> Self {
        Self {
            user_id: Some(user_id),
            audit,
        }
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    pub fn audit(&self) -> Audit {
        self.audit
    }
}

impl Entity for User {
    type Id = UserId;
    const NAME: &'static str = "user";

    fn id(&self) -> Option<UserId> {
        self.user_id
    }

    fn validate(&self) -> Result<(), ModelValidationError> {
        check_id::<Self>(self.user_id)
    }
}
