//! On-demand parent references.
//!
//! # Responsibility
//! - Store only the foreign id of a parent entity by default.
//! - Resolve the parent through a repository on first access and keep it.
//!
//! # Invariants
//! - The foreign id never changes for the lifetime of a `LazyRef`.
//! - Equality and serialization look at the foreign id only, never at the
//!   cache, so a resolved and an unresolved reference compare equal.

use crate::model::{Entity, ModelValidationError};
use crate::repo::{RepoError, RepoResult, Repository};
use once_cell::unsync::OnceCell;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Debug, Formatter};

/// Foreign id of a parent `P` plus a write-once cache of the loaded row.
pub struct LazyRef<P: Entity> {
    id: P::Id,
    cached: OnceCell<P>,
}

impl<P: Entity> LazyRef<P> {
    /// Creates an unresolved reference to the parent with `id`.
    pub fn new(id: P::Id) -> Self {
        Self {
            id,
            cached: OnceCell::new(),
        }
    }

    /// Foreign id as stored in the child row.
    pub fn id(&self) -> P::Id {
        self.id
    }

    /// Returns the parent only if an earlier call already resolved it.
    pub fn get(&self) -> Option<&P> {
        self.cached.get()
    }

    pub fn is_loaded(&self) -> bool {
        self.cached.get().is_some()
    }

    /// Loads the parent through `repo` on first use; later calls hit the cache.
    ///
    /// # Errors
    /// - `RepoError::NotFound` when the parent row no longer exists.
    /// - Any repository error raised by the lookup. Failures are not cached.
    pub fn resolve<R>(&self, repo: &R) -> RepoResult<&P>
    where
        R: Repository<P> + ?Sized,
    {
        self.cached.get_or_try_init(|| {
            repo.find_by_id(self.id)?.ok_or(RepoError::NotFound {
                entity: P::NAME,
                id: self.id.into(),
            })
        })
    }

    pub(crate) fn validate(&self, child: &'static str) -> Result<(), ModelValidationError> {
        let id: i64 = self.id.into();
        if id <= 0 {
            return Err(ModelValidationError::NonPositiveReference {
                entity: child,
                parent: P::NAME,
                id,
            });
        }
        Ok(())
    }
}

impl<P: Entity> Clone for LazyRef<P>
where
    P: Clone,
{
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            cached: self.cached.clone(),
        }
    }
}

impl<P: Entity> PartialEq for LazyRef<P> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<P: Entity> Eq for LazyRef<P> {}

impl<P: Entity> Debug for LazyRef<P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyRef")
            .field("entity", &P::NAME)
            .field("id", &self.id)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

impl<P: Entity> Default for LazyRef<P>
where
    P::Id: Default,
{
    fn default() -> Self {
        Self::new(P::Id::default())
    }
}

impl<P: Entity> Serialize for LazyRef<P>
where
    P::Id: Serialize,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.id.serialize(serializer)
    }
}

impl<'de, P: Entity> Deserialize<'de> for LazyRef<P>
where
    P::Id: Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        P::Id::deserialize(deserializer).map(Self::new)
    }
}
