//! Draft collection port.

use crate::work::domain::{Draft, DraftId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for draft store operations.
pub type DraftStoreResult<T> = Result<T, DraftStoreError>;

/// Persistence contract for the draft collection of one owner.
///
/// The collection is not partitioned by work; callers filter by
/// [`Draft::work_id`].
#[async_trait]
pub trait DraftStore: Send + Sync {
    /// Returns every draft, refetching from the backing store when `reload`
    /// is set.
    async fn all(&self, reload: bool) -> DraftStoreResult<Vec<Draft>>;

    /// Inserts a new draft.
    async fn insert(&self, draft: &Draft) -> DraftStoreResult<()>;

    /// Replaces the stored draft with the same identifier.
    ///
    /// Replacing with an identical payload leaves the collection unchanged.
    async fn replace(&self, draft: &Draft) -> DraftStoreResult<()>;

    /// Hard-deletes `draft`, returning `false` when it was already absent.
    async fn remove(&self, draft: &Draft) -> DraftStoreResult<bool>;
}

/// Errors returned by draft store implementations.
#[derive(Debug, Clone, Error)]
pub enum DraftStoreError {
    /// A draft with the same identifier already exists.
    #[error("duplicate draft identifier: {0}")]
    DuplicateDraft(DraftId),

    /// The draft to replace was not found.
    #[error("draft not found: {0}")]
    NotFound(DraftId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl DraftStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
