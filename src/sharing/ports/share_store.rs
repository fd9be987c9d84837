//! Share store port.

use crate::sharing::domain::{DestinationType, ShareDiff, ShareNode};
use crate::target::domain::TargetId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for share store operations.
pub type ShareStoreResult<T> = Result<T, ShareStoreError>;

/// Persistence contract for shares keyed by team and destination type.
#[async_trait]
pub trait ShareStore: Send + Sync {
    /// Returns the nodes currently holding the share.
    async fn load_baseline(
        &self,
        team: TargetId,
        destination: DestinationType,
    ) -> ShareStoreResult<Vec<ShareNode>>;

    /// Applies `diff` to the persisted share.
    async fn commit(
        &self,
        team: TargetId,
        destination: DestinationType,
        diff: &ShareDiff,
    ) -> ShareStoreResult<()>;
}

/// Errors returned by share store implementations.
#[derive(Debug, Clone, Error)]
pub enum ShareStoreError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ShareStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
