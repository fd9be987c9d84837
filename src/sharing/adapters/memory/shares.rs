//! In-memory share store.

use crate::sharing::{
    domain::{DestinationType, ShareDiff, ShareNode},
    ports::{ShareStore, ShareStoreError, ShareStoreResult},
};
use crate::target::domain::TargetId;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

type ShareKey = (TargetId, DestinationType);

/// Thread-safe in-memory share store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryShareStore {
    shares: Arc<RwLock<HashMap<ShareKey, Vec<ShareNode>>>>,
}

impl InMemoryShareStore {
    /// Creates an empty share store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned(err: impl ToString) -> ShareStoreError {
        ShareStoreError::persistence(std::io::Error::other(err.to_string()))
    }
}

#[async_trait]
impl ShareStore for InMemoryShareStore {
    async fn load_baseline(
        &self,
        team: TargetId,
        destination: DestinationType,
    ) -> ShareStoreResult<Vec<ShareNode>> {
        let shares = self.shares.read().map_err(Self::poisoned)?;
        Ok(shares.get(&(team, destination)).cloned().unwrap_or_default())
    }

    async fn commit(
        &self,
        team: TargetId,
        destination: DestinationType,
        diff: &ShareDiff,
    ) -> ShareStoreResult<()> {
        let mut shares = self.shares.write().map_err(Self::poisoned)?;
        let nodes = shares.entry((team, destination)).or_default();
        nodes.retain(|node| diff.removed.iter().all(|removed| removed.id != node.id));
        for added in &diff.added {
            if nodes.iter().all(|node| node.id != added.id) {
                nodes.push(added.clone());
            }
        }
        Ok(())
    }
}
