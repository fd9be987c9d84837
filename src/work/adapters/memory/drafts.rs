//! In-memory draft collection.

use crate::work::{
    domain::Draft,
    ports::{DraftStore, DraftStoreError, DraftStoreResult},
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory draft collection preserving insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDraftStore {
    drafts: Arc<RwLock<Vec<Draft>>>,
    reloads: Arc<AtomicUsize>,
}

impl InMemoryDraftStore {
    /// Creates an empty draft collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns how many reloading reads the store has served.
    #[must_use]
    pub fn reload_count(&self) -> usize {
        self.reloads.load(Ordering::SeqCst)
    }

    fn poisoned(err: impl ToString) -> DraftStoreError {
        DraftStoreError::persistence(std::io::Error::other(err.to_string()))
    }
}

#[async_trait]
impl DraftStore for InMemoryDraftStore {
    async fn all(&self, reload: bool) -> DraftStoreResult<Vec<Draft>> {
        if reload {
            self.reloads.fetch_add(1, Ordering::SeqCst);
        }
        let drafts = self.drafts.read().map_err(Self::poisoned)?;
        Ok(drafts.clone())
    }

    async fn insert(&self, draft: &Draft) -> DraftStoreResult<()> {
        let mut drafts = self.drafts.write().map_err(Self::poisoned)?;
        if drafts.iter().any(|stored| stored.id() == draft.id()) {
            return Err(DraftStoreError::DuplicateDraft(draft.id()));
        }
        drafts.push(draft.clone());
        Ok(())
    }

    async fn replace(&self, draft: &Draft) -> DraftStoreResult<()> {
        let mut drafts = self.drafts.write().map_err(Self::poisoned)?;
        let slot = drafts
            .iter_mut()
            .find(|stored| stored.id() == draft.id())
            .ok_or(DraftStoreError::NotFound(draft.id()))?;
        *slot = draft.clone();
        Ok(())
    }

    async fn remove(&self, draft: &Draft) -> DraftStoreResult<bool> {
        let mut drafts = self.drafts.write().map_err(Self::poisoned)?;
        let before = drafts.len();
        drafts.retain(|stored| stored.id() != draft.id());
        Ok(drafts.len() != before)
    }
}
