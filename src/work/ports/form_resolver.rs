//! Apply context resolution port.

use crate::work::domain::{ApplyContext, WorkDefinition};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Result type for form resolver operations.
pub type FormResolverResult<T> = Result<T, FormResolverError>;

/// Resolves the apply context for a work definition.
#[async_trait]
pub trait FormResolver: Send + Sync {
    /// Opens an application for `work`, seeded with `defaults` when given.
    ///
    /// Returns `None` when the work has no resolvable form.
    async fn resolve_apply(
        &self,
        work: &WorkDefinition,
        defaults: Option<&Value>,
    ) -> FormResolverResult<Option<ApplyContext>>;
}

/// Errors returned by form resolver implementations.
#[derive(Debug, Clone, Error)]
pub enum FormResolverError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl FormResolverError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
