//! In-memory apply context resolver.

use crate::work::{
    domain::{ApplyContext, InstanceData, WorkDefinition, WorkId},
    ports::{FormResolver, FormResolverError, FormResolverResult},
};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Resolver backed by a map of registered apply templates.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFormResolver {
    templates: Arc<RwLock<HashMap<WorkId, InstanceData>>>,
}

impl InMemoryFormResolver {
    /// Creates a resolver without templates.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the apply template for `work`.
    ///
    /// # Errors
    ///
    /// Returns [`FormResolverError::Persistence`] when the lock is poisoned.
    pub fn register(&self, work: WorkId, template: InstanceData) -> FormResolverResult<()> {
        self.templates
            .write()
            .map_err(|err| FormResolverError::persistence(std::io::Error::other(err.to_string())))?
            .insert(work, template);
        Ok(())
    }
}

#[async_trait]
impl FormResolver for InMemoryFormResolver {
    async fn resolve_apply(
        &self,
        work: &WorkDefinition,
        defaults: Option<&Value>,
    ) -> FormResolverResult<Option<ApplyContext>> {
        let templates = self
            .templates
            .read()
            .map_err(|err| FormResolverError::persistence(std::io::Error::other(err.to_string())))?;
        Ok(templates.get(&work.id()).map(|template| {
            let instance = defaults.map_or_else(
                || template.clone(),
                |data| template.clone().with_data(data.clone()),
            );
            ApplyContext::new(work.id(), instance)
        }))
    }
}
