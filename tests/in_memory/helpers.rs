//! Shared test helpers for in-memory integration tests.

use std::sync::Arc;

use mockable::DefaultClock;
use orgwork::target::{
    adapters::memory::InMemoryDirectory,
    domain::{PublishDefineParams, Target, TargetProfile},
    services::HierarchyService,
};
use orgwork::work::{
    adapters::memory::{InMemoryDraftStore, InMemoryFormResolver, InMemoryTaskStore},
    domain::WorkDefinition,
    services::WorkTaskController,
};
use rstest::fixture;

/// Hierarchy service over the in-memory directory.
pub type TestHierarchy = HierarchyService<InMemoryDirectory, DefaultClock>;

/// Controller over the in-memory work stores.
pub type TestController =
    WorkTaskController<InMemoryDraftStore, InMemoryTaskStore, InMemoryFormResolver>;

/// In-memory stores shared by every work of one scenario.
pub struct Stores {
    pub hierarchy: Arc<TestHierarchy>,
    pub drafts: Arc<InMemoryDraftStore>,
    pub tasks: Arc<InMemoryTaskStore>,
    pub forms: Arc<InMemoryFormResolver>,
}

impl Stores {
    /// Publishes a flow on `space` and returns a work bound to it.
    ///
    /// # Errors
    ///
    /// Returns an error when publishing or registering the flow fails.
    pub async fn work_on(
        &self,
        space: &Target,
        name: &str,
    ) -> Result<WorkDefinition, eyre::Report> {
        let params = PublishDefineParams::new(name, name.to_lowercase())?;
        let define = self.hierarchy.publish_define(space.id(), params).await?;
        self.tasks.register_define(define.clone())?;
        Ok(WorkDefinition::new(name, &define)?)
    }

    /// Opens a lifecycle controller for `work`.
    #[must_use]
    pub fn controller(&self, work: &WorkDefinition) -> TestController {
        WorkTaskController::new(
            work.clone(),
            Arc::clone(&self.drafts),
            Arc::clone(&self.tasks),
            Arc::clone(&self.forms),
        )
    }
}

/// Provides fresh in-memory stores for each test.
#[fixture]
pub fn stores() -> Stores {
    let hierarchy = Arc::new(HierarchyService::new(
        Arc::new(InMemoryDirectory::new()),
        Arc::new(DefaultClock),
    ));
    Stores {
        hierarchy,
        drafts: Arc::new(InMemoryDraftStore::new()),
        tasks: Arc::new(InMemoryTaskStore::new()),
        forms: Arc::new(InMemoryFormResolver::new()),
    }
}

/// Builds a profile whose code is the lower-cased name.
///
/// # Errors
///
/// Returns an error when the name is blank.
pub fn profile(name: &str) -> Result<TargetProfile, eyre::Report> {
    Ok(TargetProfile::new(name, name.to_lowercase())?)
}
