//! Shared world state for draft lifecycle BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use orgwork::target::{adapters::memory::InMemoryDirectory, services::HierarchyService};
use orgwork::work::{
    adapters::memory::{InMemoryDraftStore, InMemoryFormResolver, InMemoryTaskStore},
    domain::{WorkDefinition, WorkInstance},
    services::{BucketLoad, WorkTaskController},
};
use rstest::fixture;

/// Hierarchy service type used by the BDD world.
pub type TestHierarchy = HierarchyService<InMemoryDirectory, DefaultClock>;

/// Controller type used by the BDD world.
pub type TestController =
    WorkTaskController<InMemoryDraftStore, InMemoryTaskStore, InMemoryFormResolver>;

/// Scenario world for draft lifecycle behaviour tests.
pub struct DraftWorld {
    pub hierarchy: TestHierarchy,
    pub drafts: Arc<InMemoryDraftStore>,
    pub tasks: Arc<InMemoryTaskStore>,
    pub forms: Arc<InMemoryFormResolver>,
    pub work: Option<WorkDefinition>,
    pub controller: Option<TestController>,
    pub last_load: Option<BucketLoad>,
    pub last_instance: Option<WorkInstance>,
}

impl DraftWorld {
    /// Creates a world with empty stores and no work.
    #[must_use]
    pub fn new() -> Self {
        Self {
            hierarchy: HierarchyService::new(
                Arc::new(InMemoryDirectory::new()),
                Arc::new(DefaultClock),
            ),
            drafts: Arc::new(InMemoryDraftStore::new()),
            tasks: Arc::new(InMemoryTaskStore::new()),
            forms: Arc::new(InMemoryFormResolver::new()),
            work: None,
            controller: None,
            last_load: None,
            last_instance: None,
        }
    }

    /// Returns the controller, failing the step when none was set up.
    ///
    /// # Errors
    ///
    /// Returns an error when no work has been opened.
    pub fn controller(&self) -> Result<&TestController, eyre::Report> {
        self.controller
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing controller in scenario world"))
    }
}

impl Default for DraftWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> DraftWorld {
    DraftWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
