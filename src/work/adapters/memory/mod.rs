//! In-memory adapters for the work ports.

mod drafts;
mod forms;
mod tasks;

pub use drafts::InMemoryDraftStore;
pub use forms::InMemoryFormResolver;
pub use tasks::InMemoryTaskStore;
