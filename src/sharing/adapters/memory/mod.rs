//! In-memory adapters for the sharing ports.

mod shares;

pub use shares::InMemoryShareStore;
