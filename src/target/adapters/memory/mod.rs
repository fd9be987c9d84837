//! In-memory adapters for hierarchy ports.

mod directory;

pub use directory::InMemoryDirectory;
