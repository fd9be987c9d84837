//! Share session orchestration.

mod session;

pub use session::{ShareError, ShareResult, ShareSession};
