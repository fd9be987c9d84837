//! Outcome of a command addressed at a child record.

use serde::{Deserialize, Serialize};

/// Result of a delete or membership command that does not raise on a miss.
///
/// The boolean contract of the directory API is [`CommandOutcome::is_applied`];
/// the variants keep "absent" and "not yours" apart for callers that care.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandOutcome {
    /// The command took effect.
    Applied,
    /// The addressed record does not exist.
    NotFound,
    /// The addressed record exists but is not owned by the caller.
    Denied,
}

impl CommandOutcome {
    /// Returns `true` only when the command took effect.
    #[must_use]
    pub const fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

impl From<bool> for CommandOutcome {
    fn from(applied: bool) -> Self {
        if applied { Self::Applied } else { Self::NotFound }
    }
}
