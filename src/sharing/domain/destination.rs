//! Destination types a share can target.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error returned while parsing destination types.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown destination type: {0}")]
pub struct ParseDestinationError(pub String);

/// Kind of node a share is granted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DestinationType {
    /// Organization units picked directly from the team tree.
    Organization,
    /// Authority nodes of the selected team.
    Role,
    /// Identities held by the selected team.
    Station,
    /// Members of the selected team.
    Person,
}

impl DestinationType {
    /// Every destination type in panel order.
    pub const ALL: [Self; 4] = [Self::Organization, Self::Role, Self::Station, Self::Person];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Organization => "organization",
            Self::Role => "role",
            Self::Station => "station",
            Self::Person => "person",
        }
    }

    /// Returns the display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Organization => "组织",
            Self::Role => "角色",
            Self::Station => "岗位",
            Self::Person => "人员",
        }
    }

    /// Returns `true` when candidates come from a selected team.
    #[must_use]
    pub const fn uses_candidates(self) -> bool {
        !matches!(self, Self::Organization)
    }
}

impl fmt::Display for DestinationType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for DestinationType {
    type Error = ParseDestinationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        let normalized = trimmed.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized || kind.label() == trimmed)
            .ok_or_else(|| ParseDestinationError(value.to_owned()))
    }
}
