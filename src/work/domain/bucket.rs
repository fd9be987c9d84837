//! Lifecycle buckets and the actions offered on their rows.

use super::{ParseRowActionError, ParseTaskBucketError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Derived lifecycle state of a logical task.
///
/// The order is linear: a draft may be deleted or submitted (becoming
/// launched); launched tasks complete outside this layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskBucket {
    /// Held in the draft collection; not yet submitted.
    Draft,
    /// Submitted and awaiting completion.
    Launched,
    /// Completed or approved.
    Completed,
}

impl TaskBucket {
    /// All buckets in tab order.
    pub const ALL: [Self; 3] = [Self::Draft, Self::Launched, Self::Completed];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Launched => "launched",
            Self::Completed => "completed",
        }
    }

    /// Returns the tag the task store is queried with.
    #[must_use]
    pub const fn store_tag(self) -> &'static str {
        match self {
            Self::Draft => "草稿",
            Self::Launched => "发起的",
            Self::Completed => "已办",
        }
    }

    /// Returns the tab label of the bucket.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Draft => "草稿箱",
            Self::Launched => "已发起",
            Self::Completed => "已办结",
        }
    }

    /// Returns `true` for the draft bucket.
    #[must_use]
    pub const fn is_draft(self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Actions offered on rows of this bucket.
    #[must_use]
    pub const fn row_actions(self) -> &'static [RowAction] {
        match self {
            Self::Draft => &[RowAction::Edit, RowAction::Remove, RowAction::Submit],
            Self::Launched | Self::Completed => &[RowAction::View],
        }
    }
}

impl fmt::Display for TaskBucket {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskBucket {
    type Error = ParseTaskBucketError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        let normalized = trimmed.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|bucket| {
                bucket.as_str() == normalized
                    || bucket.store_tag() == trimmed
                    || bucket.label() == trimmed
            })
            .ok_or_else(|| ParseTaskBucketError(value.to_owned()))
    }
}

/// Command a caller raises against a selected bucket row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowAction {
    /// Open the row for editing.
    Edit,
    /// Hard-delete the row (drafts only).
    Remove,
    /// Submit the row (drafts only).
    Submit,
    /// Open the row read-only.
    View,
}

impl RowAction {
    /// Returns the canonical representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Edit => "edit",
            Self::Remove => "remove",
            Self::Submit => "submit",
            Self::View => "view",
        }
    }
}

impl TryFrom<&str> for RowAction {
    type Error = ParseRowActionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "edit" => Ok(Self::Edit),
            "remove" => Ok(Self::Remove),
            "submit" => Ok(Self::Submit),
            "view" => Ok(Self::View),
            _ => Err(ParseRowActionError(value.to_owned())),
        }
    }
}
