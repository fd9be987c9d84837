//! Submitted task records.

use super::{InstanceData, WorkId, WorkTaskId};
use crate::target::domain::DefineId;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store-side metadata of a task record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskData {
    /// Display title.
    #[serde(default)]
    pub title: String,
    /// Last update time as written by the store.
    #[serde(default)]
    pub update_time: Option<String>,
}

impl TaskData {
    /// Creates task data with a title and raw update time.
    #[must_use]
    pub fn new(title: impl Into<String>, update_time: Option<String>) -> Self {
        Self {
            title: title.into(),
            update_time,
        }
    }
}

/// A submitted task as returned by the task store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkTask {
    id: WorkTaskId,
    define_id: DefineId,
    work_id: WorkId,
    taskdata: TaskData,
    instance: Option<InstanceData>,
}

impl WorkTask {
    /// Creates a task record without an instance payload.
    #[must_use]
    pub fn new(define_id: DefineId, work_id: WorkId, taskdata: TaskData) -> Self {
        Self {
            id: WorkTaskId::new(),
            define_id,
            work_id,
            taskdata,
            instance: None,
        }
    }

    /// Returns the task with its instance payload attached.
    #[must_use]
    pub fn with_instance(mut self, instance: InstanceData) -> Self {
        self.instance = Some(instance);
        self
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> WorkTaskId {
        self.id
    }

    /// Returns the flow definition the task runs under.
    #[must_use]
    pub const fn define_id(&self) -> DefineId {
        self.define_id
    }

    /// Returns the work the task was submitted for.
    #[must_use]
    pub const fn work_id(&self) -> WorkId {
        self.work_id
    }

    /// Returns the store metadata.
    #[must_use]
    pub const fn taskdata(&self) -> &TaskData {
        &self.taskdata
    }

    /// Returns the loaded instance payload, if any.
    #[must_use]
    pub const fn instance(&self) -> Option<&InstanceData> {
        self.instance.as_ref()
    }

    /// Returns the parsed update time.
    ///
    /// Missing or unparseable values sort as the Unix epoch.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.taskdata
            .update_time
            .as_deref()
            .and_then(parse_update_time)
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }
}

/// Parses a store timestamp.
///
/// Accepts RFC 3339 and `YYYY-MM-DD HH:MM:SS[.fff]`, the latter read as UTC.
#[must_use]
pub fn parse_update_time(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
