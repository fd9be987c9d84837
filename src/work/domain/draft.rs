//! Unsubmitted form payloads.

use super::{DraftId, WorkDefinition, WorkId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An editable, unsubmitted payload for one work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    id: DraftId,
    work_id: WorkId,
    name: String,
    data: Value,
    content_text: String,
    type_name: String,
    relations: String,
}

impl Draft {
    /// Creates a draft for `work`, named after it.
    #[must_use]
    pub fn new(
        work: &WorkDefinition,
        data: Value,
        content_text: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        Self {
            id: DraftId::new(),
            work_id: work.id(),
            name: work.name().to_owned(),
            data,
            content_text: content_text.into(),
            type_name: type_name.into(),
            relations: String::new(),
        }
    }

    /// Returns a copy with the same identity and a new payload.
    #[must_use]
    pub fn revised(&self, data: Value, content_text: impl Into<String>) -> Self {
        Self {
            data,
            content_text: content_text.into(),
            ..self.clone()
        }
    }

    /// Renames the draft.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Returns the draft identifier.
    #[must_use]
    pub const fn id(&self) -> DraftId {
        self.id
    }

    /// Returns the work the draft belongs to.
    #[must_use]
    pub const fn work_id(&self) -> WorkId {
        self.work_id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the form data.
    #[must_use]
    pub const fn data(&self) -> &Value {
        &self.data
    }

    /// Returns the summary text.
    #[must_use]
    pub fn content_text(&self) -> &str {
        &self.content_text
    }

    /// Returns the draft type name.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Returns the serialized relations.
    #[must_use]
    pub fn relations(&self) -> &str {
        &self.relations
    }
}
