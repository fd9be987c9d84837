//! Work definitions and the instances submissions create.

use super::{Draft, InstanceId, WorkDomainError, WorkId};
use crate::target::domain::{DefineId, FlowDefine, TargetId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The "current work": a named application bound to one flow definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkDefinition {
    id: WorkId,
    name: String,
    define_id: DefineId,
    belong_id: TargetId,
}

impl WorkDefinition {
    /// Creates a work bound to `define`, owned by the define's space.
    ///
    /// # Errors
    ///
    /// Returns [`WorkDomainError::EmptyWorkName`] when the trimmed name is
    /// empty.
    pub fn new(name: impl Into<String>, define: &FlowDefine) -> Result<Self, WorkDomainError> {
        let raw = name.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(WorkDomainError::EmptyWorkName);
        }
        Ok(Self {
            id: WorkId::new(),
            name: trimmed.to_owned(),
            define_id: define.id(),
            belong_id: define.belong_id(),
        })
    }

    /// Returns the work identifier.
    #[must_use]
    pub const fn id(&self) -> WorkId {
        self.id
    }

    /// Returns the work name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the flow definition the work is bound to.
    #[must_use]
    pub const fn define_id(&self) -> DefineId {
        self.define_id
    }

    /// Returns the owning space.
    #[must_use]
    pub const fn belong_id(&self) -> TargetId {
        self.belong_id
    }
}

/// Request to start a flow instance from a draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceRequest {
    /// Definition the instance runs under.
    pub define_id: DefineId,
    /// Work the submission belongs to.
    pub work_id: WorkId,
    /// Form data copied from the draft.
    pub data: Value,
    /// Summary text copied from the draft.
    pub content_text: String,
}

impl InstanceRequest {
    /// Builds a request carrying the draft's payload.
    #[must_use]
    pub fn from_draft(draft: &Draft, define_id: DefineId) -> Self {
        Self {
            define_id,
            work_id: draft.work_id(),
            data: draft.data().clone(),
            content_text: draft.content_text().to_owned(),
        }
    }
}

/// A flow instance created by the task store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkInstance {
    /// Instance identifier.
    pub id: InstanceId,
    /// Definition the instance runs under.
    pub define_id: DefineId,
    /// Work the submission belongs to.
    pub work_id: WorkId,
    /// Submitted data.
    pub data: Value,
    /// Submitted summary text.
    pub content_text: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl WorkInstance {
    /// Creates an instance from `request`, stamped at `created_at`.
    #[must_use]
    pub fn from_request(request: &InstanceRequest, created_at: DateTime<Utc>) -> Self {
        Self {
            id: InstanceId::new(),
            define_id: request.define_id,
            work_id: request.work_id,
            data: request.data.clone(),
            content_text: request.content_text.clone(),
            created_at,
        }
    }
}
