//! Flow definitions bound to a space.

use super::{DefineId, HierarchyDomainError, TargetId};
use serde::{Deserialize, Serialize};

/// Fields supplied when publishing a flow definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishDefineParams {
    name: String,
    code: String,
    remark: Option<String>,
}

impl PublishDefineParams {
    /// Creates validated publish parameters.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyDomainError::EmptyDefineName`] when the trimmed name
    /// is empty.
    pub fn new(
        name: impl Into<String>,
        code: impl Into<String>,
    ) -> Result<Self, HierarchyDomainError> {
        let raw = name.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(HierarchyDomainError::EmptyDefineName);
        }
        Ok(Self {
            name: trimmed.to_owned(),
            code: code.into().trim().to_owned(),
            remark: None,
        })
    }

    /// Sets the free-form remark.
    #[must_use]
    pub fn with_remark(mut self, remark: impl Into<String>) -> Self {
        self.remark = Some(remark.into());
        self
    }
}

/// An external process template that submissions are bound to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowDefine {
    id: DefineId,
    belong_id: TargetId,
    name: String,
    code: String,
    remark: Option<String>,
}

impl FlowDefine {
    /// Creates a flow definition owned by the space `belong_id`.
    #[must_use]
    pub fn new(belong_id: TargetId, params: PublishDefineParams) -> Self {
        Self {
            id: DefineId::new(),
            belong_id,
            name: params.name,
            code: params.code,
            remark: params.remark,
        }
    }

    /// Returns the definition identifier.
    #[must_use]
    pub const fn id(&self) -> DefineId {
        self.id
    }

    /// Returns the owning space.
    #[must_use]
    pub const fn belong_id(&self) -> TargetId {
        self.belong_id
    }

    /// Returns the definition name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the definition code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the remark, if any.
    #[must_use]
    pub fn remark(&self) -> Option<&str> {
        self.remark.as_deref()
    }
}
