//! Identities: named roles owned by exactly one target.

use super::{HierarchyDomainError, IdentityId, TargetId};
use serde::{Deserialize, Serialize};

/// Fields supplied when creating an identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityParams {
    name: String,
    code: String,
    remark: Option<String>,
}

impl IdentityParams {
    /// Creates validated identity parameters.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyDomainError::EmptyIdentityName`] when the trimmed
    /// name is empty.
    pub fn new(
        name: impl Into<String>,
        code: impl Into<String>,
    ) -> Result<Self, HierarchyDomainError> {
        let raw = name.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(HierarchyDomainError::EmptyIdentityName);
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

/// A role held within a target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    id: IdentityId,
    belong_id: TargetId,
    name: String,
    code: String,
    remark: Option<String>,
}

impl Identity {
    /// Creates a new identity owned by `belong_id`.
    #[must_use]
    pub fn new(belong_id: TargetId, params: IdentityParams) -> Self {
        Self {
            id: IdentityId::new(),
            belong_id,
            name: params.name,
            code: params.code,
            remark: params.remark,
        }
    }

    /// Returns the identity identifier.
    #[must_use]
    pub const fn id(&self) -> IdentityId {
        self.id
    }

    /// Returns the owning target.
    #[must_use]
    pub const fn belong_id(&self) -> TargetId {
        self.belong_id
    }

    /// Returns the identity name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the identity code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the remark, if any.
    #[must_use]
    pub fn remark(&self) -> Option<&str> {
        self.remark.as_deref()
    }

    /// Returns `true` when the identity belongs to `target`.
    #[must_use]
    pub fn is_owned_by(&self, target: TargetId) -> bool {
        self.belong_id == target
    }
}
