//! Target aggregate: the shared base record plus variant extensions.

use super::{Capability, HierarchyDomainError, TargetId, TargetType};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Editable descriptive fields shared by every target variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetProfile {
    name: String,
    code: String,
    team_name: String,
    remark: Option<String>,
}

impl TargetProfile {
    /// Creates a validated profile. The team name defaults to `name`.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyDomainError::EmptyTargetName`] when the trimmed name
    /// is empty.
    pub fn new(
        name: impl Into<String>,
        code: impl Into<String>,
    ) -> Result<Self, HierarchyDomainError> {
        let raw = name.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(HierarchyDomainError::EmptyTargetName);
        }
        Ok(Self {
            name: trimmed.to_owned(),
            code: code.into().trim().to_owned(),
            team_name: trimmed.to_owned(),
            remark: None,
        })
    }

    /// Sets the team display name.
    #[must_use]
    pub fn with_team_name(mut self, team_name: impl Into<String>) -> Self {
        self.team_name = team_name.into();
        self
    }

    /// Sets the free-form remark.
    #[must_use]
    pub fn with_remark(mut self, remark: impl Into<String>) -> Self {
        self.remark = Some(remark.into());
        self
    }

    /// Returns the target name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the target code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the team display name.
    #[must_use]
    pub fn team_name(&self) -> &str {
        &self.team_name
    }

    /// Returns the remark, if any.
    #[must_use]
    pub fn remark(&self) -> Option<&str> {
        self.remark.as_deref()
    }
}

/// Variant-specific fields, tagged by target type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type_name", rename_all = "snake_case")]
pub enum TargetExtension {
    /// An individual user.
    Person {
        /// Companies the person has joined.
        joined_companies: Vec<TargetId>,
    },
    /// A company.
    Company {
        /// Person operating the company space, if known.
        user_id: Option<TargetId>,
    },
    /// A department.
    Department,
    /// A working group.
    WorkingGroup,
    /// A group of companies.
    Group {
        /// Enclosing group when this is a sub-group.
        parent_group_id: Option<TargetId>,
    },
    /// A cohort.
    Cohort,
}

impl TargetExtension {
    /// Returns an extension with no variant data for `target_type`.
    #[must_use]
    pub const fn empty(target_type: TargetType) -> Self {
        match target_type {
            TargetType::Person => Self::Person {
                joined_companies: Vec::new(),
            },
            TargetType::Company => Self::Company { user_id: None },
            TargetType::Department => Self::Department,
            TargetType::WorkingGroup => Self::WorkingGroup,
            TargetType::Group => Self::Group {
                parent_group_id: None,
            },
            TargetType::Cohort => Self::Cohort,
        }
    }

    /// Returns the variant tag.
    #[must_use]
    pub const fn target_type(&self) -> TargetType {
        match self {
            Self::Person { .. } => TargetType::Person,
            Self::Company { .. } => TargetType::Company,
            Self::Department => TargetType::Department,
            Self::WorkingGroup => TargetType::WorkingGroup,
            Self::Group { .. } => TargetType::Group,
            Self::Cohort => TargetType::Cohort,
        }
    }
}

/// An organization-tree node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    id: TargetId,
    belong_id: TargetId,
    profile: TargetProfile,
    extension: TargetExtension,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Target {
    /// Creates a new target of `target_type` owned by the space `belong_id`.
    #[must_use]
    pub fn new(
        target_type: TargetType,
        belong_id: TargetId,
        profile: TargetProfile,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TargetId::new(),
            belong_id,
            profile,
            extension: TargetExtension::empty(target_type),
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Creates a person or company, which owns its own space.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyDomainError::NotASpace`] for any other variant.
    pub fn new_space(
        target_type: TargetType,
        profile: TargetProfile,
        clock: &impl Clock,
    ) -> Result<Self, HierarchyDomainError> {
        if !target_type.is_space() {
            return Err(HierarchyDomainError::NotASpace(target_type));
        }
        let id = TargetId::new();
        let timestamp = clock.utc();
        Ok(Self {
            id,
            belong_id: id,
            profile,
            extension: TargetExtension::empty(target_type),
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Returns the target identifier.
    #[must_use]
    pub const fn id(&self) -> TargetId {
        self.id
    }

    /// Returns the identifier of the owning space.
    #[must_use]
    pub const fn belong_id(&self) -> TargetId {
        self.belong_id
    }

    /// Returns the space this target's authority, flows and markets live in.
    ///
    /// Persons and companies are their own space; every other variant lives
    /// in the space that owns it.
    #[must_use]
    pub const fn space_id(&self) -> TargetId {
        if self.type_name().is_space() {
            self.id
        } else {
            self.belong_id
        }
    }

    /// Returns the target name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.profile.name()
    }

    /// Returns the team display name.
    #[must_use]
    pub fn team_name(&self) -> &str {
        self.profile.team_name()
    }

    /// Returns the variant tag.
    #[must_use]
    pub const fn type_name(&self) -> TargetType {
        self.extension.target_type()
    }

    /// Returns the descriptive fields.
    #[must_use]
    pub const fn profile(&self) -> &TargetProfile {
        &self.profile
    }

    /// Returns the variant data.
    #[must_use]
    pub const fn extension(&self) -> &TargetExtension {
        &self.extension
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Variants allowed beneath this target.
    #[must_use]
    pub const fn sub_team_types(&self) -> &'static [TargetType] {
        self.type_name().sub_team_types()
    }

    /// Returns `Ok(())` when the target exposes `capability`.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyDomainError::Unsupported`] otherwise.
    pub fn require(&self, capability: Capability) -> Result<(), HierarchyDomainError> {
        let target_type = self.type_name();
        if target_type.supports(capability) {
            Ok(())
        } else {
            Err(HierarchyDomainError::Unsupported {
                target_type,
                capability,
            })
        }
    }

    /// Validates that `child` may be created beneath this target.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyDomainError::InvalidNesting`] when `child` is not in
    /// [`Self::sub_team_types`].
    pub fn accept_child(&self, child: TargetType) -> Result<(), HierarchyDomainError> {
        let parent = self.type_name();
        if parent.can_nest(child) {
            Ok(())
        } else {
            Err(HierarchyDomainError::InvalidNesting { parent, child })
        }
    }

    /// Builds a child of `child_type` nested beneath this target.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyDomainError::InvalidNesting`] when the nesting is not
    /// allowed.
    pub fn spawn_child(
        &self,
        child_type: TargetType,
        profile: TargetProfile,
        clock: &impl Clock,
    ) -> Result<Self, HierarchyDomainError> {
        self.accept_child(child_type)?;
        let mut child = Self::new(child_type, self.space_id(), profile, clock);
        if let (TargetExtension::Group { parent_group_id }, TargetType::Group) =
            (&mut child.extension, self.type_name())
        {
            *parent_group_id = Some(self.id);
        }
        Ok(child)
    }

    /// Replaces the descriptive fields.
    pub fn update_profile(&mut self, profile: TargetProfile, clock: &impl Clock) {
        self.profile = profile;
        self.updated_at = clock.utc();
    }

    /// Records the person operating a company space.
    pub fn assign_operator(&mut self, person: TargetId) {
        if let TargetExtension::Company { user_id } = &mut self.extension {
            *user_id = Some(person);
        }
    }

    /// Records that a person joined `company`.
    pub fn record_joined_company(&mut self, company: TargetId) {
        if let TargetExtension::Person { joined_companies } = &mut self.extension
            && !joined_companies.contains(&company)
        {
            joined_companies.push(company);
        }
    }
}
