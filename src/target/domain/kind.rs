//! Target variants and the capability matrix that governs them.

use super::ParseTargetTypeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Optional behaviour a target variant may expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Child teams can be created beneath the target and listed.
    SubTeams,
    /// The target owns identities (roles held by its members).
    Identities,
    /// The target exposes an authority (permission) tree.
    AuthorityTree,
    /// Flow definitions can be bound to the target.
    FlowDefinitions,
    /// The target can join and quit markets.
    MarketMembership,
}

impl Capability {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SubTeams => "sub_teams",
            Self::Identities => "identities",
            Self::AuthorityTree => "authority_tree",
            Self::FlowDefinitions => "flow_definitions",
            Self::MarketMembership => "market_membership",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Concrete organization-tree variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    /// An individual user; also acts as a personal space.
    Person,
    /// A company (unit); the primary organizational space.
    Company,
    /// A department inside a company or another department.
    Department,
    /// A working group inside a company or department.
    WorkingGroup,
    /// A group (alliance) of companies, possibly nested.
    Group,
    /// An informal cohort created by a person.
    Cohort,
}

const PERSON_SUB_TEAMS: &[TargetType] = &[TargetType::Cohort];
const COMPANY_SUB_TEAMS: &[TargetType] = &[
    TargetType::Department,
    TargetType::WorkingGroup,
    TargetType::Group,
];
const DEPARTMENT_SUB_TEAMS: &[TargetType] = &[TargetType::Department, TargetType::WorkingGroup];
const GROUP_SUB_TEAMS: &[TargetType] = &[TargetType::Group];
const NO_TEAMS: &[TargetType] = &[];

const SPACE_CAPABILITIES: &[Capability] = &[
    Capability::SubTeams,
    Capability::Identities,
    Capability::AuthorityTree,
    Capability::FlowDefinitions,
    Capability::MarketMembership,
];
const NESTED_TEAM_CAPABILITIES: &[Capability] = &[
    Capability::SubTeams,
    Capability::Identities,
    Capability::AuthorityTree,
];
const LEAF_CAPABILITIES: &[Capability] = &[Capability::Identities];

impl TargetType {
    /// All variants in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Person,
        Self::Company,
        Self::Department,
        Self::WorkingGroup,
        Self::Group,
        Self::Cohort,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Company => "company",
            Self::Department => "department",
            Self::WorkingGroup => "working_group",
            Self::Group => "group",
            Self::Cohort => "cohort",
        }
    }

    /// Returns the display label used by the directory service.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Person => "人员",
            Self::Company => "单位",
            Self::Department => "部门",
            Self::WorkingGroup => "工作组",
            Self::Group => "集团",
            Self::Cohort => "群组",
        }
    }

    /// Variants that may be created directly beneath this one.
    #[must_use]
    pub const fn sub_team_types(self) -> &'static [Self] {
        match self {
            Self::Person => PERSON_SUB_TEAMS,
            Self::Company => COMPANY_SUB_TEAMS,
            Self::Department => DEPARTMENT_SUB_TEAMS,
            Self::Group => GROUP_SUB_TEAMS,
            Self::WorkingGroup | Self::Cohort => NO_TEAMS,
        }
    }

    /// Capabilities exposed by the variant.
    #[must_use]
    pub const fn capabilities(self) -> &'static [Capability] {
        match self {
            Self::Person | Self::Company => SPACE_CAPABILITIES,
            Self::Department | Self::Group => NESTED_TEAM_CAPABILITIES,
            Self::WorkingGroup | Self::Cohort => LEAF_CAPABILITIES,
        }
    }

    /// Returns `true` when the variant exposes `capability`.
    #[must_use]
    pub fn supports(self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }

    /// Returns `true` when `child` may nest directly beneath this variant.
    #[must_use]
    pub fn can_nest(self, child: Self) -> bool {
        self.sub_team_types().contains(&child)
    }

    /// Returns `true` for variants that own a space (flows, markets, cohorts).
    #[must_use]
    pub const fn is_space(self) -> bool {
        matches!(self, Self::Person | Self::Company)
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TargetType {
    type Error = ParseTargetTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        let normalized = trimmed.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized || kind.label() == trimmed)
            .ok_or_else(|| ParseTargetTypeError(value.to_owned()))
    }
}
