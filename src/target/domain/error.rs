//! Error types for hierarchy domain validation and parsing.

use super::{Capability, TargetType};
use thiserror::Error;

/// Errors returned while constructing or mutating hierarchy values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HierarchyDomainError {
    /// The target name is empty after trimming.
    #[error("target name must not be empty")]
    EmptyTargetName,

    /// The identity name is empty after trimming.
    #[error("identity name must not be empty")]
    EmptyIdentityName,

    /// The flow definition name is empty after trimming.
    #[error("flow definition name must not be empty")]
    EmptyDefineName,

    /// The child variant may not nest beneath the parent variant.
    #[error("a {child} cannot be nested beneath a {parent}")]
    InvalidNesting {
        /// Variant of the would-be parent.
        parent: TargetType,
        /// Variant that was requested as a child.
        child: TargetType,
    },

    /// Only persons and companies own a space.
    #[error("a {0} cannot own a space")]
    NotASpace(TargetType),

    /// Companies must be founded by a person.
    #[error("a company cannot be founded by a {0}")]
    FounderNotPerson(TargetType),

    /// The variant does not expose the requested capability.
    #[error("a {target_type} does not support {capability}")]
    Unsupported {
        /// Variant that was asked for the capability.
        target_type: TargetType,
        /// Capability that was requested.
        capability: Capability,
    },
}

/// Error returned while parsing target types from storage or labels.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown target type: {0}")]
pub struct ParseTargetTypeError(pub String);
