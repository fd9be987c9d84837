//! Domain model for the organization hierarchy.
//!
//! Targets are tagged variants over a shared base record. Callers dispatch on
//! [`TargetType`] rather than probing structure, and every optional behaviour
//! is gated by a [`Capability`] drawn from the variant's fixed capability set.

mod authority;
mod error;
mod flow;
mod identity;
mod ids;
mod kind;
mod outcome;
mod target;

pub use authority::AuthorityNode;
pub use error::{HierarchyDomainError, ParseTargetTypeError};
pub use flow::{FlowDefine, PublishDefineParams};
pub use identity::{Identity, IdentityParams};
pub use ids::{AuthorityId, DefineId, IdentityId, MarketId, TargetId};
pub use kind::{Capability, TargetType};
pub use outcome::CommandOutcome;
pub use target::{Target, TargetExtension, TargetProfile};
