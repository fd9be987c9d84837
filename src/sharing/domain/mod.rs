//! Domain model for share and assignment reconciliation.
//!
//! A working set tracks, per destination type, how the checked nodes relate
//! to the persisted baseline. [`reduce`] is the only way state changes.

mod destination;
mod node;
mod reducer;
mod working_set;

pub use destination::{DestinationType, ParseDestinationError};
pub use node::{CandidateNode, ShareNode};
pub use reducer::{ShareAction, ShareState, reduce};
pub use working_set::{MembershipState, ShareDiff, ShareEntry, ShareSummary, WorkingSet};
