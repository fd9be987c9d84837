//! Identifier types for the hierarchy domain.

use crate::ids::uuid_identifier;

uuid_identifier!(
    /// Unique identifier for an organization-tree node of any variant.
    TargetId
);

uuid_identifier!(
    /// Unique identifier for an identity owned by a target.
    IdentityId
);

uuid_identifier!(
    /// Unique identifier for an authority-tree node.
    AuthorityId
);

uuid_identifier!(
    /// Unique identifier for a flow definition bound to a target.
    DefineId
);

uuid_identifier!(
    /// Unique identifier for a market a target may join.
    MarketId
);
