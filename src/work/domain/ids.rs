//! Identifier types for the work domain.

use crate::ids::uuid_identifier;

uuid_identifier!(
    /// Unique identifier for a work definition (the "current work").
    WorkId
);

uuid_identifier!(
    /// Unique identifier for a submitted task record.
    WorkTaskId
);

uuid_identifier!(
    /// Unique identifier for a draft.
    DraftId
);

uuid_identifier!(
    /// Unique identifier for a flow instance created by a submission.
    InstanceId
);
