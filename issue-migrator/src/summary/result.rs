//! Per-issue migration results.

use crate::destination::IssueHandle;
use crate::mapping::DestinationState;
use serde::Serialize;

/// A source issue that was fully replayed onto the destination.
#[derive(Debug, Clone, Serialize)]
pub struct MigratedIssue {
    /// Source identifier.
    pub source_id: u64,

    /// Handle of the created destination issue.
    pub handle: IssueHandle,

    /// Final destination state.
    pub state: DestinationState,

    /// Source comments created on the destination.
    pub comments_imported: u64,

    /// Source comments without content that were not created.
    pub comments_skipped: u64,
}
