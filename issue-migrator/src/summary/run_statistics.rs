//! Run statistics.

use super::result::MigratedIssue;
use serde::Serialize;

/// Counters accumulated over a run. They only ever grow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStatistics {
    /// Issues visited in replay order.
    pub issues_read: u64,

    /// Issues created on the destination.
    pub issues_imported: u64,

    /// Comments belonging to visited issues.
    pub comments_read: u64,

    /// Comments created on the destination.
    pub comments_imported: u64,

    /// Comments without content, not created.
    pub comments_skipped: u64,

    /// Issues dropped by the resumption cursor.
    pub issues_resumed_past: u64,

    /// Destination calls that had to be re-invoked.
    pub retries: u64,

    /// Whether this was a dry run.
    pub dry_run: bool,
}

impl RunStatistics {
    /// Creates empty statistics.
    #[must_use]
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Default::default()
        }
    }

    /// Records an issue about to be replayed with its comment count.
    pub fn record_read(&mut self, comments: usize) {
        self.issues_read += 1;
        self.comments_read += comments as u64;
    }

    /// Records a fully replayed issue.
    pub fn record_migrated(&mut self, issue: &MigratedIssue) {
        self.issues_imported += 1;
        self.comments_imported += issue.comments_imported;
        self.comments_skipped += issue.comments_skipped;
    }

    /// Returns true if every visited issue and comment was accounted for.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.issues_read == self.issues_imported
            && self.comments_read == self.comments_imported + self.comments_skipped
    }
}
