//! Sequential replay of a migration plan onto a destination.

use super::plan::{build_plan, IssuePlan, MigrationPlan};
use super::RunnerError;
use crate::assignees::AssigneeResolver;
use crate::destination::{Destination, IssueHandle};
use crate::mapping::DestinationState;
use crate::retry::{RetryError, RetryPolicy, RetryingDriver};
use crate::snapshot::Snapshot;
use crate::summary::{MigratedIssue, RunStatistics};
use crate::templates::TemplateRenderer;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, info_span, Instrument};

/// Default pause after each created comment.
pub const DEFAULT_PACING: Duration = Duration::from_millis(250);

/// Progress of a single issue through the replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IssueStage {
    Created,
    Closed,
    Open,
    CommentsReplayed,
}

impl fmt::Display for IssueStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Created => "created",
            Self::Closed => "closed",
            Self::Open => "open",
            Self::CommentsReplayed => "comments_replayed",
        })
    }
}

/// Replays source issues and comments onto a destination, one call at a
/// time.
///
/// Issues are created in ascending source order and each issue's comments
/// in ascending source order. The destination has no timestamps of its own,
/// so this order is the only chronology it gets; nothing here runs
/// concurrently.
pub struct Migrator<D> {
    destination: D,
    driver: RetryingDriver,
    resolver: AssigneeResolver,
    renderer: TemplateRenderer,
    pacing: Duration,
    resume_after: Option<String>,
}

impl<D: Destination> Migrator<D> {
    /// Creates a migrator with the default retry policy and pacing.
    pub fn new(destination: D, resolver: AssigneeResolver, renderer: TemplateRenderer) -> Self {
        Self {
            destination,
            driver: RetryingDriver::new(RetryPolicy::default()),
            resolver,
            renderer,
            pacing: DEFAULT_PACING,
            resume_after: None,
        }
    }

    /// Sets the retry policy for destination calls.
    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.driver = RetryingDriver::new(policy);
        self
    }

    /// Sets the pause applied after each created comment.
    #[must_use]
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// Skips issues whose title sorts at or before `title`.
    #[must_use]
    pub fn with_resume_after(mut self, title: Option<String>) -> Self {
        self.resume_after = title;
        self
    }

    /// Builds the replay plan without calling the destination.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Template`] if a body or note fails to render.
    pub fn plan(&self, snapshot: &Snapshot) -> Result<MigrationPlan, RunnerError> {
        Ok(build_plan(
            snapshot,
            &self.resolver,
            &self.renderer,
            self.resume_after.as_deref(),
        )?)
    }

    /// Plans and replays a snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if planning fails, or if a destination call is given
    /// up on under a bounded or fail-fast retry policy.
    pub async fn run(&self, snapshot: &Snapshot) -> Result<RunStatistics, RunnerError> {
        let plan = self.plan(snapshot)?;
        self.execute(&plan).await
    }

    /// Replays a plan.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Retry`] if a destination call is given up on,
    /// which the default policy never does.
    pub async fn execute(&self, plan: &MigrationPlan) -> Result<RunStatistics, RunnerError> {
        let mut stats = RunStatistics::new(false);
        stats.issues_resumed_past = plan.resumed_past as u64;
        let retries_before = self.driver.retries();

        info!(
            issues = plan.issues.len(),
            comments = plan.comment_count(),
            resumed_past = plan.resumed_past,
            "Starting migration"
        );

        for issue in &plan.issues {
            stats.record_read(issue.comments.len());

            let span = info_span!("migrate_issue", source_id = issue.source_id);
            let result = self.migrate_issue(issue).instrument(span).await;
            stats.retries = self.driver.retries() - retries_before;

            let migrated = result?;
            stats.record_migrated(&migrated);
        }

        info!(
            issues_imported = stats.issues_imported,
            comments_imported = stats.comments_imported,
            retries = stats.retries,
            "Migration finished"
        );
        Ok(stats)
    }

    async fn migrate_issue(&self, plan: &IssuePlan) -> Result<MigratedIssue, RetryError> {
        info!(title = %plan.issue.title, "Importing issue");

        let destination = &self.destination;
        let payload = &plan.issue;
        let handle = self
            .driver
            .run("create issue", move || destination.create_issue(payload))
            .await?;
        info!(issue = %handle, "Imported issue");
        self.enter(IssueStage::Created);

        if plan.state == DestinationState::Closed {
            let target = &handle;
            self.driver
                .run("close issue", move || {
                    destination.edit_issue_state(target, DestinationState::Closed)
                })
                .await?;
            info!(issue = %handle, "Closed issue");
            self.enter(IssueStage::Closed);
        } else {
            self.enter(IssueStage::Open);
        }

        if let Some(note) = &plan.provenance_note {
            self.post_comment(&handle, note).await?;
        }

        let mut comments_imported = 0;
        let mut comments_skipped = 0;
        for comment in &plan.comments {
            match &comment.body {
                Some(body) => {
                    self.post_comment(&handle, body).await?;
                    comments_imported += 1;
                    debug!(comment_id = comment.source_id, "Imported comment");
                }
                None => {
                    comments_skipped += 1;
                    debug!(comment_id = comment.source_id, "Skipped empty comment");
                }
            }
        }
        self.enter(IssueStage::CommentsReplayed);

        Ok(MigratedIssue {
            source_id: plan.source_id,
            handle,
            state: plan.state,
            comments_imported,
            comments_skipped,
        })
    }

    /// Creates a comment, then waits out the pacing delay.
    async fn post_comment(&self, handle: &IssueHandle, body: &str) -> Result<(), RetryError> {
        let destination = &self.destination;
        self.driver
            .run("create comment", move || destination.create_comment(handle, body))
            .await?;

        if !self.pacing.is_zero() {
            tokio::time::sleep(self.pacing).await;
        }
        Ok(())
    }

    fn enter(&self, stage: IssueStage) {
        debug!(%stage, "Issue stage reached");
    }
}
