//! Orchestrates a migration run.
//!
//! [`Runner`] wires configuration, the source snapshot and the GitHub
//! destination together; [`Migrator`] does the actual replay against any
//! [`Destination`](crate::destination::Destination).

mod config;
mod error;
mod migrator;
mod plan;

pub use config::RunnerConfig;
pub use error::RunnerError;
pub use migrator::{Migrator, DEFAULT_PACING};
pub use plan::{build_plan, CommentPlan, IssuePlan, MigrationPlan};

use crate::assignees::AssigneeResolver;
use crate::config::MigrationConfig;
use crate::destination::github::GitHubDestination;
use crate::snapshot::Snapshot;
use crate::summary::RunStatistics;
use crate::templates::TemplateRenderer;
use octocrab::Octocrab;
use tracing::info;

/// Runs a full migration from a snapshot file into a GitHub repository.
pub struct Runner {
    config: RunnerConfig,
}

impl Runner {
    /// Builds a runner from the provided configuration.
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    /// Executes the run.
    ///
    /// Configuration, the snapshot and the full replay plan are all checked
    /// before the first destination call.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] on any pre-flight failure, or if a call is
    /// given up on under a fail-fast policy.
    pub async fn run(&self) -> Result<RunStatistics, RunnerError> {
        let settings = MigrationConfig::load_or_default(self.config.config_path())?;
        settings.validate(self.config.consider_assignees())?;
        let (owner, repo) = self.config.repository_parts()?;

        let snapshot = Snapshot::load(self.config.snapshot_path())?;

        let resolver =
            AssigneeResolver::new(settings.assignees.clone(), self.config.consider_assignees());
        let renderer = TemplateRenderer::new(&settings.formats, &settings.source_name)?;

        if self.config.dry_run() {
            let plan = build_plan(&snapshot, &resolver, &renderer, self.config.resume_after())?;
            print_dry_run_preview(self.config.repository(), &plan);
            return Ok(dry_run_statistics(&plan));
        }

        let octocrab = self.build_client()?;
        let destination = GitHubDestination::new(octocrab, owner, repo);
        info!(repo = %destination.full_name(), "Migrating into repository");

        let migrator = Migrator::new(destination, resolver, renderer)
            .with_retry_policy(self.config.retry_policy())
            .with_pacing(self.config.pacing())
            .with_resume_after(self.config.resume_after().map(str::to_string));

        migrator.run(&snapshot).await
    }

    fn build_client(&self) -> Result<Octocrab, RunnerError> {
        let token = self.config.token().ok_or(RunnerError::MissingToken)?;
        let builder = Octocrab::builder().personal_token(token.to_string());
        let builder = match self.config.api_base() {
            Some(api_base) => builder.base_uri(api_base.as_str())?,
            None => builder,
        };
        Ok(builder.build()?)
    }
}

fn dry_run_statistics(plan: &MigrationPlan) -> RunStatistics {
    let mut stats = RunStatistics::new(true);
    stats.issues_resumed_past = plan.resumed_past as u64;
    for issue in &plan.issues {
        stats.record_read(issue.comments.len());
    }
    stats
}

fn print_dry_run_preview(repository: &str, plan: &MigrationPlan) {
    println!("\n[DRY RUN] Target: {repository}");
    println!(
        "  Would import {} issues with {} comments ({} skipped by resume cursor)\n",
        plan.issues.len(),
        plan.comment_count(),
        plan.resumed_past
    );

    for (i, issue) in plan.issues.iter().enumerate() {
        println!(
            "  [{}/{}] #{} \"{}\"",
            i + 1,
            plan.issues.len(),
            issue.source_id,
            issue.issue.title
        );
        println!(
            "    state: {}, labels: [{}], assignee: {}",
            issue.state,
            issue.issue.labels.join(", "),
            issue.issue.assignee.as_deref().unwrap_or("-")
        );
        let skipped = issue.comments.iter().filter(|c| c.body.is_none()).count();
        println!(
            "    comments: {} ({} empty, not imported)",
            issue.comments.len() - skipped,
            skipped
        );
    }

    if let Some(first) = plan.issues.first() {
        println!("\n  Sample issue body:");
        for line in first.issue.body.lines().take(10) {
            println!("    {line}");
        }
        if first.issue.body.lines().count() > 10 {
            println!("    ...");
        }
    }

    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const EXPORT: &str = r#"{
        "issues": [
            {"id": 1, "title": "a", "content": "x", "reporter": "r", "assignee": "jdoe",
             "created_on": "c", "updated_on": "u", "status": "open",
             "kind": "bug", "priority": "minor"}
        ],
        "comments": [
            {"id": 1, "issue": 1, "user": "u", "content": null, "created_on": "c"}
        ]
    }"#;

    fn write_snapshot(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("db-1.0.json");
        fs::write(&path, EXPORT).unwrap();
        path
    }

    #[tokio::test]
    async fn dry_run_needs_no_token() {
        let temp = TempDir::new().unwrap();
        let config = RunnerConfig::new(write_snapshot(temp.path()), "acme/widgets".into(), None)
            .with_consider_assignees(false)
            .with_dry_run(true);

        let stats = Runner::new(config).run().await.unwrap();

        assert!(stats.dry_run);
        assert_eq!(stats.issues_read, 1);
        assert_eq!(stats.comments_read, 1);
        assert_eq!(stats.issues_imported, 0);
    }

    #[tokio::test]
    async fn placeholder_assignees_abort_before_loading() {
        let temp = TempDir::new().unwrap();
        let config = RunnerConfig::new(
            temp.path().join("missing.json"),
            "acme/widgets".into(),
            Some("token".into()),
        );

        let result = Runner::new(config).run().await;
        assert!(matches!(result, Err(RunnerError::Config(_))));
    }

    #[tokio::test]
    async fn malformed_snapshot_aborts() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("db-1.0.json");
        fs::write(&path, "{").unwrap();
        let config = RunnerConfig::new(path, "acme/widgets".into(), Some("token".into()))
            .with_consider_assignees(false);

        let result = Runner::new(config).run().await;
        assert!(matches!(result, Err(RunnerError::Snapshot(_))));
    }

    #[tokio::test]
    async fn live_run_requires_token() {
        let temp = TempDir::new().unwrap();
        let config = RunnerConfig::new(write_snapshot(temp.path()), "acme/widgets".into(), None)
            .with_consider_assignees(false);

        let result = Runner::new(config).run().await;
        assert!(matches!(result, Err(RunnerError::MissingToken)));
    }
}
