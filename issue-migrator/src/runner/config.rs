//! Runner configuration.

use super::migrator::DEFAULT_PACING;
use crate::config::ConfigError;
use crate::retry::{RetryPolicy, DEFAULT_RETRY_DELAY};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Configuration for a migration run.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Path to the source export.
    snapshot_path: PathBuf,
    /// Target repository as `owner/name`.
    repository: String,
    /// GitHub token used for API calls.
    token: Option<String>,
    /// Whether source assignees are carried over.
    consider_assignees: bool,
    /// Title of the last issue migrated by a previous run.
    resume_after: Option<String>,
    /// Path to the TOML configuration file.
    config_path: Option<PathBuf>,
    /// Whether to preview the plan without calling GitHub.
    dry_run: bool,
    /// Delay before re-invoking a failed call.
    retry_delay: Duration,
    /// Pause after each created comment.
    pacing: Duration,
    /// Whether permission failures abort the run instead of being retried.
    fail_fast_on_permission: bool,
    /// GitHub API base URL, for GitHub Enterprise.
    api_base: Option<Url>,
}

impl RunnerConfig {
    /// Creates a new configuration for a run.
    pub fn new(snapshot_path: PathBuf, repository: String, token: Option<String>) -> Self {
        Self {
            snapshot_path,
            repository,
            token,
            consider_assignees: true,
            resume_after: None,
            config_path: None,
            dry_run: false,
            retry_delay: DEFAULT_RETRY_DELAY,
            pacing: DEFAULT_PACING,
            fail_fast_on_permission: false,
            api_base: None,
        }
    }

    /// Sets whether source assignees are carried over.
    pub fn with_consider_assignees(mut self, consider_assignees: bool) -> Self {
        self.consider_assignees = consider_assignees;
        self
    }

    /// Sets the resumption cursor. An empty title means no resumption.
    pub fn with_resume_after(mut self, title: Option<String>) -> Self {
        self.resume_after = title.filter(|title| !title.is_empty());
        self
    }

    /// Sets the configuration file path.
    pub fn with_config_path(mut self, config_path: Option<PathBuf>) -> Self {
        self.config_path = config_path;
        self
    }

    /// Sets dry-run mode.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Sets the delay between attempts of a failed call.
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Sets the pause after each created comment.
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// Sets whether permission failures abort the run.
    pub fn with_fail_fast_on_permission(mut self, fail_fast: bool) -> Self {
        self.fail_fast_on_permission = fail_fast;
        self
    }

    /// Sets a custom GitHub API base URL.
    pub fn with_api_base(mut self, api_base: Option<Url>) -> Self {
        self.api_base = api_base;
        self
    }

    /// Returns the source export path.
    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    /// Returns the target repository.
    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Returns the configured GitHub token.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Returns whether source assignees are carried over.
    pub fn consider_assignees(&self) -> bool {
        self.consider_assignees
    }

    /// Returns the resumption cursor.
    pub fn resume_after(&self) -> Option<&str> {
        self.resume_after.as_deref()
    }

    /// Returns the configuration file path.
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Returns whether dry-run mode is enabled.
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Returns the pause after each created comment.
    pub fn pacing(&self) -> Duration {
        self.pacing
    }

    /// Returns the GitHub API base URL override.
    pub fn api_base(&self) -> Option<&Url> {
        self.api_base.as_ref()
    }

    /// Returns the retry policy for destination calls.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::unbounded(self.retry_delay)
            .with_fail_fast_on_permanent(self.fail_fast_on_permission)
    }

    /// Splits the repository into owner and name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] unless the repository has the
    /// form `owner/name`.
    pub fn repository_parts(&self) -> Result<(&str, &str), ConfigError> {
        let invalid = || ConfigError::ValidationError {
            path: "--repo".to_string(),
            message: format!("invalid repository '{}', expected owner/name", self.repository),
        };

        let (owner, name) = self.repository.trim().split_once('/').ok_or_else(invalid)?;
        let (owner, name) = (owner.trim(), name.trim());
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(invalid());
        }
        Ok((owner, name))
    }
}
