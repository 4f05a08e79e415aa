//! GitHub destination backed by octocrab.

use super::{Destination, DestinationError, IssueHandle, NewIssue};
use crate::mapping::DestinationState;
use crate::rate_limit::{check_core_rate_limit, ensure_core_rate_limit, unix_now, RateLimitInfo};
use async_trait::async_trait;
use octocrab::models::IssueState;
use octocrab::Octocrab;
use tracing::{debug, warn};

/// Creates issues and comments in a single GitHub repository.
#[derive(Debug, Clone)]
pub struct GitHubDestination {
    octocrab: Octocrab,
    owner: String,
    repo: String,
}

impl GitHubDestination {
    /// Targets `owner/repo` with an authenticated client.
    pub fn new(octocrab: Octocrab, owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            octocrab,
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Returns the repository as `owner/repo`.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    async fn throttle(&self) -> Result<(), DestinationError> {
        ensure_core_rate_limit(&self.octocrab)
            .await
            .map_err(DestinationError::from)
    }

    /// Converts a failed call, asking GitHub when the core window resets if
    /// the call was throttled.
    async fn settle<T>(
        &self,
        result: Result<T, octocrab::Error>,
    ) -> Result<T, DestinationError> {
        let error = match result {
            Ok(value) => return Ok(value),
            Err(error) => DestinationError::from(error),
        };
        if !matches!(error, DestinationError::RateLimited { .. }) {
            return Err(error);
        }

        match check_core_rate_limit(&self.octocrab).await {
            Ok(info) => Err(with_reset_wait(error, &info, unix_now())),
            Err(e) => {
                warn!(error = %e, "Failed to read rate limit after throttling");
                Err(error)
            }
        }
    }
}

#[async_trait]
impl Destination for GitHubDestination {
    async fn create_issue(&self, issue: &NewIssue) -> Result<IssueHandle, DestinationError> {
        self.throttle().await?;
        debug!(title = %issue.title, "Creating GitHub issue");

        let result = self
            .octocrab
            .issues(&self.owner, &self.repo)
            .create(&issue.title)
            .body(&issue.body)
            .labels(issue.labels.clone())
            .assignees(issue.assignee.clone().map(|assignee| vec![assignee]))
            .send()
            .await;
        let created = self.settle(result).await?;

        Ok(IssueHandle {
            number: created.number,
            url: Some(created.html_url.to_string()),
        })
    }

    async fn edit_issue_state(
        &self,
        issue: &IssueHandle,
        state: DestinationState,
    ) -> Result<(), DestinationError> {
        self.throttle().await?;
        let state = match state {
            DestinationState::Open => IssueState::Open,
            DestinationState::Closed => IssueState::Closed,
        };

        let result = self
            .octocrab
            .issues(&self.owner, &self.repo)
            .update(issue.number)
            .state(state)
            .send()
            .await;
        self.settle(result).await.map(drop)
    }

    async fn create_comment(
        &self,
        issue: &IssueHandle,
        body: &str,
    ) -> Result<(), DestinationError> {
        self.throttle().await?;
        let result = self
            .octocrab
            .issues(&self.owner, &self.repo)
            .create_comment(issue.number, body)
            .await;
        self.settle(result).await.map(drop)
    }
}

impl From<octocrab::Error> for DestinationError {
    fn from(error: octocrab::Error) -> Self {
        let status = match &error {
            octocrab::Error::GitHub { source, .. } => Some(source.status_code.as_u16()),
            _ => None,
        };
        classify(status, &error.to_string())
    }
}

/// Classifies a GitHub failure from its HTTP status and message.
fn classify(status: Option<u16>, message: &str) -> DestinationError {
    let lower = message.to_lowercase();

    if status == Some(429) || lower.contains("rate limit") {
        return DestinationError::RateLimited {
            retry_after_secs: None,
        };
    }

    // 422 is what GitHub answers for assignees without access to the repo.
    if matches!(status, Some(403 | 422))
        || lower.contains("forbidden")
        || lower.contains("permission")
    {
        return DestinationError::PermissionDenied {
            message: message.to_string(),
        };
    }

    DestinationError::remote(message)
}

/// Fills a throttled error with the time left until the core window resets.
///
/// A limit that is not exhausted means a secondary limit, which carries no
/// reset time; the fixed retry delay applies then.
fn with_reset_wait(
    error: DestinationError,
    info: &RateLimitInfo,
    now: u64,
) -> DestinationError {
    error.with_retry_after(info.wait_needed(now))
}
