//! Destination issue tracker capability.
//!
//! The migrator only needs three mutating calls from the destination. Any
//! tracker that provides them can be targeted; [`github::GitHubDestination`]
//! is the shipped implementation.

mod error;
pub mod github;
mod handle;

pub use error::DestinationError;
pub use handle::IssueHandle;

use crate::mapping::DestinationState;
use async_trait::async_trait;
use serde::Serialize;

/// Payload of an issue to create on the destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewIssue {
    /// Issue title.
    pub title: String,

    /// Issue body.
    pub body: String,

    /// Labels to attach.
    pub labels: Vec<String>,

    /// Destination username to assign.
    pub assignee: Option<String>,
}

/// Mutating operations the migrator performs against a destination.
///
/// A failed call must have no partial effect, since it will be re-invoked.
#[async_trait]
pub trait Destination: Send + Sync {
    /// Creates an issue and returns a handle to it.
    async fn create_issue(&self, issue: &NewIssue) -> Result<IssueHandle, DestinationError>;

    /// Sets the open/closed state of an issue.
    async fn edit_issue_state(
        &self,
        issue: &IssueHandle,
        state: DestinationState,
    ) -> Result<(), DestinationError>;

    /// Adds a comment to an issue.
    async fn create_comment(&self, issue: &IssueHandle, body: &str)
        -> Result<(), DestinationError>;
}

#[async_trait]
impl<T: Destination + ?Sized> Destination for &T {
    async fn create_issue(&self, issue: &NewIssue) -> Result<IssueHandle, DestinationError> {
        (**self).create_issue(issue).await
    }

    async fn edit_issue_state(
        &self,
        issue: &IssueHandle,
        state: DestinationState,
    ) -> Result<(), DestinationError> {
        (**self).edit_issue_state(issue, state).await
    }

    async fn create_comment(
        &self,
        issue: &IssueHandle,
        body: &str,
    ) -> Result<(), DestinationError> {
        (**self).create_comment(issue, body).await
    }
}
