#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod assignees;
pub mod config;
pub mod destination;
pub mod mapping;
pub mod ordering;
pub mod rate_limit;
pub mod retry;
pub mod runner;
pub mod snapshot;
pub mod summary;
pub mod templates;

pub use assignees::{AssigneeResolution, AssigneeResolver};
pub use config::{AssigneeTable, ConfigError, MigrationConfig, ProvenanceFormats};
pub use destination::{
    github::GitHubDestination, Destination, DestinationError, IssueHandle, NewIssue,
};
pub use mapping::{map_issue, DestinationState, IssueMapping, IMPORTED_LABEL};
pub use ordering::{comments_for, order_issues, CommentIndex};
pub use rate_limit::{check_core_rate_limit, ensure_core_rate_limit, wait_if_needed, RateLimitInfo};
pub use retry::{RetryError, RetryPolicy, RetryingDriver};
pub use runner::{build_plan, MigrationPlan, Migrator, Runner, RunnerConfig, RunnerError};
pub use snapshot::{Snapshot, SnapshotError, SourceComment, SourceIssue, SourceStatus};
pub use summary::{MigratedIssue, RunStatistics};
pub use templates::{TemplateError, TemplateRenderer};
