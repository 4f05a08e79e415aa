//! Runner error types.

/// Errors that abort a migration run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Configuration loading or validation errors.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// Source snapshot loading or integrity errors.
    #[error(transparent)]
    Snapshot(#[from] crate::snapshot::SnapshotError),

    /// Provenance template errors.
    #[error(transparent)]
    Template(#[from] crate::templates::TemplateError),

    /// A destination call was given up on.
    #[error(transparent)]
    Retry(#[from] crate::retry::RetryError),

    /// GitHub API client initialization errors.
    #[error(transparent)]
    Octocrab(#[from] octocrab::Error),

    /// A live run was requested without a token.
    #[error("A GitHub token is required unless running in dry-run mode")]
    MissingToken,
}
