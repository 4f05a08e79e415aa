//! Source snapshot loading.
//!
//! A snapshot is the complete, static export of the source tracker. It is
//! read once, validated, and kept in memory for the whole run.

mod error;
mod issue;
mod status;

pub use error::SnapshotError;
pub use issue::{SourceComment, SourceIssue, ANONYMOUS_USER};
pub use status::{SourceStatus, UnknownStatus};

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

/// All issues and comments of a source export.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Issues, in export order.
    pub issues: Vec<SourceIssue>,

    /// Comments, in export order.
    #[serde(default)]
    pub comments: Vec<SourceComment>,
}

impl Snapshot {
    /// Loads and validates a snapshot from a JSON export file.
    ///
    /// Top-level keys other than `issues` and `comments` are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] if the file cannot be read, is malformed, or
    /// fails integrity validation.
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        info!(path = %path.display(), "Loading snapshot");

        let content = std::fs::read_to_string(path).map_err(|e| SnapshotError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        let snapshot = Self::from_json(&content).map_err(|e| match e {
            SnapshotError::JsonError { source, .. } => SnapshotError::JsonError {
                path: path.display().to_string(),
                source,
            },
            other => other,
        })?;

        info!(
            issues = snapshot.issues.len(),
            comments = snapshot.comments.len(),
            "Loaded snapshot"
        );
        Ok(snapshot)
    }

    /// Parses and validates a snapshot from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] if the text is malformed or fails integrity
    /// validation.
    pub fn from_json(content: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self =
            serde_json::from_str(content).map_err(|e| SnapshotError::JsonError {
                path: "<memory>".to_string(),
                source: e,
            })?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Checks identifier uniqueness and that every comment has an issue.
    ///
    /// # Errors
    ///
    /// Returns the first integrity violation found.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        let mut issue_ids = HashSet::with_capacity(self.issues.len());
        for issue in &self.issues {
            if !issue_ids.insert(issue.id) {
                return Err(SnapshotError::DuplicateIssue { id: issue.id });
            }
        }

        let mut comment_ids = HashSet::with_capacity(self.comments.len());
        for comment in &self.comments {
            if !comment_ids.insert(comment.id) {
                return Err(SnapshotError::DuplicateComment { id: comment.id });
            }
            if !issue_ids.contains(&comment.issue) {
                return Err(SnapshotError::OrphanComment {
                    comment: comment.id,
                    issue: comment.issue,
                });
            }
        }

        debug!("Snapshot integrity validated");
        Ok(())
    }
}
