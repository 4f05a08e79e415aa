//! Snapshot loading error types.

use thiserror::Error;

/// Data-integrity errors detected while loading a source snapshot.
///
/// All of these are raised before any destination call is made.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Failed to read the export file.
    #[error("Failed to read snapshot '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The export is not a valid document or a record is missing a field.
    #[error("Malformed snapshot '{path}': {source}")]
    JsonError {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// A comment references an issue that is not in the snapshot.
    #[error("Comment {comment} references unknown issue {issue}")]
    OrphanComment { comment: u64, issue: u64 },

    /// Two issues share an identifier.
    #[error("Duplicate issue identifier {id}")]
    DuplicateIssue { id: u64 },

    /// Two comments share an identifier.
    #[error("Duplicate comment identifier {id}")]
    DuplicateComment { id: u64 },
}
