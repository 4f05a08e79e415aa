//! Source issue record.

use super::status::SourceStatus;
use serde::{Deserialize, Deserializer, Serialize};

/// Name used for issues and comments filed without an account.
pub const ANONYMOUS_USER: &str = "Anonymous";

/// An issue as found in the source export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceIssue {
    /// Source-assigned identifier, unique within the snapshot.
    pub id: u64,

    /// Issue title. Also used as the resumption key.
    pub title: String,

    /// Body text. `null` in the export is read as empty.
    #[serde(default, deserialize_with = "nullable_string")]
    pub content: String,

    /// Username of the reporter, [`ANONYMOUS_USER`] when `null`.
    #[serde(deserialize_with = "user_name")]
    pub reporter: String,

    /// Username of the assignee, if any.
    #[serde(default)]
    pub assignee: Option<String>,

    /// Creation timestamp, verbatim from the export.
    pub created_on: String,

    /// Last update timestamp, verbatim from the export.
    pub updated_on: String,

    /// Source status.
    pub status: SourceStatus,

    /// Free-form classification (bug, enhancement, ...).
    pub kind: String,

    /// Free-form priority (minor, major, ...).
    pub priority: String,

    /// Component the issue was filed against.
    #[serde(default)]
    pub component: Option<String>,
}

/// A comment as found in the source export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceComment {
    /// Source-assigned identifier, unique within the snapshot.
    pub id: u64,

    /// Identifier of the issue this comment belongs to.
    pub issue: u64,

    /// Username of the author, [`ANONYMOUS_USER`] when `null`.
    #[serde(deserialize_with = "user_name")]
    pub user: String,

    /// Comment text. Empty for pure status-change events.
    #[serde(default, deserialize_with = "nullable_string")]
    pub content: String,

    /// Creation timestamp, verbatim from the export.
    pub created_on: String,
}

impl SourceComment {
    /// Returns true if the comment carries text worth migrating.
    #[must_use]
    pub fn has_content(&self) -> bool {
        !self.content.is_empty()
    }
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn user_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .unwrap_or_else(|| ANONYMOUS_USER.to_string()))
}
