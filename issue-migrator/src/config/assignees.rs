//! Assignee table deserialization.

use serde::Deserialize;
use std::collections::BTreeMap;

/// Key of the entry used for source assignees missing from the table.
pub const DEFAULT_ASSIGNEE_KEY: &str = ".DEFAULT";

/// Placeholder default shipped when no table is configured.
pub const PLACEHOLDER_ASSIGNEE: &str = "default_committer";

/// Mapping from source usernames to destination usernames.
///
/// An empty destination name means "leave unassigned". Every target must
/// have write access to the destination repository, otherwise the
/// destination rejects the issue.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct AssigneeTable {
    entries: BTreeMap<String, String>,
}

impl Default for AssigneeTable {
    fn default() -> Self {
        Self::with_default(Some(PLACEHOLDER_ASSIGNEE))
    }
}

impl AssigneeTable {
    /// Creates a table holding only the `.DEFAULT` entry.
    #[must_use]
    pub fn with_default(default: Option<&str>) -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(
            DEFAULT_ASSIGNEE_KEY.to_string(),
            default.unwrap_or_default().to_string(),
        );
        Self { entries }
    }

    /// Adds a mapping, returning the updated table.
    #[must_use]
    pub fn with_entry(mut self, source: &str, destination: Option<&str>) -> Self {
        self.entries.insert(
            source.to_string(),
            destination.unwrap_or_default().to_string(),
        );
        self
    }

    /// Looks up a source username.
    ///
    /// Returns `None` when the user is not mapped and `Some(None)` when the
    /// user is mapped to "no assignee".
    #[must_use]
    pub fn lookup(&self, source: &str) -> Option<Option<&str>> {
        if source == DEFAULT_ASSIGNEE_KEY {
            return None;
        }
        self.entries.get(source).map(|target| non_empty(target))
    }

    /// Returns the fallback assignee, if it assigns anyone.
    #[must_use]
    pub fn default_assignee(&self) -> Option<&str> {
        self.entries
            .get(DEFAULT_ASSIGNEE_KEY)
            .and_then(|target| non_empty(target))
    }

    /// Returns true if the `.DEFAULT` entry is present.
    #[must_use]
    pub fn has_default(&self) -> bool {
        self.entries.contains_key(DEFAULT_ASSIGNEE_KEY)
    }

    /// Returns true if the table is still the unconfigured placeholder.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.entries.len() == 1 && self.default_assignee() == Some(PLACEHOLDER_ASSIGNEE)
    }

    /// Number of explicit user mappings, excluding `.DEFAULT`.
    #[must_use]
    pub fn mapped_users(&self) -> usize {
        self.entries.len() - usize::from(self.has_default())
    }
}

fn non_empty(target: &str) -> Option<&str> {
    (!target.is_empty()).then_some(target)
}
