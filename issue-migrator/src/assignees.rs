//! Resolution of source assignees to destination assignees.

use crate::config::AssigneeTable;

/// Outcome of resolving a source assignee.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssigneeResolution {
    /// Destination username to assign, if any.
    pub assignee: Option<String>,

    /// Source username that had to fall back to the default, if any.
    pub unmapped: Option<String>,
}

/// Maps source usernames onto destination usernames.
#[derive(Debug, Clone)]
pub struct AssigneeResolver {
    table: AssigneeTable,
    consider_assignees: bool,
}

impl AssigneeResolver {
    /// Creates a resolver over a fixed table.
    #[must_use]
    pub fn new(table: AssigneeTable, consider_assignees: bool) -> Self {
        Self {
            table,
            consider_assignees,
        }
    }

    /// Creates a resolver that never assigns anyone.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(AssigneeTable::with_default(None), false)
    }

    /// Resolves the assignee of a source issue.
    ///
    /// Unmapped users fall back to the `.DEFAULT` entry and are reported in
    /// [`AssigneeResolution::unmapped`] so the original can be recorded.
    #[must_use]
    pub fn resolve(&self, source_assignee: Option<&str>) -> AssigneeResolution {
        let Some(source) = source_assignee.filter(|_| self.consider_assignees) else {
            return AssigneeResolution::default();
        };

        match self.table.lookup(source) {
            Some(target) => AssigneeResolution {
                assignee: target.map(str::to_string),
                unmapped: None,
            },
            None => AssigneeResolution {
                assignee: self.table.default_assignee().map(str::to_string),
                unmapped: Some(source.to_string()),
            },
        }
    }
}
