//! Mapping of source issue semantics onto destination state and labels.
//!
//! The destination only knows open and closed issues, so statuses that have
//! no native equivalent are carried over as labels.

use crate::snapshot::{SourceIssue, SourceStatus};
use serde::Serialize;
use std::fmt;

/// Label attached to every migrated issue.
pub const IMPORTED_LABEL: &str = "imported";

/// Issue state on the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DestinationState {
    /// Open issue.
    Open,
    /// Closed issue.
    Closed,
}

impl DestinationState {
    /// Returns the state name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for DestinationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Destination state and labels derived from a source issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueMapping {
    /// State the destination issue must end up in.
    pub state: DestinationState,

    /// Labels to create the issue with, in a stable order.
    pub labels: Vec<String>,
}

/// Returns the destination state for a source status.
#[must_use]
pub fn destination_state(status: SourceStatus) -> DestinationState {
    match status {
        SourceStatus::New | SourceStatus::Open | SourceStatus::OnHold => DestinationState::Open,
        SourceStatus::Resolved
        | SourceStatus::Invalid
        | SourceStatus::Duplicate
        | SourceStatus::Wontfix => DestinationState::Closed,
    }
}

/// Returns true if the status is preserved as a label on the destination.
#[must_use]
pub fn is_label_status(status: SourceStatus) -> bool {
    matches!(
        status,
        SourceStatus::OnHold
            | SourceStatus::Duplicate
            | SourceStatus::Invalid
            | SourceStatus::Wontfix
    )
}

/// Maps a source issue to its destination state and labels.
#[must_use]
pub fn map_issue(issue: &SourceIssue) -> IssueMapping {
    let mut labels: Vec<String> = Vec::with_capacity(5);
    let mut push = |label: &str| {
        if !labels.iter().any(|existing| existing == label) {
            labels.push(label.to_string());
        }
    };

    push(IMPORTED_LABEL);
    push(issue.kind.as_str());
    push(issue.priority.as_str());

    if let Some(component) = issue.component.as_deref().filter(|c| !c.is_empty()) {
        push(component);
    }

    if is_label_status(issue.status) {
        push(issue.status.as_str());
    }

    IssueMapping {
        state: destination_state(issue.status),
        labels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(status: SourceStatus, component: Option<&str>) -> SourceIssue {
        SourceIssue {
            id: 1,
            title: "title".to_string(),
            content: String::new(),
            reporter: "alice".to_string(),
            assignee: None,
            created_on: "2012-01-01".to_string(),
            updated_on: "2012-01-02".to_string(),
            status,
            kind: "bug".to_string(),
            priority: "major".to_string(),
            component: component.map(str::to_string),
        }
    }

    #[test]
    fn every_status_maps_to_a_state() {
        let closed: Vec<_> = SourceStatus::ALL
            .into_iter()
            .filter(|s| destination_state(*s) == DestinationState::Closed)
            .collect();

        assert_eq!(
            closed,
            vec![
                SourceStatus::Resolved,
                SourceStatus::Invalid,
                SourceStatus::Duplicate,
                SourceStatus::Wontfix
            ]
        );
    }

    #[test]
    fn open_issue_gets_base_labels() {
        let mapping = map_issue(&issue(SourceStatus::New, None));

        assert_eq!(mapping.state, DestinationState::Open);
        assert_eq!(mapping.labels, vec!["imported", "bug", "major"]);
    }

    #[test]
    fn component_becomes_label() {
        let mapping = map_issue(&issue(SourceStatus::Open, Some("parser")));
        assert_eq!(mapping.labels, vec!["imported", "bug", "major", "parser"]);
    }

    #[test]
    fn empty_component_is_ignored() {
        let mapping = map_issue(&issue(SourceStatus::Open, Some("")));
        assert_eq!(mapping.labels.len(), 3);
    }

    #[test]
    fn label_status_is_kept_as_label() {
        let mapping = map_issue(&issue(SourceStatus::OnHold, None));
        assert_eq!(mapping.state, DestinationState::Open);
        assert!(mapping.labels.contains(&"on hold".to_string()));

        let mapping = map_issue(&issue(SourceStatus::Wontfix, None));
        assert_eq!(mapping.state, DestinationState::Closed);
        assert!(mapping.labels.contains(&"wontfix".to_string()));
    }

    #[test]
    fn resolved_is_not_a_label() {
        let mapping = map_issue(&issue(SourceStatus::Resolved, None));
        assert_eq!(mapping.state, DestinationState::Closed);
        assert!(!mapping.labels.contains(&"resolved".to_string()));
    }

    #[test]
    fn mapping_is_deterministic() {
        for status in SourceStatus::ALL {
            let source = issue(status, Some("core"));
            assert_eq!(map_issue(&source), map_issue(&source));
        }
    }

    #[test]
    fn duplicate_labels_collapse() {
        let mut source = issue(SourceStatus::New, Some("bug"));
        source.priority = "bug".to_string();

        assert_eq!(map_issue(&source).labels, vec!["imported", "bug"]);
    }
}
