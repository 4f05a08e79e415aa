//! Deterministic replay order.
//!
//! The destination infers chronology from insertion order, so issues are
//! replayed by ascending source identifier and comments by ascending source
//! identifier within their issue.

use crate::snapshot::{SourceComment, SourceIssue};
use std::collections::HashMap;

/// Returns the issues to replay, sorted by identifier.
///
/// Issues whose title is lexicographically less than or equal to
/// `resume_after` are dropped. This assumes titles grow with identifiers,
/// which only holds for exports whose titles were numbered that way. An
/// empty cursor skips nothing.
#[must_use]
pub fn order_issues<'a>(
    issues: &'a [SourceIssue],
    resume_after: Option<&str>,
) -> Vec<&'a SourceIssue> {
    let cursor = resume_after.filter(|cursor| !cursor.is_empty());
    let mut ordered: Vec<&SourceIssue> = issues
        .iter()
        .filter(|issue| cursor.map_or(true, |cursor| issue.title.as_str() > cursor))
        .collect();
    ordered.sort_by_key(|issue| issue.id);
    ordered
}

/// Returns the comments of one issue, sorted by identifier.
#[must_use]
pub fn comments_for<'a>(
    issue: &SourceIssue,
    comments: &'a [SourceComment],
) -> Vec<&'a SourceComment> {
    let mut matching: Vec<&SourceComment> = comments
        .iter()
        .filter(|comment| comment.issue == issue.id)
        .collect();
    matching.sort_by_key(|comment| comment.id);
    matching
}

/// Comments grouped by issue, each group sorted by identifier.
///
/// Equivalent to calling [`comments_for`] per issue without rescanning the
/// full comment list each time.
#[derive(Debug, Default)]
pub struct CommentIndex<'a> {
    by_issue: HashMap<u64, Vec<&'a SourceComment>>,
}

impl<'a> CommentIndex<'a> {
    /// Groups all comments of a snapshot.
    #[must_use]
    pub fn new(comments: &'a [SourceComment]) -> Self {
        let mut by_issue: HashMap<u64, Vec<&'a SourceComment>> = HashMap::new();
        for comment in comments {
            by_issue.entry(comment.issue).or_default().push(comment);
        }
        for group in by_issue.values_mut() {
            group.sort_by_key(|comment| comment.id);
        }
        Self { by_issue }
    }

    /// Returns the ordered comments of an issue.
    #[must_use]
    pub fn for_issue(&self, issue_id: u64) -> &[&'a SourceComment] {
        self.by_issue.get(&issue_id).map_or(&[][..], Vec::as_slice)
    }
}
