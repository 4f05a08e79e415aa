//! Replay planning.
//!
//! A plan holds everything the destination will receive, in order. Building
//! it renders every body and note up front, so formatting problems surface
//! before the first destination call.

use crate::assignees::AssigneeResolver;
use crate::destination::NewIssue;
use crate::mapping::{map_issue, DestinationState};
use crate::ordering::{order_issues, CommentIndex};
use crate::snapshot::{Snapshot, SourceIssue};
use crate::templates::{TemplateError, TemplateRenderer};
use serde::Serialize;
use tracing::debug;

/// Separator between provenance notes posted as one comment.
const NOTE_SEPARATOR: &str = "\n\n";

/// Ordered replay of a snapshot.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MigrationPlan {
    /// Issues to replay, by ascending source identifier.
    pub issues: Vec<IssuePlan>,

    /// Issues dropped by the resumption cursor.
    pub resumed_past: usize,
}

impl MigrationPlan {
    /// Total number of source comments in the plan.
    #[must_use]
    pub fn comment_count(&self) -> usize {
        self.issues.iter().map(|issue| issue.comments.len()).sum()
    }
}

/// Replay of one source issue.
#[derive(Debug, Clone, Serialize)]
pub struct IssuePlan {
    /// Source identifier.
    pub source_id: u64,

    /// Payload for the create call.
    pub issue: NewIssue,

    /// State the issue must end up in.
    pub state: DestinationState,

    /// Provenance comment posted after creation (and closure), if any.
    pub provenance_note: Option<String>,

    /// Source comments, by ascending source identifier.
    pub comments: Vec<CommentPlan>,
}

/// Replay of one source comment.
#[derive(Debug, Clone, Serialize)]
pub struct CommentPlan {
    /// Source identifier.
    pub source_id: u64,

    /// Rendered body, `None` when the comment has no content.
    pub body: Option<String>,
}

/// Builds the replay plan for a snapshot.
///
/// # Errors
///
/// Returns [`TemplateError`] if any body or note fails to render.
pub fn build_plan(
    snapshot: &Snapshot,
    resolver: &AssigneeResolver,
    renderer: &TemplateRenderer,
    resume_after: Option<&str>,
) -> Result<MigrationPlan, TemplateError> {
    let ordered = order_issues(&snapshot.issues, resume_after);
    let index = CommentIndex::new(&snapshot.comments);

    let issues = ordered
        .into_iter()
        .map(|issue| plan_issue(issue, &index, resolver, renderer))
        .collect::<Result<Vec<_>, _>>()?;

    let plan = MigrationPlan {
        resumed_past: snapshot.issues.len() - issues.len(),
        issues,
    };
    debug!(
        issues = plan.issues.len(),
        comments = plan.comment_count(),
        resumed_past = plan.resumed_past,
        "Built migration plan"
    );
    Ok(plan)
}

fn plan_issue(
    issue: &SourceIssue,
    index: &CommentIndex<'_>,
    resolver: &AssigneeResolver,
    renderer: &TemplateRenderer,
) -> Result<IssuePlan, TemplateError> {
    let mapping = map_issue(issue);
    let resolution = resolver.resolve(issue.assignee.as_deref());

    let mut notes = Vec::new();
    if let Some(unmapped) = &resolution.unmapped {
        notes.push(renderer.render_assignee_note(issue, unmapped)?);
    }
    if mapping.state == DestinationState::Closed {
        notes.extend(renderer.render_closure_notes(issue)?);
    }

    let comments = index
        .for_issue(issue.id)
        .iter()
        .map(|comment| -> Result<CommentPlan, TemplateError> {
            let body = if comment.has_content() {
                Some(renderer.render_comment_body(comment)?)
            } else {
                None
            };
            Ok(CommentPlan {
                source_id: comment.id,
                body,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(IssuePlan {
        source_id: issue.id,
        issue: NewIssue {
            title: issue.title.clone(),
            body: renderer.render_issue_body(issue)?,
            labels: mapping.labels,
            assignee: resolution.assignee,
        },
        state: mapping.state,
        provenance_note: (!notes.is_empty()).then(|| notes.join(NOTE_SEPARATOR)),
        comments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AssigneeTable, ProvenanceFormats};

    const EXPORT: &str = r#"{
        "issues": [
            {"id": 2, "title": "b", "content": "second", "reporter": "alice",
             "assignee": "ghost", "created_on": "c2", "updated_on": "u2",
             "status": "resolved", "kind": "bug", "priority": "major"},
            {"id": 1, "title": "a", "content": "first", "reporter": "alice",
             "assignee": "jdoe", "created_on": "c1", "updated_on": "u1",
             "status": "new", "kind": "bug", "priority": "minor"}
        ],
        "comments": [
            {"id": 11, "issue": 2, "user": "bob", "content": "", "created_on": "t1"},
            {"id": 10, "issue": 2, "user": "bob", "content": "looks fixed", "created_on": "t0"}
        ]
    }"#;

    fn plan(resume_after: Option<&str>) -> MigrationPlan {
        let snapshot = Snapshot::from_json(EXPORT).unwrap();
        let resolver = AssigneeResolver::new(
            AssigneeTable::with_default(Some("octocat")).with_entry("jdoe", Some("john-doe")),
            true,
        );
        let renderer = TemplateRenderer::new(&ProvenanceFormats::default(), "Bitbucket").unwrap();
        build_plan(&snapshot, &resolver, &renderer, resume_after).unwrap()
    }

    #[test]
    fn issues_planned_in_identifier_order() {
        let plan = plan(None);
        let ids: Vec<u64> = plan.issues.iter().map(|i| i.source_id).collect();

        assert_eq!(ids, vec![1, 2]);
        assert_eq!(plan.resumed_past, 0);
        assert_eq!(plan.comment_count(), 2);
    }

    #[test]
    fn open_mapped_issue_has_no_note() {
        let plan = plan(None);
        let first = &plan.issues[0];

        assert_eq!(first.state, DestinationState::Open);
        assert_eq!(first.issue.assignee.as_deref(), Some("john-doe"));
        assert_eq!(first.provenance_note, None);
        assert_eq!(
            first.issue.body,
            "(Original issue 1 created by alice on c1)\n\nfirst"
        );
    }

    #[test]
    fn closed_issue_note_combines_assignee_and_closure() {
        let plan = plan(None);
        let second = &plan.issues[1];

        assert_eq!(second.state, DestinationState::Closed);
        assert_eq!(second.issue.assignee.as_deref(), Some("octocat"));
        assert_eq!(
            second.provenance_note.as_deref(),
            Some(
                "(Original issue was assigned to ghost)\n\n\
                 (Original issue 2 last updated on u2)\n\n\
                 (Issue automatically closed due to status in Bitbucket: resolved)"
            )
        );
    }

    #[test]
    fn comments_ordered_and_empty_ones_unrendered() {
        let plan = plan(None);
        let comments = &plan.issues[1].comments;

        assert_eq!(comments[0].source_id, 10);
        assert_eq!(
            comments[0].body.as_deref(),
            Some("(Original comment by bob on t0)\n\nlooks fixed")
        );
        assert_eq!(comments[1].source_id, 11);
        assert_eq!(comments[1].body, None);
    }

    #[test]
    fn cursor_counts_resumed_issues() {
        let plan = plan(Some("a"));

        assert_eq!(plan.issues.len(), 1);
        assert_eq!(plan.issues[0].source_id, 2);
        assert_eq!(plan.resumed_past, 1);
    }
}
