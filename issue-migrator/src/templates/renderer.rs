//! Template renderer.

use super::TemplateError;
use crate::config::ProvenanceFormats;
use crate::snapshot::{SourceComment, SourceIssue};
use handlebars::{no_escape, Context, Handlebars, Helper, HelperResult, Output, RenderContext};
use serde_json::{json, Value};

const ISSUE_BODY: &str = "issue-body";
const COMMENT_BODY: &str = "comment-body";
const ASSIGNEE_NOTE: &str = "assignee-note";
const UPDATED_NOTE: &str = "updated-note";
const CLOSED_NOTE: &str = "closed-note";

/// Creates a configured Handlebars registry with custom helpers.
///
/// The registry is configured with:
/// - No HTML escaping (for markdown output)
/// - Strict mode (catches missing variables)
/// - `eq` helper for equality comparisons
#[must_use]
pub fn create_handlebars_registry() -> Handlebars<'static> {
    let mut hbs = Handlebars::new();
    hbs.register_escape_fn(no_escape);
    hbs.set_strict_mode(true);
    hbs.register_helper("eq", Box::new(eq_helper));
    hbs
}

/// Equality helper.
///
/// Usage: `{{#if (eq kind "bug")}}...{{/if}}`
fn eq_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let param1 = h.param(0).and_then(|v| v.value().as_str());
    let param2 = h.param(1).and_then(|v| v.value().as_str());

    let result = match (param1, param2) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    };

    out.write(if result { "true" } else { "" })?;
    Ok(())
}

/// Renders issue bodies, comment bodies and provenance notes.
pub struct TemplateRenderer {
    handlebars: Handlebars<'static>,
    source_name: String,
}

impl TemplateRenderer {
    /// Compiles the configured formats.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::RegistrationError`] naming the first format
    /// that fails to compile.
    pub fn new(formats: &ProvenanceFormats, source_name: &str) -> Result<Self, TemplateError> {
        let mut handlebars = create_handlebars_registry();
        for (name, format) in [
            (ISSUE_BODY, &formats.issue_body),
            (COMMENT_BODY, &formats.comment_body),
            (ASSIGNEE_NOTE, &formats.assignee_note),
            (UPDATED_NOTE, &formats.updated_note),
            (CLOSED_NOTE, &formats.closed_note),
        ] {
            handlebars
                .register_template_string(name, format)
                .map_err(|source| TemplateError::RegistrationError { name, source })?;
        }

        Ok(Self {
            handlebars,
            source_name: source_name.to_string(),
        })
    }

    /// Renders the body of a migrated issue.
    ///
    /// # Errors
    ///
    /// Returns an error if the format references unknown fields.
    pub fn render_issue_body(&self, issue: &SourceIssue) -> Result<String, TemplateError> {
        self.render(ISSUE_BODY, &self.issue_data(issue))
    }

    /// Renders the body of a migrated comment.
    ///
    /// # Errors
    ///
    /// Returns an error if the format references unknown fields.
    pub fn render_comment_body(&self, comment: &SourceComment) -> Result<String, TemplateError> {
        let data = json!({
            "id": comment.id,
            "issue": comment.issue,
            "user": comment.user,
            "content": comment.content,
            "created_on": comment.created_on,
            "source_name": self.source_name,
        });
        self.render(COMMENT_BODY, &data)
    }

    /// Renders the note recording an assignee that could not be mapped.
    ///
    /// # Errors
    ///
    /// Returns an error if the format references unknown fields.
    pub fn render_assignee_note(
        &self,
        issue: &SourceIssue,
        assignee: &str,
    ) -> Result<String, TemplateError> {
        let mut data = self.issue_data(issue);
        data["assignee"] = Value::String(assignee.to_string());
        self.render(ASSIGNEE_NOTE, &data)
    }

    /// Renders the notes explaining an automatic closure: the last update
    /// time, then the source status that caused it.
    ///
    /// # Errors
    ///
    /// Returns an error if a format references unknown fields.
    pub fn render_closure_notes(&self, issue: &SourceIssue) -> Result<[String; 2], TemplateError> {
        let data = self.issue_data(issue);
        Ok([
            self.render(UPDATED_NOTE, &data)?,
            self.render(CLOSED_NOTE, &data)?,
        ])
    }

    fn issue_data(&self, issue: &SourceIssue) -> Value {
        json!({
            "id": issue.id,
            "title": issue.title,
            "content": issue.content,
            "reporter": issue.reporter,
            "assignee": issue.assignee.as_deref().unwrap_or_default(),
            "created_on": issue.created_on,
            "updated_on": issue.updated_on,
            "status": issue.status.as_str(),
            "kind": issue.kind,
            "priority": issue.priority,
            "component": issue.component.as_deref().unwrap_or_default(),
            "source_name": self.source_name,
        })
    }

    fn render(&self, name: &str, data: &Value) -> Result<String, TemplateError> {
        Ok(self.handlebars.render(name, data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::SourceStatus;

    fn sample_issue() -> SourceIssue {
        SourceIssue {
            id: 12,
            title: "Crash on start".to_string(),
            content: "It <b>crashes</b>.".to_string(),
            reporter: "alice".to_string(),
            assignee: Some("ghost".to_string()),
            created_on: "2012-05-01T10:00:00".to_string(),
            updated_on: "2012-06-01T10:00:00".to_string(),
            status: SourceStatus::Wontfix,
            kind: "bug".to_string(),
            priority: "major".to_string(),
            component: None,
        }
    }

    fn renderer() -> TemplateRenderer {
        TemplateRenderer::new(&ProvenanceFormats::default(), "Bitbucket").unwrap()
    }

    #[test]
    fn renders_default_issue_body() {
        let body = renderer().render_issue_body(&sample_issue()).unwrap();
        assert_eq!(
            body,
            "(Original issue 12 created by alice on 2012-05-01T10:00:00)\n\nIt <b>crashes</b>."
        );
    }

    #[test]
    fn renders_default_comment_body() {
        let comment = SourceComment {
            id: 3,
            issue: 12,
            user: "bob".to_string(),
            content: "Same here".to_string(),
            created_on: "2012-05-02".to_string(),
        };

        let body = renderer().render_comment_body(&comment).unwrap();
        assert_eq!(body, "(Original comment by bob on 2012-05-02)\n\nSame here");
    }

    #[test]
    fn renders_assignee_note() {
        let note = renderer()
            .render_assignee_note(&sample_issue(), "ghost")
            .unwrap();
        assert_eq!(note, "(Original issue was assigned to ghost)");
    }

    #[test]
    fn renders_closure_notes() {
        let [updated, closed] = renderer().render_closure_notes(&sample_issue()).unwrap();

        assert_eq!(
            updated,
            "(Original issue 12 last updated on 2012-06-01T10:00:00)"
        );
        assert_eq!(
            closed,
            "(Issue automatically closed due to status in Bitbucket: wontfix)"
        );
    }

    #[test]
    fn custom_format_with_eq_helper() {
        let formats = ProvenanceFormats {
            issue_body: r#"{{#if (eq kind "bug")}}[bug] {{/if}}{{title}}"#.to_string(),
            ..ProvenanceFormats::default()
        };
        let renderer = TemplateRenderer::new(&formats, "Bitbucket").unwrap();

        let body = renderer.render_issue_body(&sample_issue()).unwrap();
        assert_eq!(body, "[bug] Crash on start");
    }

    #[test]
    fn invalid_format_is_rejected() {
        let formats = ProvenanceFormats {
            closed_note: "{{#if status}}unterminated".to_string(),
            ..ProvenanceFormats::default()
        };

        let result = TemplateRenderer::new(&formats, "Bitbucket");
        assert!(matches!(
            result,
            Err(TemplateError::RegistrationError {
                name: "closed-note",
                ..
            })
        ));
    }

    #[test]
    fn unknown_field_fails_in_strict_mode() {
        let formats = ProvenanceFormats {
            comment_body: "{{author}}".to_string(),
            ..ProvenanceFormats::default()
        };
        let renderer = TemplateRenderer::new(&formats, "Bitbucket").unwrap();
        let comment = SourceComment {
            id: 1,
            issue: 1,
            user: "bob".to_string(),
            content: "x".to_string(),
            created_on: String::new(),
        };

        assert!(matches!(
            renderer.render_comment_body(&comment),
            Err(TemplateError::RenderError(_))
        ));
    }
}
