//! Provenance text formats.

use serde::Deserialize;

/// Handlebars formats for the text the migrator adds to preserve source
/// information the destination cannot represent.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProvenanceFormats {
    /// Body of a migrated issue.
    #[serde(default = "default_issue_body_format")]
    pub issue_body: String,

    /// Body of a migrated comment.
    #[serde(default = "default_comment_body_format")]
    pub comment_body: String,

    /// Note added when the source assignee could not be mapped.
    #[serde(default = "default_assignee_note_format")]
    pub assignee_note: String,

    /// Note carrying the last update time of a closed issue.
    #[serde(default = "default_updated_note_format")]
    pub updated_note: String,

    /// Note explaining why an issue was closed.
    #[serde(default = "default_closed_note_format")]
    pub closed_note: String,
}

impl Default for ProvenanceFormats {
    fn default() -> Self {
        Self {
            issue_body: default_issue_body_format(),
            comment_body: default_comment_body_format(),
            assignee_note: default_assignee_note_format(),
            updated_note: default_updated_note_format(),
            closed_note: default_closed_note_format(),
        }
    }
}

/// Default issue body format.
pub fn default_issue_body_format() -> String {
    "(Original issue {{id}} created by {{reporter}} on {{created_on}})\n\n{{content}}".to_string()
}

/// Default comment body format.
pub fn default_comment_body_format() -> String {
    "(Original comment by {{user}} on {{created_on}})\n\n{{content}}".to_string()
}

/// Default unmapped-assignee note format.
pub fn default_assignee_note_format() -> String {
    "(Original issue was assigned to {{assignee}})".to_string()
}

/// Default last-updated note format.
pub fn default_updated_note_format() -> String {
    "(Original issue {{id}} last updated on {{updated_on}})".to_string()
}

/// Default closure note format.
pub fn default_closed_note_format() -> String {
    "(Issue automatically closed due to status in {{source_name}}: {{status}})".to_string()
}
