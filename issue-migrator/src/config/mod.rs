//! Run configuration loading.
//!
//! The configuration file is TOML and carries the assignee table and the
//! provenance text formats. Every field is optional.

mod assignees;
mod error;
mod formats;

pub use assignees::{AssigneeTable, DEFAULT_ASSIGNEE_KEY, PLACEHOLDER_ASSIGNEE};
pub use error::ConfigError;
pub use formats::{
    default_assignee_note_format, default_closed_note_format, default_comment_body_format,
    default_issue_body_format, default_updated_note_format, ProvenanceFormats,
};

use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Origin reported in validation errors for built-in defaults.
const DEFAULTS_ORIGIN: &str = "<defaults>";

/// Parsed contents of a configuration file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MigrationConfig {
    /// Name of the source tracker, used in provenance notes.
    #[serde(default = "default_source_name")]
    pub source_name: String,

    /// Source to destination username mapping.
    #[serde(default)]
    pub assignees: AssigneeTable,

    /// Provenance text formats.
    #[serde(default)]
    pub formats: ProvenanceFormats,

    /// Where this configuration came from.
    #[serde(skip, default = "default_origin")]
    origin: String,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            source_name: default_source_name(),
            assignees: AssigneeTable::default(),
            formats: ProvenanceFormats::default(),
            origin: default_origin(),
        }
    }
}

fn default_source_name() -> String {
    "Bitbucket".to_string()
}

fn default_origin() -> String {
    DEFAULTS_ORIGIN.to_string()
}

impl MigrationConfig {
    /// Loads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        info!(path = %path.display(), "Loading configuration");

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        let mut config: Self = toml::from_str(&content).map_err(|e| ConfigError::TomlError {
            path: path.display().to_string(),
            source: e,
        })?;
        config.origin = path.display().to_string();

        debug!(
            mapped_users = config.assignees.mapped_users(),
            "Loaded assignee table"
        );
        Ok(config)
    }

    /// Loads the file if one is given, otherwise returns the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    /// Checks that the configuration is usable for a run.
    ///
    /// When assignees are not considered the table is irrelevant.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if assignees are considered
    /// and the table lacks a `.DEFAULT` entry or is still the placeholder.
    pub fn validate(&self, consider_assignees: bool) -> Result<(), ConfigError> {
        if !consider_assignees {
            return Ok(());
        }

        if !self.assignees.has_default() {
            return Err(self.invalid(format!(
                "assignee table must contain a '{DEFAULT_ASSIGNEE_KEY}' entry"
            )));
        }

        if self.assignees.is_placeholder() {
            return Err(self.invalid(
                "configure the assignee table, or disable assignees to ignore it".to_string(),
            ));
        }

        Ok(())
    }

    /// Returns where this configuration came from.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    fn invalid(&self, message: String) -> ConfigError {
        ConfigError::ValidationError {
            path: self.origin.clone(),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(dir: &Path, content: &str) -> std::path::PathBuf {
        let path = dir.join("migrator.toml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn load_full_config() {
        let temp = TempDir::new().unwrap();
        let path = write_config(
            temp.path(),
            r#"
source-name = "Old Tracker"

[assignees]
".DEFAULT" = "octocat"
jdoe = "john-doe"
retired = ""

[formats]
comment-body = "{{user}} said: {{content}}"
"#,
        );

        let config = MigrationConfig::load(&path).unwrap();

        assert_eq!(config.source_name, "Old Tracker");
        assert_eq!(config.assignees.lookup("jdoe"), Some(Some("john-doe")));
        assert_eq!(config.assignees.lookup("retired"), Some(None));
        assert_eq!(config.formats.comment_body, "{{user}} said: {{content}}");
        assert_eq!(config.formats.issue_body, default_issue_body_format());
        assert!(config.origin().ends_with("migrator.toml"));
        config.validate(true).unwrap();
    }

    #[test]
    fn empty_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let path = write_config(temp.path(), "");

        let config = MigrationConfig::load(&path).unwrap();

        assert_eq!(config.source_name, "Bitbucket");
        assert!(config.assignees.is_placeholder());
        assert_eq!(config.formats, ProvenanceFormats::default());
    }

    #[test]
    fn load_missing_file() {
        let temp = TempDir::new().unwrap();
        let result = MigrationConfig::load(&temp.path().join("nope.toml"));
        assert!(matches!(result, Err(ConfigError::IoError { .. })));
    }

    #[test]
    fn load_invalid_toml() {
        let temp = TempDir::new().unwrap();
        let path = write_config(temp.path(), "assignees = [");

        let result = MigrationConfig::load(&path);
        assert!(matches!(result, Err(ConfigError::TomlError { .. })));
    }

    #[test]
    fn placeholder_rejected_when_assignees_considered() {
        let config = MigrationConfig::default();

        assert!(matches!(
            config.validate(true),
            Err(ConfigError::ValidationError { .. })
        ));
        assert!(config.validate(false).is_ok());
    }

    #[test]
    fn missing_default_rejected() {
        let temp = TempDir::new().unwrap();
        let path = write_config(
            temp.path(),
            r#"
[assignees]
jdoe = "john-doe"
"#,
        );

        let config = MigrationConfig::load(&path).unwrap();
        let err = config.validate(true).unwrap_err();
        assert!(err.to_string().contains(".DEFAULT"));
    }

    #[test]
    fn load_or_default_without_path() {
        let config = MigrationConfig::load_or_default(None).unwrap();
        assert_eq!(config.origin(), DEFAULTS_ORIGIN);
    }
}
