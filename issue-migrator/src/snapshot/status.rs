//! Source issue status values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status of an issue in the source tracker.
///
/// The set is closed: an export containing any other value fails to load, so
/// every status is guaranteed to have a destination mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SourceStatus {
    /// Freshly reported.
    New,
    /// Acknowledged and open.
    Open,
    /// Fixed.
    Resolved,
    /// Parked without being closed.
    OnHold,
    /// Not a valid report.
    Invalid,
    /// Duplicate of another issue.
    Duplicate,
    /// Will not be fixed.
    Wontfix,
}

impl SourceStatus {
    /// All statuses, in the order the source tracker lists them.
    pub const ALL: [Self; 7] = [
        Self::New,
        Self::Open,
        Self::Resolved,
        Self::OnHold,
        Self::Invalid,
        Self::Duplicate,
        Self::Wontfix,
    ];

    /// Returns the status as spelled in the export.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Open => "open",
            Self::Resolved => "resolved",
            Self::OnHold => "on hold",
            Self::Invalid => "invalid",
            Self::Duplicate => "duplicate",
            Self::Wontfix => "wontfix",
        }
    }
}

impl fmt::Display for SourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown issue status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for SourceStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

impl TryFrom<String> for SourceStatus {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SourceStatus> for String {
    fn from(status: SourceStatus) -> Self {
        status.as_str().to_string()
    }
}
