//! Handles to created destination issues.

use serde::Serialize;
use std::fmt;

/// Opaque reference to an issue created on the destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueHandle {
    /// Destination issue number.
    pub number: u64,

    /// Web URL of the issue, when the destination reports one.
    pub url: Option<String>,
}

impl IssueHandle {
    /// Creates a handle without a URL.
    #[must_use]
    pub fn new(number: u64) -> Self {
        Self { number, url: None }
    }
}

impl fmt::Display for IssueHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.number)
    }
}
