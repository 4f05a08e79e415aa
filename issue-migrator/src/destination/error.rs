//! Destination error types.

use thiserror::Error;

/// Failures reported by a destination call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DestinationError {
    /// Any failure not classified further (network, server errors, ...).
    #[error("Destination error: {message}")]
    Remote { message: String },

    /// The destination is throttling requests.
    #[error("Rate limited, retry after {retry_after_secs:?}s")]
    RateLimited { retry_after_secs: Option<u64> },

    /// The credentials lack permission for the request, e.g. assigning a
    /// user without write access.
    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },
}

impl DestinationError {
    /// Creates an unclassified remote error.
    pub fn remote(message: impl Into<String>) -> Self {
        Self::Remote {
            message: message.into(),
        }
    }

    /// Returns true if retrying cannot succeed.
    #[must_use]
    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::PermissionDenied { .. })
    }

    /// Sets the wait of a rate-limited error. Other errors are returned as is.
    #[must_use]
    pub fn with_retry_after(self, secs: Option<u64>) -> Self {
        match self {
            Self::RateLimited { .. } => Self::RateLimited {
                retry_after_secs: secs,
            },
            other => other,
        }
    }

    /// Returns the wait requested by the destination, if any.
    #[must_use]
    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            Self::RateLimited { retry_after_secs } => *retry_after_secs,
            _ => None,
        }
    }
}
