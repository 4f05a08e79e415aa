//! Retry error types.

use crate::destination::DestinationError;
use thiserror::Error;

/// A destination call the driver stopped retrying.
///
/// Never produced by the default unbounded policy.
#[derive(Debug, Error)]
pub enum RetryError {
    /// The failure cannot be fixed by retrying and the policy fails fast.
    #[error("{operation} failed permanently: {source}")]
    Permanent {
        operation: &'static str,
        #[source]
        source: DestinationError,
    },

    /// The policy's attempt limit was reached.
    #[error("{operation} failed after {attempts} attempts: {source}")]
    Exhausted {
        operation: &'static str,
        attempts: u32,
        #[source]
        source: DestinationError,
    },
}
