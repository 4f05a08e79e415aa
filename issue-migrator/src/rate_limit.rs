//! GitHub core API rate limiting.
//!
//! Issue and comment creation count against the core limit. The GitHub
//! destination checks it before every call and sleeps until the window
//! resets when only a few requests remain, so throttling is avoided rather
//! than retried.

use octocrab::Octocrab;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{info, warn};

/// Maximum time to wait for a rate limit reset (1 hour).
pub const MAX_WAIT_SECS: u64 = 3600;

/// Remaining requests below which we wait for the reset.
const MIN_REMAINING_THRESHOLD: u32 = 5;

/// Core rate limit state.
#[derive(Debug, Clone)]
pub struct RateLimitInfo {
    /// Requests remaining in the current window.
    pub remaining: u32,

    /// Unix timestamp when the window resets.
    pub reset: u64,

    /// Total requests allowed per window.
    pub limit: u32,
}

impl RateLimitInfo {
    /// Returns how long to wait before the next call, if at all.
    ///
    /// The wait is capped at [`MAX_WAIT_SECS`].
    #[must_use]
    pub fn wait_needed(&self, now: u64) -> Option<u64> {
        if self.remaining >= MIN_REMAINING_THRESHOLD || self.reset <= now {
            return None;
        }

        let wait_secs = self.reset - now;
        if wait_secs > MAX_WAIT_SECS {
            warn!(
                wait_secs,
                max_wait = MAX_WAIT_SECS,
                "Rate limit reset too far in future, capping wait time"
            );
        }
        Some(wait_secs.min(MAX_WAIT_SECS))
    }
}

/// Fetches the current core rate limit.
///
/// # Errors
///
/// Returns an error if the rate limit API call fails.
pub async fn check_core_rate_limit(octocrab: &Octocrab) -> Result<RateLimitInfo, octocrab::Error> {
    let rate_limit = octocrab.ratelimit().get().await?;
    let core = &rate_limit.resources.core;

    Ok(RateLimitInfo {
        remaining: core.remaining as u32,
        reset: core.reset,
        limit: core.limit as u32,
    })
}

/// Current Unix time in seconds.
pub(crate) fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Sleeps until the window resets if few requests remain.
///
/// Returns `true` if we waited.
pub async fn wait_if_needed(info: &RateLimitInfo) -> bool {
    let Some(wait_secs) = info.wait_needed(unix_now()) else {
        return false;
    };

    info!(
        remaining = info.remaining,
        limit = info.limit,
        wait_secs,
        "Rate limit low, waiting for reset"
    );
    tokio::time::sleep(Duration::from_secs(wait_secs)).await;
    true
}

/// Checks the core limit and waits for the reset if it is nearly exhausted.
///
/// # Errors
///
/// Returns an error if the rate limit check fails.
pub async fn ensure_core_rate_limit(octocrab: &Octocrab) -> Result<(), octocrab::Error> {
    let info = check_core_rate_limit(octocrab).await?;
    wait_if_needed(&info).await;
    Ok(())
}
