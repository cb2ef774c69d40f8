//! Runtime configuration for the transport, rate limiter, and retry policy.
//!
//! Every value has a default matching the public BoardGameGeek XML API's
//! published courtesy limits; the CLI overrides them field by field.

use std::time::Duration;

/// Guild used when no `--guild-id` is given.
pub const DEFAULT_GUILD_ID: u64 = 2708;

/// Report path used when no `--outfile` is given.
pub const DEFAULT_OUTFILE: &str = "./results/results.csv";

/// Base URL of the XML API v2.
pub const DEFAULT_BASE_URL: &str = "https://www.boardgamegeek.com/xmlapi2";

/// Ceiling applied to outbound requests against the API host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Tasks allowed in flight at once.
    pub max_concurrent: usize,
    /// Task starts allowed per `window`. 0 disables the start cap.
    pub max_per_window: usize,
    /// Length of the sliding start window. Zero disables the start cap.
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 1,
            max_per_window: 1,
            window: Duration::from_millis(660),
        }
    }
}

/// Bounded retry with exponential backoff.
///
/// Applies to both "still processing" answers and failed attempts.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts including the first. Values below 1 are treated as 1.
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub multiplier: f64,
}

impl RetryPolicy {
    /// Retry policy that never waits between attempts.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
            multiplier: 1.0,
        }
    }

    pub(crate) fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Delay to wait after the given attempt (1-based) before the next one.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(32) as i32;
        let secs = self.initial_backoff.as_secs_f64() * self.multiplier.powi(exp);
        let capped = secs.min(self.max_backoff.as_secs_f64());
        if capped.is_finite() && capped > 0.0 {
            Duration::from_secs_f64(capped)
        } else {
            Duration::ZERO
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 8,
            initial_backoff: Duration::from_secs(2),
            max_backoff: Duration::from_secs(30),
            multiplier: 2.0,
        }
    }
}

/// HTTP transport settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    /// Skips TLS certificate validation. Off unless explicitly requested.
    pub accept_invalid_certs: bool,
    /// Per-request timeout; `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            accept_invalid_certs: false,
            request_timeout: None,
        }
    }
}
