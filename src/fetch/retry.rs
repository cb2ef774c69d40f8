//! Rate-limited fetches with bounded retry.
//!
//! The API answers some requests with "accepted and will be processed, try
//! again later" while it builds the result. [`Fetcher::fetch_with_retry`]
//! polls such endpoints under a [`RetryPolicy`] and gives up with a typed
//! [`FetchError`] once the budget is spent.

use super::{HttpClient, RateLimiter, fetch_text};
use crate::config::RetryPolicy;
use crate::error::FetchError;
use anyhow::Result;
use reqwest::StatusCode;
use std::sync::Arc;
use tracing::{debug, warn};

/// Outcome of decoding a response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload<T> {
    Ready(T),
    /// The processing sentinel: ask again later.
    Processing,
    /// An API error document, such as an unknown user or guild.
    Rejected(String),
}

/// Outcome of a single fetch. Never an error; failures are data.
#[derive(Debug, Clone, PartialEq)]
pub enum Attempt<T> {
    Ready(T),
    Processing,
    Failed(String),
    /// Terminal failure; not retried.
    Rejected(String),
}

pub struct Fetcher<C> {
    client: C,
    limiter: Arc<RateLimiter>,
    policy: RetryPolicy,
}

impl<C: HttpClient> Fetcher<C> {
    pub fn new(client: C, limiter: Arc<RateLimiter>, policy: RetryPolicy) -> Self {
        Self {
            client,
            limiter,
            policy,
        }
    }

    /// One rate-limited GET of `url`, decoded with `parse`.
    ///
    /// HTTP 202 is the processing sentinel. API error documents and 4xx
    /// statuses other than 429 are [`Attempt::Rejected`]. Any other
    /// non-success status, a transport error, or a parse error comes back as
    /// [`Attempt::Failed`].
    pub async fn fetch_once<T, P>(&self, url: &str, parse: P) -> Attempt<T>
    where
        P: Fn(&str) -> Result<Payload<T>>,
    {
        let body = match self.limiter.submit(|| fetch_text(&self.client, url)).await {
            Ok(Ok(body)) => body,
            Ok(Err(e)) => return Attempt::Failed(format!("{e:#}")),
            Err(e) => return Attempt::Failed(e.to_string()),
        };

        if body.status == StatusCode::ACCEPTED {
            return Attempt::Processing;
        }
        if body.status.is_client_error() && body.status != StatusCode::TOO_MANY_REQUESTS {
            return Attempt::Rejected(format!("HTTP {}", body.status));
        }
        if !body.status.is_success() {
            return Attempt::Failed(format!("HTTP {}", body.status));
        }

        match parse(&body.text) {
            Ok(Payload::Ready(value)) => Attempt::Ready(value),
            Ok(Payload::Processing) => Attempt::Processing,
            Ok(Payload::Rejected(reason)) => Attempt::Rejected(reason),
            Err(e) => Attempt::Failed(format!("parse error: {e:#}")),
        }
    }

    /// Fetches `url` until it yields data or the retry policy is exhausted.
    ///
    /// # Errors
    ///
    /// [`FetchError::Rejected`] as soon as an attempt is rejected,
    /// [`FetchError::StillProcessing`] if the last attempt was still
    /// processing, otherwise [`FetchError::Exhausted`] with the last failure.
    #[tracing::instrument(skip(self, parse))]
    pub async fn fetch_with_retry<T, P>(&self, url: &str, parse: P) -> Result<T, FetchError>
    where
        P: Fn(&str) -> Result<Payload<T>>,
    {
        let attempts = self.policy.attempts();
        let mut last_failure = None;

        for attempt in 1..=attempts {
            match self.fetch_once(url, &parse).await {
                Attempt::Ready(value) => {
                    debug!(attempt, "Fetch succeeded");
                    return Ok(value);
                }
                Attempt::Processing => {
                    debug!(attempt, "Results still processing");
                    last_failure = None;
                }
                Attempt::Failed(reason) => {
                    warn!(attempt, reason = %reason, "Fetch attempt failed");
                    last_failure = Some(reason);
                }
                Attempt::Rejected(reason) => {
                    debug!(attempt, reason = %reason, "Request rejected");
                    return Err(FetchError::Rejected {
                        url: url.to_string(),
                        reason,
                    });
                }
            }

            if attempt < attempts {
                let delay = self.policy.backoff(attempt);
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
            }
        }

        Err(match last_failure {
            None => FetchError::StillProcessing {
                url: url.to_string(),
                attempts,
            },
            Some(reason) => FetchError::Exhausted {
                url: url.to_string(),
                attempts,
                reason,
            },
        })
    }
}
