//! Outbound request throttling.
//!
//! A [`RateLimiter`] caps how many tasks run at once and how many may start
//! inside a sliding time window. Admission is strictly first come, first
//! served: both the queue lock and the concurrency semaphore are FIFO-fair in
//! tokio, and a caller holds the queue lock until it has been admitted.
//!
//! ```text
//!     submit ──► [queue lock] ──► slot free? ──► window has room? ──► run task
//!                   (FIFO)        (max_concurrent)  (max_per_window)     │
//!                                        ▲                               │
//!                                        └──────── slot released ◄───────┘
//!                                                 (success or failure)
//! ```

use crate::config::RateLimitConfig;
use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{AcquireError, Mutex, OwnedSemaphorePermit, Semaphore};
use tokio::time::{Instant, sleep_until};
use tracing::trace;

pub struct RateLimiter {
    slots: Arc<Semaphore>,
    window: Option<(usize, Duration)>,
    starts: Mutex<VecDeque<Instant>>,
}

/// Proof of admission. The concurrency slot is returned when this is dropped.
#[derive(Debug)]
pub struct RatePermit {
    _slot: OwnedSemaphorePermit,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        let window = (config.max_per_window > 0 && !config.window.is_zero())
            .then_some((config.max_per_window, config.window));

        Self {
            slots: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
            window,
            starts: Mutex::new(VecDeque::new()),
        }
    }

    /// A limiter that admits everything immediately.
    pub fn unlimited() -> Self {
        Self {
            slots: Arc::new(Semaphore::new(Semaphore::MAX_PERMITS)),
            window: None,
            starts: Mutex::new(VecDeque::new()),
        }
    }

    /// Waits for a concurrency slot and room in the start window.
    pub async fn acquire(&self) -> Result<RatePermit, AcquireError> {
        let mut starts = self.starts.lock().await;
        let slot = self.slots.clone().acquire_owned().await?;

        if let Some((limit, window)) = self.window {
            loop {
                let now = Instant::now();
                while starts
                    .front()
                    .is_some_and(|started| now.duration_since(*started) >= window)
                {
                    starts.pop_front();
                }

                match starts.front() {
                    Some(oldest) if starts.len() >= limit => {
                        let ready_at = *oldest + window;
                        trace!(wait_ms = (ready_at - now).as_millis() as u64, "Rate window full");
                        sleep_until(ready_at).await;
                    }
                    _ => break,
                }
            }
            starts.push_back(Instant::now());
        }

        Ok(RatePermit { _slot: slot })
    }

    /// Runs `task` once admitted, holding the slot until its future settles.
    pub async fn submit<F, Fut, T>(&self, task: F) -> Result<T, AcquireError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let _permit = self.acquire().await?;
        Ok(task().await)
    }
}
