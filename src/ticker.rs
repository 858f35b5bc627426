//! Price ticker driver loop
//!
//! Fetches a sample on a fixed interval and hands it to the
//! [`MessagePublisher`]. Runtime errors are logged and the loop carries on;
//! only [`PriceTicker::start`] can fail for good.

use crate::{
    constants::{INITIAL_BACKOFF_MS, MAX_BACKOFF_MS, MAX_RETRY_ATTEMPTS, REFRESH_INTERVAL_SECS},
    error::{FetchError, PublishError, StartupError},
    provider::PriceFetcher,
    publisher::{MessagePublisher, PublishOutcome},
    types::{DisplayState, MessageHandle, PriceSample},
};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::{interval_at, sleep, MissedTickBehavior};

/// Bounded retry with exponential backoff for price fetches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per fetch, including the first. At least 1.
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl RetryPolicy {
    /// A single attempt, no retries
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay before attempt `attempt + 1`, doubling from the initial backoff
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_RETRY_ATTEMPTS,
            initial_backoff: Duration::from_millis(INITIAL_BACKOFF_MS),
            max_backoff: Duration::from_millis(MAX_BACKOFF_MS),
        }
    }
}

/// Result of one tick
#[derive(Debug)]
pub enum TickOutcome {
    /// Every fetch attempt failed; state untouched
    FetchFailed(FetchError),
    /// Quote matched the live message
    Unchanged,
    /// New message is live
    Published {
        handle: MessageHandle,
        previous_deleted: bool,
    },
    /// Sending the new message failed; the old one stays live
    PublishFailed(PublishError),
}

/// Drives the fetch → compare → publish cycle
pub struct PriceTicker {
    fetcher: Arc<dyn PriceFetcher>,
    publisher: MessagePublisher,
    poll_interval: Duration,
    retry: RetryPolicy,
}

impl PriceTicker {
    pub fn new(fetcher: Arc<dyn PriceFetcher>, publisher: MessagePublisher) -> Self {
        Self {
            fetcher,
            publisher,
            poll_interval: Duration::from_secs(REFRESH_INTERVAL_SECS),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn state(&self) -> &DisplayState {
        self.publisher.state()
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Fetches the first sample and publishes it unconditionally
    ///
    /// Errors here are fatal to the process.
    pub async fn start(&mut self) -> Result<MessageHandle, StartupError> {
        let sample = self.fetch_with_retry().await?;
        let handle = self.publisher.publish_initial(sample).await?;
        Ok(handle)
    }

    /// Runs one fetch-compare-publish cycle
    pub async fn tick(&mut self) -> TickOutcome {
        let sample = match self.fetch_with_retry().await {
            Ok(sample) => sample,
            Err(e) => {
                tracing::warn!(
                    provider = self.fetcher.provider_name(),
                    error = %e,
                    "Failed to get price, skipping update"
                );
                return TickOutcome::FetchFailed(e);
            }
        };

        match self.publisher.publish_if_changed(sample).await {
            Ok(PublishOutcome::Unchanged) => TickOutcome::Unchanged,
            Ok(PublishOutcome::Replaced {
                handle,
                previous_deleted,
                ..
            }) => TickOutcome::Published {
                handle,
                previous_deleted,
            },
            Err(e) => {
                tracing::error!(error = %e, "Failed to update price message");
                TickOutcome::PublishFailed(e)
            }
        }
    }

    /// Ticks until `shutdown` resolves
    ///
    /// The first tick fires one interval after the call, since `start`
    /// already published. A slow tick delays the next one; ticks never
    /// overlap.
    pub async fn run_until<F>(&mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tracing::info!(
            poll_interval_secs = self.poll_interval.as_secs(),
            provider = self.fetcher.provider_name(),
            chat_id = self.publisher.chat_id(),
            "Starting price ticker loop"
        );

        let start = tokio::time::Instant::now() + self.poll_interval;
        let mut ticker = interval_at(start, self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Shutdown requested, stopping price ticker");
                    break;
                }
                _ = ticker.tick() => {
                    self.tick().await;
                }
            }
        }
    }

    /// Ticks forever
    pub async fn run(&mut self) {
        self.run_until(std::future::pending()).await
    }

    /// Fetches a sample, retrying transient failures per the retry policy
    async fn fetch_with_retry(&self) -> Result<PriceSample, FetchError> {
        let max_attempts = self.retry.max_attempts.max(1);
        let start = Instant::now();
        let mut attempt = 1;

        loop {
            match self.fetcher.fetch().await {
                Ok(sample) => {
                    tracing::debug!(
                        provider = self.fetcher.provider_name(),
                        attempt = attempt,
                        latency_ms = start.elapsed().as_millis() as u64,
                        "Fetched price sample"
                    );
                    return Ok(sample);
                }
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    let backoff = self.retry.backoff_after(attempt);
                    tracing::warn!(
                        attempt = attempt,
                        max_attempts = max_attempts,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %e,
                        "Failed to fetch price, retrying"
                    );
                    sleep(backoff).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
