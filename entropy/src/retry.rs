use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

use crate::config::{duration_ms, option_duration_ms};

/// How often, and how patiently, to repeat a failing network step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero is treated as one.
    pub attempts: u32,
    /// Sleep before the second attempt.
    #[serde(rename = "delay_ms", with = "duration_ms")]
    pub delay: Duration,
    /// Multiplier applied to the delay after every further failure.
    #[serde(default = "default_backoff")]
    pub backoff: f64,
    /// Ceiling for the grown delay.
    #[serde(default, rename = "max_delay_ms", with = "option_duration_ms")]
    pub max_delay: Option<Duration>,
}

fn default_backoff() -> f64 {
    1.0
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(2, Duration::from_secs(1))
    }
}

impl RetryPolicy {
    /// Fixed delay between attempts.
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts,
            delay,
            backoff: default_backoff(),
            max_delay: None,
        }
    }

    /// A single attempt, no sleeping.
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }

    pub fn with_backoff(mut self, factor: f64, max_delay: Duration) -> Self {
        self.backoff = factor;
        self.max_delay = Some(max_delay);
        self
    }

    fn max_attempts(&self) -> u32 {
        self.attempts.max(1)
    }

    /// Delay to sleep after the `failed`-th failure (1-based).
    pub fn delay_after(&self, failed: u32) -> Duration {
        let exponent = failed.saturating_sub(1).min(i32::MAX as u32) as i32;
        let factor = self.backoff.max(1.0).powi(exponent);
        let grown = Duration::try_from_secs_f64(self.delay.as_secs_f64() * factor)
            .unwrap_or(Duration::MAX);
        match self.max_delay {
            Some(ceiling) => grown.min(ceiling),
            None => grown,
        }
    }

    /// Run `op` until it succeeds or the attempts are used up.
    pub async fn run<T, E, F, Fut>(&self, mut op: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        let attempts = self.max_attempts();
        let mut failed = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(last) => {
                    failed += 1;
                    if failed >= attempts {
                        return Err(RetryError { attempts, last });
                    }
                    let delay = self.delay_after(failed);
                    warn!(
                        attempt = failed,
                        max_attempts = attempts,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %last,
                        "retrying after error"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

/// Every attempt failed; `last` is the final underlying error.
#[derive(Debug, thiserror::Error)]
#[error("after {attempts} attempts, last error: {last}")]
pub struct RetryError<E> {
    pub attempts: u32,
    #[source]
    pub last: E,
}
