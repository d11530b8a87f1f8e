//! Bounded retry loop with exponential backoff and jitter

use rand::Rng;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::core::errors::{is_retriable_status, Result};
use crate::core::transport::{HttpResponse, HttpTransport, PreparedRequest};

/// Default number of attempts, the first one included
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Exponential backoff parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backoff {
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub factor: f64,
    /// Proportional jitter, `0.23` spreads each delay over ±23%
    pub jitter: f64,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(120),
            factor: 1.6,
            jitter: 0.23,
        }
    }
}

impl Backoff {
    /// No waiting between attempts
    pub fn none() -> Self {
        Self {
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            factor: 1.0,
            jitter: 0.0,
        }
    }

    /// Delay before retry number `retry` (1-based), before jitter.
    ///
    /// `initial_delay * factor^(retry - 1)`, capped at `max_delay`.
    pub fn base_delay(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(i32::MAX as u32) as i32;
        let secs = self.initial_delay.as_secs_f64() * self.factor.powi(exponent);
        let max = self.max_delay.as_secs_f64();
        if !secs.is_finite() || secs >= max {
            self.max_delay
        } else {
            Duration::try_from_secs_f64(secs.max(0.0)).unwrap_or(self.max_delay)
        }
    }

    /// Delay before retry number `retry` with a jitter sample in `[-1, 1]`
    pub fn delay(&self, retry: u32, sample: f64) -> Duration {
        let base = self.base_delay(retry).as_secs_f64();
        let spread = self.jitter * sample.clamp(-1.0, 1.0);
        let secs = (base * (1.0 + spread)).max(0.0);
        Duration::try_from_secs_f64(secs).unwrap_or(self.max_delay)
    }
}

/// Source of jitter samples in `[-1, 1]`
pub trait JitterSource: Send + Sync {
    fn sample(&self) -> f64;
}

/// Uniform jitter from the thread-local RNG
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomJitter;

impl JitterSource for RandomJitter {
    fn sample(&self) -> f64 {
        rand::thread_rng().gen_range(-1.0..=1.0)
    }
}

/// Constant jitter sample, for deterministic delays
#[derive(Debug, Clone, Copy)]
pub struct FixedJitter(pub f64);

impl JitterSource for FixedJitter {
    fn sample(&self) -> f64 {
        self.0
    }
}

/// Retry policy for one logical call
#[derive(Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Backoff,
    pub jitter: Arc<dyn JitterSource>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff: Backoff::default(),
            jitter: Arc::new(RandomJitter),
        }
    }
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_attempts", &self.max_attempts)
            .field("backoff", &self.backoff)
            .finish_non_exhaustive()
    }
}

impl RetryPolicy {
    /// Policy with `max_attempts` attempts and the given backoff
    pub fn new(max_attempts: u32, backoff: Backoff) -> Self {
        Self {
            max_attempts,
            backoff,
            ..Default::default()
        }
    }

    /// Replace the jitter source
    pub fn with_jitter(mut self, jitter: impl JitterSource + 'static) -> Self {
        self.jitter = Arc::new(jitter);
        self
    }

    /// Delay to wait before retry number `retry`
    pub fn next_delay(&self, retry: u32) -> Duration {
        self.backoff.delay(retry, self.jitter.sample())
    }
}

/// Send `request` until it yields a non-retriable outcome or attempts run out.
///
/// Only 429 and 5xx responses are retried. Transport errors and every other
/// status are returned as-is on the attempt that produced them. When attempts
/// are exhausted the last retriable response is returned unchanged.
pub async fn execute_with_retry(
    transport: &dyn HttpTransport,
    request: &PreparedRequest,
    policy: &RetryPolicy,
) -> Result<HttpResponse> {
    let max_attempts = policy.max_attempts.max(1);
    let mut total_delay = Duration::ZERO;
    let mut attempt = 1;

    loop {
        debug!("Attempt {}/{} for {}", attempt, max_attempts, request.url);
        let response = transport.execute(request).await?;
        let status = response.status.as_u16();

        if !is_retriable_status(status) {
            if attempt > 1 {
                info!(
                    "Request to {} finished after {} retries ({:?} waited)",
                    request.url,
                    attempt - 1,
                    total_delay
                );
            }
            return Ok(response);
        }

        if attempt >= max_attempts {
            warn!(
                "Giving up on {} after {} attempts, last status {}",
                request.url, attempt, status
            );
            return Ok(response);
        }

        let delay = policy.next_delay(attempt);
        warn!(
            "Retriable status {} from {}, retrying in {:?}",
            status, request.url, delay
        );
        sleep(delay).await;
        total_delay += delay;
        attempt += 1;
    }
}
