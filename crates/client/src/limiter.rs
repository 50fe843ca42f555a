//! Rate limiter gating every outbound search call.
//!
//! Two limits apply, both global to the process rather than per term:
//!
//! - a minimum spacing between consecutive calls, enforced by waiting;
//! - a maximum number of calls in any trailing 60 second window, enforced by
//!   rejecting with [`Error::RateLimitExceeded`] (no automatic retry).
//!
//! The window lives behind a tokio mutex, which queues waiters in FIFO order,
//! so exactly one caller evaluates and updates the window at a time.

use std::collections::VecDeque;
use std::time::Duration;

use svgl_core::{AppConfig, Error};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Length of the sliding window.
const WINDOW: Duration = Duration::from_secs(60);

/// Limits applied by [`RateLimiter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Minimum spacing between two calls.
    pub min_interval: Duration,
    /// Maximum calls within the trailing minute.
    pub max_per_minute: usize,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for RateLimitConfig {
    fn from(config: &AppConfig) -> Self {
        Self { min_interval: config.min_request_interval(), max_per_minute: config.max_requests_per_minute }
    }
}

/// Call timestamps observed in the trailing window.
#[derive(Debug, Default)]
struct RateWindow {
    calls: VecDeque<Instant>,
    last_call: Option<Instant>,
}

impl RateWindow {
    fn prune(&mut self, now: Instant) {
        while let Some(oldest) = self.calls.front() {
            if now.duration_since(*oldest) >= WINDOW {
                self.calls.pop_front();
            } else {
                break;
            }
        }
    }

    fn record(&mut self, at: Instant) {
        self.calls.push_back(at);
        self.last_call = Some(at);
    }
}

/// Rate limiter to enforce request spacing and a per-minute budget.
#[derive(Debug)]
pub struct RateLimiter {
    window: Mutex<RateWindow>,
    config: RateLimitConfig,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self { window: Mutex::new(RateWindow::default()), config }
    }

    /// Acquire permission to make a call, waiting out the spacing if needed.
    ///
    /// # Errors
    ///
    /// - `Error::RateLimitExceeded` if the trailing minute is already full
    /// - `Error::Canceled` if `cancel` fires while queued or waiting
    pub async fn acquire(&self, cancel: &CancellationToken) -> Result<(), Error> {
        let mut window = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Error::Canceled),
            guard = self.window.lock() => guard,
        };

        let now = Instant::now();
        window.prune(now);

        if window.calls.len() >= self.config.max_per_minute {
            tracing::debug!(
                calls = window.calls.len(),
                max = self.config.max_per_minute,
                "rate limit reached, rejecting search"
            );
            return Err(Error::RateLimitExceeded);
        }

        if let Some(last) = window.last_call {
            let elapsed = now.duration_since(last);
            if elapsed < self.config.min_interval {
                let wait = self.config.min_interval - elapsed;
                tracing::debug!(?wait, "spacing search call");
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(Error::Canceled),
                    _ = tokio::time::sleep(wait) => {}
                }
            }
        }

        window.record(Instant::now());
        Ok(())
    }

    /// Number of calls recorded in the trailing minute.
    pub async fn calls_in_window(&self) -> usize {
        let mut window = self.window.lock().await;
        window.prune(Instant::now());
        window.calls.len()
    }
}
