//! Frame pacing.

use std::time::Duration;
use tokio::time::{self, Instant};

/// Below this remainder a frame yields instead of sleeping.
const MIN_SLEEP: Duration = Duration::from_micros(100);

/// Keeps consecutive frames at least one interval apart.
#[derive(Debug)]
pub struct FramePacer {
    interval: Duration,
    then: Instant,
}

impl FramePacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            then: Instant::now(),
        }
    }

    /// Negative and NaN intervals disable waiting. Intervals too long for a
    /// `Duration` saturate.
    pub fn from_millis(interval_ms: f64) -> Self {
        let interval = Duration::try_from_secs_f64(interval_ms.max(0.0) / 1000.0).unwrap_or(Duration::MAX);
        Self::new(interval)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Mark the start of a frame.
    pub fn begin(&mut self) {
        self.then = Instant::now();
    }

    /// Wait out what is left of the interval since the last mark, then mark
    /// again. Returns how long it slept.
    pub async fn tick(&mut self) -> Duration {
        let now = Instant::now();
        let remaining = self.interval.saturating_sub(now - self.then);
        self.then = now;
        if remaining > MIN_SLEEP {
            time::sleep(remaining).await;
            remaining
        } else {
            tokio::task::yield_now().await;
            Duration::ZERO
        }
    }
}
