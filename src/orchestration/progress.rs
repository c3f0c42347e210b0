//! Simulated Generation Progress
//!
//! The generation service gives no progress feedback, so progress is
//! estimated from elapsed time against a typical run length. Estimates stop
//! at a ceiling below 100 and jump to 100 only when the response arrives.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};

use crate::config::ProgressConfig;
use crate::constants::progress;
use crate::types::Result;

const MIN_TICK: Duration = Duration::from_millis(1);

/// Receives progress percentages in `0.0..=100.0`
pub type ProgressCallback = Arc<dyn Fn(f32) + Send + Sync>;

/// Time-based progress estimate
#[derive(Debug, Clone)]
pub struct ProgressEstimator {
    estimated_total: Duration,
    tick: Duration,
    ceiling: f32,
}

impl Default for ProgressEstimator {
    fn default() -> Self {
        Self::from(&ProgressConfig::default())
    }
}

impl From<&ProgressConfig> for ProgressEstimator {
    fn from(config: &ProgressConfig) -> Self {
        Self::new(
            Duration::from_secs(config.estimated_total_secs),
            Duration::from_secs(config.tick_secs),
        )
    }
}

impl ProgressEstimator {
    /// `tick` is raised to at least one millisecond
    pub fn new(estimated_total: Duration, tick: Duration) -> Self {
        Self {
            estimated_total,
            tick: tick.max(MIN_TICK),
            ceiling: progress::CEILING,
        }
    }

    /// Estimated percentage after `elapsed`
    pub fn at(&self, elapsed: Duration) -> f32 {
        if self.estimated_total.is_zero() {
            return self.ceiling;
        }
        let ratio = elapsed.as_secs_f32() / self.estimated_total.as_secs_f32();
        (ratio * 100.0).min(self.ceiling)
    }

    /// Drive `future` to completion, reporting estimates every tick.
    ///
    /// Emits 100 once the future resolves successfully. Nothing is emitted
    /// after an error, so wrap only the transport step when an error reply
    /// should still count as complete. Without a callback the future is
    /// simply awaited.
    pub async fn track<T, F>(&self, future: F, callback: Option<&ProgressCallback>) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let Some(callback) = callback else {
            return future.await;
        };

        let start = Instant::now();
        let mut ticker = tokio::time::interval_at(start + self.tick, self.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(future);

        let result = loop {
            tokio::select! {
                result = &mut future => break result,
                _ = ticker.tick() => callback(self.at(start.elapsed())),
            }
        };

        if result.is_ok() {
            callback(100.0);
        }
        result
    }
}
