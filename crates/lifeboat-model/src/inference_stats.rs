//! Prediction latency and failure tracking.
//!
//! [`TrackedModel`] wraps any [`SurvivalModel`] and records how long each
//! call took and whether it failed. A call that returns a non-finite
//! probability counts as a failure. [`InferenceStatsTracker::snapshot`]
//! summarises the most recent calls for the health endpoint.

use lifeboat_core::{FeatureVector, LifeboatError, ModelOutput, Result, SurvivalModel};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::warn;

/// Default number of latency samples kept.
pub const DEFAULT_WINDOW: usize = 512;

/// Point-in-time summary of recent predictions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InferenceStats {
    /// Predictions attempted since startup.
    pub total_calls: u64,
    /// Predictions that returned an error since startup.
    pub failures: u64,
    /// Samples in the latency window.
    pub window: usize,
    pub p50_us: u64,
    pub p95_us: u64,
    pub max_us: u64,
}

#[derive(Debug)]
struct Window {
    latencies: VecDeque<Duration>,
    capacity: usize,
    total_calls: u64,
    failures: u64,
}

/// Thread-safe sliding window of prediction latencies.
#[derive(Debug)]
pub struct InferenceStatsTracker {
    inner: Mutex<Window>,
}

impl InferenceStatsTracker {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Mutex::new(Window {
                latencies: VecDeque::with_capacity(capacity),
                capacity,
                total_calls: 0,
                failures: 0,
            }),
        }
    }

    /// Record one prediction.
    pub fn record(&self, latency: Duration, failed: bool) {
        let mut w = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        w.total_calls += 1;
        if failed {
            w.failures += 1;
        }
        if w.latencies.len() == w.capacity {
            w.latencies.pop_front();
        }
        w.latencies.push_back(latency);
    }

    /// Summarise the current window. Percentiles are zero before the first
    /// call.
    #[must_use]
    pub fn snapshot(&self) -> InferenceStats {
        let w = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let mut sorted: Vec<Duration> = w.latencies.iter().copied().collect();
        sorted.sort_unstable();

        InferenceStats {
            total_calls: w.total_calls,
            failures: w.failures,
            window: sorted.len(),
            p50_us: micros(nearest_rank(&sorted, 50.0)),
            p95_us: micros(nearest_rank(&sorted, 95.0)),
            max_us: micros(sorted.last().copied().unwrap_or_default()),
        }
    }
}

impl Default for InferenceStatsTracker {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

fn nearest_rank(sorted: &[Duration], pct: f64) -> Duration {
    if sorted.is_empty() {
        return Duration::ZERO;
    }
    let rank = ((pct / 100.0) * sorted.len() as f64).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}

fn micros(d: Duration) -> u64 {
    u64::try_from(d.as_micros()).unwrap_or(u64::MAX)
}

/// A [`SurvivalModel`] that reports every call to an [`InferenceStatsTracker`].
pub struct TrackedModel {
    inner: Arc<dyn SurvivalModel>,
    stats: Arc<InferenceStatsTracker>,
}

impl TrackedModel {
    pub fn new(inner: Arc<dyn SurvivalModel>, stats: Arc<InferenceStatsTracker>) -> Self {
        Self { inner, stats }
    }

    pub fn stats(&self) -> &Arc<InferenceStatsTracker> {
        &self.stats
    }
}

impl SurvivalModel for TrackedModel {
    fn predict(&self, features: &FeatureVector) -> Result<ModelOutput> {
        let start = Instant::now();
        let result = self.inner.predict(features).and_then(|output| {
            if output.probability.is_finite() {
                Ok(output)
            } else {
                warn!(
                    model = self.inner.name(),
                    probability = output.probability,
                    "Model returned a non-finite probability"
                );
                Err(LifeboatError::Prediction(format!(
                    "model '{}' returned a non-finite probability",
                    self.inner.name()
                )))
            }
        });
        self.stats.record(start.elapsed(), result.is_err());
        result
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
