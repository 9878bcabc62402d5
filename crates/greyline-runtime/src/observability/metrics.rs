//! Metrics collection and reporting

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

/// Counter metric
#[derive(Debug, Clone, Default)]
pub struct Counter {
    value: Arc<RwLock<u64>>,
}

impl Counter {
    /// Create a new counter
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment the counter
    pub fn inc(&self) {
        *self.value.write().unwrap_or_else(PoisonError::into_inner) += 1;
    }

    /// Get the current value
    pub fn get(&self) -> u64 {
        *self.value.read().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Running aggregate of a histogram's observations
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HistogramSummary {
    pub count: u64,
    pub sum: f64,
    pub min: f64,
    pub max: f64,
}

impl HistogramSummary {
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

/// Histogram metric. Keeps a fixed-size aggregate, not the samples.
#[derive(Debug, Clone, Default)]
pub struct Histogram {
    summary: Arc<RwLock<HistogramSummary>>,
}

impl Histogram {
    /// Create a new histogram
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe a value
    pub fn observe(&self, value: f64) {
        let mut summary = self.summary.write().unwrap_or_else(PoisonError::into_inner);
        if summary.count == 0 {
            summary.min = value;
            summary.max = value;
        } else {
            summary.min = summary.min.min(value);
            summary.max = summary.max.max(value);
        }
        summary.count += 1;
        summary.sum += value;
    }

    /// Observe a duration in seconds
    pub fn observe_duration(&self, duration: Duration) {
        self.observe(duration.as_secs_f64());
    }

    /// Get count of observations
    pub fn count(&self) -> u64 {
        self.summary().count
    }

    pub fn summary(&self) -> HistogramSummary {
        *self.summary.read().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Metrics registry
pub trait Metrics: Send + Sync {
    /// Get a counter
    fn counter(&self, name: &str) -> Arc<Counter>;

    /// Get a histogram
    fn histogram(&self, name: &str) -> Arc<Histogram>;
}

/// Point-in-time copy of every metric, ordered by name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub counters: BTreeMap<String, u64>,
    pub histograms: BTreeMap<String, HistogramSummary>,
}

/// In-process metrics collector
pub struct MetricsCollector {
    counters: RwLock<HashMap<String, Arc<Counter>>>,
    histograms: RwLock<HashMap<String, Arc<Histogram>>>,
}

impl MetricsCollector {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            counters: RwLock::new(HashMap::new()),
            histograms: RwLock::new(HashMap::new()),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let counters = self
            .counters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(name, counter)| (name.clone(), counter.get()))
            .collect();
        let histograms = self
            .histograms
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(name, histogram)| (name.clone(), histogram.summary()))
            .collect();

        MetricsSnapshot {
            counters,
            histograms,
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics for MetricsCollector {
    fn counter(&self, name: &str) -> Arc<Counter> {
        if let Some(counter) = self
            .counters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
        {
            return Arc::clone(counter);
        }
        self.counters
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(name.to_string())
            .or_default()
            .clone()
    }

    fn histogram(&self, name: &str) -> Arc<Histogram> {
        if let Some(histogram) = self
            .histograms
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
        {
            return Arc::clone(histogram);
        }
        self.histograms
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(name.to_string())
            .or_default()
            .clone()
    }
}
