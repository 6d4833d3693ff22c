//! Centralized counters and pass-duration statistics for the
//! reconciliation loop, structurally descended from the teacher's own
//! `metrics/collector.rs`.

use average::{concatenate, Estimate, Max, Mean, Min, Variance};

concatenate!(
    Estimator,
    [Min, min],
    [Max, max],
    [Mean, mean],
    [Variance, population_variance]
);

#[derive(Debug, Default)]
pub struct EstimatorWrapper {
    estimator: Estimator,
}

impl EstimatorWrapper {
    pub fn new() -> Self {
        Self {
            estimator: Estimator::new(),
        }
    }

    pub fn add(&mut self, value: f64) {
        self.estimator.add(value);
    }

    pub fn min(&self) -> f64 {
        self.estimator.min()
    }

    pub fn max(&self) -> f64 {
        self.estimator.max()
    }

    pub fn mean(&self) -> f64 {
        self.estimator.mean()
    }

    pub fn population_variance(&self) -> f64 {
        self.estimator.population_variance()
    }
}

#[derive(Debug, Default)]
pub struct MetricsCollector {
    /// Number of completed reconciliation passes.
    pub total_passes: u64,
    /// Number of passes aborted by a component-level error.
    pub total_pass_errors: u64,
    /// Number of ASGs scaled up across all passes.
    pub total_scale_ups: u64,
    /// Number of ASGs scaled down across all passes.
    pub total_scale_downs: u64,
    /// Number of resize decisions that were clamped by MinSize/MaxSize.
    pub total_constrained_resizes: u64,
    /// Wall-clock duration of each completed pass, in seconds.
    pub pass_duration_stats: EstimatorWrapper,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_pass(&mut self, duration_seconds: f64) {
        self.total_passes += 1;
        self.pass_duration_stats.add(duration_seconds);
    }

    pub fn record_pass_error(&mut self) {
        self.total_pass_errors += 1;
    }
}
