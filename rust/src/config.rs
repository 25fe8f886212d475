//! Configuration types for the rollout scheduler.

use chrono::Duration;
use pyo3::prelude::*;

/// Upper bound on the estimate horizon, whatever is configured.
pub const MAX_ESTIMATE_HORIZON_DAYS: u32 = 31;

/// Tuning for schedule derivation and estimation.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// How far ahead `estimate` simulates before giving up, in days.
    /// Values above `MAX_ESTIMATE_HORIZON_DAYS` are clamped.
    #[pyo3(get, set)]
    pub estimate_horizon_days: u32,
    /// Logging verbosity (0 = silent, 3 = debug)
    #[pyo3(get, set)]
    pub verbosity: u8,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            estimate_horizon_days: 7,
            verbosity: 0,
        }
    }
}

impl SchedulerConfig {
    /// The estimate horizon, clamped to `MAX_ESTIMATE_HORIZON_DAYS`.
    pub fn estimate_horizon(&self) -> Duration {
        let days = self.estimate_horizon_days.min(MAX_ESTIMATE_HORIZON_DAYS);
        Duration::days(i64::from(days))
    }
}

#[pymethods]
impl SchedulerConfig {
    #[new]
    #[pyo3(signature = (estimate_horizon_days=None, verbosity=None))]
    fn new(estimate_horizon_days: Option<u32>, verbosity: Option<u8>) -> Self {
        let defaults = Self::default();
        Self {
            estimate_horizon_days: estimate_horizon_days
                .unwrap_or(defaults.estimate_horizon_days),
            verbosity: verbosity.unwrap_or(defaults.verbosity),
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "SchedulerConfig(estimate_horizon_days={}, verbosity={})",
            self.estimate_horizon_days, self.verbosity
        )
    }
}
