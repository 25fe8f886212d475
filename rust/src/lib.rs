//! Rust implementation of batch change rollout window scheduling.
//!
//! This module decides how much reconciliation work may happen right now, and
//! estimates when a queued changeset will be reconciled, given the rollout windows
//! configured by a site administrator.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use chrono::{DateTime, Duration, Utc};
use pyo3::prelude::*;
use std::sync::Arc;

pub mod clock;
mod config;
pub mod logging;
mod models;
pub mod scheduler;
pub mod window;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::SchedulerConfig;
pub use models::RawWindow;
pub use scheduler::{validate_configuration, Configuration, Schedule, Validity};
pub use window::{Capacity, ConfigurationError, IndexedWindowError, Rate, Window, WindowError};

/// Validate rollout windows without building a configuration.
///
/// # Arguments
/// * `windows` - Raw windows from site configuration, or None if unset
///
/// # Raises
/// * ValueError listing every invalid window
#[pyfunction]
#[pyo3(name = "validate_configuration", signature = (windows=None))]
fn py_validate_configuration(windows: Option<Vec<RawWindow>>) -> PyResult<()> {
    validate_configuration(windows.as_deref())
        .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))
}

/// An admission grant (PyO3 wrapper).
#[pyclass(name = "Schedule", frozen)]
#[derive(Clone, Debug)]
pub struct PySchedule {
    inner: Schedule,
}

#[pymethods]
impl PySchedule {
    #[getter]
    fn valid_from(&self) -> DateTime<Utc> {
        self.inner.valid_from()
    }

    #[getter]
    fn duration(&self) -> Duration {
        self.inner.duration()
    }

    #[getter]
    fn valid_until(&self) -> DateTime<Utc> {
        self.inner.valid_until()
    }

    /// Items admitted over the schedule; None means unlimited.
    #[getter]
    fn total(&self) -> Option<u64> {
        match self.inner.total() {
            Capacity::Unlimited => None,
            Capacity::Limited(n) => Some(n),
        }
    }

    #[getter]
    fn rate(&self) -> String {
        self.inner.rate().to_string()
    }

    fn __repr__(&self) -> String {
        format!(
            "Schedule(valid_from={}, duration={}s, rate={})",
            self.inner.valid_from(),
            self.inner.duration().num_seconds(),
            self.inner.rate()
        )
    }
}

/// Rollout window configuration (PyO3 wrapper).
#[pyclass(name = "Configuration", frozen)]
#[derive(Clone, Debug)]
pub struct PyConfiguration {
    inner: Configuration,
}

#[pymethods]
impl PyConfiguration {
    /// Build a configuration from raw windows.
    ///
    /// # Raises
    /// * ValueError listing every invalid window
    #[new]
    #[pyo3(signature = (windows=None, config=None))]
    fn new(windows: Option<Vec<RawWindow>>, config: Option<SchedulerConfig>) -> PyResult<Self> {
        Configuration::with_options(
            windows.as_deref(),
            config.unwrap_or_default(),
            Arc::new(SystemClock),
        )
        .map(|inner| Self { inner })
        .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))
    }

    fn has_rollout_windows(&self) -> bool {
        self.inner.has_rollout_windows()
    }

    fn schedule(&self) -> PySchedule {
        PySchedule {
            inner: self.inner.schedule(),
        }
    }

    /// Estimate when queue position `n` (0 is next) will be reconciled.
    ///
    /// Returns None if there is no reliable estimate.
    fn estimate(&self, now: DateTime<Utc>, n: u64) -> Option<DateTime<Utc>> {
        self.inner.estimate(now, n)
    }

    fn __repr__(&self) -> String {
        format!("Configuration(windows={})", self.inner.windows().len())
    }
}

/// The batch_rollout.rust Python module.
#[pymodule]
fn rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Input and config types
    m.add_class::<RawWindow>()?;
    m.add_class::<SchedulerConfig>()?;

    // Scheduling
    m.add_class::<PyConfiguration>()?;
    m.add_class::<PySchedule>()?;
    m.add_function(wrap_pyfunction!(py_validate_configuration, m)?)?;

    Ok(())
}
