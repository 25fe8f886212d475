//! Raw input types supplied by site configuration.

use pyo3::prelude::*;

/// A rollout window as written by an administrator, before validation.
#[pyclass]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawWindow {
    /// Weekday names ("mon", "tuesday", ...); absent or empty means every day
    #[pyo3(get, set)]
    pub days: Option<Vec<String>>,
    /// Start time of day as "HH:MM" UTC
    #[pyo3(get, set)]
    pub start: Option<String>,
    /// End time of day as "HH:MM" UTC
    #[pyo3(get, set)]
    pub end: Option<String>,
    /// "unlimited", "0", "N/window" or "N/<second|minute|hour>"
    #[pyo3(get, set)]
    pub rate: String,
}

#[pymethods]
impl RawWindow {
    #[new]
    #[pyo3(signature = (rate, days=None, start=None, end=None))]
    fn new(
        rate: String,
        days: Option<Vec<String>>,
        start: Option<String>,
        end: Option<String>,
    ) -> Self {
        Self {
            days,
            start,
            end,
            rate,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "RawWindow(rate={:?}, days={:?}, start={:?}, end={:?})",
            self.rate, self.days, self.start, self.end
        )
    }
}
