//! Admission grants handed to the worker loop.

use chrono::{DateTime, Duration, Utc};

use crate::window::{Capacity, Rate};

/// Starting at `valid_from`, for `duration`, admit the capacity of `rate`.
///
/// Must be recomputed at `valid_until()`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Schedule {
    valid_from: DateTime<Utc>,
    duration: Duration,
    rate: Rate,
}

impl Schedule {
    pub fn new(valid_from: DateTime<Utc>, duration: Duration, rate: Rate) -> Self {
        debug_assert!(duration >= Duration::zero());
        Self {
            valid_from,
            duration,
            rate,
        }
    }

    pub fn valid_from(&self) -> DateTime<Utc> {
        self.valid_from
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn rate(&self) -> Rate {
        self.rate
    }

    #[inline]
    pub fn valid_until(&self) -> DateTime<Utc> {
        self.valid_from + self.duration
    }

    /// Total work admitted over the whole schedule.
    pub fn total(&self) -> Capacity {
        self.rate.capacity_for(self.duration)
    }
}
