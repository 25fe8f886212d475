//! Processing rates and the capacity they grant.

use chrono::Duration;
use std::fmt;

const MILLIS_PER_HOUR: u128 = 3_600_000;

/// How much work a window admits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rate {
    /// No limit at all.
    Unlimited,
    /// Nothing may be processed.
    Zero,
    /// A fixed count for each schedule handed out, whatever its length.
    PerWindow(u64),
    /// A count per hour, prorated over the schedule length.
    PerHour(u64),
}

/// Total work admitted by a schedule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capacity {
    Unlimited,
    Limited(u64),
}

impl Rate {
    pub fn is_per_hour(&self) -> bool {
        matches!(self, Rate::PerHour(_))
    }

    /// Capacity granted over `duration`.
    ///
    /// Per-hour rates are floored to whole items: 10/hour over 45 minutes is 7.
    pub fn capacity_for(&self, duration: Duration) -> Capacity {
        match *self {
            Rate::Unlimited => Capacity::Unlimited,
            Rate::Zero => Capacity::Limited(0),
            Rate::PerWindow(n) => Capacity::Limited(n),
            Rate::PerHour(n) => {
                let millis = duration.num_milliseconds().max(0) as u128;
                let total = u128::from(n) * millis / MILLIS_PER_HOUR;
                Capacity::Limited(u64::try_from(total).unwrap_or(u64::MAX))
            }
        }
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rate::Unlimited => write!(f, "unlimited"),
            Rate::Zero => write!(f, "0"),
            Rate::PerWindow(n) => write!(f, "{}/window", n),
            Rate::PerHour(n) => write!(f, "{}/hour", n),
        }
    }
}

impl Capacity {
    pub fn is_zero(&self) -> bool {
        matches!(self, Capacity::Limited(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_rates_skip_arithmetic() {
        assert_eq!(
            Rate::Unlimited.capacity_for(Duration::minutes(1)),
            Capacity::Unlimited
        );
        assert_eq!(
            Rate::Zero.capacity_for(Duration::hours(5)),
            Capacity::Limited(0)
        );
        assert!(Rate::Zero.capacity_for(Duration::hours(5)).is_zero());
    }

    #[test]
    fn test_per_window_ignores_duration() {
        for minutes in [1, 30, 600] {
            assert_eq!(
                Rate::PerWindow(12).capacity_for(Duration::minutes(minutes)),
                Capacity::Limited(12)
            );
        }
    }

    #[test]
    fn test_per_hour_prorated() {
        assert_eq!(
            Rate::PerHour(10).capacity_for(Duration::minutes(30)),
            Capacity::Limited(5)
        );
        assert_eq!(
            Rate::PerHour(10).capacity_for(Duration::hours(3)),
            Capacity::Limited(30)
        );
    }

    #[test]
    fn test_per_hour_fraction_floors() {
        // 7.5 items
        assert_eq!(
            Rate::PerHour(10).capacity_for(Duration::minutes(45)),
            Capacity::Limited(7)
        );
        // Less than a whole item
        assert_eq!(
            Rate::PerHour(10).capacity_for(Duration::minutes(5)),
            Capacity::Limited(0)
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Rate::Unlimited.to_string(), "unlimited");
        assert_eq!(Rate::Zero.to_string(), "0");
        assert_eq!(Rate::PerWindow(3).to_string(), "3/window");
        assert_eq!(Rate::PerHour(60).to_string(), "60/hour");
    }
}
