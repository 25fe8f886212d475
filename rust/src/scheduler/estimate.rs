//! Long-horizon estimate of when a queued item will be processed.

use chrono::{DateTime, Duration, Utc};

use crate::window::Capacity;
use crate::{log_debug, log_error};

use super::configuration::Configuration;

/// `duration * part / whole`, to the millisecond.
fn prorate(duration: Duration, part: u64, whole: u64) -> Duration {
    let millis = i128::from(duration.num_milliseconds()) * i128::from(part) / i128::from(whole);
    Duration::milliseconds(i64::try_from(millis).unwrap_or(i64::MAX))
}

impl Configuration {
    /// Estimate when the item at queue position `n` (0 is next) will be processed.
    ///
    /// Walks forward through successive schedules from `now`. Returns `None` when
    /// the item would not be reached within the estimate horizon, since the
    /// answer is unreliable that far out, or when the horizon end is not
    /// representable.
    pub fn estimate(&self, now: DateTime<Utc>, n: u64) -> Option<DateTime<Utc>> {
        if !self.has_rollout_windows() {
            return Some(now);
        }

        let verbosity = self.config().verbosity;
        let Some(until) = now.checked_add_signed(self.config().estimate_horizon()) else {
            log_debug!(verbosity, "  Estimate horizon from {} overflows", now);
            return None;
        };
        let mut remaining = n;
        let mut at = now;

        while at < until {
            let schedule = self.schedule_at(at, false);
            if schedule.duration() <= Duration::zero() {
                debug_assert!(false, "empty schedule at {} during estimate", at);
                log_error!("rollout window: empty schedule at {} during estimate", at);
                return None;
            }

            let capacity = schedule.total();
            if capacity.is_zero() {
                log_debug!(
                    verbosity,
                    "  {}: nothing admitted until {}",
                    at,
                    schedule.valid_until()
                );
                at = schedule.valid_until();
                continue;
            }
            let total = match capacity {
                Capacity::Unlimited => {
                    log_debug!(verbosity, "  {}: unlimited, item {} processed now", at, n);
                    return Some(at);
                }
                Capacity::Limited(total) => total,
            };

            log_debug!(
                verbosity,
                "  {}: {} admitted until {}, {} ahead",
                at,
                total,
                schedule.valid_until(),
                remaining
            );

            if remaining < total {
                // The item lands part-way through this schedule
                return Some(at + prorate(schedule.duration(), remaining, total));
            }
            if remaining == total {
                // Last item this schedule admits
                return Some(schedule.valid_until());
            }

            remaining -= total;
            at = schedule.valid_until();
        }

        log_debug!(verbosity, "  No estimate for item {} within horizon", n);
        None
    }
}
