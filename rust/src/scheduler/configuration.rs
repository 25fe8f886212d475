//! The rollout window configuration and near-term schedule derivation.

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::config::SchedulerConfig;
use crate::models::RawWindow;
use crate::window::{parse_windows, ConfigurationError, Rate, Window};
use crate::{log_changes, log_checks, log_error};

use super::schedule::Schedule;

/// Re-poll interval while nothing may be processed, or for open-ended windows.
const POLL_INTERVAL_MINUTES: i64 = 1;
/// Schedule length when no windows are configured at all.
const UNRESTRICTED_MINUTES: i64 = 10;

/// How long an answer from `current_for` stays correct.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Validity {
    /// Until the configuration changes.
    Unbounded,
    /// For this long from the query instant.
    Bounded(Duration),
}

/// The rollout windows configured on the site.
///
/// Immutable once built: a configuration change produces a new value that the
/// caller swaps in atomically.
#[derive(Clone, Debug)]
pub struct Configuration {
    /// Later windows win while they are open
    windows: Vec<Window>,
    config: SchedulerConfig,
    clock: Arc<dyn Clock>,
}

/// Check a raw window list without building a configuration.
pub fn validate_configuration(raw: Option<&[RawWindow]>) -> Result<(), ConfigurationError> {
    parse_windows(raw).map(|_| ())
}

impl Default for Configuration {
    fn default() -> Self {
        Self::from_windows(Vec::new(), SchedulerConfig::default(), Arc::new(SystemClock))
    }
}

impl Configuration {
    /// Build from raw site configuration using the system clock.
    ///
    /// An absent list means no rollout windows, so processing is unrestricted.
    pub fn new(raw: Option<&[RawWindow]>) -> Result<Self, ConfigurationError> {
        Self::with_options(raw, SchedulerConfig::default(), Arc::new(SystemClock))
    }

    pub fn with_options(
        raw: Option<&[RawWindow]>,
        config: SchedulerConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigurationError> {
        let windows = parse_windows(raw)?;
        Ok(Self::from_windows(windows, config, clock))
    }

    /// Build from already validated windows.
    pub fn from_windows(
        windows: Vec<Window>,
        config: SchedulerConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            windows,
            config,
            clock,
        }
    }

    pub fn windows(&self) -> &[Window] {
        &self.windows
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn has_rollout_windows(&self) -> bool {
        !self.windows.is_empty()
    }

    /// The window in force at `now`, if any, and how long that stays true.
    ///
    /// With no windows configured this returns `(None, Unbounded)`; callers should
    /// treat that case as unrestricted before asking.
    pub fn current_for(&self, now: DateTime<Utc>) -> (Option<&Window>, Validity) {
        let verbosity = self.config.verbosity;

        if self.windows.is_empty() {
            return (None, Validity::Unbounded);
        }

        let Some(index) = self.windows.iter().rposition(|w| w.is_open(now)) else {
            let next = self
                .windows
                .iter()
                .filter_map(|w| w.next_open_after(now))
                .min();
            return match next {
                Some(at) => {
                    log_checks!(verbosity, "No window open at {}, next opens at {}", now, at);
                    (None, Validity::Bounded(at - now))
                }
                None => {
                    debug_assert!(false, "no rollout window opens within a week of {}", now);
                    log_error!("rollout window: no window opens within a week of {}", now);
                    (None, Validity::Unbounded)
                }
            };
        };
        let window = &self.windows[index];

        // A later window takes over as soon as it opens, which may be before this
        // window would close on its own.
        let mut close = window.natural_close(now);
        for later in &self.windows[index + 1..] {
            if let Some(opens) = later.next_open_after(now) {
                close = Some(close.map_or(opens, |c| c.min(opens)));
            }
        }

        match close {
            None => {
                log_checks!(verbosity, "Window {} open at {} indefinitely", index, now);
                (Some(window), Validity::Unbounded)
            }
            Some(close) => {
                log_checks!(verbosity, "Window {} open at {} until {}", index, now, close);
                (Some(window), Validity::Bounded(close - now))
            }
        }
    }

    /// Derive the schedule starting at `at`.
    ///
    /// `minimal` caps idle schedules at one minute so live configuration edits are
    /// picked up quickly.
    pub fn schedule_at(&self, at: DateTime<Utc>, minimal: bool) -> Schedule {
        let poll = Duration::minutes(POLL_INTERVAL_MINUTES);

        match self.current_for(at) {
            (None, Validity::Bounded(until_open)) => {
                if minimal && until_open >= poll {
                    Schedule::new(at, poll, Rate::Zero)
                } else {
                    Schedule::new(at, until_open, Rate::Zero)
                }
            }
            (None, Validity::Unbounded) => Schedule::new(at, poll, Rate::Zero),
            (Some(window), Validity::Unbounded) => {
                // Hourly rates get a full hour so proration stays meaningful
                if window.rate().is_per_hour() {
                    Schedule::new(at, Duration::hours(1), window.rate())
                } else {
                    Schedule::new(at, poll, window.rate())
                }
            }
            // TODO: split long bounded windows so config edits land sooner
            (Some(window), Validity::Bounded(remaining)) => {
                Schedule::new(at, remaining, window.rate())
            }
        }
    }

    /// The schedule the worker should follow right now.
    pub fn schedule(&self) -> Schedule {
        let now = self.clock.now();
        let schedule = if self.has_rollout_windows() {
            self.schedule_at(now, true)
        } else {
            // Short horizon so configuration reloads are noticed
            Schedule::new(now, Duration::minutes(UNRESTRICTED_MINUTES), Rate::Unlimited)
        };

        log_changes!(
            self.config.verbosity,
            "Schedule from {} for {}s at rate {}",
            schedule.valid_from(),
            schedule.duration().num_seconds(),
            schedule.rate()
        );
        schedule
    }
}
