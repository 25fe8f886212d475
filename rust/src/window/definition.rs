//! A single rollout window and its occurrence math.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, Utc};

use crate::log_error;

use super::rate::Rate;
use super::weekday::WeekdaySet;

/// Days scanned past today when looking for an occurrence.
const SEARCH_DAYS: u64 = 7;

/// A validated rollout window. All times are UTC.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Window {
    days: WeekdaySet,
    /// Daily `[start, end)` bounds; `None` covers the whole day
    hours: Option<(NaiveTime, NaiveTime)>,
    rate: Rate,
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

impl Window {
    /// Create a window. `hours` must have its start strictly before its end.
    pub fn new(days: WeekdaySet, hours: Option<(NaiveTime, NaiveTime)>, rate: Rate) -> Self {
        debug_assert!(hours.map_or(true, |(start, end)| start < end));
        Self { days, hours, rate }
    }

    /// A window open every day, all day.
    pub fn always(rate: Rate) -> Self {
        Self::new(WeekdaySet::all(), None, rate)
    }

    pub fn start(&self) -> Option<NaiveTime> {
        self.hours.map(|(start, _)| start)
    }

    pub fn end(&self) -> Option<NaiveTime> {
        self.hours.map(|(_, end)| end)
    }

    pub fn days(&self) -> WeekdaySet {
        self.days
    }

    pub fn rate(&self) -> Rate {
        self.rate
    }

    /// Whether the window applies at `now`.
    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        if !self.days.includes(now.weekday()) {
            return false;
        }
        match self.hours {
            None => true,
            Some((start, end)) => {
                let time = now.time();
                start <= time && time < end
            }
        }
    }

    /// Earliest instant at or after `now` at which the window is open.
    ///
    /// Scans today and the following week; `None` only if no day qualifies.
    pub fn next_open_after(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if self.is_open(now) {
            return Some(now);
        }

        let today = now.date_naive();
        let opens_at = self.start().unwrap_or(NaiveTime::MIN);
        for offset in 0..=SEARCH_DAYS {
            let date = today.checked_add_days(Days::new(offset))?;
            if !self.days.includes(date.weekday()) {
                continue;
            }
            let candidate = date.and_time(opens_at).and_utc();
            // Today's start may already be behind us
            if candidate >= now {
                return Some(candidate);
            }
        }
        None
    }

    /// When this window stops applying on its own terms, given it is open at `now`.
    ///
    /// `None` means it never closes. Later windows that take over earlier are
    /// not considered here.
    pub fn natural_close(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if let Some((_, end)) = self.hours {
            return Some(now.date_naive().and_time(end).and_utc());
        }
        if !self.days.is_explicit() {
            return None;
        }

        // Consecutive permitted days run together: close at the first excluded one
        let today = now.date_naive();
        for offset in 1..=SEARCH_DAYS {
            let Some(date) = today.checked_add_days(Days::new(offset)) else {
                break;
            };
            if !self.days.includes(date.weekday()) {
                return Some(start_of_day(date));
            }
        }
        // A configured list naming all seven days has nothing to close on
        if !self.days.restricts() {
            return None;
        }

        debug_assert!(false, "no excluded day within a week for {:?}", self.days);
        log_error!(
            "rollout window: could not find end of day-limited window after {}",
            now
        );
        today.succ_opt().map(start_of_day)
    }
}
