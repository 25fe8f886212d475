//! Weekday restrictions.

use chrono::Weekday;

const EVERY_DAY: u8 = 0b0111_1111;

/// Set of weekdays a window applies on.
///
/// Keeps "no restriction configured" apart from an explicit list that happens to
/// name all seven days, although both behave identically.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeekdaySet {
    /// Bitmask indexed by `Weekday::num_days_from_monday`. Never zero.
    mask: u8,
    explicit: bool,
}

impl WeekdaySet {
    /// Every day, with no restriction configured.
    pub fn all() -> Self {
        Self {
            mask: EVERY_DAY,
            explicit: false,
        }
    }

    /// Explicit set of days. An empty iterator yields `all()`.
    pub fn from_days<I: IntoIterator<Item = Weekday>>(days: I) -> Self {
        let mask = days
            .into_iter()
            .fold(0u8, |mask, day| mask | (1 << day.num_days_from_monday()));
        if mask == 0 {
            return Self::all();
        }
        Self {
            mask,
            explicit: true,
        }
    }

    #[inline]
    pub fn includes(&self, day: Weekday) -> bool {
        self.mask & (1 << day.num_days_from_monday()) != 0
    }

    /// True if the set came from configuration rather than the all-days default.
    pub fn is_explicit(&self) -> bool {
        self.explicit
    }

    /// True if at least one day of the week is excluded.
    pub fn restricts(&self) -> bool {
        self.mask != EVERY_DAY
    }
}

impl Default for WeekdaySet {
    fn default() -> Self {
        Self::all()
    }
}
