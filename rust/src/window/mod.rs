//! Rollout window value types and their validation.
//!
//! A window restricts processing to certain times of day and days of week, at a
//! given rate.

mod definition;
mod parse;
mod rate;
mod weekday;

pub use definition::Window;
pub use parse::{
    parse_rate, parse_time_of_day, parse_weekday, parse_window, parse_windows,
    ConfigurationError, IndexedWindowError, WindowError,
};
pub use rate::{Capacity, Rate};
pub use weekday::WeekdaySet;
