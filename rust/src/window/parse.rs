//! Validation of raw window definitions.
//!
//! Errors are collected across the whole list so an administrator sees every
//! invalid entry at once.

use chrono::{NaiveTime, Weekday};
use thiserror::Error;

use crate::models::RawWindow;

use super::definition::Window;
use super::rate::Rate;
use super::weekday::WeekdaySet;

/// Why a single raw window was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WindowError {
    #[error("invalid time of day {0:?}: expected HH:MM")]
    InvalidTimeOfDay(String),
    #[error("invalid weekday {0:?}")]
    InvalidWeekday(String),
    #[error("invalid rate {0:?}: expected \"unlimited\", \"0\" or N/<unit>")]
    InvalidRate(String),
    #[error("start and end times must both be set or both be omitted")]
    MismatchedBounds,
    #[error("end time {end} must be after start time {start}")]
    EndNotAfterStart { start: NaiveTime, end: NaiveTime },
}

/// A `WindowError` tagged with the position of the offending entry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("window {index}: {source}")]
pub struct IndexedWindowError {
    pub index: usize,
    pub source: WindowError,
}

/// Every problem found in a rollout window list.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid rollout window configuration: {}", join_errors(.errors))]
pub struct ConfigurationError {
    pub errors: Vec<IndexedWindowError>,
}

fn join_errors(errors: &[IndexedWindowError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Parse "H:MM" or "HH:MM".
pub fn parse_time_of_day(raw: &str) -> Result<NaiveTime, WindowError> {
    let invalid = || WindowError::InvalidTimeOfDay(raw.to_string());

    let (hour, minute) = raw.trim().split_once(':').ok_or_else(invalid)?;
    let is_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !is_digits(hour) || hour.len() > 2 || !is_digits(minute) || minute.len() != 2 {
        return Err(invalid());
    }

    let hour: u32 = hour.parse().map_err(|_| invalid())?;
    let minute: u32 = minute.parse().map_err(|_| invalid())?;
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)
}

pub fn parse_weekday(raw: &str) -> Result<Weekday, WindowError> {
    raw.trim()
        .parse::<Weekday>()
        .map_err(|_| WindowError::InvalidWeekday(raw.to_string()))
}

/// Parse a rate.
///
/// Seconds and minutes are normalised to an hourly count.
pub fn parse_rate(raw: &str) -> Result<Rate, WindowError> {
    let invalid = || WindowError::InvalidRate(raw.to_string());
    let normalised = raw.trim().to_ascii_lowercase();

    if normalised == "unlimited" {
        return Ok(Rate::Unlimited);
    }
    if normalised == "0" {
        return Ok(Rate::Zero);
    }

    let (count, unit) = normalised.split_once('/').ok_or_else(invalid)?;
    let count = count.trim();
    if count.is_empty() || !count.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let n: u64 = count.parse().map_err(|_| invalid())?;

    let per_hour = match unit.trim() {
        "window" => return Ok(if n == 0 { Rate::Zero } else { Rate::PerWindow(n) }),
        "s" | "sec" | "second" | "seconds" => n.checked_mul(3600),
        "m" | "min" | "minute" | "minutes" => n.checked_mul(60),
        "h" | "hr" | "hour" | "hours" => Some(n),
        _ => None,
    }
    .ok_or_else(invalid)?;

    Ok(if per_hour == 0 {
        Rate::Zero
    } else {
        Rate::PerHour(per_hour)
    })
}

/// Validate a single raw window.
pub fn parse_window(raw: &RawWindow) -> Result<Window, WindowError> {
    let hours = match (raw.start.as_deref(), raw.end.as_deref()) {
        (None, None) => None,
        (Some(start), Some(end)) => {
            let start = parse_time_of_day(start)?;
            let end = parse_time_of_day(end)?;
            if end <= start {
                return Err(WindowError::EndNotAfterStart { start, end });
            }
            Some((start, end))
        }
        _ => return Err(WindowError::MismatchedBounds),
    };

    let days = match &raw.days {
        Some(names) => {
            let days = names
                .iter()
                .map(|name| parse_weekday(name))
                .collect::<Result<Vec<_>, _>>()?;
            WeekdaySet::from_days(days)
        }
        None => WeekdaySet::all(),
    };

    let rate = parse_rate(&raw.rate)?;

    Ok(Window::new(days, hours, rate))
}

/// Validate a whole window list, keeping configuration order.
///
/// An absent list is valid and yields no windows.
pub fn parse_windows(raw: Option<&[RawWindow]>) -> Result<Vec<Window>, ConfigurationError> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };

    let mut windows = Vec::with_capacity(raw.len());
    let mut errors = Vec::new();
    for (index, raw_window) in raw.iter().enumerate() {
        match parse_window(raw_window) {
            Ok(window) => windows.push(window),
            Err(source) => errors.push(IndexedWindowError { index, source }),
        }
    }

    if errors.is_empty() {
        Ok(windows)
    } else {
        Err(ConfigurationError { errors })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    fn make_raw(
        days: Option<&[&str]>,
        start: Option<&str>,
        end: Option<&str>,
        rate: &str,
    ) -> RawWindow {
        RawWindow {
            days: days.map(|d| d.iter().map(|s| s.to_string()).collect()),
            start: start.map(str::to_string),
            end: end.map(str::to_string),
            rate: rate.to_string(),
        }
    }

    #[test]
    fn test_parse_time_of_day() {
        assert_eq!(parse_time_of_day("09:30"), Ok(hm(9, 30)));
        assert_eq!(parse_time_of_day("7:05"), Ok(hm(7, 5)));
        assert_eq!(parse_time_of_day(" 23:59 "), Ok(hm(23, 59)));
        assert_eq!(parse_time_of_day("00:00"), Ok(hm(0, 0)));
    }

    #[test]
    fn test_parse_time_of_day_rejects_garbage() {
        for raw in ["24:00", "12:60", "12", "12:5", "+1:00", "ab:cd", "123:00", ""] {
            assert_eq!(
                parse_time_of_day(raw),
                Err(WindowError::InvalidTimeOfDay(raw.to_string())),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_weekday() {
        assert_eq!(parse_weekday("mon"), Ok(Weekday::Mon));
        assert_eq!(parse_weekday("Saturday"), Ok(Weekday::Sat));
        assert!(matches!(
            parse_weekday("funday"),
            Err(WindowError::InvalidWeekday(_))
        ));
    }

    #[test]
    fn test_parse_rate_sentinels() {
        assert_eq!(parse_rate("unlimited"), Ok(Rate::Unlimited));
        assert_eq!(parse_rate("UNLIMITED"), Ok(Rate::Unlimited));
        assert_eq!(parse_rate("0"), Ok(Rate::Zero));
        assert_eq!(parse_rate("0/hour"), Ok(Rate::Zero));
    }

    #[test]
    fn test_parse_rate_units() {
        assert_eq!(parse_rate("10/hour"), Ok(Rate::PerHour(10)));
        assert_eq!(parse_rate("10/h"), Ok(Rate::PerHour(10)));
        assert_eq!(parse_rate("2/minute"), Ok(Rate::PerHour(120)));
        assert_eq!(parse_rate("1/sec"), Ok(Rate::PerHour(3600)));
        assert_eq!(parse_rate("5/window"), Ok(Rate::PerWindow(5)));
    }

    #[test]
    fn test_parse_rate_rejects_garbage() {
        for raw in [
            "",
            "fast",
            "10",
            "10/fortnight",
            "-1/hour",
            "/hour",
            "99999999999999999999/hour",
        ] {
            assert!(
                matches!(parse_rate(raw), Err(WindowError::InvalidRate(_))),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_rate_overflow_on_normalisation() {
        assert!(matches!(
            parse_rate(&format!("{}/second", u64::MAX)),
            Err(WindowError::InvalidRate(_))
        ));
    }

    #[test]
    fn test_parse_window_full() {
        let raw = make_raw(Some(&["mon", "fri"]), Some("09:00"), Some("17:00"), "10/hour");
        let window = parse_window(&raw).unwrap();
        assert_eq!(window.start(), Some(hm(9, 0)));
        assert_eq!(window.end(), Some(hm(17, 0)));
        assert!(window.days().includes(Weekday::Fri));
        assert!(!window.days().includes(Weekday::Tue));
        assert_eq!(window.rate(), Rate::PerHour(10));
    }

    #[test]
    fn test_parse_window_unrestricted() {
        let window = parse_window(&make_raw(None, None, None, "unlimited")).unwrap();
        assert_eq!(window, Window::always(Rate::Unlimited));
    }

    #[test]
    fn test_parse_window_mismatched_bounds() {
        let raw = make_raw(None, Some("09:00"), None, "unlimited");
        assert_eq!(parse_window(&raw), Err(WindowError::MismatchedBounds));
    }

    #[test]
    fn test_parse_window_end_before_start() {
        let raw = make_raw(None, Some("17:00"), Some("09:00"), "unlimited");
        assert_eq!(
            parse_window(&raw),
            Err(WindowError::EndNotAfterStart {
                start: hm(17, 0),
                end: hm(9, 0),
            })
        );
        let raw = make_raw(None, Some("09:00"), Some("09:00"), "unlimited");
        assert!(parse_window(&raw).is_err());
    }

    #[test]
    fn test_parse_windows_absent_is_empty() {
        assert_eq!(parse_windows(None), Ok(Vec::new()));
    }

    #[test]
    fn test_parse_windows_collects_every_error() {
        let raw = vec![
            make_raw(None, Some("25:00"), Some("26:00"), "unlimited"),
            make_raw(None, None, None, "10/hour"),
            make_raw(Some(&["someday"]), None, None, "unlimited"),
        ];
        let err = parse_windows(Some(&raw)).unwrap_err();

        assert_eq!(err.errors.len(), 2);
        assert_eq!(err.errors[0].index, 0);
        assert_eq!(err.errors[1].index, 2);

        let message = err.to_string();
        assert!(message.contains("window 0"), "{message}");
        assert!(message.contains("window 2"), "{message}");
        assert!(!message.contains("window 1"), "{message}");
    }
}
