//! Calendar dates and their string forms.
//!
//! - `DayKey` - canonical `YYYY-MM-DD` identity used for provider requests
//!   and for matching the selected grid cell
//! - `DateFormatter` - human-facing strings driven by `[appearance]`
//! - month arithmetic helpers for the reference month

use chrono::{Datelike, Local, Months, NaiveDate};
use std::fmt::{self, Write};
use std::str::FromStr;
use thiserror::Error;

use crate::config::AppearanceConfig;

/// A day in the viewer's local calendar (no time-of-day component)
pub type CalendarDate = NaiveDate;

const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Canonical `YYYY-MM-DD` form of a calendar date
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DayKey(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid day key {0:?} (expected YYYY-MM-DD)")]
pub struct DayKeyError(String);

impl DayKey {
    pub fn from_date(date: CalendarDate) -> Self {
        Self(date.format(DAY_KEY_FORMAT).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for DayKey {
    type Err = DayKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let date = NaiveDate::parse_from_str(s, DAY_KEY_FORMAT)
            .map_err(|_| DayKeyError(s.to_string()))?;

        // chrono accepts unpadded fields; only the canonical spelling is a key
        let key = Self::from_date(date);
        if key.as_str() != s {
            return Err(DayKeyError(s.to_string()));
        }
        Ok(key)
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Today's date in the local timezone
pub fn today() -> CalendarDate {
    Local::now().date_naive()
}

/// First day of the month containing `date`
pub fn month_start(date: CalendarDate) -> CalendarDate {
    date.with_day(1).unwrap_or(date)
}

/// Shift a month by `delta` months, landing on the first of the target month.
///
/// Year rollover is handled by chrono: one month back from January is
/// December of the previous year. Out-of-range results leave the month as is.
pub fn shift_month(month: CalendarDate, delta: i32) -> CalendarDate {
    let start = month_start(month);
    let months = Months::new(delta.unsigned_abs());
    let shifted = if delta >= 0 {
        start.checked_add_months(months)
    } else {
        start.checked_sub_months(months)
    };
    shifted.unwrap_or(start)
}

/// Weekday index with Monday = 0 .. Sunday = 6
pub fn weekday_index(date: CalendarDate) -> u32 {
    date.weekday().num_days_from_monday()
}

/// Formats dates for display using the configured chrono patterns
#[derive(Debug, Clone)]
pub struct DateFormatter {
    date_format: String,
    month_format: String,
}

impl DateFormatter {
    pub fn new(appearance: &AppearanceConfig) -> Self {
        Self {
            date_format: appearance.date_format.clone(),
            month_format: appearance.month_format.clone(),
        }
    }

    /// Localized day string, e.g. `05.03.2024`
    pub fn display(&self, date: CalendarDate) -> String {
        format_or_key(date, &self.date_format)
    }

    /// Uppercased month heading, e.g. `MARCH 2024`
    pub fn month_label(&self, month: CalendarDate) -> String {
        format_or_key(month, &self.month_format).to_uppercase()
    }
}

/// A bad pattern in the config falls back to the day key instead of panicking
fn format_or_key(date: CalendarDate, pattern: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", date.format(pattern)).is_err() {
        tracing::warn!("Invalid date format {:?}, using day key", pattern);
        return DayKey::from_date(date).to_string();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> CalendarDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_key_is_zero_padded() {
        assert_eq!(DayKey::from_date(ymd(2024, 3, 5)).as_str(), "2024-03-05");
        assert_eq!(DayKey::from_date(ymd(987, 12, 31)).as_str(), "0987-12-31");
    }

    #[test]
    fn test_day_key_round_trips() {
        let mut date = ymd(2023, 12, 1);
        for _ in 0..800 {
            let key = DayKey::from_date(date);
            let parsed: DayKey = key.as_str().parse().unwrap();
            assert_eq!(parsed, key);
            assert_eq!(parsed.to_string(), key.to_string());
            date = date.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_day_key_rejects_non_canonical() {
        assert!("2024-02-30".parse::<DayKey>().is_err());
        assert!("2024-3-5".parse::<DayKey>().is_err());
        assert!("2024-03-05T10:00".parse::<DayKey>().is_err());
        assert!("garbage".parse::<DayKey>().is_err());
        assert!("".parse::<DayKey>().is_err());
    }

    #[test]
    fn test_shift_month_rolls_over_years() {
        assert_eq!(shift_month(ymd(2024, 1, 15), -1), ymd(2023, 12, 1));
        assert_eq!(shift_month(ymd(2023, 12, 1), 1), ymd(2024, 1, 1));
        assert_eq!(shift_month(ymd(2024, 3, 1), -14), ymd(2023, 1, 1));
        assert_eq!(shift_month(ymd(2024, 3, 1), 0), ymd(2024, 3, 1));
    }

    #[test]
    fn test_shift_month_never_skips_short_months() {
        // Jan 31 + 1 month must land in February, not March
        assert_eq!(shift_month(ymd(2024, 1, 31), 1), ymd(2024, 2, 1));
        assert_eq!(shift_month(ymd(2023, 3, 31), -1), ymd(2023, 2, 1));
    }

    #[test]
    fn test_weekday_index_starts_monday() {
        assert_eq!(weekday_index(ymd(2024, 2, 26)), 0); // Monday
        assert_eq!(weekday_index(ymd(2024, 3, 1)), 4); // Friday
        assert_eq!(weekday_index(ymd(2024, 3, 2)), 5); // Saturday
        assert_eq!(weekday_index(ymd(2024, 4, 7)), 6); // Sunday
    }

    #[test]
    fn test_formatter_defaults() {
        let formatter = DateFormatter::new(&AppearanceConfig::default());
        assert_eq!(formatter.display(ymd(2024, 3, 5)), "05.03.2024");
        assert_eq!(formatter.month_label(ymd(2024, 3, 1)), "MARCH 2024");
    }

    #[test]
    fn test_formatter_bad_pattern_falls_back() {
        let appearance = AppearanceConfig {
            date_format: "%Q".to_string(),
            ..Default::default()
        };
        let formatter = DateFormatter::new(&appearance);
        assert_eq!(formatter.display(ymd(2024, 3, 5)), "2024-03-05");
    }
}
