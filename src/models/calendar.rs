//! Weekly calendar primitives.
//!
//! A school week is seven canonical days. Within a day, time is a
//! 24-hour clock with minute precision.
//!
//! # Time Model
//! Clock times are minutes since midnight (`0..1440`). There is no date,
//! no timezone and no recurrence: a slot on `Monday` means every Monday.
//!
//! # Interval Semantics
//! Time windows are half-open `[start, end)`, so a lesson ending at 09:00
//! and another starting at 09:00 do not overlap.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::InvalidInput;

/// Minimum length of an accepted weekday abbreviation.
const MIN_ABBREVIATION: usize = 3;

/// A day of the school week, in canonical order.
///
/// The derived ordering follows the declaration order, which is the
/// canonical Monday-first order used for sorting schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// All seven days in canonical order.
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Canonical display name.
    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }

    /// Position in the canonical week (Monday = 0).
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Resolves user input to a weekday.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    /// Accepts the full name or any prefix of at least three letters
    /// (`"wed"`, `"Thurs"`, `"SATURDAY"`). Three-letter prefixes are
    /// unique across the week, so a match is never ambiguous.
    pub fn from_name(input: &str) -> Option<Self> {
        let wanted = input.trim().to_lowercase();
        if wanted.chars().count() < MIN_ABBREVIATION {
            return None;
        }
        Self::ALL
            .into_iter()
            .find(|day| day.name().to_lowercase().starts_with(&wanted))
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A time of day on a 24-hour clock, minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime {
    minutes: u16,
}

impl ClockTime {
    /// Creates a clock time from hour and minute.
    ///
    /// Returns `None` if `hour >= 24` or `minute >= 60`.
    pub fn from_hm(hour: u16, minute: u16) -> Option<Self> {
        (hour < 24 && minute < 60).then(|| Self {
            minutes: hour * 60 + minute,
        })
    }

    /// Minutes since midnight.
    #[inline]
    pub fn minutes(self) -> u16 {
        self.minutes
    }

    #[inline]
    pub fn hour(self) -> u16 {
        self.minutes / 60
    }

    #[inline]
    pub fn minute(self) -> u16 {
        self.minutes % 60
    }
}

impl FromStr for ClockTime {
    type Err = chrono::ParseError;

    /// Parses `HH:MM` (24-hour). A single-digit hour such as `8:30` is accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let time = NaiveTime::parse_from_str(s.trim(), "%H:%M")?;
        Ok(Self {
            minutes: (time.hour() * 60 + time.minute()) as u16,
        })
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// A time interval [start, end) within one day.
///
/// Half-open interval: includes start, excludes end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    /// Interval start (inclusive).
    pub start: ClockTime,
    /// Interval end (exclusive).
    pub end: ClockTime,
}

impl TimeWindow {
    /// Creates a new time window.
    pub fn new(start: ClockTime, end: ClockTime) -> Self {
        Self { start, end }
    }

    /// Whether the window has positive length.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.start < self.end
    }

    /// Length of this window in minutes (0 if invalid).
    #[inline]
    pub fn duration_minutes(&self) -> u16 {
        self.end.minutes().saturating_sub(self.start.minutes())
    }

    /// Whether two windows overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Parses a weekly slot request: day name plus `HH:MM` start and end.
///
/// Checks run in order (day, start, end, interval) and the first failure
/// is reported.
pub fn parse_weekly_window(
    day: &str,
    start: &str,
    end: &str,
) -> Result<(Weekday, TimeWindow), InvalidInput> {
    let day = Weekday::from_name(day)
        .ok_or_else(|| InvalidInput::UnknownDay(day.trim().to_string()))?;
    let start_time = parse_clock(start)?;
    let end_time = parse_clock(end)?;
    let window = TimeWindow::new(start_time, end_time);
    if !window.is_valid() {
        return Err(InvalidInput::EmptyInterval {
            start: start_time,
            end: end_time,
        });
    }
    Ok((day, window))
}

fn parse_clock(text: &str) -> Result<ClockTime, InvalidInput> {
    text.parse()
        .map_err(|_| InvalidInput::MalformedTime(text.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> ClockTime {
        s.parse().unwrap()
    }

    #[test]
    fn test_weekday_full_names() {
        assert_eq!(Weekday::from_name("Monday"), Some(Weekday::Monday));
        assert_eq!(Weekday::from_name("  sunday "), Some(Weekday::Sunday));
        assert_eq!(Weekday::from_name("WEDNESDAY"), Some(Weekday::Wednesday));
    }

    #[test]
    fn test_weekday_abbreviations() {
        assert_eq!(Weekday::from_name("wed"), Some(Weekday::Wednesday));
        assert_eq!(Weekday::from_name("Thurs"), Some(Weekday::Thursday));
        assert_eq!(Weekday::from_name("tue"), Some(Weekday::Tuesday));
        assert_eq!(Weekday::from_name("sat"), Some(Weekday::Saturday));
    }

    #[test]
    fn test_weekday_rejects_unknown() {
        assert_eq!(Weekday::from_name(""), None);
        assert_eq!(Weekday::from_name("mo"), None); // too short
        assert_eq!(Weekday::from_name("Mondays"), None);
        assert_eq!(Weekday::from_name("Funday"), None);
    }

    #[test]
    fn test_weekday_order() {
        assert!(Weekday::Monday < Weekday::Wednesday);
        assert!(Weekday::Saturday < Weekday::Sunday);
        assert_eq!(Weekday::Monday.index(), 0);
        assert_eq!(Weekday::Sunday.index(), 6);
    }

    #[test]
    fn test_clock_time_parse() {
        assert_eq!(t("08:30").minutes(), 8 * 60 + 30);
        assert_eq!(t("8:05"), ClockTime::from_hm(8, 5).unwrap());
        assert_eq!(t(" 23:59 ").to_string(), "23:59");
        assert_eq!(t("00:00").minutes(), 0);
    }

    #[test]
    fn test_clock_time_rejects_malformed() {
        assert!("24:00".parse::<ClockTime>().is_err());
        assert!("12:60".parse::<ClockTime>().is_err());
        assert!("noon".parse::<ClockTime>().is_err());
        assert!("12".parse::<ClockTime>().is_err());
        assert!("12:30pm".parse::<ClockTime>().is_err());
    }

    #[test]
    fn test_clock_time_display_pads() {
        assert_eq!(ClockTime::from_hm(7, 5).unwrap().to_string(), "07:05");
        assert!(ClockTime::from_hm(24, 0).is_none());
    }

    #[test]
    fn test_clock_time_serde() {
        let json = serde_json::to_string(&t("09:15")).unwrap();
        assert_eq!(json, "\"09:15\"");
        let back: ClockTime = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t("09:15"));
        assert!(serde_json::from_str::<ClockTime>("\"9h15\"").is_err());
    }

    #[test]
    fn test_time_window() {
        let w = TimeWindow::new(t("08:00"), t("09:00"));
        assert_eq!(w.duration_minutes(), 60);
        assert!(w.is_valid());
        assert!(!TimeWindow::new(t("09:00"), t("09:00")).is_valid());
        assert!(!TimeWindow::new(t("09:00"), t("08:00")).is_valid());
    }

    #[test]
    fn test_time_window_overlap() {
        let a = TimeWindow::new(t("08:00"), t("09:00"));
        let b = TimeWindow::new(t("08:30"), t("09:30"));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));

        let c = TimeWindow::new(t("09:00"), t("10:00")); // touching but not overlapping
        assert!(!a.overlaps(&c));
        assert!(!c.overlaps(&a));
    }

    #[test]
    fn test_parse_weekly_window() {
        let (day, w) = parse_weekly_window("mon", "08:00", "09:15").unwrap();
        assert_eq!(day, Weekday::Monday);
        assert_eq!(w.duration_minutes(), 75);
    }

    #[test]
    fn test_parse_weekly_window_errors() {
        assert_eq!(
            parse_weekly_window("someday", "08:00", "09:00"),
            Err(InvalidInput::UnknownDay("someday".into()))
        );
        assert_eq!(
            parse_weekly_window("Monday", "8am", "09:00"),
            Err(InvalidInput::MalformedTime("8am".into()))
        );
        assert_eq!(
            parse_weekly_window("Monday", "09:00", "09:00"),
            Err(InvalidInput::EmptyInterval {
                start: t("09:00"),
                end: t("09:00")
            })
        );
    }

    #[test]
    fn test_time_window_invalid() {
        let w = TimeWindow::new(t("10:00"), t("10:00"));
        assert!(!w.is_valid());
        assert_eq!(w.duration_minutes(), 0);
    }
}
