//! Clock-time and calendar helpers.
//!
//! Times of day cross every boundary (database rows, query strings, JSON) as
//! zero-padded 24-hour `"HH:MM"` strings. Inside the workspace they are kept
//! as minutes since midnight, wrapped in [`ClockTime`] wherever the value has
//! not been validated yet.

use chrono::{NaiveDate, NaiveTime, Timelike, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of minutes in a calendar day; valid clock times are below this.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeParseError {
    #[error("invalid time of day '{0}', expected HH:MM")]
    InvalidTime(String),
    #[error("invalid weekday '{0}'")]
    InvalidWeekday(String),
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("unknown time zone '{0}'")]
    UnknownTimeZone(String),
}

/// A validated time of day with minute resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(u16);

impl ClockTime {
    /// Midnight, the first minute of the day.
    pub const MIDNIGHT: ClockTime = ClockTime(0);

    pub fn from_minutes(minutes: u32) -> Option<Self> {
        if minutes < MINUTES_PER_DAY {
            Some(Self(minutes as u16))
        } else {
            None
        }
    }

    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        if minute >= 60 {
            return None;
        }
        Self::from_minutes(hour * 60 + minute)
    }

    /// Minutes since midnight.
    pub fn minutes(self) -> u32 {
        u32::from(self.0)
    }
}

impl FromStr for ClockTime {
    type Err = TimeParseError;

    /// Accepts `HH:MM` and `HH:MM:SS`; seconds are dropped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let time = NaiveTime::parse_from_str(trimmed, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
            .map_err(|_| TimeParseError::InvalidTime(s.to_string()))?;
        Self::from_hm(time.hour(), time.minute())
            .ok_or_else(|| TimeParseError::InvalidTime(s.to_string()))
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Formats minutes since midnight as `"HH:MM"`.
///
/// # Panics
///
/// Panics when `minutes` is not a time of day. Callers only pass values
/// derived from validated working windows.
pub fn format_minutes(minutes: u32) -> String {
    match ClockTime::from_minutes(minutes) {
        Some(time) => time.to_string(),
        None => panic!("{minutes} minutes is not a time of day"),
    }
}

/// Lower-case English weekday name, the form stored with working hours.
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

pub fn parse_weekday(name: &str) -> Result<Weekday, TimeParseError> {
    match name.trim().to_lowercase().as_str() {
        "monday" => Ok(Weekday::Mon),
        "tuesday" => Ok(Weekday::Tue),
        "wednesday" => Ok(Weekday::Wed),
        "thursday" => Ok(Weekday::Thu),
        "friday" => Ok(Weekday::Fri),
        "saturday" => Ok(Weekday::Sat),
        "sunday" => Ok(Weekday::Sun),
        _ => Err(TimeParseError::InvalidWeekday(name.to_string())),
    }
}

pub fn parse_date(value: &str) -> Result<NaiveDate, TimeParseError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| TimeParseError::InvalidDate(value.to_string()))
}

fn zone(time_zone: &str) -> Result<Tz, TimeParseError> {
    Tz::from_str(time_zone).map_err(|_| TimeParseError::UnknownTimeZone(time_zone.to_string()))
}

/// The current calendar date in the given IANA time zone.
pub fn today_in_zone(time_zone: &str) -> Result<NaiveDate, TimeParseError> {
    Ok(Utc::now().with_timezone(&zone(time_zone)?).date_naive())
}

/// The current date and wall-clock minute in the given IANA time zone.
pub fn now_in_zone(time_zone: &str) -> Result<(NaiveDate, ClockTime), TimeParseError> {
    let now = Utc::now().with_timezone(&zone(time_zone)?);
    let time = ClockTime::from_hm(now.hour(), now.minute()).unwrap_or(ClockTime::MIDNIGHT);
    Ok((now.date_naive(), time))
}
