//! Textual durations such as `30s`, `60m` or `1.5h`.
//!
//! A [`ConfigDuration`] keeps the number and unit it was written with, so a
//! value read from a config file prints back the way the operator wrote it.
//! Equality and ordering compare the represented length of time, which makes
//! `60m` equal to `1h`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Unit suffix of a [`ConfigDuration`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Nanoseconds,
    Microseconds,
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeUnit::Nanoseconds => "ns",
            TimeUnit::Microseconds => "us",
            TimeUnit::Milliseconds => "ms",
            TimeUnit::Seconds => "s",
            TimeUnit::Minutes => "m",
            TimeUnit::Hours => "h",
            TimeUnit::Days => "d",
        }
    }

    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "ns" => Some(TimeUnit::Nanoseconds),
            "us" => Some(TimeUnit::Microseconds),
            "ms" => Some(TimeUnit::Milliseconds),
            "s" => Some(TimeUnit::Seconds),
            "m" => Some(TimeUnit::Minutes),
            "h" => Some(TimeUnit::Hours),
            "d" => Some(TimeUnit::Days),
            _ => None,
        }
    }

    /// Length of one unit in nanoseconds.
    fn nanos(&self) -> f64 {
        match self {
            TimeUnit::Nanoseconds => 1.0,
            TimeUnit::Microseconds => 1e3,
            TimeUnit::Milliseconds => 1e6,
            TimeUnit::Seconds => 1e9,
            TimeUnit::Minutes => 60.0 * 1e9,
            TimeUnit::Hours => 3_600.0 * 1e9,
            TimeUnit::Days => 86_400.0 * 1e9,
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors produced while reading a duration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseDurationError {
    #[error("duration is empty")]
    Empty,

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("unknown time unit '{0}' (expected one of ns, us, ms, s, m, h, d)")]
    UnknownUnit(String),
}

/// A non-negative duration written as `<number><unit>`.
#[derive(Debug, Clone, Copy)]
pub struct ConfigDuration {
    value: f64,
    unit: TimeUnit,
}

impl ConfigDuration {
    /// Create a duration from a number of units.
    ///
    /// Rejects negative, NaN and infinite values.
    pub fn new(value: f64, unit: TimeUnit) -> Result<Self, ParseDurationError> {
        if !value.is_finite() || value < 0.0 {
            return Err(ParseDurationError::InvalidNumber(value.to_string()));
        }
        Ok(Self {
            value: value.abs(),
            unit,
        })
    }

    pub fn from_millis(millis: u64) -> Self {
        Self::whole(millis, TimeUnit::Milliseconds)
    }

    pub fn from_secs(secs: u64) -> Self {
        Self::whole(secs, TimeUnit::Seconds)
    }

    pub fn from_mins(mins: u64) -> Self {
        Self::whole(mins, TimeUnit::Minutes)
    }

    pub fn from_hours(hours: u64) -> Self {
        Self::whole(hours, TimeUnit::Hours)
    }

    fn whole(value: u64, unit: TimeUnit) -> Self {
        Self {
            value: value as f64,
            unit,
        }
    }

    /// The number as written.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// The unit as written.
    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// Value expressed in another unit.
    pub fn value_in(&self, unit: TimeUnit) -> f64 {
        self.to_nanos() / unit.nanos()
    }

    fn to_nanos(&self) -> f64 {
        self.value * self.unit.nanos()
    }

    /// Convert to a [`std::time::Duration`], saturating at `Duration::MAX`.
    pub fn as_std(&self) -> Duration {
        let nanos = self.to_nanos();
        let secs = (nanos / 1e9).floor();
        if secs >= u64::MAX as f64 {
            return Duration::MAX;
        }
        let subsec = (nanos - secs * 1e9).round() as u64;
        Duration::from_secs(secs as u64)
            .checked_add(Duration::from_nanos(subsec))
            .unwrap_or(Duration::MAX)
    }
}

impl PartialEq for ConfigDuration {
    fn eq(&self, other: &Self) -> bool {
        self.to_nanos() == other.to_nanos()
    }
}

impl PartialOrd for ConfigDuration {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.to_nanos().partial_cmp(&other.to_nanos())
    }
}

impl fmt::Display for ConfigDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit)
    }
}

impl FromStr for ConfigDuration {
    type Err = ParseDurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseDurationError::Empty);
        }

        let (num_part, unit_part) = split_number_unit(s);
        let num_part = num_part.trim();

        if num_part.is_empty() || !num_part.chars().all(|c| c.is_ascii_digit() || c == '.') {
            return Err(ParseDurationError::InvalidNumber(num_part.to_string()));
        }
        let value: f64 = num_part
            .parse()
            .map_err(|_| ParseDurationError::InvalidNumber(num_part.to_string()))?;

        let unit = TimeUnit::from_suffix(unit_part)
            .ok_or_else(|| ParseDurationError::UnknownUnit(unit_part.to_string()))?;

        Self::new(value, unit)
    }
}

/// Split a duration string into number and unit parts at the first letter.
fn split_number_unit(s: &str) -> (&str, &str) {
    let idx = s
        .char_indices()
        .find(|(_, c)| c.is_alphabetic())
        .map(|(i, _)| i)
        .unwrap_or(s.len());

    (&s[..idx], &s[idx..])
}

impl Serialize for ConfigDuration {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ConfigDuration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
