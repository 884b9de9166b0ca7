//! Wall-clock arithmetic shared by the validator and the calculator.
//!
//! Every time of day is held as minutes since midnight so interval checks are
//! plain integer comparisons. Times carry no date and no timezone; they are local
//! to the barbershop.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::InputError;

/// Minutes in a day. `24:00` is a valid end bound but never a start.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// A time of day, `00:00` through `24:00`, at minute resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WallTime(u16);

impl WallTime {
    pub const MIDNIGHT: WallTime = WallTime(0);
    pub const END_OF_DAY: WallTime = WallTime(MINUTES_PER_DAY);

    /// Build from a minute offset. Fails past `24:00`.
    pub fn from_minutes(minutes: u32) -> Result<Self, InputError> {
        u16::try_from(minutes)
            .ok()
            .filter(|m| *m <= MINUTES_PER_DAY)
            .map(WallTime)
            .ok_or_else(|| InputError::InvalidTime(format!("{} minutes past midnight", minutes)))
    }

    pub fn from_hm(hour: u32, minute: u32) -> Result<Self, InputError> {
        if minute >= 60 || hour > 24 || (hour == 24 && minute != 0) {
            return Err(InputError::InvalidTime(format!("{:02}:{:02}", hour, minute)));
        }
        Self::from_minutes(hour * 60 + minute)
    }

    /// Parse `HH:MM`, or `HH:MM:SS` with zero seconds (the shape of SQL `TIME`).
    pub fn parse(s: &str) -> Result<Self, InputError> {
        let trimmed = s.trim();
        if trimmed == "24:00" || trimmed == "24:00:00" {
            return Ok(Self::END_OF_DAY);
        }

        let time = NaiveTime::parse_from_str(trimmed, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
            .map_err(|_| InputError::InvalidTime(s.to_string()))?;

        if time.second() != 0 || time.nanosecond() != 0 {
            return Err(InputError::InvalidTime(format!(
                "{} (seconds are not supported)",
                s
            )));
        }

        Ok(WallTime((time.hour() * 60 + time.minute()) as u16))
    }

    pub fn minutes(self) -> u32 {
        u32::from(self.0)
    }

    pub fn hour(self) -> u32 {
        self.minutes() / 60
    }

    pub fn minute(self) -> u32 {
        self.minutes() % 60
    }

    /// `None` when the result would run past `24:00`.
    pub fn checked_add_minutes(self, minutes: u32) -> Option<WallTime> {
        self.minutes()
            .checked_add(minutes)
            .and_then(|m| Self::from_minutes(m).ok())
    }
}

impl fmt::Display for WallTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for WallTime {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for WallTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WallTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        WallTime::parse(&raw).map_err(de::Error::custom)
    }
}

/// A half-open `[start, end)` interval of wall-clock time.
///
/// An interval ending at `10:00` and one starting at `10:00` share no minute and
/// therefore do not overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeRange {
    pub start: WallTime,
    pub end: WallTime,
}

impl TimeRange {
    pub fn new(start: WallTime, end: WallTime) -> Self {
        Self { start, end }
    }

    pub fn duration_minutes(&self) -> u32 {
        self.end.minutes().saturating_sub(self.start.minutes())
    }

    /// `self.start < other.end && other.start < self.end`.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// True when `other` lies entirely inside `self`.
    pub fn contains(&self, other: &TimeRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Minutes shared by both ranges, 0 when they do not overlap.
    pub fn overlap_minutes(&self, other: &TimeRange) -> u32 {
        if !self.overlaps(other) {
            return 0;
        }
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        end.minutes() - start.minutes()
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

