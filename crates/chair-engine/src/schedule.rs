//! Barber working hours: one optional [`DaySchedule`] per weekday.
//!
//! Schedules arrive from storage as JSON blobs. Deserialization turns them into
//! strongly typed values up front so the engine never inspects raw JSON. A day
//! that is missing, `null`, or flagged closed is simply not bookable.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::clock::{TimeRange, WallTime};
use crate::error::InputError;

/// Working hours for one weekday, with an optional break window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDaySchedule")]
pub struct DaySchedule {
    pub start_time: WallTime,
    pub end_time: WallTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub break_start: Option<WallTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub break_end: Option<WallTime>,
    pub active: bool,
}

/// Wire shape accepted from storage. Closed days may omit their hours.
#[derive(Deserialize)]
struct RawDaySchedule {
    #[serde(default, alias = "start")]
    start_time: Option<WallTime>,
    #[serde(default, alias = "end")]
    end_time: Option<WallTime>,
    #[serde(default)]
    break_start: Option<WallTime>,
    #[serde(default)]
    break_end: Option<WallTime>,
    #[serde(default, alias = "is_active")]
    active: Option<bool>,
    #[serde(default)]
    closed: Option<bool>,
}

impl TryFrom<RawDaySchedule> for DaySchedule {
    type Error = InputError;

    fn try_from(raw: RawDaySchedule) -> Result<Self, Self::Error> {
        let active = raw.active.unwrap_or(true) && !raw.closed.unwrap_or(false);

        let (start_time, end_time) = match (raw.start_time, raw.end_time) {
            (Some(start), Some(end)) => (start, end),
            _ if !active => (WallTime::MIDNIGHT, WallTime::MIDNIGHT),
            _ => {
                return Err(InputError::InvalidSchedule(
                    "active day needs both start_time and end_time".to_string(),
                ))
            }
        };

        Ok(DaySchedule {
            start_time,
            end_time,
            break_start: raw.break_start,
            break_end: raw.break_end,
            active,
        })
    }
}

impl DaySchedule {
    /// An active day without a break.
    pub fn new(start_time: WallTime, end_time: WallTime) -> Self {
        Self {
            start_time,
            end_time,
            break_start: None,
            break_end: None,
            active: true,
        }
    }

    /// A day explicitly marked closed.
    pub fn closed() -> Self {
        Self {
            active: false,
            ..Self::new(WallTime::MIDNIGHT, WallTime::MIDNIGHT)
        }
    }

    pub fn with_break(mut self, break_start: WallTime, break_end: WallTime) -> Self {
        self.break_start = Some(break_start);
        self.break_end = Some(break_end);
        self
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn working_window(&self) -> TimeRange {
        TimeRange::new(self.start_time, self.end_time)
    }

    /// `None` when the day has no break. Call [`validate`](Self::validate) first
    /// to reject a half-specified break.
    pub fn break_window(&self) -> Option<TimeRange> {
        match (self.break_start, self.break_end) {
            (Some(start), Some(end)) => Some(TimeRange::new(start, end)),
            _ => None,
        }
    }

    /// Check the day's invariants. Inactive days are never inspected.
    ///
    /// # Errors
    /// Returns `InputError::InvalidSchedule` when `start_time >= end_time` and
    /// `InputError::InvalidBreak` when the break is half-specified, empty, or
    /// outside the working window.
    pub fn validate(&self) -> Result<(), InputError> {
        if !self.active {
            return Ok(());
        }

        if self.start_time >= self.end_time {
            return Err(InputError::InvalidSchedule(format!(
                "start_time {} must be before end_time {}",
                self.start_time, self.end_time
            )));
        }

        match (self.break_start, self.break_end) {
            (None, None) => Ok(()),
            (Some(bs), Some(be)) => {
                if bs >= be {
                    return Err(InputError::InvalidBreak(format!(
                        "break_start {} must be before break_end {}",
                        bs, be
                    )));
                }
                if bs < self.start_time || be > self.end_time {
                    return Err(InputError::InvalidBreak(format!(
                        "break {}-{} lies outside working hours {}-{}",
                        bs, be, self.start_time, self.end_time
                    )));
                }
                Ok(())
            }
            _ => Err(InputError::InvalidBreak(
                "break_start and break_end must be given together".to_string(),
            )),
        }
    }
}

/// Lowercase full weekday name, the key used in stored schedules.
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

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// A barber's week. Serialized as an object keyed by lowercase weekday name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "BTreeMap<String, Option<DaySchedule>>")]
pub struct WeeklySchedule {
    days: [Option<DaySchedule>; 7],
}

impl WeeklySchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_day(mut self, weekday: Weekday, day: DaySchedule) -> Self {
        self.set(weekday, Some(day));
        self
    }

    pub fn set(&mut self, weekday: Weekday, day: Option<DaySchedule>) {
        self.days[weekday.num_days_from_monday() as usize] = day;
    }

    /// The stored entry for `weekday`, active or not.
    pub fn entry(&self, weekday: Weekday) -> Option<&DaySchedule> {
        self.days[weekday.num_days_from_monday() as usize].as_ref()
    }

    /// The bookable day for `weekday`: `None` when absent or inactive.
    pub fn day(&self, weekday: Weekday) -> Option<&DaySchedule> {
        self.entry(weekday).filter(|d| d.is_active())
    }

    pub fn for_date(&self, date: NaiveDate) -> Option<&DaySchedule> {
        self.day(date.weekday())
    }

    /// Validate every active day.
    pub fn validate(&self) -> Result<(), InputError> {
        for weekday in WEEK {
            if let Some(day) = self.entry(weekday) {
                day.validate().map_err(|e| prefix_weekday(weekday, e))?;
            }
        }
        Ok(())
    }
}

fn prefix_weekday(weekday: Weekday, err: InputError) -> InputError {
    let name = weekday_name(weekday);
    match err {
        InputError::InvalidSchedule(msg) => InputError::InvalidSchedule(format!("{}: {}", name, msg)),
        InputError::InvalidBreak(msg) => InputError::InvalidBreak(format!("{}: {}", name, msg)),
        other => other,
    }
}

impl TryFrom<BTreeMap<String, Option<DaySchedule>>> for WeeklySchedule {
    type Error = InputError;

    fn try_from(raw: BTreeMap<String, Option<DaySchedule>>) -> Result<Self, Self::Error> {
        let mut schedule = WeeklySchedule::new();
        let mut seen = [false; 7];
        for (key, day) in raw {
            let weekday: Weekday = key
                .trim()
                .parse()
                .map_err(|_| InputError::UnknownWeekday(key.clone()))?;
            let slot = &mut seen[weekday.num_days_from_monday() as usize];
            if *slot {
                return Err(InputError::DuplicateWeekday(weekday_name(weekday).to_string()));
            }
            *slot = true;
            schedule.set(weekday, day);
        }
        Ok(schedule)
    }
}

impl Serialize for WeeklySchedule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let present = WEEK.iter().filter(|w| self.entry(**w).is_some()).count();
        let mut map = serializer.serialize_map(Some(present))?;
        for weekday in WEEK {
            if let Some(day) = self.entry(weekday) {
                map.serialize_entry(weekday_name(weekday), day)?;
            }
        }
        map.end()
    }
}
