//! Bookable start times for one barber on one day.
//!
//! Walks the working day on a fixed grid and keeps every start whose
//! `[start, start + duration)` interval stays inside working hours, misses the
//! break, and misses every existing booking. The result is deterministic:
//! identical inputs always produce the identical, ascending list.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::booking::BookingInterval;
use crate::clock::WallTime;
use crate::error::{InputError, Result};
use crate::schedule::{DaySchedule, WeeklySchedule};

/// Grid step used by the booking front end.
pub const DEFAULT_SLOT_GRANULARITY_MINUTES: u32 = 30;

/// Response body of the available-slots endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableSlots {
    pub date: NaiveDate,
    pub service_duration: u32,
    pub available_slots: Vec<WallTime>,
}

impl AvailableSlots {
    /// Compute the slots for `date` and wrap them in the response shape.
    pub fn for_date(
        schedule: &WeeklySchedule,
        date: NaiveDate,
        existing: &[BookingInterval],
        service_duration_minutes: u32,
        slot_granularity_minutes: u32,
    ) -> Result<Self> {
        let available_slots = slots_for_date(
            schedule,
            date,
            existing,
            service_duration_minutes,
            slot_granularity_minutes,
        )?;
        Ok(Self {
            date,
            service_duration: service_duration_minutes,
            available_slots,
        })
    }

    pub fn is_fully_booked(&self) -> bool {
        self.available_slots.is_empty()
    }
}

/// Enumerate bookable start times on `day` for a service of the given length.
///
/// An absent or inactive day yields an empty list, as does a day with every
/// slot taken. Neither case is an error.
///
/// # Errors
/// - `InputError::InvalidDuration` if `service_duration_minutes` is 0.
/// - `InputError::InvalidGranularity` if `slot_granularity_minutes` is 0.
/// - `InputError::InvalidSchedule` / `InvalidBreak` if the active day is malformed.
pub fn compute_slots(
    day: Option<&DaySchedule>,
    existing: &[BookingInterval],
    service_duration_minutes: u32,
    slot_granularity_minutes: u32,
) -> Result<Vec<WallTime>> {
    if service_duration_minutes == 0 {
        return Err(InputError::InvalidDuration(0).into());
    }
    if slot_granularity_minutes == 0 {
        return Err(InputError::InvalidGranularity(0).into());
    }

    let day = match day {
        Some(day) if day.is_active() => day,
        _ => return Ok(Vec::new()),
    };
    day.validate()?;

    let open = day.start_time.minutes();
    let close = day.end_time.minutes();

    // Everything the candidate must not touch, as minute pairs.
    let mut blocked: Vec<(u32, u32)> = existing
        .iter()
        .map(|b| (b.start_time.minutes(), b.end_time.minutes()))
        .collect();
    if let Some(lunch) = day.break_window() {
        blocked.push((lunch.start.minutes(), lunch.end.minutes()));
    }

    let mut slots = Vec::new();
    let mut start = open;
    while let Some(end) = start
        .checked_add(service_duration_minutes)
        .filter(|end| *end <= close)
    {
        let free = blocked
            .iter()
            .all(|&(busy_start, busy_end)| !(start < busy_end && busy_start < end));
        if free {
            slots.push(WallTime::from_minutes(start)?);
        }
        match start.checked_add(slot_granularity_minutes) {
            Some(next) => start = next,
            None => break,
        }
    }

    Ok(slots)
}

/// [`compute_slots`] for the weekday of `date` in a weekly schedule.
pub fn slots_for_date(
    schedule: &WeeklySchedule,
    date: NaiveDate,
    existing: &[BookingInterval],
    service_duration_minutes: u32,
    slot_granularity_minutes: u32,
) -> Result<Vec<WallTime>> {
    compute_slots(
        schedule.for_date(date),
        existing,
        service_duration_minutes,
        slot_granularity_minutes,
    )
}
