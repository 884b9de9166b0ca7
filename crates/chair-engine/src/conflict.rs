//! Conflict validation for a proposed booking.
//!
//! Every check uses half-open `[start, end)` overlap: two intervals overlap iff
//! `a.start < b.end && b.start < a.end`. A booking ending at 10:00 does not
//! conflict with one starting at 10:00.

use chrono::NaiveDate;

use crate::booking::{BookingInterval, CandidateInterval};
use crate::clock::TimeRange;
use crate::error::Result;
use crate::schedule::{DaySchedule, WeeklySchedule};

/// An existing booking that overlaps a candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct Conflict {
    pub booking: BookingInterval,
    pub overlap_minutes: u32,
}

/// Half-open interval overlap. Symmetric in its arguments.
pub fn overlaps(a: &TimeRange, b: &TimeRange) -> bool {
    a.overlaps(b)
}

/// All existing bookings that overlap `candidate`, in input order.
///
/// The booking whose id equals `exclude_id` is skipped, so an appointment
/// being rescheduled never conflicts with itself.
pub fn find_conflicts(
    candidate: &CandidateInterval,
    existing: &[BookingInterval],
    exclude_id: Option<&str>,
) -> Vec<Conflict> {
    let wanted = candidate.range();

    existing
        .iter()
        .filter(|b| Some(b.id.as_str()) != exclude_id)
        .filter_map(|b| {
            let range = b.range();
            if wanted.overlaps(&range) {
                Some(Conflict {
                    booking: b.clone(),
                    overlap_minutes: wanted.overlap_minutes(&range),
                })
            } else {
                None
            }
        })
        .collect()
}

/// Decide whether `candidate` may be booked on `day`.
///
/// Returns `Ok(false)` when the day is absent or inactive, when the candidate
/// falls outside working hours, overlaps the break, or overlaps any booking
/// other than `exclude_id`.
///
/// # Errors
/// Returns `ScheduleError::Input` when `day` is active but malformed.
pub fn is_available(
    day: Option<&DaySchedule>,
    candidate: &CandidateInterval,
    existing: &[BookingInterval],
    exclude_id: Option<&str>,
) -> Result<bool> {
    let day = match day {
        Some(day) if day.is_active() => day,
        _ => return Ok(false),
    };
    day.validate()?;

    let wanted = candidate.range();

    if !day.working_window().contains(&wanted) {
        return Ok(false);
    }

    if let Some(lunch) = day.break_window() {
        if lunch.overlaps(&wanted) {
            return Ok(false);
        }
    }

    let clash = existing
        .iter()
        .filter(|b| Some(b.id.as_str()) != exclude_id)
        .any(|b| b.range().overlaps(&wanted));

    Ok(!clash)
}

/// [`is_available`] against the weekday of `date` in a weekly schedule.
pub fn is_available_on(
    schedule: &WeeklySchedule,
    date: NaiveDate,
    candidate: &CandidateInterval,
    existing: &[BookingInterval],
    exclude_id: Option<&str>,
) -> Result<bool> {
    is_available(schedule.for_date(date), candidate, existing, exclude_id)
}
