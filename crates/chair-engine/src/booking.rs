//! Booking records as the engine sees them.
//!
//! [`BookingInterval`] is an existing appointment already filtered to blocking
//! statuses. [`CandidateInterval`] is a proposed booking. [`Appointment`] is the
//! fuller storage-side snapshot, reduced to intervals by [`blocking_intervals`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::clock::{TimeRange, WallTime};
use crate::error::InputError;
use crate::status::AppointmentStatus;

/// One existing booking for a barber on a given day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingInterval {
    pub id: String,
    pub start_time: WallTime,
    pub end_time: WallTime,
}

impl BookingInterval {
    pub fn new(id: impl Into<String>, start_time: WallTime, end_time: WallTime) -> Self {
        Self {
            id: id.into(),
            start_time,
            end_time,
        }
    }

    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.start_time, self.end_time)
    }
}

/// A proposed booking: a start time plus the service duration.
///
/// Construction guarantees `end > start` and that the booking ends by `24:00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCandidate")]
pub struct CandidateInterval {
    start_time: WallTime,
    duration_minutes: u32,
}

#[derive(Deserialize)]
struct RawCandidate {
    start_time: WallTime,
    duration_minutes: i64,
}

impl TryFrom<RawCandidate> for CandidateInterval {
    type Error = InputError;

    fn try_from(raw: RawCandidate) -> Result<Self, Self::Error> {
        CandidateInterval::new(raw.start_time, raw.duration_minutes)
    }
}

impl CandidateInterval {
    /// # Errors
    /// `InputError::InvalidDuration` for zero or negative durations and
    /// `InputError::InvalidTime` when the booking would run past midnight.
    pub fn new(start_time: WallTime, duration_minutes: i64) -> Result<Self, InputError> {
        let duration = u32::try_from(duration_minutes)
            .ok()
            .filter(|d| *d > 0)
            .ok_or(InputError::InvalidDuration(duration_minutes))?;

        if start_time.checked_add_minutes(duration).is_none() {
            return Err(InputError::InvalidTime(format!(
                "{} + {} minutes runs past midnight",
                start_time, duration
            )));
        }

        Ok(Self {
            start_time,
            duration_minutes: duration,
        })
    }

    /// A candidate covering an explicit `[start, end)` range, as when a
    /// reschedule request carries both bounds.
    pub fn from_range(start_time: WallTime, end_time: WallTime) -> Result<Self, InputError> {
        let duration = i64::from(end_time.minutes()) - i64::from(start_time.minutes());
        Self::new(start_time, duration)
    }

    pub fn start_time(&self) -> WallTime {
        self.start_time
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    pub fn end_time(&self) -> WallTime {
        // Checked in `new`.
        self.start_time
            .checked_add_minutes(self.duration_minutes)
            .unwrap_or(WallTime::END_OF_DAY)
    }

    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.start_time, self.end_time())
    }
}

/// Storage-side appointment snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub barber_id: String,
    #[serde(alias = "appointment_date")]
    pub date: NaiveDate,
    pub start_time: WallTime,
    pub end_time: WallTime,
    pub status: AppointmentStatus,
}

impl Appointment {
    pub fn interval(&self) -> BookingInterval {
        BookingInterval::new(self.id.clone(), self.start_time, self.end_time)
    }
}

/// The barber's blocking bookings for `date`, ordered by start time.
///
/// Cancelled, no-show and completed appointments never block a slot.
pub fn blocking_intervals(
    appointments: &[Appointment],
    barber_id: &str,
    date: NaiveDate,
) -> Vec<BookingInterval> {
    let mut intervals: Vec<BookingInterval> = appointments
        .iter()
        .filter(|a| a.barber_id == barber_id && a.date == date && a.status.is_blocking())
        .map(Appointment::interval)
        .collect();
    intervals.sort_by_key(|b| (b.start_time, b.end_time));
    intervals
}
