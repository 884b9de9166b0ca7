//! Error types for chair-engine operations.
//!
//! "No availability" is never an error: the calculator returns an empty list and
//! the validator returns `false`. Errors are reserved for malformed input and for
//! failures at the storage boundary.

use chrono::NaiveDate;
use thiserror::Error;

use crate::status::AppointmentStatus;

/// Malformed input handed to the engine. Reported to the immediate caller and
/// never repaired.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Invalid time: {0}")]
    InvalidTime(String),

    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error("Invalid break window: {0}")]
    InvalidBreak(String),

    #[error("Invalid service duration: {0} minutes (must be positive)")]
    InvalidDuration(i64),

    #[error("Invalid slot granularity: {0} minutes (must be positive)")]
    InvalidGranularity(u32),

    #[error("Unknown weekday: {0}")]
    UnknownWeekday(String),

    #[error("Weekday given more than once: {0}")]
    DuplicateWeekday(String),

    #[error("Unknown appointment status: {0}")]
    UnknownStatus(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error(transparent)]
    Input(#[from] InputError),

    /// The slot was taken between the availability check and the write, or the
    /// pre-check itself found an overlap.
    #[error("Booking conflict for barber {barber_id} on {date} at {start_time}-{end_time}")]
    BookingConflict {
        barber_id: String,
        date: NaiveDate,
        start_time: String,
        end_time: String,
    },

    #[error("Unknown barber: {0}")]
    UnknownBarber(String),

    #[error("Unknown booking: {0}")]
    UnknownBooking(String),

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
