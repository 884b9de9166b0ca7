//! # chair-engine
//!
//! Appointment scheduling engine for barbershops: conflict validation and slot
//! availability over a barber's weekly working hours.
//!
//! The core functions are pure. They take a schedule, the day's bookings and a
//! candidate or service duration, and read no clock and touch no storage, so
//! they are safe to call from any number of threads at once.
//!
//! ## Modules
//!
//! - [`clock`] -- `HH:MM` wall times as minutes since midnight, half-open ranges
//! - [`schedule`] -- `WeeklySchedule` / `DaySchedule` with break windows
//! - [`booking`] -- existing bookings, candidates, appointment snapshots
//! - [`status`] -- appointment lifecycle and the blocking-status set
//! - [`conflict`] -- may this candidate be booked?
//! - [`availability`] -- which start times are bookable?
//! - [`store`] -- storage port and the lock-guarded in-memory store
//! - [`service`] -- fetch, check, persist orchestration
//! - [`error`] -- Error types

pub mod availability;
pub mod booking;
pub mod clock;
pub mod conflict;
pub mod error;
pub mod schedule;
pub mod service;
pub mod status;
pub mod store;

pub use availability::{compute_slots, slots_for_date, AvailableSlots, DEFAULT_SLOT_GRANULARITY_MINUTES};
pub use booking::{blocking_intervals, Appointment, BookingInterval, CandidateInterval};
pub use clock::{TimeRange, WallTime};
pub use conflict::{find_conflicts, is_available, is_available_on, overlaps, Conflict};
pub use error::{InputError, ScheduleError};
pub use schedule::{DaySchedule, WeeklySchedule};
pub use service::BookingService;
pub use status::{AppointmentStatus, BLOCKING_STATUSES};
pub use store::{BookingId, BookingStore, InMemoryStore, NewBooking};
