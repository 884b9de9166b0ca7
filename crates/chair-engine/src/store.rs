//! The storage boundary and an in-memory reference store.
//!
//! The pure validator is only a fast pre-check: two requests can both pass it
//! before either is written. [`BookingStore::persist_booking`] is therefore the
//! authoritative guard and must refuse overlapping writes itself.
//! [`InMemoryStore`] does this by holding one lock across
//! fetch-validate-persist.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::booking::{blocking_intervals, Appointment, BookingInterval, CandidateInterval};
use crate::clock::WallTime;
use crate::conflict::is_available;
use crate::error::{InputError, Result, ScheduleError};
use crate::schedule::WeeklySchedule;
use crate::status::AppointmentStatus;

pub type BookingId = String;

/// A booking request as it arrives from the API layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBooking {
    pub barber_id: String,
    #[serde(alias = "appointment_date")]
    pub date: NaiveDate,
    pub start_time: WallTime,
    pub duration_minutes: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
}

impl NewBooking {
    pub fn new(
        barber_id: impl Into<String>,
        date: NaiveDate,
        start_time: WallTime,
        duration_minutes: i64,
    ) -> Self {
        Self {
            barber_id: barber_id.into(),
            date,
            start_time,
            duration_minutes,
            service_id: None,
        }
    }

    pub fn candidate(&self) -> std::result::Result<CandidateInterval, InputError> {
        CandidateInterval::new(self.start_time, self.duration_minutes)
    }

    pub(crate) fn conflict(&self, candidate: &CandidateInterval) -> ScheduleError {
        ScheduleError::BookingConflict {
            barber_id: self.barber_id.clone(),
            date: self.date,
            start_time: candidate.start_time().to_string(),
            end_time: candidate.end_time().to_string(),
        }
    }
}

/// Schedule and booking persistence, owned outside the engine.
pub trait BookingStore: Send + Sync {
    fn weekly_schedule(&self, barber_id: &str) -> Result<WeeklySchedule>;

    /// Bookings for the barber on `date`, restricted to blocking statuses.
    fn bookings_for_day(&self, barber_id: &str, date: NaiveDate) -> Result<Vec<BookingInterval>>;

    /// Write a new booking. Must fail with `ScheduleError::BookingConflict` if the
    /// slot is no longer free at write time.
    fn persist_booking(&self, booking: &NewBooking) -> Result<BookingId>;

    /// Move an existing booking, with the same guarantee as `persist_booking`.
    fn reschedule_booking(&self, id: &str, booking: &NewBooking) -> Result<()>;

    fn update_status(&self, id: &str, status: AppointmentStatus) -> Result<()>;
}

impl<T: BookingStore + ?Sized> BookingStore for Arc<T> {
    fn weekly_schedule(&self, barber_id: &str) -> Result<WeeklySchedule> {
        (**self).weekly_schedule(barber_id)
    }

    fn bookings_for_day(&self, barber_id: &str, date: NaiveDate) -> Result<Vec<BookingInterval>> {
        (**self).bookings_for_day(barber_id, date)
    }

    fn persist_booking(&self, booking: &NewBooking) -> Result<BookingId> {
        (**self).persist_booking(booking)
    }

    fn reschedule_booking(&self, id: &str, booking: &NewBooking) -> Result<()> {
        (**self).reschedule_booking(id, booking)
    }

    fn update_status(&self, id: &str, status: AppointmentStatus) -> Result<()> {
        (**self).update_status(id, status)
    }
}

#[derive(Debug, Default)]
struct StoreState {
    schedules: HashMap<String, WeeklySchedule>,
    appointments: Vec<Appointment>,
    next_id: u64,
}

impl StoreState {
    fn schedule(&self, barber_id: &str) -> Result<&WeeklySchedule> {
        self.schedules
            .get(barber_id)
            .ok_or_else(|| ScheduleError::UnknownBarber(barber_id.to_string()))
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.appointments
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| ScheduleError::UnknownBooking(id.to_string()))
    }

    /// Next `apt-N` id not already taken, including by seeded rows.
    fn next_free_id(&mut self) -> BookingId {
        loop {
            self.next_id += 1;
            let id = format!("apt-{}", self.next_id);
            if !self.appointments.iter().any(|a| a.id == id) {
                return id;
            }
        }
    }

    /// Authoritative availability check. Runs under the store lock.
    fn ensure_free(
        &self,
        booking: &NewBooking,
        exclude_id: Option<&str>,
    ) -> Result<CandidateInterval> {
        let schedule = self.schedule(&booking.barber_id)?;
        let candidate = booking.candidate()?;
        let existing = blocking_intervals(&self.appointments, &booking.barber_id, booking.date);

        if !is_available(schedule.for_date(booking.date), &candidate, &existing, exclude_id)? {
            warn!(
                barber_id = %booking.barber_id,
                date = %booking.date,
                start = %candidate.start_time(),
                end = %candidate.end_time(),
                "booking rejected at write time"
            );
            return Err(booking.conflict(&candidate));
        }
        Ok(candidate)
    }
}

/// Process-local store serializing every write behind one mutex.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register or replace a barber's weekly schedule.
    ///
    /// # Errors
    /// Returns `ScheduleError::Input` if any active day is malformed.
    pub fn put_schedule(&self, barber_id: impl Into<String>, schedule: WeeklySchedule) -> Result<()> {
        schedule.validate()?;
        self.lock().schedules.insert(barber_id.into(), schedule);
        Ok(())
    }

    /// Seed an appointment without any availability check, as when loading
    /// historical rows.
    pub fn insert_appointment(&self, appointment: Appointment) {
        self.lock().appointments.push(appointment);
    }

    pub fn appointment(&self, id: &str) -> Option<Appointment> {
        self.lock().appointments.iter().find(|a| a.id == id).cloned()
    }

    /// All appointments for the barber on `date`, any status.
    pub fn appointments_for_day(&self, barber_id: &str, date: NaiveDate) -> Vec<Appointment> {
        self.lock()
            .appointments
            .iter()
            .filter(|a| a.barber_id == barber_id && a.date == date)
            .cloned()
            .collect()
    }
}

impl BookingStore for InMemoryStore {
    fn weekly_schedule(&self, barber_id: &str) -> Result<WeeklySchedule> {
        self.lock().schedule(barber_id).cloned()
    }

    fn bookings_for_day(&self, barber_id: &str, date: NaiveDate) -> Result<Vec<BookingInterval>> {
        let state = self.lock();
        state.schedule(barber_id)?;
        Ok(blocking_intervals(&state.appointments, barber_id, date))
    }

    fn persist_booking(&self, booking: &NewBooking) -> Result<BookingId> {
        let mut state = self.lock();
        let candidate = state.ensure_free(booking, None)?;

        let id = state.next_free_id();
        state.appointments.push(Appointment {
            id: id.clone(),
            barber_id: booking.barber_id.clone(),
            date: booking.date,
            start_time: candidate.start_time(),
            end_time: candidate.end_time(),
            status: AppointmentStatus::Scheduled,
        });

        debug!(id = %id, barber_id = %booking.barber_id, date = %booking.date, slot = %candidate.range(), "booking persisted");
        Ok(id)
    }

    fn reschedule_booking(&self, id: &str, booking: &NewBooking) -> Result<()> {
        let mut state = self.lock();
        let index = state.position(id)?;

        let current = state.appointments[index].status;
        if !current.is_blocking() {
            return Err(ScheduleError::InvalidTransition {
                from: current,
                to: AppointmentStatus::Scheduled,
            });
        }

        let candidate = state.ensure_free(booking, Some(id))?;
        let appointment = &mut state.appointments[index];
        appointment.barber_id = booking.barber_id.clone();
        appointment.date = booking.date;
        appointment.start_time = candidate.start_time();
        appointment.end_time = candidate.end_time();

        debug!(id = %id, barber_id = %booking.barber_id, date = %booking.date, slot = %candidate.range(), "booking rescheduled");
        Ok(())
    }

    fn update_status(&self, id: &str, status: AppointmentStatus) -> Result<()> {
        let mut state = self.lock();
        let index = state.position(id)?;
        let appointment = &mut state.appointments[index];

        if !appointment.status.can_transition_to(status) {
            return Err(ScheduleError::InvalidTransition {
                from: appointment.status,
                to: status,
            });
        }
        appointment.status = status;

        debug!(id = %id, status = %status, "status updated");
        Ok(())
    }
}
