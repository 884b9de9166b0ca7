//! Booking orchestration over a [`BookingStore`].
//!
//! Each call fetches the schedule and the day's bookings, runs the pure engine,
//! and only then writes. The engine check here is advisory; the store's write
//! is what actually guarantees no double booking. Nothing is retried.

use chrono::NaiveDate;
use tracing::debug;

use crate::availability::{AvailableSlots, DEFAULT_SLOT_GRANULARITY_MINUTES};
use crate::conflict::is_available;
use crate::error::Result;
use crate::store::{BookingId, BookingStore, NewBooking};

pub struct BookingService<S> {
    store: S,
    slot_granularity_minutes: u32,
}

impl<S: BookingStore> BookingService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            slot_granularity_minutes: DEFAULT_SLOT_GRANULARITY_MINUTES,
        }
    }

    pub fn with_granularity(mut self, minutes: u32) -> Self {
        self.slot_granularity_minutes = minutes;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn available_slots(
        &self,
        barber_id: &str,
        date: NaiveDate,
        service_duration_minutes: u32,
    ) -> Result<AvailableSlots> {
        let schedule = self.store.weekly_schedule(barber_id)?;
        let existing = self.store.bookings_for_day(barber_id, date)?;
        AvailableSlots::for_date(
            &schedule,
            date,
            &existing,
            service_duration_minutes,
            self.slot_granularity_minutes,
        )
    }

    /// Book a new appointment.
    ///
    /// # Errors
    /// `ScheduleError::BookingConflict` when the pre-check or the store's own
    /// guard finds the slot taken; `ScheduleError::Input` for a malformed request.
    pub fn book(&self, request: &NewBooking) -> Result<BookingId> {
        self.precheck(request, None)?;
        self.store.persist_booking(request)
    }

    /// Move booking `id` to the slot described by `request`. The booking's own
    /// current interval never counts as a conflict.
    pub fn reschedule(&self, id: &str, request: &NewBooking) -> Result<()> {
        self.precheck(request, Some(id))?;
        self.store.reschedule_booking(id, request)
    }

    fn precheck(&self, request: &NewBooking, exclude_id: Option<&str>) -> Result<()> {
        let candidate = request.candidate()?;
        let schedule = self.store.weekly_schedule(&request.barber_id)?;
        let existing = self.store.bookings_for_day(&request.barber_id, request.date)?;

        if is_available(schedule.for_date(request.date), &candidate, &existing, exclude_id)? {
            Ok(())
        } else {
            debug!(
                barber_id = %request.barber_id,
                date = %request.date,
                slot = %candidate.range(),
                "slot unavailable at pre-check"
            );
            Err(request.conflict(&candidate))
        }
    }
}
