// --- File: crates/salonbook_availability/src/booking.rs ---
//! The multi-step booking flow.
//!
//! A customer picks a service, a staff member (or any), a date and a time,
//! then leaves contact details. [`BookingFlow`] owns the selections made so
//! far in a [`BookingSession`] and turns them into an appointment on
//! [`BookingFlow::submit`]. The session is cleared once the appointment is
//! written; on a lost slot only the time is dropped so the customer can pick
//! another one.

use crate::logic::{
    compute_availability, compute_availability_any, is_bookable_duration, is_slot_free,
    slots_for_staff, AvailabilityError,
};
use chrono::NaiveDate;
use salonbook_common::models::{
    AppointmentStatus, CustomerDetails, NewAppointment, SlotSets, StaffMember,
};
use salonbook_common::services::{AppointmentStore, AvailabilitySource, SourceError};
use salonbook_common::time::{now_in_zone, today_in_zone};
use salonbook_common::{ClockTime, SalonbookError, TimeParseError};
use salonbook_config::{BookingConfig, StraddlePolicy};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Booking is incomplete: {0} missing")]
    Incomplete(&'static str),
    #[error("Invalid booking: {0}")]
    Validation(String),
    #[error("The selected slot is no longer available")]
    SlotUnavailable,
    #[error(transparent)]
    Source(SourceError),
    #[error(transparent)]
    Time(#[from] TimeParseError),
}

impl From<SourceError> for BookingError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::Conflict(_) => BookingError::SlotUnavailable,
            other => BookingError::Source(other),
        }
    }
}

impl From<AvailabilityError> for BookingError {
    fn from(err: AvailabilityError) -> Self {
        match err {
            AvailabilityError::Source(source) => source.into(),
        }
    }
}

impl From<BookingError> for SalonbookError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::Incomplete(_) | BookingError::Validation(_) => {
                SalonbookError::ValidationError(err.to_string())
            }
            BookingError::SlotUnavailable => SalonbookError::ConflictError(err.to_string()),
            BookingError::Source(source) => source.into(),
            BookingError::Time(time) => time.into(),
        }
    }
}

/// Who should perform the service.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StaffChoice {
    /// First staff member free at the selected time.
    #[default]
    Any,
    Specific(String),
}

impl StaffChoice {
    /// Maps the wire form (`None`, `""` or `"any"` for any staff) to a choice.
    pub fn from_param(staff_id: Option<&str>) -> Self {
        match staff_id.map(str::trim) {
            None | Some("") => StaffChoice::Any,
            Some(id) if id.eq_ignore_ascii_case("any") => StaffChoice::Any,
            Some(id) => StaffChoice::Specific(id.to_string()),
        }
    }
}

/// Selections made so far in one booking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingSession {
    pub service_id: Option<String>,
    pub staff: StaffChoice,
    /// `None` means today in the business time zone.
    pub date: Option<NaiveDate>,
    pub time: Option<ClockTime>,
    pub customer: Option<CustomerDetails>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingConfirmation {
    pub appointment_id: String,
    pub customer_name: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = Date))]
    pub date: NaiveDate,
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "10:00"))]
    pub time: ClockTime,
    pub service_name: String,
    pub staff_id: String,
    pub staff_name: String,
    pub status: AppointmentStatus,
}

pub struct BookingFlow {
    session: BookingSession,
    time_zone: String,
    policy: StraddlePolicy,
}

impl BookingFlow {
    pub fn new(time_zone: impl Into<String>, policy: StraddlePolicy) -> Self {
        Self {
            session: BookingSession::default(),
            time_zone: time_zone.into(),
            policy,
        }
    }

    pub fn from_config(config: &BookingConfig) -> Self {
        Self::new(config.time_zone.clone(), config.straddle_policy)
    }

    pub fn session(&self) -> &BookingSession {
        &self.session
    }

    // Slots depend on service, staff and date, so changing any of them drops the time.
    pub fn select_service(&mut self, service_id: impl Into<String>) {
        self.session.service_id = Some(service_id.into());
        self.session.time = None;
    }

    pub fn select_staff(&mut self, staff: StaffChoice) {
        self.session.staff = staff;
        self.session.time = None;
    }

    pub fn select_date(&mut self, date: NaiveDate) {
        self.session.date = Some(date);
        self.session.time = None;
    }

    pub fn select_time(&mut self, time: ClockTime) {
        self.session.time = Some(time);
    }

    pub fn set_customer(&mut self, customer: CustomerDetails) {
        self.session.customer = Some(customer);
    }

    pub fn clear(&mut self) {
        self.session = BookingSession::default();
    }

    /// The selected date, or today in the business time zone.
    pub fn selected_date(&self) -> Result<NaiveDate, BookingError> {
        match self.session.date {
            Some(date) => Ok(date),
            None => Ok(today_in_zone(&self.time_zone)?),
        }
    }

    /// Slots offered for the current service, staff and date selections.
    pub async fn available_slots(
        &self,
        source: &dyn AvailabilitySource,
    ) -> Result<SlotSets, BookingError> {
        let service_id = self
            .session
            .service_id
            .as_deref()
            .ok_or(BookingError::Incomplete("service"))?;
        let date = self.selected_date()?;
        let slots = match &self.session.staff {
            StaffChoice::Specific(staff_id) => {
                compute_availability(source, staff_id, date, service_id, self.policy).await?
            }
            StaffChoice::Any => compute_availability_any(source, date, service_id, self.policy).await?,
        };
        Ok(slots)
    }

    /// Validates the session, re-checks the slot and writes the appointment.
    pub async fn submit(
        &mut self,
        source: &dyn AvailabilitySource,
        store: &dyn AppointmentStore,
    ) -> Result<BookingConfirmation, BookingError> {
        let service_id = self
            .session
            .service_id
            .clone()
            .ok_or(BookingError::Incomplete("service"))?;
        let time = self.session.time.ok_or(BookingError::Incomplete("time"))?;
        let customer = self
            .session
            .customer
            .clone()
            .ok_or(BookingError::Incomplete("customer details"))?;
        if customer.name.trim().is_empty() {
            return Err(BookingError::Incomplete("customer name"));
        }
        if customer.phone.trim().is_empty() {
            return Err(BookingError::Incomplete("customer phone"));
        }

        let (today, now) = now_in_zone(&self.time_zone)?;
        let date = self.session.date.unwrap_or(today);
        if date < today || (date == today && time <= now) {
            return Err(BookingError::Validation(format!("{} {} is in the past", date, time)));
        }

        let service = source.get_service(&service_id).await?;
        let duration = match service.duration_min {
            Some(minutes) if is_bookable_duration(minutes) => minutes,
            _ => {
                return Err(BookingError::Validation(format!(
                    "service '{}' cannot be booked online",
                    service.name
                )))
            }
        };

        let staff = match self.session.staff.clone() {
            StaffChoice::Specific(staff_id) => {
                let staff = source.get_staff(&staff_id).await?;
                let offered =
                    slots_for_staff(source, &staff_id, date, duration, self.policy).await?;
                if !offered.contains_start(time.minutes()) {
                    return Err(self.slot_lost(&staff_id, date, time));
                }
                let busy = source.get_busy_intervals(&staff_id, date).await?;
                if !is_slot_free(&busy, time.minutes(), duration) {
                    return Err(self.slot_lost(&staff_id, date, time));
                }
                staff
            }
            StaffChoice::Any => {
                let free = self.first_free_staff(source, date, time, duration).await?;
                match free {
                    Some(staff) => staff,
                    None => return Err(self.slot_lost("any", date, time)),
                }
            }
        };

        let appointment = NewAppointment {
            service_id: service.id.clone(),
            staff_id: staff.id.clone(),
            customer,
            date,
            time,
            duration_min: duration,
        };
        let appointment = match store.insert_appointment(appointment).await {
            Ok(appointment) => appointment,
            Err(SourceError::Conflict(_)) => return Err(self.slot_lost(&staff.id, date, time)),
            Err(e) => return Err(e.into()),
        };

        info!(
            appointment_id = %appointment.id,
            staff_id = %staff.id,
            %date,
            %time,
            "Appointment booked"
        );

        let confirmation = BookingConfirmation {
            appointment_id: appointment.id,
            customer_name: appointment.customer.name,
            date: appointment.date,
            time: appointment.time,
            service_name: service.name,
            staff_id: staff.id,
            staff_name: staff.name,
            status: appointment.status,
        };
        self.clear();
        Ok(confirmation)
    }

    fn slot_lost(&mut self, staff_id: &str, date: NaiveDate, time: ClockTime) -> BookingError {
        warn!(staff_id, %date, %time, "Selected slot is no longer available");
        self.session.time = None;
        BookingError::SlotUnavailable
    }

    /// First staff member, in catalog order, offering `time` on `date`.
    async fn first_free_staff(
        &self,
        source: &dyn AvailabilitySource,
        date: NaiveDate,
        time: ClockTime,
        duration: u32,
    ) -> Result<Option<StaffMember>, BookingError> {
        for member in source.list_staff().await? {
            let slots = slots_for_staff(source, &member.id, date, duration, self.policy).await?;
            if slots.contains_start(time.minutes()) {
                return Ok(Some(member));
            }
        }
        Ok(None)
    }
}
