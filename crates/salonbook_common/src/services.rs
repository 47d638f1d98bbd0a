// --- File: crates/salonbook_common/src/services.rs ---
//! Data-access abstractions consumed by the availability engine.
//!
//! The engine never talks to a database directly. It is handed an
//! [`AvailabilitySource`] for reads and an [`AppointmentStore`] for the single
//! write it performs, so the same logic runs against SQL, the in-memory store
//! or a test double.

use crate::models::{
    Appointment, BusyInterval, NewAppointment, ServiceOffering, StaffMember, WorkingWindow,
};
use chrono::{NaiveDate, Weekday};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Errors reported by a data source.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The requested record does not exist.
    #[error("not found: {0}")]
    NotFound(String),
    /// A conditional write found an overlapping appointment.
    #[error("conflict: {0}")]
    Conflict(String),
    /// The backend could not be reached or the query failed.
    #[error("fetch failed: {0}")]
    Fetch(String),
    /// A stored record could not be turned into a domain value.
    #[error("invalid data: {0}")]
    InvalidData(String),
}

/// Read access to working hours, bookings and the catalog.
pub trait AvailabilitySource: Send + Sync {
    /// Working windows of a staff member for a weekday. Empty when the staff
    /// member does not work that day.
    fn get_working_windows(
        &self,
        staff_id: &str,
        weekday: Weekday,
    ) -> BoxFuture<'_, Vec<WorkingWindow>, SourceError>;

    /// Busy intervals of non-cancelled appointments, in no particular order.
    fn get_busy_intervals(
        &self,
        staff_id: &str,
        date: NaiveDate,
    ) -> BoxFuture<'_, Vec<BusyInterval>, SourceError>;

    /// Fails with [`SourceError::NotFound`] for unknown services.
    fn get_service(&self, service_id: &str) -> BoxFuture<'_, ServiceOffering, SourceError>;

    /// Fails with [`SourceError::NotFound`] for unknown staff members.
    fn get_staff(&self, staff_id: &str) -> BoxFuture<'_, StaffMember, SourceError>;

    fn list_services(&self) -> BoxFuture<'_, Vec<ServiceOffering>, SourceError>;

    fn list_staff(&self) -> BoxFuture<'_, Vec<StaffMember>, SourceError>;

    /// Duration of a service in minutes; `None` when the catalog has none.
    fn get_service_duration(&self, service_id: &str) -> BoxFuture<'_, Option<u32>, SourceError> {
        let service_id = service_id.to_string();
        Box::pin(async move { Ok(self.get_service(&service_id).await?.duration_min) })
    }
}

/// Write access for new appointments.
pub trait AppointmentStore: Send + Sync {
    /// Inserts the appointment unless a non-cancelled appointment of the same
    /// staff member on the same date overlaps it, in which case
    /// [`SourceError::Conflict`] is returned and nothing is written.
    fn insert_appointment(
        &self,
        appointment: NewAppointment,
    ) -> BoxFuture<'_, Appointment, SourceError>;
}
