//! Repository for the salon catalog and appointments
//!
//! Reads for the availability engine go through the
//! [`AvailabilitySource`](salonbook_common::AvailabilitySource) and
//! [`AppointmentStore`](salonbook_common::AppointmentStore) traits. This
//! trait covers what only the database needs: schema setup, seeding and
//! appointment administration.

use crate::error::DbError;
use salonbook_common::models::{Appointment, AppointmentStatus};
use salonbook_config::CatalogConfig;

pub trait SalonRepository {
    /// Create the catalog and appointment tables if they don't already exist.
    fn init_schema(&self) -> impl std::future::Future<Output = Result<(), DbError>> + Send;

    /// Write the configured services, staff and working hours when the
    /// services table is empty.
    ///
    /// # Returns
    ///
    /// `true` if the catalog was written, `false` if one was already present
    fn seed_catalog(
        &self,
        catalog: &CatalogConfig,
    ) -> impl std::future::Future<Output = Result<bool, DbError>> + Send;

    fn find_appointment(
        &self,
        appointment_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<Appointment>, DbError>> + Send;

    /// Confirm or cancel an appointment. Cancelling frees its time.
    fn set_appointment_status(
        &self,
        appointment_id: &str,
        status: AppointmentStatus,
    ) -> impl std::future::Future<Output = Result<(), DbError>> + Send;
}
