// --- File: crates/salonbook_availability/src/service.rs ---
//! In-memory implementation of the data-access traits.
//!
//! Used when no database is configured and as the store behind most tests.

use chrono::{NaiveDate, Weekday};
use salonbook_common::catalog::{working_windows, CatalogError};
use salonbook_common::models::{
    Appointment, AppointmentStatus, BusyInterval, NewAppointment, ServiceOffering, StaffMember,
    WorkingWindow,
};
use salonbook_common::services::{AppointmentStore, AvailabilitySource, BoxFuture, SourceError};
use salonbook_config::CatalogConfig;
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::{debug, info};

#[derive(Default)]
struct Catalog {
    services: Vec<ServiceOffering>,
    staff: Vec<StaffMember>,
    hours: HashMap<String, Vec<WorkingWindow>>,
}

/// Catalog and appointments kept in process memory.
#[derive(Default)]
pub struct InMemorySalonStore {
    catalog: RwLock<Catalog>,
    appointments: RwLock<Vec<Appointment>>,
}

fn poisoned<T>(_: T) -> SourceError {
    SourceError::Fetch("in-memory store lock poisoned".to_string())
}

impl InMemorySalonStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store holding the configured services, staff and working hours.
    pub fn from_catalog(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let mut catalog = Catalog {
            services: config.services.iter().map(ServiceOffering::from).collect(),
            staff: config.staff.iter().map(StaffMember::from).collect(),
            hours: HashMap::new(),
        };
        for seed in &config.staff {
            catalog.hours.insert(seed.id.clone(), working_windows(seed)?);
        }
        info!(
            services = catalog.services.len(),
            staff = catalog.staff.len(),
            "In-memory catalog loaded"
        );
        Ok(Self {
            catalog: RwLock::new(catalog),
            appointments: RwLock::new(Vec::new()),
        })
    }

    pub fn add_service(&self, service: ServiceOffering) -> Result<(), SourceError> {
        self.catalog.write().map_err(poisoned)?.services.push(service);
        Ok(())
    }

    pub fn add_staff(&self, staff: StaffMember) -> Result<(), SourceError> {
        self.catalog.write().map_err(poisoned)?.staff.push(staff);
        Ok(())
    }

    pub fn add_working_window(&self, window: WorkingWindow) -> Result<(), SourceError> {
        self.catalog
            .write()
            .map_err(poisoned)?
            .hours
            .entry(window.staff_id.clone())
            .or_default()
            .push(window);
        Ok(())
    }

    /// Snapshot of all stored appointments, cancelled ones included.
    pub fn appointments(&self) -> Result<Vec<Appointment>, SourceError> {
        Ok(self.appointments.read().map_err(poisoned)?.clone())
    }

    pub fn set_appointment_status(
        &self,
        appointment_id: &str,
        status: AppointmentStatus,
    ) -> Result<(), SourceError> {
        let mut appointments = self.appointments.write().map_err(poisoned)?;
        let appointment = appointments
            .iter_mut()
            .find(|appointment| appointment.id == appointment_id)
            .ok_or_else(|| SourceError::NotFound(format!("appointment '{}'", appointment_id)))?;
        appointment.status = status;
        Ok(())
    }

    fn busy_intervals(
        appointments: &[Appointment],
        staff_id: &str,
        date: NaiveDate,
    ) -> Vec<BusyInterval> {
        appointments
            .iter()
            .filter(|appointment| {
                appointment.staff_id == staff_id
                    && appointment.date == date
                    && appointment.status != AppointmentStatus::Cancelled
            })
            .map(Appointment::busy_interval)
            .collect()
    }
}

impl AvailabilitySource for InMemorySalonStore {
    fn get_working_windows(
        &self,
        staff_id: &str,
        weekday: Weekday,
    ) -> BoxFuture<'_, Vec<WorkingWindow>, SourceError> {
        let staff_id = staff_id.to_string();
        Box::pin(async move {
            let catalog = self.catalog.read().map_err(poisoned)?;
            Ok(catalog
                .hours
                .get(&staff_id)
                .map(|windows| {
                    windows
                        .iter()
                        .filter(|window| window.weekday == weekday)
                        .cloned()
                        .collect()
                })
                .unwrap_or_default())
        })
    }

    fn get_busy_intervals(
        &self,
        staff_id: &str,
        date: NaiveDate,
    ) -> BoxFuture<'_, Vec<BusyInterval>, SourceError> {
        let staff_id = staff_id.to_string();
        Box::pin(async move {
            let appointments = self.appointments.read().map_err(poisoned)?;
            Ok(Self::busy_intervals(&appointments, &staff_id, date))
        })
    }

    fn get_service(&self, service_id: &str) -> BoxFuture<'_, ServiceOffering, SourceError> {
        let service_id = service_id.to_string();
        Box::pin(async move {
            let catalog = self.catalog.read().map_err(poisoned)?;
            catalog
                .services
                .iter()
                .find(|service| service.id == service_id)
                .cloned()
                .ok_or_else(|| SourceError::NotFound(format!("service '{}'", service_id)))
        })
    }

    fn get_staff(&self, staff_id: &str) -> BoxFuture<'_, StaffMember, SourceError> {
        let staff_id = staff_id.to_string();
        Box::pin(async move {
            let catalog = self.catalog.read().map_err(poisoned)?;
            catalog
                .staff
                .iter()
                .find(|member| member.id == staff_id)
                .cloned()
                .ok_or_else(|| SourceError::NotFound(format!("staff member '{}'", staff_id)))
        })
    }

    fn list_services(&self) -> BoxFuture<'_, Vec<ServiceOffering>, SourceError> {
        Box::pin(async move { Ok(self.catalog.read().map_err(poisoned)?.services.clone()) })
    }

    fn list_staff(&self) -> BoxFuture<'_, Vec<StaffMember>, SourceError> {
        Box::pin(async move { Ok(self.catalog.read().map_err(poisoned)?.staff.clone()) })
    }
}

impl AppointmentStore for InMemorySalonStore {
    fn insert_appointment(
        &self,
        appointment: NewAppointment,
    ) -> BoxFuture<'_, Appointment, SourceError> {
        Box::pin(async move {
            // Check and insert under one write lock.
            let mut appointments = self.appointments.write().map_err(poisoned)?;
            let busy = Self::busy_intervals(&appointments, &appointment.staff_id, appointment.date);
            let (start, end) = (appointment.start_minute(), appointment.end_minute());
            if busy.iter().any(|interval| interval.overlaps(start, end)) {
                debug!(
                    staff_id = %appointment.staff_id,
                    date = %appointment.date,
                    time = %appointment.time,
                    "Overlapping appointment, insert rejected"
                );
                return Err(SourceError::Conflict(format!(
                    "{} at {} on {} overlaps an existing appointment",
                    appointment.staff_id, appointment.time, appointment.date
                )));
            }

            let stored = Appointment {
                id: uuid::Uuid::new_v4().to_string(),
                service_id: appointment.service_id,
                staff_id: appointment.staff_id,
                customer: appointment.customer,
                date: appointment.date,
                time: appointment.time,
                duration_min: appointment.duration_min,
                status: AppointmentStatus::Pending,
            };
            appointments.push(stored.clone());
            Ok(stored)
        })
    }
}
