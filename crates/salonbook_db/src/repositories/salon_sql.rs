//! SQL implementation of the salon repository
//!
//! Dates are stored as `YYYY-MM-DD` text and times of day as `HH:MM` text so
//! the same schema works through the `Any` driver on every backend. Optional
//! text columns hold `''` for "absent" and a duration of `0` means the
//! service cannot be booked online.

use crate::error::DbError;
use crate::repositories::salon::SalonRepository;
use crate::DbClient;
use chrono::{NaiveDate, Weekday};
use salonbook_common::catalog::working_windows;
use salonbook_common::models::{
    Appointment, AppointmentStatus, BusyInterval, CustomerDetails, NewAppointment,
    ServiceOffering, StaffMember, WorkingWindow,
};
use salonbook_common::services::{AppointmentStore, AvailabilitySource, BoxFuture, SourceError};
use salonbook_common::time::{parse_date, parse_weekday, weekday_name, ClockTime};
use salonbook_config::CatalogConfig;
use sqlx::any::AnyRow;
use sqlx::Row;
use tracing::{debug, error, info, warn};

const SCHEMA: [&str; 5] = [
    r#"
        CREATE TABLE IF NOT EXISTS services (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            price_cents BIGINT NOT NULL DEFAULT 0,
            duration_min BIGINT NOT NULL DEFAULT 0,
            position BIGINT NOT NULL DEFAULT 0
        )
    "#,
    r#"
        CREATE TABLE IF NOT EXISTS staff (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            specialty TEXT NOT NULL DEFAULT '',
            position BIGINT NOT NULL DEFAULT 0
        )
    "#,
    r#"
        CREATE TABLE IF NOT EXISTS working_hours (
            staff_id TEXT NOT NULL,
            weekday TEXT NOT NULL,
            start_time TEXT NOT NULL,
            end_time TEXT NOT NULL
        )
    "#,
    r#"
        CREATE TABLE IF NOT EXISTS appointments (
            id TEXT PRIMARY KEY,
            service_id TEXT NOT NULL,
            staff_id TEXT NOT NULL,
            customer_name TEXT NOT NULL,
            customer_phone TEXT NOT NULL,
            customer_email TEXT NOT NULL DEFAULT '',
            customer_birthdate TEXT NOT NULL DEFAULT '',
            date TEXT NOT NULL,
            time TEXT NOT NULL,
            duration_min BIGINT NOT NULL,
            status TEXT NOT NULL,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )
    "#,
    // Two live appointments may never share a start.
    r#"
        CREATE UNIQUE INDEX IF NOT EXISTS appointments_live_start
        ON appointments (staff_id, date, time)
        WHERE status <> 'cancelled'
    "#,
];

const SELECT_SERVICE: &str =
    "SELECT id, name, description, price_cents, duration_min FROM services";
const SELECT_STAFF: &str = "SELECT id, name, specialty FROM staff";
const SELECT_APPOINTMENT: &str = r#"
    SELECT id, service_id, staff_id, customer_name, customer_phone, customer_email,
           customer_birthdate, date, time, duration_min, status
    FROM appointments
"#;
const SELECT_BUSY: &str = r#"
    SELECT time, duration_min FROM appointments
    WHERE staff_id = $1 AND date = $2 AND status <> 'cancelled'
"#;

/// SQL implementation of the salon repository
#[derive(Debug, Clone)]
pub struct SqlSalonRepository {
    db_client: DbClient,
}

fn text_or_none(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn date_text(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn clock_time(table: &'static str, raw: &str) -> Result<ClockTime, DbError> {
    raw.parse::<ClockTime>()
        .map_err(|e| DbError::invalid_row(table, e))
}

fn minutes(table: &'static str, raw: i64) -> Result<u32, DbError> {
    u32::try_from(raw).map_err(|_| DbError::invalid_row(table, format!("duration {}", raw)))
}

fn service_from_row(row: &AnyRow) -> Result<ServiceOffering, DbError> {
    let duration: i64 = row.try_get("duration_min")?;
    Ok(ServiceOffering {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: text_or_none(row.try_get("description")?),
        price_cents: row.try_get("price_cents")?,
        duration_min: Some(minutes("services", duration)?).filter(|minutes| *minutes > 0),
    })
}

fn staff_from_row(row: &AnyRow) -> Result<StaffMember, DbError> {
    Ok(StaffMember {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        specialty: text_or_none(row.try_get("specialty")?),
    })
}

fn appointment_from_row(row: &AnyRow) -> Result<Appointment, DbError> {
    const TABLE: &str = "appointments";
    let birthdate = text_or_none(row.try_get("customer_birthdate")?)
        .map(|raw| parse_date(&raw))
        .transpose()
        .map_err(|e| DbError::invalid_row(TABLE, e))?;
    let date: String = row.try_get("date")?;
    let time: String = row.try_get("time")?;
    let status: String = row.try_get("status")?;
    Ok(Appointment {
        id: row.try_get("id")?,
        service_id: row.try_get("service_id")?,
        staff_id: row.try_get("staff_id")?,
        customer: CustomerDetails {
            name: row.try_get("customer_name")?,
            phone: row.try_get("customer_phone")?,
            email: text_or_none(row.try_get("customer_email")?),
            birthdate,
        },
        date: parse_date(&date).map_err(|e| DbError::invalid_row(TABLE, e))?,
        time: clock_time(TABLE, &time)?,
        duration_min: minutes(TABLE, row.try_get("duration_min")?)?,
        status: status
            .parse::<AppointmentStatus>()
            .map_err(|e| DbError::invalid_row(TABLE, e))?,
    })
}

fn busy_from_rows(
    rows: &[AnyRow],
    staff_id: &str,
    date: NaiveDate,
) -> Result<Vec<BusyInterval>, DbError> {
    rows.iter()
        .map(|row| {
            let time: String = row.try_get("time")?;
            let duration = minutes("appointments", row.try_get("duration_min")?)?;
            Ok(BusyInterval::from_appointment(
                staff_id,
                date,
                clock_time("appointments", &time)?,
                duration,
            ))
        })
        .collect()
}

fn query_error(context: &str, e: sqlx::Error) -> DbError {
    error!("Failed to {}: {}", context, e);
    DbError::QueryError(e.to_string())
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

impl SqlSalonRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }

    pub async fn is_healthy(&self) -> bool {
        self.db_client.is_healthy().await
    }

    async fn find_working_windows(
        &self,
        staff_id: &str,
        weekday: Weekday,
    ) -> Result<Vec<WorkingWindow>, DbError> {
        let rows = sqlx::query(
            r#"
                SELECT weekday, start_time, end_time FROM working_hours
                WHERE staff_id = $1 AND weekday = $2
                ORDER BY start_time
            "#,
        )
        .bind(staff_id)
        .bind(weekday_name(weekday))
        .fetch_all(self.db_client.pool())
        .await
        .map_err(|e| query_error("load working hours", e))?;

        const TABLE: &str = "working_hours";
        rows.iter()
            .map(|row| {
                let weekday: String = row.try_get("weekday")?;
                let start: String = row.try_get("start_time")?;
                let end: String = row.try_get("end_time")?;
                WorkingWindow::new(
                    staff_id,
                    parse_weekday(&weekday).map_err(|e| DbError::invalid_row(TABLE, e))?,
                    clock_time(TABLE, &start)?,
                    clock_time(TABLE, &end)?,
                )
                .map_err(|e| DbError::invalid_row(TABLE, e))
            })
            .collect()
    }

    async fn find_busy_intervals(
        &self,
        staff_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<BusyInterval>, DbError> {
        let rows = sqlx::query(SELECT_BUSY)
            .bind(staff_id)
            .bind(date_text(date))
            .fetch_all(self.db_client.pool())
            .await
            .map_err(|e| query_error("load appointments", e))?;
        busy_from_rows(&rows, staff_id, date)
    }

    async fn find_service(&self, service_id: &str) -> Result<ServiceOffering, DbError> {
        let row = sqlx::query(&format!("{} WHERE id = $1", SELECT_SERVICE))
            .bind(service_id)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| query_error("find service", e))?
            .ok_or_else(|| DbError::NotFound(format!("service '{}'", service_id)))?;
        service_from_row(&row)
    }

    async fn find_staff(&self, staff_id: &str) -> Result<StaffMember, DbError> {
        let row = sqlx::query(&format!("{} WHERE id = $1", SELECT_STAFF))
            .bind(staff_id)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| query_error("find staff member", e))?
            .ok_or_else(|| DbError::NotFound(format!("staff member '{}'", staff_id)))?;
        staff_from_row(&row)
    }

    async fn find_all_services(&self) -> Result<Vec<ServiceOffering>, DbError> {
        let rows = sqlx::query(&format!("{} ORDER BY position, id", SELECT_SERVICE))
            .fetch_all(self.db_client.pool())
            .await
            .map_err(|e| query_error("list services", e))?;
        rows.iter().map(service_from_row).collect()
    }

    async fn find_all_staff(&self) -> Result<Vec<StaffMember>, DbError> {
        let rows = sqlx::query(&format!("{} ORDER BY position, id", SELECT_STAFF))
            .fetch_all(self.db_client.pool())
            .await
            .map_err(|e| query_error("list staff", e))?;
        rows.iter().map(staff_from_row).collect()
    }

    /// Re-checks overlap and inserts inside one transaction. The partial
    /// unique index rejects a concurrent insert at the same start.
    async fn create_appointment(&self, appointment: NewAppointment) -> Result<Appointment, DbError> {
        let date = date_text(appointment.date);
        let time = appointment.time.to_string();
        let mut tx = self.db_client.begin().await?;

        let rows = sqlx::query(SELECT_BUSY)
            .bind(appointment.staff_id.as_str())
            .bind(date.as_str())
            .fetch_all(&mut *tx)
            .await
            .map_err(|e| query_error("load appointments", e))?;
        let busy = busy_from_rows(&rows, &appointment.staff_id, appointment.date)?;
        let (start, end) = (appointment.start_minute(), appointment.end_minute());
        if busy.iter().any(|interval| interval.overlaps(start, end)) {
            debug!(
                staff_id = %appointment.staff_id,
                %date,
                %time,
                "Overlapping appointment, insert rejected"
            );
            return Err(DbError::Conflict(format!(
                "{} at {} on {} overlaps an existing appointment",
                appointment.staff_id, time, date
            )));
        }

        let id = uuid::Uuid::new_v4().to_string();
        let status = AppointmentStatus::Pending;
        sqlx::query(
            r#"
                INSERT INTO appointments (
                    id, service_id, staff_id, customer_name, customer_phone, customer_email,
                    customer_birthdate, date, time, duration_min, status
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(id.as_str())
        .bind(appointment.service_id.as_str())
        .bind(appointment.staff_id.as_str())
        .bind(appointment.customer.name.as_str())
        .bind(appointment.customer.phone.as_str())
        .bind(appointment.customer.email.clone().unwrap_or_default())
        .bind(appointment.customer.birthdate.map(date_text).unwrap_or_default())
        .bind(date.as_str())
        .bind(time.as_str())
        .bind(i64::from(appointment.duration_min))
        .bind(status.as_str())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                warn!(staff_id = %appointment.staff_id, %date, %time, "Concurrent booking won the slot");
                DbError::Conflict(format!("{} at {} on {} is taken", appointment.staff_id, time, date))
            } else {
                query_error("insert appointment", e)
            }
        })?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionError(e.to_string()))?;

        info!(appointment_id = %id, staff_id = %appointment.staff_id, %date, %time, "Appointment stored");
        Ok(Appointment {
            id,
            service_id: appointment.service_id,
            staff_id: appointment.staff_id,
            customer: appointment.customer,
            date: appointment.date,
            time: appointment.time,
            duration_min: appointment.duration_min,
            status,
        })
    }
}

impl SalonRepository for SqlSalonRepository {
    async fn init_schema(&self) -> Result<(), DbError> {
        debug!("Initializing salon schema");
        for statement in SCHEMA {
            self.db_client.execute(statement).await?;
        }
        info!("Salon schema initialized successfully");
        Ok(())
    }

    async fn seed_catalog(&self, catalog: &CatalogConfig) -> Result<bool, DbError> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM services")
            .fetch_one(self.db_client.pool())
            .await
            .map_err(|e| query_error("count services", e))?;
        let existing: i64 = row.try_get("total")?;
        if existing > 0 {
            debug!(existing, "Catalog already present, skipping seed");
            return Ok(false);
        }

        // Validate every staff member's hours before anything is written.
        let mut hours = Vec::with_capacity(catalog.staff.len());
        for seed in &catalog.staff {
            hours.push(working_windows(seed).map_err(|e| DbError::ConfigError(e.to_string()))?);
        }

        let mut tx = self.db_client.begin().await?;
        for (position, service) in catalog.services.iter().enumerate() {
            sqlx::query(
                r#"
                    INSERT INTO services (id, name, description, price_cents, duration_min, position)
                    VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(service.id.as_str())
            .bind(service.name.as_str())
            .bind(service.description.clone().unwrap_or_default())
            .bind(service.price_cents)
            .bind(i64::from(service.duration_min.unwrap_or(0)))
            .bind(position as i64)
            .execute(&mut *tx)
            .await
            .map_err(|e| query_error("seed service", e))?;
        }
        for (position, (member, windows)) in catalog.staff.iter().zip(&hours).enumerate() {
            sqlx::query(
                "INSERT INTO staff (id, name, specialty, position) VALUES ($1, $2, $3, $4)",
            )
            .bind(member.id.as_str())
            .bind(member.name.as_str())
            .bind(member.specialty.clone().unwrap_or_default())
            .bind(position as i64)
            .execute(&mut *tx)
            .await
            .map_err(|e| query_error("seed staff member", e))?;

            for window in windows {
                sqlx::query(
                    r#"
                        INSERT INTO working_hours (staff_id, weekday, start_time, end_time)
                        VALUES ($1, $2, $3, $4)
                    "#,
                )
                .bind(window.staff_id.as_str())
                .bind(weekday_name(window.weekday))
                .bind(window.start.to_string())
                .bind(window.end.to_string())
                .execute(&mut *tx)
                .await
                .map_err(|e| query_error("seed working hours", e))?;
            }
        }
        tx.commit()
            .await
            .map_err(|e| DbError::TransactionError(e.to_string()))?;

        info!(
            services = catalog.services.len(),
            staff = catalog.staff.len(),
            "Catalog seeded"
        );
        Ok(true)
    }

    async fn find_appointment(&self, appointment_id: &str) -> Result<Option<Appointment>, DbError> {
        let row = sqlx::query(&format!("{} WHERE id = $1", SELECT_APPOINTMENT))
            .bind(appointment_id)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| query_error("find appointment", e))?;
        row.as_ref().map(appointment_from_row).transpose()
    }

    async fn set_appointment_status(
        &self,
        appointment_id: &str,
        status: AppointmentStatus,
    ) -> Result<(), DbError> {
        let result = sqlx::query("UPDATE appointments SET status = $1 WHERE id = $2")
            .bind(status.as_str())
            .bind(appointment_id)
            .execute(self.db_client.pool())
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DbError::Conflict(format!(
                        "appointment '{}' overlaps a live appointment",
                        appointment_id
                    ))
                } else {
                    query_error("update appointment status", e)
                }
            })?;
        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(format!("appointment '{}'", appointment_id)));
        }
        info!(appointment_id, %status, "Appointment status updated");
        Ok(())
    }
}

impl AvailabilitySource for SqlSalonRepository {
    fn get_working_windows(
        &self,
        staff_id: &str,
        weekday: Weekday,
    ) -> BoxFuture<'_, Vec<WorkingWindow>, SourceError> {
        let staff_id = staff_id.to_string();
        Box::pin(async move { Ok(self.find_working_windows(&staff_id, weekday).await?) })
    }

    fn get_busy_intervals(
        &self,
        staff_id: &str,
        date: NaiveDate,
    ) -> BoxFuture<'_, Vec<BusyInterval>, SourceError> {
        let staff_id = staff_id.to_string();
        Box::pin(async move { Ok(self.find_busy_intervals(&staff_id, date).await?) })
    }

    fn get_service(&self, service_id: &str) -> BoxFuture<'_, ServiceOffering, SourceError> {
        let service_id = service_id.to_string();
        Box::pin(async move { Ok(self.find_service(&service_id).await?) })
    }

    fn get_staff(&self, staff_id: &str) -> BoxFuture<'_, StaffMember, SourceError> {
        let staff_id = staff_id.to_string();
        Box::pin(async move { Ok(self.find_staff(&staff_id).await?) })
    }

    fn list_services(&self) -> BoxFuture<'_, Vec<ServiceOffering>, SourceError> {
        Box::pin(async move { Ok(self.find_all_services().await?) })
    }

    fn list_staff(&self) -> BoxFuture<'_, Vec<StaffMember>, SourceError> {
        Box::pin(async move { Ok(self.find_all_staff().await?) })
    }
}

impl AppointmentStore for SqlSalonRepository {
    fn insert_appointment(
        &self,
        appointment: NewAppointment,
    ) -> BoxFuture<'_, Appointment, SourceError> {
        Box::pin(async move { Ok(self.create_appointment(appointment).await?) })
    }
}
