// --- File: crates/salonbook_common/src/models.rs ---

//! Domain records shared by the availability engine, the stores and the HTTP layer.

use crate::time::{format_minutes, ClockTime};
use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("working window for staff {staff_id} must start before it ends ({start}-{end})")]
    EmptyWindow {
        staff_id: String,
        start: ClockTime,
        end: ClockTime,
    },
    #[error("unknown appointment status '{0}'")]
    UnknownStatus(String),
}

/// One contiguous interval in which a staff member can take appointments on a weekday.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingWindow {
    pub staff_id: String,
    pub weekday: Weekday,
    pub start: ClockTime,
    pub end: ClockTime,
}

impl WorkingWindow {
    pub fn new(
        staff_id: impl Into<String>,
        weekday: Weekday,
        start: ClockTime,
        end: ClockTime,
    ) -> Result<Self, ModelError> {
        let staff_id = staff_id.into();
        if start >= end {
            return Err(ModelError::EmptyWindow {
                staff_id,
                start,
                end,
            });
        }
        Ok(Self {
            staff_id,
            weekday,
            start,
            end,
        })
    }

    pub fn start_minute(&self) -> u32 {
        self.start.minutes()
    }

    pub fn end_minute(&self) -> u32 {
        self.end.minutes()
    }
}

/// Time already taken by a non-cancelled appointment.
///
/// `end_minute` may exceed a day's length for appointments running past midnight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusyInterval {
    pub staff_id: String,
    pub date: NaiveDate,
    pub start_minute: u32,
    pub end_minute: u32,
}

impl BusyInterval {
    pub fn from_appointment(
        staff_id: impl Into<String>,
        date: NaiveDate,
        start: ClockTime,
        duration_min: u32,
    ) -> Self {
        Self {
            staff_id: staff_id.into(),
            date,
            start_minute: start.minutes(),
            end_minute: start.minutes().saturating_add(duration_min),
        }
    }

    /// Closed-open overlap test against `[start, end)`.
    pub fn overlaps(&self, start: u32, end: u32) -> bool {
        start < self.end_minute && end > self.start_minute
    }
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotKind {
    /// The gap equals the service duration exactly.
    Perfect,
    /// The gap is larger than the service duration.
    Other,
}

/// A candidate start time for a new appointment.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slot {
    #[cfg_attr(feature = "openapi", schema(example = "10:00"))]
    pub label: String,
    #[cfg_attr(feature = "openapi", schema(example = 600))]
    pub start_minute: u32,
    pub kind: SlotKind,
}

impl Slot {
    pub fn new(start_minute: u32, kind: SlotKind) -> Self {
        Self {
            label: format_minutes(start_minute),
            start_minute,
            kind,
        }
    }
}

/// Perfect and other slots for one staff member and date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotSets {
    pub perfect: Vec<Slot>,
    pub other: Vec<Slot>,
}

impl SlotSets {
    pub fn is_empty(&self) -> bool {
        self.perfect.is_empty() && self.other.is_empty()
    }

    pub fn contains_start(&self, start_minute: u32) -> bool {
        self.perfect
            .iter()
            .chain(self.other.iter())
            .any(|slot| slot.start_minute == start_minute)
    }
}

/// The slot closest to a customer's requested time.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BestMatch {
    #[serde(flatten)]
    pub slot: Slot,
    pub is_perfect_match: bool,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceOffering {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    /// Missing or zero means the service cannot be booked online.
    pub duration_min: Option<u32>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: String,
    pub name: String,
    pub specialty: Option<String>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(AppointmentStatus::Pending),
            "confirmed" => Ok(AppointmentStatus::Confirmed),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            other => Err(ModelError::UnknownStatus(other.to_string())),
        }
    }
}

/// Contact details submitted with a booking.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = Date))]
    pub birthdate: Option<NaiveDate>,
}

/// An appointment about to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAppointment {
    pub service_id: String,
    pub staff_id: String,
    pub customer: CustomerDetails,
    pub date: NaiveDate,
    pub time: ClockTime,
    pub duration_min: u32,
}

impl NewAppointment {
    pub fn start_minute(&self) -> u32 {
        self.time.minutes()
    }

    pub fn end_minute(&self) -> u32 {
        self.time.minutes().saturating_add(self.duration_min)
    }
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Appointment {
    pub id: String,
    pub service_id: String,
    pub staff_id: String,
    pub customer: CustomerDetails,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = Date))]
    pub date: NaiveDate,
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "10:00"))]
    pub time: ClockTime,
    pub duration_min: u32,
    pub status: AppointmentStatus,
}

impl Appointment {
    pub fn busy_interval(&self) -> BusyInterval {
        BusyInterval::from_appointment(&self.staff_id, self.date, self.time, self.duration_min)
    }
}
