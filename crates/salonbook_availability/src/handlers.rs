// File: crates/salonbook_availability/src/handlers.rs
use crate::booking::{BookingConfirmation, BookingFlow, StaffChoice};
use crate::logic::{
    compute_availability, compute_availability_any, compute_best_match, AvailabilityQuery,
    AvailabilityResponse, BookingRequest, HealthResponse,
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use salonbook_common::models::{ServiceOffering, StaffMember};
use salonbook_common::services::{AppointmentStore, AvailabilitySource};
use salonbook_common::time::parse_date;
use salonbook_common::{ClockTime, SalonbookError};
use salonbook_config::AppConfig;
use std::sync::Arc;
use tracing::info;

// Shared state needed by the booking handlers
#[derive(Clone)]
pub struct BookingState {
    pub config: Arc<AppConfig>,
    pub source: Arc<dyn AvailabilitySource>,
    pub store: Arc<dyn AppointmentStore>,
}

impl BookingState {
    /// State backed by one store serving both reads and writes.
    pub fn with_store<S>(config: Arc<AppConfig>, store: Arc<S>) -> Self
    where
        S: AvailabilitySource + AppointmentStore + 'static,
    {
        Self {
            config,
            source: store.clone(),
            store,
        }
    }
}

/// Handler listing the bookable services.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/services",
    responses(
        (status = 200, description = "Services offered by the salon", body = [ServiceOffering]),
        (status = 503, description = "Catalog could not be read")
    ),
    tag = "Booking"
))]
pub async fn list_services_handler(
    State(state): State<Arc<BookingState>>,
) -> Result<Json<Vec<ServiceOffering>>, SalonbookError> {
    Ok(Json(state.source.list_services().await?))
}

/// Handler listing the staff members customers can choose from.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/staff",
    responses(
        (status = 200, description = "Staff members", body = [StaffMember]),
        (status = 503, description = "Catalog could not be read")
    ),
    tag = "Booking"
))]
pub async fn list_staff_handler(
    State(state): State<Arc<BookingState>>,
) -> Result<Json<Vec<StaffMember>>, SalonbookError> {
    Ok(Json(state.source.list_staff().await?))
}

/// Handler to get the perfect and other slots for a date.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/availability",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Available start times and the best match", body = AvailabilityResponse),
        (status = 400, description = "Malformed date or time"),
        (status = 404, description = "Unknown service or staff member"),
        (status = 503, description = "Availability could not be read")
    ),
    tag = "Booking"
))]
pub async fn get_availability_handler(
    State(state): State<Arc<BookingState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, SalonbookError> {
    let date = parse_date(&query.date)?;
    let requested = query
        .requested_time
        .as_deref()
        .filter(|raw| !raw.trim().is_empty())
        .map(str::parse::<ClockTime>)
        .transpose()?;
    let policy = state.config.booking.straddle_policy;

    let (staff_id, slots) = match StaffChoice::from_param(query.staff_id.as_deref()) {
        StaffChoice::Specific(staff_id) => {
            let slots = compute_availability(
                state.source.as_ref(),
                &staff_id,
                date,
                &query.service_id,
                policy,
            )
            .await?;
            (Some(staff_id), slots)
        }
        StaffChoice::Any => {
            let slots =
                compute_availability_any(state.source.as_ref(), date, &query.service_id, policy)
                    .await?;
            (None, slots)
        }
    };

    let best_match = compute_best_match(&slots.perfect, &slots.other, requested);
    info!(
        service_id = %query.service_id,
        staff_id = staff_id.as_deref().unwrap_or("any"),
        %date,
        perfect = slots.perfect.len(),
        other = slots.other.len(),
        "Availability computed"
    );

    Ok(Json(AvailabilityResponse::new(
        date, staff_id, &slots, best_match,
    )))
}

/// Handler to book a slot.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/bookings",
    request_body = BookingRequest,
    responses(
        (status = 201, description = "Appointment booked", body = BookingConfirmation),
        (status = 400, description = "Incomplete or invalid booking"),
        (status = 404, description = "Unknown service or staff member"),
        (status = 409, description = "Slot no longer available"),
        (status = 503, description = "Appointments could not be read or written")
    ),
    tag = "Booking"
))]
pub async fn create_booking_handler(
    State(state): State<Arc<BookingState>>,
    Json(payload): Json<BookingRequest>,
) -> Result<(StatusCode, Json<BookingConfirmation>), SalonbookError> {
    let mut flow = BookingFlow::from_config(&state.config.booking);
    flow.select_service(payload.service_id);
    flow.select_staff(StaffChoice::from_param(payload.staff_id.as_deref()));
    if let Some(date) = payload.date.as_deref() {
        flow.select_date(parse_date(date)?);
    }
    flow.select_time(payload.time.parse::<ClockTime>()?);
    flow.set_customer(payload.customer);

    let confirmation = flow
        .submit(state.source.as_ref(), state.store.as_ref())
        .await?;
    Ok((StatusCode::CREATED, Json(confirmation)))
}

/// Liveness probe that also reads the catalog.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service and store are up", body = HealthResponse),
        (status = 503, description = "Store unreachable")
    ),
    tag = "Booking"
))]
pub async fn health_handler(
    State(state): State<Arc<BookingState>>,
) -> Result<Json<HealthResponse>, SalonbookError> {
    let services = state.source.list_services().await?;
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        services: services.len(),
    }))
}
