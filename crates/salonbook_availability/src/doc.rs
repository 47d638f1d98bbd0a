// File: crates/salonbook_availability/src/doc.rs

#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::booking::BookingConfirmation;
use crate::handlers;
use crate::logic::{AvailabilityQuery, AvailabilityResponse, BookingRequest, HealthResponse};
use salonbook_common::models::{
    AppointmentStatus, BestMatch, CustomerDetails, ServiceOffering, Slot, SlotKind, StaffMember,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::list_services_handler,
        handlers::list_staff_handler,
        handlers::get_availability_handler,
        handlers::create_booking_handler,
        handlers::health_handler
    ),
    components(
        schemas(
            AvailabilityQuery,
            AvailabilityResponse,
            BookingRequest,
            BookingConfirmation,
            HealthResponse,
            ServiceOffering,
            StaffMember,
            CustomerDetails,
            AppointmentStatus,
            BestMatch,
            Slot,
            SlotKind
        )
    ),
    tags(
        (name = "Booking", description = "Salon availability and booking API")
    ),
    servers(
        (url = "/api", description = "Salonbook API server")
    )
)]
pub struct BookingApiDoc;
