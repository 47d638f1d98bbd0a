// --- File: crates/salonbook_availability/src/routes.rs ---

use crate::handlers::{
    create_booking_handler, get_availability_handler, health_handler, list_services_handler,
    list_staff_handler, BookingState,
};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Creates a router containing all booking routes, to be nested under `/api`.
pub fn routes(state: Arc<BookingState>) -> Router {
    Router::new()
        .route("/services", get(list_services_handler))
        .route("/staff", get(list_staff_handler))
        .route("/availability", get(get_availability_handler))
        .route("/bookings", post(create_booking_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}
