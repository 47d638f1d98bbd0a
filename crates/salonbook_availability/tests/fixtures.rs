//! Test fixtures for the booking API tests
//!
//! Each integration test binary includes this module with `mod fixtures;`
//! and uses a subset of it.
#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::{Duration, NaiveDate};
use salonbook_availability::handlers::BookingState;
use salonbook_availability::routes::routes;
use salonbook_availability::service::InMemorySalonStore;
use salonbook_common::time::today_in_zone;
use salonbook_config::{
    AppConfig, BookingConfig, CatalogConfig, ServiceSeed, StaffSeed, StraddlePolicy,
    WorkingHoursSeed,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const TIME_ZONE: &str = "Europe/Zurich";

fn hours(start: &str, end: &str) -> Vec<WorkingHoursSeed> {
    [
        "monday",
        "tuesday",
        "wednesday",
        "thursday",
        "friday",
        "saturday",
        "sunday",
    ]
    .iter()
    .map(|weekday| WorkingHoursSeed {
        weekday: weekday.to_string(),
        start_time: start.to_string(),
        end_time: end.to_string(),
    })
    .collect()
}

/// A small salon: Sara works 09:00-11:00, Paolo 14:00-16:00, every day.
pub fn create_catalog() -> CatalogConfig {
    CatalogConfig {
        services: vec![
            ServiceSeed {
                id: "cut".to_string(),
                name: "Haircut".to_string(),
                description: Some("Wash, cut and blow-dry".to_string()),
                price_cents: 3500,
                duration_min: Some(30),
            },
            ServiceSeed {
                id: "beard".to_string(),
                name: "Beard trim".to_string(),
                description: None,
                price_cents: 1500,
                duration_min: Some(30),
            },
            ServiceSeed {
                id: "color".to_string(),
                name: "Color".to_string(),
                description: None,
                price_cents: 6000,
                duration_min: Some(60),
            },
        ],
        staff: vec![
            StaffSeed {
                id: "sara".to_string(),
                name: "Sara".to_string(),
                specialty: Some("Color".to_string()),
                hours: hours("09:00", "11:00"),
            },
            StaffSeed {
                id: "paolo".to_string(),
                name: "Paolo".to_string(),
                specialty: Some("Barber".to_string()),
                hours: hours("14:00", "16:00"),
            },
        ],
    }
}

/// Creates a mock AppConfig for testing
pub fn create_mock_config() -> Arc<AppConfig> {
    Arc::new(AppConfig {
        booking: BookingConfig {
            time_zone: TIME_ZONE.to_string(),
            straddle_policy: StraddlePolicy::Clip,
            catalog: create_catalog(),
        },
        ..AppConfig::default()
    })
}

pub fn create_store() -> Arc<InMemorySalonStore> {
    Arc::new(InMemorySalonStore::from_catalog(&create_catalog()).expect("valid catalog"))
}

pub fn create_app(store: Arc<InMemorySalonStore>) -> Router {
    routes(Arc::new(BookingState::with_store(create_mock_config(), store)))
}

pub fn future_date(days: i64) -> NaiveDate {
    today_in_zone(TIME_ZONE).unwrap() + Duration::days(days)
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}
