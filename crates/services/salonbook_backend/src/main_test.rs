#[cfg(test)]
mod tests {
    use crate::app_state::{AppState, StartupError};
    use crate::build_app;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Router,
    };
    use chrono::Duration;
    use salonbook_common::time::today_in_zone;
    use salonbook_config::{
        AppConfig, CatalogConfig, DatabaseConfig, ServiceSeed, StaffSeed, WorkingHoursSeed,
    };
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn config() -> AppConfig {
        let mut config = AppConfig::default();
        config.booking.catalog = CatalogConfig {
            services: vec![ServiceSeed {
                id: "cut".to_string(),
                name: "Haircut".to_string(),
                description: None,
                price_cents: 3000,
                duration_min: Some(30),
            }],
            staff: vec![StaffSeed {
                id: "giulia".to_string(),
                name: "Giulia".to_string(),
                specialty: Some("Colour".to_string()),
                hours: [
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
                    start_time: "09:00".to_string(),
                    end_time: "10:00".to_string(),
                })
                .collect(),
            }],
        };
        config
    }

    fn next_week() -> String {
        let today = today_in_zone("Europe/Rome").unwrap();
        (today + Duration::days(7)).format("%Y-%m-%d").to_string()
    }

    async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn booking_request(date: &str) -> Request<Body> {
        let payload = json!({
            "service_id": "cut",
            "staff_id": "giulia",
            "date": date,
            "time": "09:00",
            "customer": { "name": "Marta Rossi", "phone": "+39 320 0000000" }
        });
        Request::builder()
            .method("POST")
            .uri("/api/bookings")
            .header("content-type", "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_in_memory_app_serves_api() {
        let state = AppState::in_memory(Arc::new(config())).unwrap();
        let app = build_app(&state);

        let (status, body) = call(
            &app,
            Request::builder().uri("/api/health").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["services"], 1);

        let uri = format!("/api/availability?date={}&service_id=cut", next_week());
        let (status, body) = call(&app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["other_slots"], json!(["09:00", "09:30"]));
    }

    #[tokio::test]
    async fn test_routes_live_under_api_prefix() {
        let app = build_app(&AppState::in_memory(Arc::new(config())).unwrap());
        let response = app
            .oneshot(Request::builder().uri("/services").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_invalid_catalog_fails_startup() {
        let mut config = config();
        config.booking.catalog.staff[0].hours[0].start_time = "11:00".to_string();
        let result = AppState::in_memory(Arc::new(config));
        assert!(matches!(result, Err(StartupError::Catalog(_))));
    }

    #[tokio::test]
    async fn test_new_without_database_uses_memory() {
        let state = AppState::new(Arc::new(config())).await.unwrap();
        let app = build_app(&state);
        let (status, _) = call(&app, booking_request(&next_week())).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    #[cfg(feature = "database")]
    #[tokio::test]
    async fn test_sqlite_store_rejects_double_booking() {
        let path = std::env::temp_dir().join(format!("salonbook-{}.db", uuid::Uuid::new_v4()));
        let mut config = config();
        config.database = Some(DatabaseConfig {
            url: format!("sqlite://{}", path.display()),
        });

        let state = AppState::new(Arc::new(config)).await.unwrap();
        let app = build_app(&state);
        let date = next_week();

        let (status, body) = call(&app, booking_request(&date)).await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        assert_eq!(body["staff_name"], "Giulia");

        let (status, body) = call(&app, booking_request(&date)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], 409);

        let uri = format!("/api/availability?date={}&service_id=cut&staff_id=giulia", date);
        let (_, body) = call(&app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await;
        assert_eq!(body["perfect_slots"], json!(["09:30"]));
        let _ = std::fs::remove_file(path);
    }
}
