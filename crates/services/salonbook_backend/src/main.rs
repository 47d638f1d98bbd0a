// File: services/salonbook_backend/src/main.rs
use axum::{routing::get, Router};
use salonbook_availability::routes as booking_routes;
use salonbook_common::logging;
use salonbook_config::load_config;
use std::error::Error;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

mod app_state;
#[cfg(test)]
mod main_test;

use app_state::AppState;

fn build_app(state: &AppState) -> Router {
    let api_router = Router::new()
        .route("/", get(|| async { "Welcome to the Salonbook API!" }))
        .merge(booking_routes(state.booking.clone()));

    #[allow(unused_mut)] // for the features it needs to be mutable
    let mut app = Router::new().nest("/api", api_router);

    // Conditionally add Swagger UI and JSON endpoint if openapi feature enabled
    #[cfg(feature = "openapi")]
    {
        use salonbook_availability::doc::BookingApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Salonbook API",
                version = "0.1.0",
                description = "Salon availability and booking API docs",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            servers( (url = "/api", description = "Main API Prefix")),
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(BookingApiDoc::openapi());
        info!("Adding Swagger UI at /api/docs");
        app = app.merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc));
    }

    app.layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = Arc::new(load_config()?);
    let _log_guard = logging::init_from_config(config.logging.as_ref());

    let state = AppState::new(config.clone()).await?;
    let app = build_app(&state);

    let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
