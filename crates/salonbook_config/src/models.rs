// --- File: crates/salonbook_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

// --- Database Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub url: String, // e.g. "secret_from_env" resolved from DATABASE_URL
}

// --- Logging Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct LoggingConfig {
    /// Minimum level for salonbook targets ("trace", "debug", "info", ...).
    pub level: Option<String>,
    /// When set, logs are additionally written to a daily rolling file here.
    pub directory: Option<String>,
    pub file_prefix: Option<String>,
}

/// How busy intervals that only partially overlap a working window are treated.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StraddlePolicy {
    /// Only intervals fully inside the window count as busy for it.
    Ignore,
    /// Partially overlapping intervals are clipped to the window bounds.
    #[default]
    Clip,
}

// --- Catalog seed data ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServiceSeed {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Price in the smallest currency unit (e.g. cents).
    #[serde(default)]
    pub price_cents: i64,
    pub duration_min: Option<u32>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WorkingHoursSeed {
    /// Lower-case English weekday name, e.g. "monday".
    pub weekday: String,
    /// "HH:MM"
    pub start_time: String,
    /// "HH:MM"
    pub end_time: String,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StaffSeed {
    pub id: String,
    pub name: String,
    pub specialty: Option<String>,
    #[serde(default)]
    pub hours: Vec<WorkingHoursSeed>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct CatalogConfig {
    #[serde(default)]
    pub services: Vec<ServiceSeed>,
    #[serde(default)]
    pub staff: Vec<StaffSeed>,
}

// --- Booking Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BookingConfig {
    /// IANA time zone of the business, used to decide what "today" is.
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    #[serde(default)]
    pub straddle_policy: StraddlePolicy,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

fn default_time_zone() -> String {
    "Europe/Rome".to_string()
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            time_zone: default_time_zone(),
            straddle_policy: StraddlePolicy::default(),
            catalog: CatalogConfig::default(),
        }
    }
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    // Without a database the backend falls back to the in-memory store.
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    #[serde(default)]
    pub logging: Option<LoggingConfig>,
    #[serde(default)]
    pub booking: BookingConfig,
}
