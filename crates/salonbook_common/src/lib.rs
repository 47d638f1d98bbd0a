// --- File: crates/salonbook_common/src/lib.rs ---

// Declare modules within this crate
pub mod catalog; // Catalog seed conversion
pub mod error; // Error handling
pub mod http; // HTTP error responses
pub mod logging; // Logging utilities
pub mod models; // Domain records
pub mod services; // Data-access traits
pub mod time; // Clock-time and calendar helpers

// Re-export error types and utilities for easier access
pub use error::{HttpStatusCode, SalonbookError};

pub use http::IntoHttpResponse;

pub use logging::{init, init_from_config, init_with_level};

pub use services::{AppointmentStore, AvailabilitySource, BoxFuture, SourceError};

pub use time::{format_minutes, ClockTime, TimeParseError};
