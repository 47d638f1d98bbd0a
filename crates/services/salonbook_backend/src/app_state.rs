// --- File: crates/services/salonbook_backend/src/app_state.rs ---
use salonbook_availability::handlers::BookingState;
use salonbook_availability::service::InMemorySalonStore;
use salonbook_common::catalog::CatalogError;
use salonbook_config::AppConfig;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[cfg(feature = "database")]
use salonbook_db::{DbClient, DbError, RepositoryFactory, SalonRepository, SalonRepositoryFactory};

#[derive(Error, Debug)]
pub enum StartupError {
    #[error("invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
    #[error("database setup failed: {0}")]
    Database(String),
}

#[cfg(feature = "database")]
impl From<DbError> for StartupError {
    fn from(err: DbError) -> Self {
        StartupError::Database(err.to_string())
    }
}

/// Application state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub booking: Arc<BookingState>,
}

impl AppState {
    /// Picks the store: SQL when a database is configured, otherwise the
    /// catalog from the config held in memory.
    pub async fn new(config: Arc<AppConfig>) -> Result<Self, StartupError> {
        #[cfg(feature = "database")]
        {
            if config.database.is_some() {
                return Self::with_database(config).await;
            }
        }
        Self::in_memory(config)
    }

    pub fn in_memory(config: Arc<AppConfig>) -> Result<Self, StartupError> {
        let store = Arc::new(InMemorySalonStore::from_catalog(&config.booking.catalog)?);
        info!("Using in-memory appointment store");
        Ok(Self::with_booking(config.clone(), BookingState::with_store(config, store)))
    }

    #[cfg(feature = "database")]
    async fn with_database(config: Arc<AppConfig>) -> Result<Self, StartupError> {
        let client = DbClient::new(&config).await?;
        let repository = SalonRepositoryFactory::new().create_repository(client);
        repository.init_schema().await?;
        if repository.seed_catalog(&config.booking.catalog).await? {
            info!("Seeded catalog from configuration");
        }
        info!("Using SQL appointment store");
        let store = Arc::new(repository);
        Ok(Self::with_booking(config.clone(), BookingState::with_store(config, store)))
    }

    fn with_booking(config: Arc<AppConfig>, booking: BookingState) -> Self {
        Self {
            config,
            booking: Arc::new(booking),
        }
    }
}
