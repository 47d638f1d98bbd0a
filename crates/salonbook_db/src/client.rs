//! Database client for Salonbook
//!
//! A thin wrapper around a pooled `sqlx::Any` connection. The driver is
//! chosen from the URL scheme at runtime, so the repositories never name a
//! concrete backend.

use crate::error::DbError;
use salonbook_config::{AppConfig, DatabaseConfig};
use sqlx::pool::PoolOptions;
use sqlx::{Pool, Transaction};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, error, info};

/// Type alias for a database transaction
pub type DbTransaction<'a> = Transaction<'a, sqlx::Any>;

const MAX_CONNECTIONS: u32 = 5;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(3);
const IDLE_TIMEOUT: Duration = Duration::from_secs(600);

/// Database client for Salonbook
#[derive(Debug, Clone)]
pub struct DbClient {
    pool: Pool<sqlx::Any>,
}

impl DbClient {
    /// Create a client from the `database` section of the application config.
    ///
    /// # Errors
    ///
    /// Fails when the section is missing, the URL is empty or the pool cannot
    /// connect.
    pub async fn new(config: &AppConfig) -> Result<Self, DbError> {
        let db_config = config
            .database
            .as_ref()
            .ok_or_else(|| DbError::ConfigError("Database configuration is missing".to_string()))?;
        Self::from_config(db_config).await
    }

    pub async fn from_config(db_config: &DatabaseConfig) -> Result<Self, DbError> {
        if db_config.url.is_empty() {
            return Err(DbError::ConfigError("Database URL is empty".to_string()));
        }
        Self::from_url(&db_config.url).await
    }

    /// Create a client from a database URL such as `sqlite:data/salon.db`.
    pub async fn from_url(db_url: &str) -> Result<Self, DbError> {
        if db_url.is_empty() {
            return Err(DbError::UrlError("Database URL is empty".to_string()));
        }
        let pool = Self::create_pool(db_url).await?;
        Ok(Self { pool })
    }

    async fn create_pool(db_url: &str) -> Result<Pool<sqlx::Any>, DbError> {
        debug!("Creating database pool with URL: {}", db_url);
        sqlx::any::install_default_drivers();

        if db_url.starts_with("sqlite:") {
            ensure_sqlite_file(db_url)?;
        }

        let pool = PoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .idle_timeout(IDLE_TIMEOUT)
            .connect_with(sqlx::any::AnyConnectOptions::from_str(db_url)?)
            .await
            .map_err(|e| {
                error!("Failed to create database pool: {}", e);
                DbError::PoolError(e.to_string())
            })?;

        info!("Database pool created successfully");
        Ok(pool)
    }

    pub fn pool(&self) -> &Pool<sqlx::Any> {
        &self.pool
    }

    /// Begin a transaction
    pub async fn begin(&self) -> Result<DbTransaction<'_>, DbError> {
        self.pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionError(e.to_string()))
    }

    /// Execute a statement that returns no rows, yielding the affected row count.
    pub async fn execute(&self, query: &str) -> Result<u64, DbError> {
        sqlx::query(query)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected())
            .map_err(|e| DbError::QueryError(e.to_string()))
    }

    pub async fn is_healthy(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

impl std::fmt::Display for DbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DbClient")
    }
}

// The Any driver cannot pass `create_if_missing`, so the file is created up front.
fn ensure_sqlite_file(db_url: &str) -> Result<(), DbError> {
    let db_path = db_url
        .strip_prefix("sqlite://")
        .or_else(|| db_url.strip_prefix("sqlite:"))
        .unwrap_or(db_url);
    let db_path = db_path.split('?').next().unwrap_or(db_path);
    if db_path.is_empty() || db_path.contains(":memory:") {
        return Ok(());
    }

    let path = Path::new(db_path);
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            debug!("Creating directory for SQLite database: {:?}", dir);
            std::fs::create_dir_all(dir).map_err(|e| {
                error!("Failed to create directory for SQLite database: {}", e);
                DbError::PoolError(format!("Failed to create directory: {}", e))
            })?;
        }
    }
    if !path.exists() {
        debug!("Creating empty SQLite database file: {}", db_path);
        std::fs::File::create(path).map_err(|e| {
            error!("Failed to create SQLite database file: {}", e);
            DbError::PoolError(format!("Failed to create database file: {}", e))
        })?;
    }
    Ok(())
}
