//! SQL persistence for Salonbook
//!
//! A pooled `sqlx::Any` client plus a repository that implements the
//! availability engine's data-access traits over it. SQLite is enabled by
//! default; PostgreSQL and MySQL can be switched on through feature flags.
//!
//! # Example
//!
//! ```rust,no_run
//! use salonbook_config::AppConfig;
//! use salonbook_db::{DbClient, SalonRepository, SqlSalonRepository};
//!
//! async fn setup(config: &AppConfig) -> Result<SqlSalonRepository, Box<dyn std::error::Error>> {
//!     let repository = SqlSalonRepository::new(DbClient::new(config).await?);
//!     repository.init_schema().await?;
//!     repository.seed_catalog(&config.booking.catalog).await?;
//!     Ok(repository)
//! }
//! ```

pub mod client;
pub mod error;
pub mod repositories;
pub mod repository;

pub use client::DbClient;
pub use error::DbError;
pub use repository::RepositoryFactory;

pub use repositories::{SalonRepository, SalonRepositoryFactory, SqlSalonRepository};
