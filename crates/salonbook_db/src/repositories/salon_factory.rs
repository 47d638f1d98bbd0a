//! Factory for creating salon repositories

use crate::repositories::salon_sql::SqlSalonRepository;
use crate::{DbClient, RepositoryFactory};

#[derive(Debug, Clone, Default)]
pub struct SalonRepositoryFactory;

impl SalonRepositoryFactory {
    pub fn new() -> Self {
        Self
    }
}

impl RepositoryFactory<SqlSalonRepository, DbClient> for SalonRepositoryFactory {
    fn create_repository(&self, db_client: DbClient) -> SqlSalonRepository {
        SqlSalonRepository::new(db_client)
    }
}
