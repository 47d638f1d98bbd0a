//! Repository modules for database access

pub mod salon;
pub mod salon_factory;
pub mod salon_sql;


pub use salon::SalonRepository;
pub use salon_factory::SalonRepositoryFactory;
pub use salon_sql::SqlSalonRepository;
