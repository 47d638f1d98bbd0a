//! Repository factory trait
//!
//! Lets the backend build repositories without naming the concrete SQL
//! implementation.

/// A trait for database repository factories
///
/// This trait defines a factory for creating repository instances.
/// It is generic over the repository type and the configuration type.
pub trait RepositoryFactory<R, C> {
    /// Create a new repository instance
    fn create_repository(&self, config: C) -> R;
}
