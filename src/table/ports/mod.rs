//! Port contracts for table storage and atomic seating.

pub mod repository;

pub use repository::{TableRepository, TableRepositoryError, TableRepositoryResult};
