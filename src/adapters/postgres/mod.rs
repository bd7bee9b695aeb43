//! `PostgreSQL` adapter for reservations and tables.

mod models;
mod repository;
mod schema;

pub use repository::{FloorPgPool, PostgresFloorStore};
