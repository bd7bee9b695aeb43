//! Port contracts for reservation storage.
//!
//! Ports define infrastructure-agnostic interfaces used by reservation
//! services.

pub mod repository;

pub use repository::{
    ReservationRepository, ReservationRepositoryError, ReservationRepositoryResult,
};
