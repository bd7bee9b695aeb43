//! Repository port for reservation persistence and lookup.

use crate::reservation::domain::{Reservation, ReservationId, ReservationStatus};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use thiserror::Error;

/// Result type for reservation repository operations.
pub type ReservationRepositoryResult<T> = Result<T, ReservationRepositoryError>;

/// Reservation persistence contract.
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Stores a new reservation.
    ///
    /// # Errors
    ///
    /// Returns [`ReservationRepositoryError::DuplicateReservation`] when the
    /// identifier already exists.
    async fn store_reservation(&self, reservation: &Reservation)
    -> ReservationRepositoryResult<()>;

    /// Persists changes to an existing reservation.
    ///
    /// The write only happens while the stored status still equals
    /// `expected`, the status the caller loaded.
    ///
    /// # Errors
    ///
    /// Returns [`ReservationRepositoryError::NotFound`] when the reservation
    /// does not exist, or [`ReservationRepositoryError::StatusChanged`] when
    /// a seat or finish changed its status in the meantime.
    async fn update_reservation(
        &self,
        reservation: &Reservation,
        expected: ReservationStatus,
    ) -> ReservationRepositoryResult<()>;

    /// Removes a reservation whose stored status still equals `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`ReservationRepositoryError::NotFound`] when the reservation
    /// does not exist, or [`ReservationRepositoryError::StatusChanged`] when
    /// its status moved since it was loaded.
    async fn delete_reservation(
        &self,
        id: ReservationId,
        expected: ReservationStatus,
    ) -> ReservationRepositoryResult<()>;

    /// Finds a reservation by identifier.
    ///
    /// Returns `None` when the reservation does not exist.
    async fn find_reservation(
        &self,
        id: ReservationId,
    ) -> ReservationRepositoryResult<Option<Reservation>>;

    /// Returns the active reservations for a date ordered by time.
    ///
    /// Finished and cancelled reservations are excluded.
    async fn list_reservations_by_date(
        &self,
        date: NaiveDate,
    ) -> ReservationRepositoryResult<Vec<Reservation>>;

    /// Returns reservations whose phone digits contain the digits of
    /// `fragment`, ordered by date and time.
    async fn search_reservations_by_phone(
        &self,
        fragment: &str,
    ) -> ReservationRepositoryResult<Vec<Reservation>>;
}

/// Errors returned by reservation repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ReservationRepositoryError {
    /// A reservation with the same identifier already exists.
    #[error("duplicate reservation identifier: {0}")]
    DuplicateReservation(ReservationId),

    /// The reservation was not found.
    #[error("reservation not found: {0}")]
    NotFound(ReservationId),

    /// The stored status differs from the one the write was based on.
    #[error("reservation {id} is {actual}, expected {expected}")]
    StatusChanged {
        /// Reservation identifier.
        id: ReservationId,
        /// Status the caller loaded.
        expected: ReservationStatus,
        /// Status currently stored.
        actual: ReservationStatus,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ReservationRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
