//! Repository port for tables and the two-record seat/finish operations.

use crate::reservation::domain::{Reservation, ReservationId};
use crate::table::domain::{DiningTable, SeatingError, TableId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for table repository operations.
pub type TableRepositoryResult<T> = Result<T, TableRepositoryError>;

/// Table persistence contract.
///
/// [`atomic_seat`](Self::atomic_seat) and [`atomic_finish`](Self::atomic_finish)
/// must apply both record changes or neither, and must re-check the seating
/// rules against the state they lock so that two concurrent seat attempts on
/// one table cannot both succeed.
#[async_trait]
pub trait TableRepository: Send + Sync {
    /// Stores a new table.
    ///
    /// # Errors
    ///
    /// Returns [`TableRepositoryError::DuplicateTable`] when the identifier
    /// already exists.
    async fn store_table(&self, table: &DiningTable) -> TableRepositoryResult<()>;

    /// Finds a table by identifier.
    ///
    /// Returns `None` when the table does not exist.
    async fn find_table(&self, id: TableId) -> TableRepositoryResult<Option<DiningTable>>;

    /// Returns every table ordered by name.
    async fn list_tables(&self) -> TableRepositoryResult<Vec<DiningTable>>;

    /// Seats a reservation at a table as one unit.
    ///
    /// Returns the updated table and reservation.
    ///
    /// # Errors
    ///
    /// Returns [`TableRepositoryError::TableNotFound`],
    /// [`TableRepositoryError::ReservationNotFound`], or
    /// [`TableRepositoryError::Seating`] when the locked state breaks a
    /// seating rule.
    async fn atomic_seat(
        &self,
        table_id: TableId,
        reservation_id: ReservationId,
        at: DateTime<Utc>,
    ) -> TableRepositoryResult<(DiningTable, Reservation)>;

    /// Frees a table and finishes its reservation as one unit.
    ///
    /// Returns the updated table and reservation.
    ///
    /// # Errors
    ///
    /// Returns [`TableRepositoryError::TableNotFound`],
    /// [`TableRepositoryError::ReservationNotFound`], or
    /// [`TableRepositoryError::Seating`] when the table no longer holds the
    /// reservation.
    async fn atomic_finish(
        &self,
        table_id: TableId,
        reservation_id: ReservationId,
        at: DateTime<Utc>,
    ) -> TableRepositoryResult<(DiningTable, Reservation)>;
}

/// Errors returned by table repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TableRepositoryError {
    /// A table with the same identifier already exists.
    #[error("duplicate table identifier: {0}")]
    DuplicateTable(TableId),

    /// The table was not found.
    #[error("table not found: {0}")]
    TableNotFound(TableId),

    /// The reservation was not found.
    #[error("reservation not found: {0}")]
    ReservationNotFound(ReservationId),

    /// The locked state broke a seating rule.
    #[error(transparent)]
    Seating(#[from] SeatingError),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TableRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
