//! Service layer for table creation and the seat/finish operations.

use crate::error::FailureKind;
use crate::reservation::{
    domain::{Reservation, ReservationId},
    ports::{ReservationRepository, ReservationRepositoryError},
};
use crate::table::{
    domain::{self, DiningTable, SeatingError, TableId, TableRuleError},
    ports::{TableRepository, TableRepositoryError},
    validation::{self, RESERVATION_ID, TablePayload},
};
use mockable::Clock;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// The table and reservation after a seat or finish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeatingOutcome {
    /// Updated table.
    pub table: DiningTable,
    /// Updated reservation.
    pub reservation: Reservation,
}

/// Service-level errors for table operations.
#[derive(Debug, Error)]
pub enum TableServiceError {
    /// The table payload was rejected.
    #[error(transparent)]
    Rule(#[from] TableRuleError),

    /// A seating precondition failed.
    #[error(transparent)]
    Seating(#[from] SeatingError),

    /// The table does not exist.
    #[error("table not found: {0}")]
    NotFound(TableId),

    /// Table repository operation failed.
    #[error(transparent)]
    Tables(#[from] TableRepositoryError),

    /// Reservation repository operation failed.
    #[error(transparent)]
    Reservations(#[from] ReservationRepositoryError),
}

impl TableServiceError {
    /// Classifies the failure for the request layer.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::Rule(err) => err.kind(),
            Self::Seating(err) | Self::Tables(TableRepositoryError::Seating(err)) => err.kind(),
            Self::NotFound(_)
            | Self::Tables(
                TableRepositoryError::TableNotFound(_)
                | TableRepositoryError::ReservationNotFound(_),
            )
            | Self::Reservations(ReservationRepositoryError::NotFound(_)) => FailureKind::NotFound,
            Self::Tables(TableRepositoryError::DuplicateTable(_))
            | Self::Reservations(
                ReservationRepositoryError::DuplicateReservation(_)
                | ReservationRepositoryError::StatusChanged { .. },
            ) => {
                FailureKind::Conflict
            }
            Self::Tables(TableRepositoryError::Persistence(_))
            | Self::Reservations(ReservationRepositoryError::Persistence(_)) => {
                FailureKind::Persistence
            }
        }
    }
}

/// Result type for table service operations.
pub type TableServiceResult<T> = Result<T, TableServiceError>;

/// Table and seating orchestration service.
#[derive(Clone)]
pub struct TableAssignmentService<S, C>
where
    S: ReservationRepository + TableRepository,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> TableAssignmentService<S, C>
where
    S: ReservationRepository + TableRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new table assignment service.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    /// Validates a payload and stores a new free table.
    ///
    /// # Errors
    ///
    /// Returns [`TableServiceError::Rule`] when validation fails or
    /// [`TableServiceError::Tables`] when storage rejects it.
    pub async fn create_table(&self, payload: &TablePayload) -> TableServiceResult<DiningTable> {
        let draft = validation::validate_new_table(payload).inspect_err(|err| {
            tracing::debug!(kind = %err.kind(), error = %err, "table rejected");
        })?;
        let table = DiningTable::new(draft, &*self.clock);
        self.store.store_table(&table).await?;
        tracing::info!(
            table_id = %table.id(),
            table_name = %table.table_name(),
            capacity = table.capacity().value(),
            "table created"
        );
        Ok(table)
    }

    /// Loads a table.
    ///
    /// # Errors
    ///
    /// Returns [`TableServiceError::NotFound`] when it does not exist.
    pub async fn find_table(&self, id: TableId) -> TableServiceResult<DiningTable> {
        self.store
            .find_table(id)
            .await?
            .ok_or(TableServiceError::NotFound(id))
    }

    /// Lists every table ordered by name.
    ///
    /// # Errors
    ///
    /// Returns [`TableServiceError::Tables`] when lookup fails.
    pub async fn list_tables(&self) -> TableServiceResult<Vec<DiningTable>> {
        Ok(self.store.list_tables().await?)
    }

    /// Seats the reservation named in `payload` at a table.
    ///
    /// Preconditions are checked in order: the payload names a reservation,
    /// the reservation exists, the table exists, the table is free, the
    /// party fits, and the reservation is booked. The store re-checks them
    /// while applying both changes atomically.
    ///
    /// # Errors
    ///
    /// Returns [`TableServiceError::Seating`] for any failed precondition,
    /// including one lost to a concurrent seat.
    pub async fn seat(
        &self,
        table_id: TableId,
        payload: &TablePayload,
    ) -> TableServiceResult<SeatingOutcome> {
        let reservation_id = requested_reservation(payload).inspect_err(log_rejection)?;
        let reservation = self
            .store
            .find_reservation(reservation_id)
            .await?
            .ok_or_else(|| SeatingError::ReservationNotFound(reservation_id.to_string()))
            .inspect_err(log_rejection)?;
        let table = self
            .store
            .find_table(table_id)
            .await?
            .ok_or(SeatingError::TableNotFound(table_id))
            .inspect_err(log_rejection)?;
        domain::check_seating(&table, &reservation).inspect_err(log_rejection)?;

        let (seated_table, seated_reservation) = self
            .store
            .atomic_seat(table.id(), reservation.id(), self.clock.utc())
            .await
            .map_err(lost_race)?;
        tracing::info!(
            table_id = %table_id,
            reservation_id = %reservation_id,
            people = seated_reservation.people().value(),
            "reservation seated"
        );
        Ok(SeatingOutcome {
            table: seated_table,
            reservation: seated_reservation,
        })
    }

    /// Frees a table and finishes the reservation it held.
    ///
    /// # Errors
    ///
    /// Returns [`TableServiceError::Seating`] when the table does not exist
    /// or is not occupied.
    pub async fn finish(&self, table_id: TableId) -> TableServiceResult<SeatingOutcome> {
        let table = self
            .store
            .find_table(table_id)
            .await?
            .ok_or(SeatingError::TableNotFound(table_id))
            .inspect_err(log_rejection)?;
        let reservation_id = domain::check_finish(&table).inspect_err(log_rejection)?;

        let (freed_table, finished_reservation) = self
            .store
            .atomic_finish(table.id(), reservation_id, self.clock.utc())
            .await
            .map_err(lost_race)?;
        tracing::info!(
            table_id = %table_id,
            reservation_id = %reservation_id,
            "table finished"
        );
        Ok(SeatingOutcome {
            table: freed_table,
            reservation: finished_reservation,
        })
    }
}

fn requested_reservation(payload: &TablePayload) -> Result<ReservationId, SeatingError> {
    match payload.get(RESERVATION_ID) {
        None | Some(Value::Null) => Err(SeatingError::MissingField(RESERVATION_ID)),
        Some(Value::String(raw)) => raw
            .parse()
            .map_err(|_| SeatingError::ReservationNotFound(raw.clone())),
        Some(other) => Err(SeatingError::ReservationNotFound(other.to_string())),
    }
}

/// Maps a store-side rejection, logging when the service's own checks had
/// passed moments before.
fn lost_race(err: TableRepositoryError) -> TableServiceError {
    let seating = match err {
        TableRepositoryError::Seating(seating) => seating,
        TableRepositoryError::TableNotFound(id) => SeatingError::TableNotFound(id),
        TableRepositoryError::ReservationNotFound(id) => {
            SeatingError::ReservationNotFound(id.to_string())
        }
        other => return TableServiceError::Tables(other),
    };
    tracing::warn!(
        kind = %seating.kind(),
        error = %seating,
        "floor changed between precondition check and commit"
    );
    TableServiceError::Seating(seating)
}

fn log_rejection(err: &SeatingError) {
    tracing::debug!(kind = %err.kind(), error = %err, "seating rejected");
}
