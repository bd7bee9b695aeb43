//! In-memory floor store for tests and single-process deployments.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::reservation::{
    domain::{Reservation, ReservationId, ReservationStatus},
    ports::{ReservationRepository, ReservationRepositoryError, ReservationRepositoryResult},
};
use crate::table::{
    domain::{self, DiningTable, TableId},
    ports::{TableRepository, TableRepositoryError, TableRepositoryResult},
};

/// Thread-safe in-memory store for reservations and tables.
///
/// Every mutation takes the same write lock, which makes the seat and finish
/// operations atomic with respect to each other and to plain updates.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFloorStore {
    state: Arc<RwLock<FloorState>>,
}

#[derive(Debug, Default)]
struct FloorState {
    reservations: HashMap<ReservationId, Reservation>,
    tables: HashMap<TableId, DiningTable>,
}

impl InMemoryFloorStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, FloorState>, std::io::Error> {
        self.state
            .read()
            .map_err(|err| std::io::Error::other(err.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, FloorState>, std::io::Error> {
        self.state
            .write()
            .map_err(|err| std::io::Error::other(err.to_string()))
    }
}

#[async_trait]
impl ReservationRepository for InMemoryFloorStore {
    async fn store_reservation(
        &self,
        reservation: &Reservation,
    ) -> ReservationRepositoryResult<()> {
        let mut state = self.write().map_err(ReservationRepositoryError::persistence)?;
        if state.reservations.contains_key(&reservation.id()) {
            return Err(ReservationRepositoryError::DuplicateReservation(
                reservation.id(),
            ));
        }
        state
            .reservations
            .insert(reservation.id(), reservation.clone());
        Ok(())
    }

    async fn update_reservation(
        &self,
        reservation: &Reservation,
        expected: ReservationStatus,
    ) -> ReservationRepositoryResult<()> {
        let mut state = self.write().map_err(ReservationRepositoryError::persistence)?;
        let stored = state
            .reservations
            .get_mut(&reservation.id())
            .ok_or(ReservationRepositoryError::NotFound(reservation.id()))?;
        ensure_status(stored, expected)?;
        *stored = reservation.clone();
        Ok(())
    }

    async fn delete_reservation(
        &self,
        id: ReservationId,
        expected: ReservationStatus,
    ) -> ReservationRepositoryResult<()> {
        let mut state = self.write().map_err(ReservationRepositoryError::persistence)?;
        let stored = state
            .reservations
            .get(&id)
            .ok_or(ReservationRepositoryError::NotFound(id))?;
        ensure_status(stored, expected)?;
        state.reservations.remove(&id);
        Ok(())
    }

    async fn find_reservation(
        &self,
        id: ReservationId,
    ) -> ReservationRepositoryResult<Option<Reservation>> {
        let state = self.read().map_err(ReservationRepositoryError::persistence)?;
        Ok(state.reservations.get(&id).cloned())
    }

    async fn list_reservations_by_date(
        &self,
        date: NaiveDate,
    ) -> ReservationRepositoryResult<Vec<Reservation>> {
        let state = self.read().map_err(ReservationRepositoryError::persistence)?;
        let mut found: Vec<Reservation> = state
            .reservations
            .values()
            .filter(|reservation| {
                reservation.reservation_date() == date && !reservation.status().is_terminal()
            })
            .cloned()
            .collect();
        found.sort_by_key(|reservation| (reservation.reservation_time(), reservation.created_at()));
        Ok(found)
    }

    async fn search_reservations_by_phone(
        &self,
        fragment: &str,
    ) -> ReservationRepositoryResult<Vec<Reservation>> {
        let state = self.read().map_err(ReservationRepositoryError::persistence)?;
        let mut found: Vec<Reservation> = state
            .reservations
            .values()
            .filter(|reservation| reservation.mobile_number().matches_fragment(fragment))
            .cloned()
            .collect();
        found.sort_by_key(|reservation| (reservation.slot(), reservation.created_at()));
        Ok(found)
    }
}

#[async_trait]
impl TableRepository for InMemoryFloorStore {
    async fn store_table(&self, table: &DiningTable) -> TableRepositoryResult<()> {
        let mut state = self.write().map_err(TableRepositoryError::persistence)?;
        if state.tables.contains_key(&table.id()) {
            return Err(TableRepositoryError::DuplicateTable(table.id()));
        }
        state.tables.insert(table.id(), table.clone());
        Ok(())
    }

    async fn find_table(&self, id: TableId) -> TableRepositoryResult<Option<DiningTable>> {
        let state = self.read().map_err(TableRepositoryError::persistence)?;
        Ok(state.tables.get(&id).cloned())
    }

    async fn list_tables(&self) -> TableRepositoryResult<Vec<DiningTable>> {
        let state = self.read().map_err(TableRepositoryError::persistence)?;
        let mut tables: Vec<DiningTable> = state.tables.values().cloned().collect();
        tables.sort_by(|left, right| {
            left.table_name()
                .cmp(right.table_name())
                .then_with(|| left.created_at().cmp(&right.created_at()))
        });
        Ok(tables)
    }

    async fn atomic_seat(
        &self,
        table_id: TableId,
        reservation_id: ReservationId,
        at: DateTime<Utc>,
    ) -> TableRepositoryResult<(DiningTable, Reservation)> {
        let mut state = self.write().map_err(TableRepositoryError::persistence)?;
        let (mut table, mut reservation) = load_pair(&state, table_id, reservation_id)?;
        domain::seat(&mut table, &mut reservation, at)?;
        store_pair(&mut state, &table, &reservation);
        Ok((table, reservation))
    }

    async fn atomic_finish(
        &self,
        table_id: TableId,
        reservation_id: ReservationId,
        at: DateTime<Utc>,
    ) -> TableRepositoryResult<(DiningTable, Reservation)> {
        let mut state = self.write().map_err(TableRepositoryError::persistence)?;
        let (mut table, mut reservation) = load_pair(&state, table_id, reservation_id)?;
        domain::finish(&mut table, &mut reservation, at)?;
        store_pair(&mut state, &table, &reservation);
        Ok((table, reservation))
    }
}

/// Fails unless `stored` still has the status the caller based its write on.
fn ensure_status(
    stored: &Reservation,
    expected: ReservationStatus,
) -> ReservationRepositoryResult<()> {
    if stored.status() == expected {
        return Ok(());
    }
    Err(ReservationRepositoryError::StatusChanged {
        id: stored.id(),
        expected,
        actual: stored.status(),
    })
}

/// Copies a table and reservation out of the locked state.
///
/// The rules run against the copies; [`store_pair`] writes them back only
/// once both changes have succeeded.
fn load_pair(
    state: &FloorState,
    table_id: TableId,
    reservation_id: ReservationId,
) -> TableRepositoryResult<(DiningTable, Reservation)> {
    let table = state
        .tables
        .get(&table_id)
        .cloned()
        .ok_or(TableRepositoryError::TableNotFound(table_id))?;
    let reservation = state
        .reservations
        .get(&reservation_id)
        .cloned()
        .ok_or(TableRepositoryError::ReservationNotFound(reservation_id))?;
    Ok((table, reservation))
}

fn store_pair(state: &mut FloorState, table: &DiningTable, reservation: &Reservation) {
    state.tables.insert(table.id(), table.clone());
    state
        .reservations
        .insert(reservation.id(), reservation.clone());
}
