//! `PostgreSQL` store for reservations and tables.

use super::{
    models::{
        NewReservationRow, NewTableRow, ReservationChanges, ReservationRow, TableRow,
    },
    schema::{dining_tables, reservations},
};
use crate::reservation::{
    domain::{
        GuestName, MobileNumber, PartySize, PersistedReservationData, Reservation,
        ReservationId, ReservationStatus, digits_only,
    },
    ports::{ReservationRepository, ReservationRepositoryError, ReservationRepositoryResult},
};
use crate::table::{
    domain::{
        self, DiningTable, PersistedTableData, SeatingError, TableCapacity, TableId, TableName,
    },
    ports::{TableRepository, TableRepositoryError, TableRepositoryResult},
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by the floor store.
pub type FloorPgPool = Pool<ConnectionManager<PgConnection>>;

const RESERVATION_COLUMNS: &str = concat!(
    "id, first_name, last_name, mobile_number, reservation_date, reservation_time, ",
    "people, status, created_at, updated_at",
);

/// `PostgreSQL`-backed store implementing both repository ports.
///
/// Seat and finish run in one transaction that locks the table row and then
/// the reservation row with `SELECT ... FOR UPDATE`, always in that order.
#[derive(Debug, Clone)]
pub struct PostgresFloorStore {
    pool: FloorPgPool,
}

/// Port errors that can wrap a pool or join failure.
trait PersistenceFailure: Send + 'static {
    fn wrap(err: impl std::error::Error + Send + Sync + 'static) -> Self;
}

impl PersistenceFailure for ReservationRepositoryError {
    fn wrap(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

impl PersistenceFailure for TableRepositoryError {
    fn wrap(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

impl From<DieselError> for TableRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

impl PostgresFloorStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: FloorPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T, E>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut PgConnection) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: PersistenceFailure,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(E::wrap)?;
            f(&mut connection)
        })
        .await
        .map_err(E::wrap)?
    }
}

#[async_trait]
impl ReservationRepository for PostgresFloorStore {
    async fn store_reservation(
        &self,
        reservation: &Reservation,
    ) -> ReservationRepositoryResult<()> {
        let reservation_id = reservation.id();
        let new_row = to_new_reservation_row(reservation)?;

        self.run_blocking(move |connection| -> ReservationRepositoryResult<_> {
            diesel::insert_into(reservations::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        ReservationRepositoryError::DuplicateReservation(reservation_id)
                    }
                    _ => ReservationRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update_reservation(
        &self,
        reservation: &Reservation,
        expected: ReservationStatus,
    ) -> ReservationRepositoryResult<()> {
        let reservation_id = reservation.id();
        let changes = to_reservation_changes(reservation)?;

        self.run_blocking(move |connection| -> ReservationRepositoryResult<_> {
            let updated = diesel::update(
                reservations::table
                    .find(reservation_id.into_inner())
                    .filter(reservations::status.eq(expected.as_str())),
            )
            .set(&changes)
            .execute(connection)
            .map_err(ReservationRepositoryError::persistence)?;
            if updated == 0 {
                return Err(missing_or_changed(connection, reservation_id, expected)?);
            }
            Ok(())
        })
        .await
    }

    async fn delete_reservation(
        &self,
        id: ReservationId,
        expected: ReservationStatus,
    ) -> ReservationRepositoryResult<()> {
        self.run_blocking(move |connection| -> ReservationRepositoryResult<_> {
            let deleted = diesel::delete(
                reservations::table
                    .find(id.into_inner())
                    .filter(reservations::status.eq(expected.as_str())),
            )
            .execute(connection)
            .map_err(ReservationRepositoryError::persistence)?;
            if deleted == 0 {
                return Err(missing_or_changed(connection, id, expected)?);
            }
            Ok(())
        })
        .await
    }

    async fn find_reservation(
        &self,
        id: ReservationId,
    ) -> ReservationRepositoryResult<Option<Reservation>> {
        self.run_blocking(move |connection| -> ReservationRepositoryResult<_> {
            let row = reservations::table
                .find(id.into_inner())
                .select(ReservationRow::as_select())
                .first::<ReservationRow>(connection)
                .optional()
                .map_err(ReservationRepositoryError::persistence)?;
            row.map(|found| row_to_reservation(found).map_err(ReservationRepositoryError::wrap))
                .transpose()
        })
        .await
    }

    async fn list_reservations_by_date(
        &self,
        date: NaiveDate,
    ) -> ReservationRepositoryResult<Vec<Reservation>> {
        self.run_blocking(move |connection| -> ReservationRepositoryResult<_> {
            let rows = reservations::table
                .filter(reservations::reservation_date.eq(date))
                .filter(reservations::status.ne(ReservationStatus::Finished.as_str()))
                .filter(reservations::status.ne(ReservationStatus::Cancelled.as_str()))
                .order((reservations::reservation_time, reservations::created_at))
                .select(ReservationRow::as_select())
                .load::<ReservationRow>(connection)
                .map_err(ReservationRepositoryError::persistence)?;
            rows_to_reservations(rows)
        })
        .await
    }

    async fn search_reservations_by_phone(
        &self,
        fragment: &str,
    ) -> ReservationRepositoryResult<Vec<Reservation>> {
        let pattern = format!("%{}%", digits_only(fragment));
        self.run_blocking(move |connection| -> ReservationRepositoryResult<_> {
            let rows = diesel::sql_query(format!(
                concat!(
                    "SELECT {} FROM reservations ",
                    "WHERE regexp_replace(mobile_number, '[^0-9]', '', 'g') LIKE $1 ",
                    "ORDER BY reservation_date, reservation_time, created_at",
                ),
                RESERVATION_COLUMNS
            ))
            .bind::<diesel::sql_types::Text, _>(pattern)
            .load::<ReservationRow>(connection)
            .map_err(ReservationRepositoryError::persistence)?;
            rows_to_reservations(rows)
        })
        .await
    }
}

#[async_trait]
impl TableRepository for PostgresFloorStore {
    async fn store_table(&self, table: &DiningTable) -> TableRepositoryResult<()> {
        let table_id = table.id();
        let new_row = to_new_table_row(table)?;

        self.run_blocking(move |connection| -> TableRepositoryResult<_> {
            diesel::insert_into(dining_tables::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TableRepositoryError::DuplicateTable(table_id)
                    }
                    _ => TableRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_table(&self, id: TableId) -> TableRepositoryResult<Option<DiningTable>> {
        self.run_blocking(move |connection| -> TableRepositoryResult<_> {
            let row = dining_tables::table
                .find(id.into_inner())
                .select(TableRow::as_select())
                .first::<TableRow>(connection)
                .optional()?;
            row.map(row_to_table).transpose()
        })
        .await
    }

    async fn list_tables(&self) -> TableRepositoryResult<Vec<DiningTable>> {
        self.run_blocking(move |connection| -> TableRepositoryResult<_> {
            dining_tables::table
                .order((dining_tables::table_name, dining_tables::created_at))
                .select(TableRow::as_select())
                .load::<TableRow>(connection)?
                .into_iter()
                .map(row_to_table)
                .collect()
        })
        .await
    }

    async fn atomic_seat(
        &self,
        table_id: TableId,
        reservation_id: ReservationId,
        at: DateTime<Utc>,
    ) -> TableRepositoryResult<(DiningTable, Reservation)> {
        self.run_blocking(move |connection| -> TableRepositoryResult<_> {
            connection.transaction::<_, TableRepositoryError, _>(|tx| {
                let (mut table, mut reservation) = lock_pair(tx, table_id, reservation_id)?;
                domain::seat(&mut table, &mut reservation, at)?;

                let claimed = diesel::update(
                    dining_tables::table
                        .find(table_id.into_inner())
                        .filter(dining_tables::reservation_id.is_null()),
                )
                .set((
                    dining_tables::reservation_id.eq(Some(reservation_id.into_inner())),
                    dining_tables::updated_at.eq(at),
                ))
                .execute(tx)?;
                if claimed == 0 {
                    return Err(occupied_by_other(tx, table_id)?);
                }

                let seated = diesel::update(
                    reservations::table
                        .find(reservation_id.into_inner())
                        .filter(reservations::status.eq(ReservationStatus::Booked.as_str())),
                )
                .set((
                    reservations::status.eq(reservation.status().as_str()),
                    reservations::updated_at.eq(at),
                ))
                .execute(tx)?;
                if seated == 0 {
                    return Err(SeatingError::AlreadySeated(reservation_id).into());
                }

                Ok((table, reservation))
            })
        })
        .await
    }

    async fn atomic_finish(
        &self,
        table_id: TableId,
        reservation_id: ReservationId,
        at: DateTime<Utc>,
    ) -> TableRepositoryResult<(DiningTable, Reservation)> {
        self.run_blocking(move |connection| -> TableRepositoryResult<_> {
            connection.transaction::<_, TableRepositoryError, _>(|tx| {
                let (mut table, mut reservation) = lock_pair(tx, table_id, reservation_id)?;
                domain::finish(&mut table, &mut reservation, at)?;

                diesel::update(dining_tables::table.find(table_id.into_inner()))
                    .set((
                        dining_tables::reservation_id.eq(None::<uuid::Uuid>),
                        dining_tables::updated_at.eq(at),
                    ))
                    .execute(tx)?;
                diesel::update(reservations::table.find(reservation_id.into_inner()))
                    .set((
                        reservations::status.eq(reservation.status().as_str()),
                        reservations::updated_at.eq(at),
                    ))
                    .execute(tx)?;

                Ok((table, reservation))
            })
        })
        .await
    }
}

/// Explains why a status-guarded write matched no row.
fn missing_or_changed(
    connection: &mut PgConnection,
    id: ReservationId,
    expected: ReservationStatus,
) -> ReservationRepositoryResult<ReservationRepositoryError> {
    let stored = reservations::table
        .find(id.into_inner())
        .select(reservations::status)
        .first::<String>(connection)
        .optional()
        .map_err(ReservationRepositoryError::persistence)?;
    let Some(raw) = stored else {
        return Ok(ReservationRepositoryError::NotFound(id));
    };
    let actual = ReservationStatus::try_from(raw.as_str())
        .map_err(|_| ReservationRepositoryError::wrap(RowError::new("status", raw.clone())))?;
    Ok(ReservationRepositoryError::StatusChanged {
        id,
        expected,
        actual,
    })
}

/// Locks the table row, then the reservation row, and loads both.
fn lock_pair(
    tx: &mut PgConnection,
    table_id: TableId,
    reservation_id: ReservationId,
) -> TableRepositoryResult<(DiningTable, Reservation)> {
    let table_row = dining_tables::table
        .find(table_id.into_inner())
        .select(TableRow::as_select())
        .for_update()
        .first::<TableRow>(tx)
        .optional()?
        .ok_or(TableRepositoryError::TableNotFound(table_id))?;
    let reservation_row = reservations::table
        .find(reservation_id.into_inner())
        .select(ReservationRow::as_select())
        .for_update()
        .first::<ReservationRow>(tx)
        .optional()?
        .ok_or(TableRepositoryError::ReservationNotFound(reservation_id))?;

    let table = row_to_table(table_row)?;
    let reservation = row_to_reservation(reservation_row).map_err(TableRepositoryError::wrap)?;
    Ok((table, reservation))
}

/// Builds the occupancy error after a conditional claim updated no row.
fn occupied_by_other(
    tx: &mut PgConnection,
    table_id: TableId,
) -> TableRepositoryResult<TableRepositoryError> {
    let holder = dining_tables::table
        .find(table_id.into_inner())
        .select(dining_tables::reservation_id)
        .first::<Option<uuid::Uuid>>(tx)
        .optional()?
        .flatten();
    Ok(holder.map_or(
        TableRepositoryError::TableNotFound(table_id),
        |held| {
            SeatingError::TableOccupied {
                table_id,
                reservation_id: ReservationId::from_uuid(held),
            }
            .into()
        },
    ))
}

fn to_new_reservation_row(reservation: &Reservation) -> ReservationRepositoryResult<NewReservationRow> {
    Ok(NewReservationRow {
        id: reservation.id().into_inner(),
        first_name: reservation.first_name().as_str().to_owned(),
        last_name: reservation.last_name().as_str().to_owned(),
        mobile_number: reservation.mobile_number().as_str().to_owned(),
        reservation_date: reservation.reservation_date(),
        reservation_time: reservation.reservation_time(),
        people: people_column(reservation)?,
        status: reservation.status().as_str().to_owned(),
        created_at: reservation.created_at(),
        updated_at: reservation.updated_at(),
    })
}

fn to_reservation_changes(reservation: &Reservation) -> ReservationRepositoryResult<ReservationChanges> {
    Ok(ReservationChanges {
        first_name: reservation.first_name().as_str().to_owned(),
        last_name: reservation.last_name().as_str().to_owned(),
        mobile_number: reservation.mobile_number().as_str().to_owned(),
        reservation_date: reservation.reservation_date(),
        reservation_time: reservation.reservation_time(),
        people: people_column(reservation)?,
        status: reservation.status().as_str().to_owned(),
        updated_at: reservation.updated_at(),
    })
}

fn people_column(reservation: &Reservation) -> ReservationRepositoryResult<i32> {
    i32::try_from(reservation.people().value()).map_err(ReservationRepositoryError::persistence)
}

fn to_new_table_row(table: &DiningTable) -> TableRepositoryResult<NewTableRow> {
    Ok(NewTableRow {
        id: table.id().into_inner(),
        table_name: table.table_name().as_str().to_owned(),
        capacity: i32::try_from(table.capacity().value())
            .map_err(TableRepositoryError::persistence)?,
        reservation_id: table.reservation_id().map(ReservationId::into_inner),
        created_at: table.created_at(),
        updated_at: table.updated_at(),
    })
}

fn rows_to_reservations(rows: Vec<ReservationRow>) -> ReservationRepositoryResult<Vec<Reservation>> {
    rows.into_iter()
        .map(|row| row_to_reservation(row).map_err(ReservationRepositoryError::wrap))
        .collect()
}

/// Rebuilds a reservation, rejecting rows that break domain invariants.
fn row_to_reservation(row: ReservationRow) -> Result<Reservation, RowError> {
    let ReservationRow {
        id,
        first_name,
        last_name,
        mobile_number,
        reservation_date,
        reservation_time,
        people,
        status,
        created_at,
        updated_at,
    } = row;

    let party = u64::try_from(people).map_err(|_| RowError::new("people", people.to_string()))?;
    let data = PersistedReservationData {
        id: ReservationId::from_uuid(id),
        first_name: GuestName::new("first_name", first_name).map_err(RowError::from_rule)?,
        last_name: GuestName::new("last_name", last_name).map_err(RowError::from_rule)?,
        mobile_number: MobileNumber::new(mobile_number).map_err(RowError::from_rule)?,
        reservation_date,
        reservation_time,
        people: PartySize::new(party).map_err(RowError::from_rule)?,
        status: ReservationStatus::try_from(status.as_str())
            .map_err(|_| RowError::new("status", status.clone()))?,
        created_at,
        updated_at,
    };
    Ok(Reservation::from_persisted(data))
}

fn row_to_table(row: TableRow) -> TableRepositoryResult<DiningTable> {
    let TableRow {
        id,
        table_name,
        capacity,
        reservation_id,
        created_at,
        updated_at,
    } = row;

    let seats = u64::try_from(capacity)
        .map_err(|_| TableRepositoryError::wrap(RowError::new("capacity", capacity.to_string())))?;
    let data = PersistedTableData {
        id: TableId::from_uuid(id),
        table_name: TableName::new(table_name).map_err(TableRepositoryError::persistence)?,
        capacity: TableCapacity::new(seats).map_err(TableRepositoryError::persistence)?,
        reservation_id: reservation_id.map(ReservationId::from_uuid),
        created_at,
        updated_at,
    };
    Ok(DiningTable::from_persisted(data))
}

/// A stored row that no longer satisfies the domain rules.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("stored {column} is invalid: {value}")]
struct RowError {
    column: &'static str,
    value: String,
}

impl RowError {
    const fn new(column: &'static str, value: String) -> Self {
        Self { column, value }
    }

    fn from_rule(err: crate::reservation::domain::ReservationRuleError) -> Self {
        Self::new("reservation", err.to_string())
    }
}
