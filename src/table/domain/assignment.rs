//! Seating rules shared by every storage adapter.
//!
//! Adapters call [`seat`] and [`finish`] inside their critical section or
//! transaction; services call the `check_*` functions first to fail fast
//! with the same errors.

use super::{DiningTable, SeatingError};
use crate::reservation::domain::{Reservation, ReservationId, ReservationStatus};
use chrono::{DateTime, Utc};

/// Checks whether `reservation` may be seated at `table`.
///
/// Checks run in order: occupancy, capacity, then reservation status.
///
/// # Errors
///
/// Returns [`SeatingError::TableOccupied`], [`SeatingError::CapacityExceeded`],
/// [`SeatingError::AlreadySeated`], or [`SeatingError::ReservationFinalized`].
pub fn check_seating(table: &DiningTable, reservation: &Reservation) -> Result<(), SeatingError> {
    if let Some(current) = table.reservation_id() {
        return Err(SeatingError::TableOccupied {
            table_id: table.id(),
            reservation_id: current,
        });
    }
    if reservation.people().value() > table.capacity().value() {
        return Err(SeatingError::CapacityExceeded {
            people: reservation.people(),
            capacity: table.capacity(),
        });
    }
    match reservation.status() {
        ReservationStatus::Booked => Ok(()),
        ReservationStatus::Seated => Err(SeatingError::AlreadySeated(reservation.id())),
        status @ (ReservationStatus::Finished | ReservationStatus::Cancelled) => {
            Err(SeatingError::ReservationFinalized {
                id: reservation.id(),
                status,
            })
        }
    }
}

/// Seats `reservation` at `table`, updating both.
///
/// Neither record changes when an error is returned.
///
/// # Errors
///
/// Returns the errors of [`check_seating`].
pub fn seat(
    table: &mut DiningTable,
    reservation: &mut Reservation,
    at: DateTime<Utc>,
) -> Result<(), SeatingError> {
    check_seating(table, reservation)?;
    reservation.transition_at(ReservationStatus::Seated, at)?;
    table.occupy(reservation.id(), at);
    Ok(())
}

/// Returns the reservation seated at `table`.
///
/// # Errors
///
/// Returns [`SeatingError::TableNotOccupied`] when the table is free.
pub fn check_finish(table: &DiningTable) -> Result<ReservationId, SeatingError> {
    table
        .reservation_id()
        .ok_or(SeatingError::TableNotOccupied(table.id()))
}

/// Releases `table` and finishes the reservation it held.
///
/// Neither record changes when an error is returned.
///
/// # Errors
///
/// Returns [`SeatingError::TableNotOccupied`] for a free table,
/// [`SeatingError::NotSeatedHere`] when the table holds another reservation,
/// or [`SeatingError::Lifecycle`] when the reservation is not seated.
pub fn finish(
    table: &mut DiningTable,
    reservation: &mut Reservation,
    at: DateTime<Utc>,
) -> Result<(), SeatingError> {
    let held = check_finish(table)?;
    if held != reservation.id() {
        return Err(SeatingError::NotSeatedHere {
            table_id: table.id(),
            reservation_id: reservation.id(),
        });
    }
    reservation.transition_at(ReservationStatus::Finished, at)?;
    table.release(at);
    Ok(())
}
