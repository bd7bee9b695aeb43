//! Error types for table validation and seating rules.

use super::{TableCapacity, TableId};
use crate::error::FailureKind;
use crate::reservation::domain::{
    PartySize, ReservationId, ReservationRuleError, ReservationStatus,
};
use thiserror::Error;

/// Rejections raised while validating a new table.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TableRuleError {
    /// One or more required fields are absent or blank.
    #[error("missing required field(s): {}", .0.join(", "))]
    MissingField(Vec<String>),

    /// The payload carries fields outside the table allow-list.
    #[error("invalid field(s): {}", .0.join(", "))]
    UnknownField(Vec<String>),

    /// A field holds a value of the wrong JSON type.
    #[error("{field} must be text")]
    InvalidFieldType {
        /// Offending field name.
        field: &'static str,
    },

    /// The capacity is not a positive integer.
    #[error("invalid number for capacity: {0}")]
    InvalidCapacity(String),

    /// The table name is shorter than two characters.
    #[error("table_name needs to be more than one character, got '{0}'")]
    TableNameTooShort(String),

    /// A new table was submitted already holding a reservation.
    #[error("new tables must be free; seat reservations through table assignment")]
    TableNotFree,
}

impl TableRuleError {
    /// Classifies the rejection for the request layer.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        FailureKind::Validation
    }
}

/// Rejections raised by the seat and finish operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SeatingError {
    /// The seat payload lacks a reservation reference.
    #[error("missing required field(s): {0}")]
    MissingField(&'static str),

    /// The referenced reservation does not exist.
    #[error("reservation not found: {0}")]
    ReservationNotFound(String),

    /// The referenced table does not exist.
    #[error("table not found: {0}")]
    TableNotFound(TableId),

    /// The table already holds a reservation.
    #[error("table {table_id} is occupied by reservation {reservation_id}")]
    TableOccupied {
        /// Requested table.
        table_id: TableId,
        /// Reservation currently seated there.
        reservation_id: ReservationId,
    },

    /// The party is larger than the table.
    #[error("reservation for {people} is greater than table capacity {capacity}")]
    CapacityExceeded {
        /// Party size.
        people: PartySize,
        /// Table capacity.
        capacity: TableCapacity,
    },

    /// The reservation is already seated.
    #[error("reservation {0} is already seated")]
    AlreadySeated(ReservationId),

    /// The reservation is finished or cancelled.
    #[error("reservation {id} is {status} and cannot be seated")]
    ReservationFinalized {
        /// Reservation identifier.
        id: ReservationId,
        /// Terminal status.
        status: ReservationStatus,
    },

    /// The table is free.
    #[error("table {0} is not occupied")]
    TableNotOccupied(TableId),

    /// The table holds a different reservation than the one being finished.
    #[error("table {table_id} does not hold reservation {reservation_id}")]
    NotSeatedHere {
        /// Table being finished.
        table_id: TableId,
        /// Reservation the caller expected.
        reservation_id: ReservationId,
    },

    /// The reservation refused the status change.
    #[error(transparent)]
    Lifecycle(#[from] ReservationRuleError),
}

impl SeatingError {
    /// Classifies the rejection for the request layer.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::MissingField(_) | Self::CapacityExceeded { .. } => FailureKind::Validation,
            Self::ReservationNotFound(_) | Self::TableNotFound(_) => FailureKind::NotFound,
            Self::TableOccupied { .. }
            | Self::AlreadySeated(_)
            | Self::ReservationFinalized { .. }
            | Self::TableNotOccupied(_)
            | Self::NotSeatedHere { .. } => FailureKind::Conflict,
            Self::Lifecycle(err) => err.kind(),
        }
    }
}

/// Error returned while parsing table identifiers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid table identifier: {0}")]
pub struct ParseTableIdError(pub String);
