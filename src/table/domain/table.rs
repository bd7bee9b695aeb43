//! Table aggregate root.

use super::{TableCapacity, TableId, TableName};
use crate::reservation::domain::ReservationId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::Serialize;

/// Validated fields for a new table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTableDraft {
    /// Display name.
    pub table_name: TableName,
    /// Number of seats.
    pub capacity: TableCapacity,
}

/// Table aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiningTable {
    id: TableId,
    table_name: TableName,
    capacity: TableCapacity,
    reservation_id: Option<ReservationId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTableData {
    /// Persisted table identifier.
    pub id: TableId,
    /// Persisted display name.
    pub table_name: TableName,
    /// Persisted capacity.
    pub capacity: TableCapacity,
    /// Reservation currently seated, if any.
    pub reservation_id: Option<ReservationId>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl DiningTable {
    /// Creates a free table.
    #[must_use]
    pub fn new(draft: NewTableDraft, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TableId::new(),
            table_name: draft.table_name,
            capacity: draft.capacity,
            reservation_id: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a table from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTableData) -> Self {
        Self {
            id: data.id,
            table_name: data.table_name,
            capacity: data.capacity,
            reservation_id: data.reservation_id,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the table identifier.
    #[must_use]
    pub const fn id(&self) -> TableId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub const fn table_name(&self) -> &TableName {
        &self.table_name
    }

    /// Returns the number of seats.
    #[must_use]
    pub const fn capacity(&self) -> TableCapacity {
        self.capacity
    }

    /// Returns the seated reservation, if any.
    #[must_use]
    pub const fn reservation_id(&self) -> Option<ReservationId> {
        self.reservation_id
    }

    /// Returns `true` when no reservation is seated.
    #[must_use]
    pub const fn is_free(&self) -> bool {
        self.reservation_id.is_none()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub(super) fn occupy(&mut self, reservation_id: ReservationId, at: DateTime<Utc>) {
        self.reservation_id = Some(reservation_id);
        self.updated_at = at;
    }

    pub(super) fn release(&mut self, at: DateTime<Utc>) {
        self.reservation_id = None;
        self.updated_at = at;
    }
}
