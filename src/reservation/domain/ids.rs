//! Identifier and validated scalar types for the reservation domain.

use super::{ParseReservationIdError, ReservationRuleError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservationId(Uuid);

impl ReservationId {
    /// Creates a new random reservation identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a reservation identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for ReservationId {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<Uuid> for ReservationId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl FromStr for ReservationId {
    type Err = ParseReservationIdError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value.trim())
            .map(Self)
            .map_err(|_| ParseReservationIdError(value.to_owned()))
    }
}

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Number of guests in a party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PartySize(u32);

impl PartySize {
    /// Largest party size representable in the current `PostgreSQL` schema.
    const MAX_PERSISTED_VALUE: u64 = i32::MAX as u64;

    /// Creates a validated party size.
    ///
    /// # Errors
    ///
    /// Returns [`ReservationRuleError::InvalidPeopleCount`] when the value is
    /// zero or exceeds the schema-backed maximum (`i32::MAX`).
    pub fn new(value: u64) -> Result<Self, ReservationRuleError> {
        if value == 0 || value > Self::MAX_PERSISTED_VALUE {
            return Err(ReservationRuleError::InvalidPeopleCount(value.to_string()));
        }
        u32::try_from(value)
            .map(Self)
            .map_err(|_| ReservationRuleError::InvalidPeopleCount(value.to_string()))
    }

    /// Returns the number of guests.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for PartySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
