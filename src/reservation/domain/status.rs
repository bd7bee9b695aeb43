//! Reservation status state machine.

use super::ParseReservationStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reservation lifecycle status.
///
/// ```text
/// booked --(seat)--> seated --(finish)--> finished
/// booked --(cancel)--> cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    /// Awaiting the party's arrival.
    #[default]
    Booked,
    /// The party occupies a table.
    Seated,
    /// The party has left and the table was released.
    Finished,
    /// The booking was called off.
    Cancelled,
}

impl ReservationStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 4] = [Self::Booked, Self::Seated, Self::Finished, Self::Cancelled];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Booked => "booked",
            Self::Seated => "seated",
            Self::Finished => "finished",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns `true` for statuses with no outgoing transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Finished | Self::Cancelled)
    }

    /// Returns `true` when the state machine permits moving to `next`.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Booked, Self::Seated | Self::Cancelled) | (Self::Seated, Self::Finished)
        )
    }

    /// Returns `true` when staff may set `next` directly on a reservation.
    ///
    /// Seating and finishing always go through table assignment so the table
    /// record changes with the reservation.
    #[must_use]
    pub const fn allows_manual_change_to(self, next: Self) -> bool {
        matches!((self, next), (Self::Booked, Self::Cancelled))
    }
}

impl TryFrom<&str> for ReservationStatus {
    type Error = ParseReservationStatusError;

    /// Accepts only the exact lowercase names; no trimming or case folding.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| ParseReservationStatusError(value.to_owned()))
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
