//! Domain model for reservations.
//!
//! The reservation domain models guest details, party size, the booking
//! slot, and the status state machine while keeping storage concerns outside
//! the domain boundary.

mod contact;
mod error;
mod ids;
mod policy;
mod reservation;
mod status;

pub use contact::{GuestName, MobileNumber, digits_only};
pub use error::{
    HoursViolation, ParseReservationIdError, ParseReservationStatusError, ReservationRuleError,
};
pub use ids::{PartySize, ReservationId};
pub use policy::ReservationPolicy;
pub use reservation::{PersistedReservationData, Reservation, ReservationDraft};
pub use status::ReservationStatus;
