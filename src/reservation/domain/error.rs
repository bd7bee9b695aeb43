//! Error types for reservation validation and lifecycle rules.

use super::{ReservationId, ReservationStatus};
use crate::error::FailureKind;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;
use thiserror::Error;

/// Rejections raised while validating or mutating a reservation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReservationRuleError {
    /// One or more required fields are absent or blank.
    #[error("missing required field(s): {}", .0.join(", "))]
    MissingField(Vec<String>),

    /// The payload carries fields outside the reservation allow-list.
    #[error("invalid field(s): {}", .0.join(", "))]
    UnknownField(Vec<String>),

    /// A text field holds a non-text value.
    #[error("{field} must be text")]
    InvalidFieldType {
        /// Offending field name.
        field: &'static str,
    },

    /// The party size is not a positive integer.
    #[error("invalid number of people: {0}")]
    InvalidPeopleCount(String),

    /// The reservation date or time does not parse.
    #[error("invalid {field}: '{value}'")]
    InvalidDateTime {
        /// Offending field name.
        field: &'static str,
        /// Raw submitted value.
        value: String,
    },

    /// The reservation falls on a day the restaurant is closed.
    #[error("restaurant is closed on {weekday}s ({date})")]
    RestaurantClosed {
        /// Requested date.
        date: NaiveDate,
        /// English weekday name.
        weekday: &'static str,
    },

    /// The reservation slot is not strictly in the future.
    #[error("reservation must be set in the future, got {requested}")]
    ReservationInPast {
        /// Requested slot in restaurant local time.
        requested: NaiveDateTime,
    },

    /// The reservation time falls outside operating hours.
    #[error("{0}")]
    OutsideOperatingHours(HoursViolation),

    /// A new reservation was submitted with a status other than booked.
    #[error("new reservations must start as booked, got {0}")]
    InvalidInitialStatus(ReservationStatus),

    /// The status value is not one of the known statuses.
    #[error("unknown reservation status: {0}")]
    UnknownStatus(String),

    /// The reservation is finished or cancelled and cannot change.
    #[error("reservation {id} is {status} and can no longer be updated")]
    ReservationFinalized {
        /// Reservation identifier.
        id: ReservationId,
        /// Terminal status.
        status: ReservationStatus,
    },

    /// The requested status change is not permitted.
    #[error("reservation {id} cannot move from {from} to {to}")]
    InvalidStatusTransition {
        /// Reservation identifier.
        id: ReservationId,
        /// Current status.
        from: ReservationStatus,
        /// Requested status.
        to: ReservationStatus,
    },
}

impl ReservationRuleError {
    /// Builds a [`Self::MissingField`] for a single field.
    #[must_use]
    pub fn missing(field: &str) -> Self {
        Self::MissingField(vec![field.to_owned()])
    }

    /// Classifies the rejection for the request layer.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::ReservationFinalized { .. } | Self::InvalidStatusTransition { .. } => {
                FailureKind::Conflict
            }
            _ => FailureKind::Validation,
        }
    }
}

/// Which side of the operating window a reservation time fell on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoursViolation {
    /// Earlier than the opening time.
    TooEarly {
        /// First bookable time.
        opens_at: NaiveTime,
    },
    /// Later than the last seating.
    TooLate {
        /// Last bookable time.
        last_seating: NaiveTime,
    },
}

impl fmt::Display for HoursViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooEarly { opens_at } => write!(
                f,
                "restaurant does not open until {}",
                opens_at.format("%H:%M")
            ),
            Self::TooLate { last_seating } => write!(
                f,
                "a reservation cannot be scheduled after {}",
                last_seating.format("%H:%M")
            ),
        }
    }
}

/// Error returned while parsing reservation statuses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown reservation status: {0}")]
pub struct ParseReservationStatusError(pub String);

/// Error returned while parsing reservation identifiers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid reservation identifier: {0}")]
pub struct ParseReservationIdError(pub String);
