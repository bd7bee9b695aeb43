//! Reservation aggregate root.

use super::{
    GuestName, MobileNumber, PartySize, ReservationId, ReservationRuleError, ReservationStatus,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use mockable::Clock;
use serde::Serialize;

/// Normalized reservation fields produced by the validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationDraft {
    /// Guest first name.
    pub first_name: GuestName,
    /// Guest last name.
    pub last_name: GuestName,
    /// Guest phone number.
    pub mobile_number: MobileNumber,
    /// Booked calendar date.
    pub reservation_date: NaiveDate,
    /// Booked time of day.
    pub reservation_time: NaiveTime,
    /// Party size.
    pub people: PartySize,
    /// Requested status; always booked for new reservations.
    pub status: ReservationStatus,
}

/// Reservation aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reservation {
    id: ReservationId,
    first_name: GuestName,
    last_name: GuestName,
    mobile_number: MobileNumber,
    reservation_date: NaiveDate,
    reservation_time: NaiveTime,
    people: PartySize,
    status: ReservationStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted reservation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedReservationData {
    /// Persisted reservation identifier.
    pub id: ReservationId,
    /// Persisted guest first name.
    pub first_name: GuestName,
    /// Persisted guest last name.
    pub last_name: GuestName,
    /// Persisted phone number.
    pub mobile_number: MobileNumber,
    /// Persisted date.
    pub reservation_date: NaiveDate,
    /// Persisted time of day.
    pub reservation_time: NaiveTime,
    /// Persisted party size.
    pub people: PartySize,
    /// Persisted status.
    pub status: ReservationStatus,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    /// Creates a booked reservation from validated fields.
    #[must_use]
    pub fn new(draft: ReservationDraft, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: ReservationId::new(),
            first_name: draft.first_name,
            last_name: draft.last_name,
            mobile_number: draft.mobile_number,
            reservation_date: draft.reservation_date,
            reservation_time: draft.reservation_time,
            people: draft.people,
            status: ReservationStatus::Booked,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a reservation from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedReservationData) -> Self {
        Self {
            id: data.id,
            first_name: data.first_name,
            last_name: data.last_name,
            mobile_number: data.mobile_number,
            reservation_date: data.reservation_date,
            reservation_time: data.reservation_time,
            people: data.people,
            status: data.status,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the reservation identifier.
    #[must_use]
    pub const fn id(&self) -> ReservationId {
        self.id
    }

    /// Returns the guest first name.
    #[must_use]
    pub const fn first_name(&self) -> &GuestName {
        &self.first_name
    }

    /// Returns the guest last name.
    #[must_use]
    pub const fn last_name(&self) -> &GuestName {
        &self.last_name
    }

    /// Returns the guest phone number.
    #[must_use]
    pub const fn mobile_number(&self) -> &MobileNumber {
        &self.mobile_number
    }

    /// Returns the booked date.
    #[must_use]
    pub const fn reservation_date(&self) -> NaiveDate {
        self.reservation_date
    }

    /// Returns the booked time of day.
    #[must_use]
    pub const fn reservation_time(&self) -> NaiveTime {
        self.reservation_time
    }

    /// Returns the booked date and time combined.
    #[must_use]
    pub const fn slot(&self) -> NaiveDateTime {
        NaiveDateTime::new(self.reservation_date, self.reservation_time)
    }

    /// Returns the party size.
    #[must_use]
    pub const fn people(&self) -> PartySize {
        self.people
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> ReservationStatus {
        self.status
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

    /// Fails when the reservation is in a terminal status.
    ///
    /// # Errors
    ///
    /// Returns [`ReservationRuleError::ReservationFinalized`] for finished and
    /// cancelled reservations.
    pub const fn ensure_mutable(&self) -> Result<(), ReservationRuleError> {
        if self.status.is_terminal() {
            return Err(ReservationRuleError::ReservationFinalized {
                id: self.id,
                status: self.status,
            });
        }
        Ok(())
    }

    /// Replaces the editable fields with a validated draft.
    ///
    /// A status in the draft that differs from the current one must be a
    /// manual change the state machine allows.
    ///
    /// # Errors
    ///
    /// Returns [`ReservationRuleError::ReservationFinalized`] when the
    /// reservation is terminal, or
    /// [`ReservationRuleError::InvalidStatusTransition`] for a disallowed
    /// status change.
    pub fn revise(
        &mut self,
        draft: ReservationDraft,
        clock: &impl Clock,
    ) -> Result<(), ReservationRuleError> {
        self.ensure_mutable()?;
        self.ensure_manual_change(draft.status)?;

        self.first_name = draft.first_name;
        self.last_name = draft.last_name;
        self.mobile_number = draft.mobile_number;
        self.reservation_date = draft.reservation_date;
        self.reservation_time = draft.reservation_time;
        self.people = draft.people;
        self.status = draft.status;
        self.touch(clock.utc());
        Ok(())
    }

    /// Sets the status directly, as staff do when cancelling.
    ///
    /// Setting the current status again is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`ReservationRuleError::ReservationFinalized`] when the
    /// reservation is terminal, or
    /// [`ReservationRuleError::InvalidStatusTransition`] for statuses that
    /// only table assignment may set.
    pub fn change_status(
        &mut self,
        next: ReservationStatus,
        clock: &impl Clock,
    ) -> Result<(), ReservationRuleError> {
        self.ensure_mutable()?;
        if next == self.status {
            return Ok(());
        }
        self.ensure_manual_change(next)?;
        self.status = next;
        self.touch(clock.utc());
        Ok(())
    }

    /// Cancels a booked reservation.
    ///
    /// # Errors
    ///
    /// See [`Self::change_status`].
    pub fn cancel(&mut self, clock: &impl Clock) -> Result<(), ReservationRuleError> {
        self.change_status(ReservationStatus::Cancelled, clock)
    }

    /// Moves along the state machine at the given instant.
    ///
    /// Used by table assignment, which stamps both records with one instant.
    ///
    /// # Errors
    ///
    /// Returns [`ReservationRuleError::ReservationFinalized`] when the
    /// reservation is terminal, or
    /// [`ReservationRuleError::InvalidStatusTransition`] when the state
    /// machine has no such edge.
    pub fn transition_at(
        &mut self,
        next: ReservationStatus,
        at: DateTime<Utc>,
    ) -> Result<(), ReservationRuleError> {
        self.ensure_mutable()?;
        if !self.status.can_transition_to(next) {
            return Err(self.transition_error(next));
        }
        self.status = next;
        self.touch(at);
        Ok(())
    }

    fn ensure_manual_change(&self, next: ReservationStatus) -> Result<(), ReservationRuleError> {
        if next != self.status && !self.status.allows_manual_change_to(next) {
            return Err(self.transition_error(next));
        }
        Ok(())
    }

    const fn transition_error(&self, to: ReservationStatus) -> ReservationRuleError {
        ReservationRuleError::InvalidStatusTransition {
            id: self.id,
            from: self.status,
            to,
        }
    }

    fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
}
