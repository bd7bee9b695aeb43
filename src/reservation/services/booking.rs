//! Service layer for creating, editing, and listing reservations.

use crate::error::FailureKind;
use crate::reservation::{
    domain::{
        Reservation, ReservationId, ReservationPolicy, ReservationRuleError, ReservationStatus,
    },
    ports::{ReservationRepository, ReservationRepositoryError},
    validation::{ReservationPayload, ReservationValidator},
};
use chrono::NaiveDate;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Selects which reservations the dashboard lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReservationQuery {
    /// Active reservations on a date, ordered by time.
    ForDate(NaiveDate),
    /// Reservations whose phone number contains the given digits.
    ByPhone(String),
}

/// Service-level errors for reservation operations.
#[derive(Debug, Error)]
pub enum ReservationServiceError {
    /// A validation or lifecycle rule rejected the request.
    #[error(transparent)]
    Rule(#[from] ReservationRuleError),

    /// The reservation does not exist.
    #[error("reservation not found: {0}")]
    NotFound(ReservationId),

    /// The reservation still occupies a table.
    #[error("reservation {0} is seated; finish its table before deleting it")]
    StillSeated(ReservationId),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] ReservationRepositoryError),
}

impl ReservationServiceError {
    /// Classifies the failure for the request layer.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::Rule(err) => err.kind(),
            Self::NotFound(_) | Self::Repository(ReservationRepositoryError::NotFound(_)) => {
                FailureKind::NotFound
            }
            Self::StillSeated(_)
            | Self::Repository(
                ReservationRepositoryError::DuplicateReservation(_)
                | ReservationRepositoryError::StatusChanged { .. },
            ) => {
                FailureKind::Conflict
            }
            Self::Repository(ReservationRepositoryError::Persistence(_)) => {
                FailureKind::Persistence
            }
        }
    }
}

/// Result type for reservation service operations.
pub type ReservationServiceResult<T> = Result<T, ReservationServiceError>;

/// Reservation orchestration service.
#[derive(Clone)]
pub struct ReservationService<R, C>
where
    R: ReservationRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    validator: ReservationValidator,
}

impl<R, C> ReservationService<R, C>
where
    R: ReservationRepository,
    C: Clock + Send + Sync,
{
    /// Creates a service using the default reservation policy.
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            repository,
            clock,
            validator: ReservationValidator::new(),
        }
    }

    /// Replaces the reservation policy.
    #[must_use]
    pub fn with_policy(mut self, policy: ReservationPolicy) -> Self {
        self.validator = ReservationValidator::with_policy(policy);
        self
    }

    /// Validates a payload and stores a new booked reservation.
    ///
    /// # Errors
    ///
    /// Returns [`ReservationServiceError::Rule`] when validation fails or
    /// [`ReservationServiceError::Repository`] when storage rejects it.
    pub async fn create(
        &self,
        payload: &ReservationPayload,
    ) -> ReservationServiceResult<Reservation> {
        let draft = self
            .validator
            .validate_create(payload, self.clock.utc())
            .inspect_err(|err| log_rejection("create", err))?;
        let reservation = Reservation::new(draft, &*self.clock);
        self.repository.store_reservation(&reservation).await?;
        tracing::info!(
            reservation_id = %reservation.id(),
            slot = %reservation.slot(),
            people = reservation.people().value(),
            "reservation booked"
        );
        Ok(reservation)
    }

    /// Loads a reservation.
    ///
    /// # Errors
    ///
    /// Returns [`ReservationServiceError::NotFound`] when it does not exist.
    pub async fn find(&self, id: ReservationId) -> ReservationServiceResult<Reservation> {
        self.repository
            .find_reservation(id)
            .await?
            .ok_or(ReservationServiceError::NotFound(id))
    }

    /// Applies a (possibly partial) edit to a reservation.
    ///
    /// # Errors
    ///
    /// Returns [`ReservationServiceError::NotFound`] for unknown reservations
    /// and [`ReservationServiceError::Rule`] when the edit is rejected,
    /// including every edit of a finished or cancelled reservation.
    /// Returns [`ReservationServiceError::Repository`] with
    /// [`ReservationRepositoryError::StatusChanged`] when a seat or finish
    /// committed after the reservation was loaded.
    pub async fn update(
        &self,
        id: ReservationId,
        payload: &ReservationPayload,
    ) -> ReservationServiceResult<Reservation> {
        let mut reservation = self.find(id).await?;
        let loaded_status = reservation.status();
        let draft = self
            .validator
            .validate_update(&reservation, payload, self.clock.utc())
            .inspect_err(|err| log_rejection("update", err))?;
        reservation
            .revise(draft, &*self.clock)
            .inspect_err(|err| log_rejection("update", err))?;
        self.repository
            .update_reservation(&reservation, loaded_status)
            .await
            .inspect_err(log_conflict)?;
        tracing::info!(reservation_id = %id, "reservation updated");
        Ok(reservation)
    }

    /// Sets a reservation's status from a `{"status": ...}` payload.
    ///
    /// # Errors
    ///
    /// Returns [`ReservationServiceError::NotFound`] for unknown reservations
    /// and [`ReservationServiceError::Rule`] for missing, unknown, or
    /// disallowed statuses.
    pub async fn update_status(
        &self,
        id: ReservationId,
        payload: &ReservationPayload,
    ) -> ReservationServiceResult<Reservation> {
        let mut reservation = self.find(id).await?;
        let status = self
            .validator
            .validate_status_change(&reservation, payload, self.clock.utc())
            .inspect_err(|err| log_rejection("update_status", err))?;
        self.apply_status(&mut reservation, status).await?;
        Ok(reservation)
    }

    /// Cancels a booked reservation.
    ///
    /// # Errors
    ///
    /// Returns [`ReservationServiceError::NotFound`] for unknown reservations
    /// and [`ReservationServiceError::Rule`] unless the reservation is booked.
    pub async fn cancel(&self, id: ReservationId) -> ReservationServiceResult<Reservation> {
        let mut reservation = self.find(id).await?;
        self.apply_status(&mut reservation, ReservationStatus::Cancelled)
            .await?;
        Ok(reservation)
    }

    /// Deletes a reservation that is not currently seated.
    ///
    /// # Errors
    ///
    /// Returns [`ReservationServiceError::NotFound`] for unknown reservations
    /// and [`ReservationServiceError::StillSeated`] while a table holds it.
    pub async fn destroy(&self, id: ReservationId) -> ReservationServiceResult<()> {
        let reservation = self.find(id).await?;
        if reservation.status() == ReservationStatus::Seated {
            return Err(ReservationServiceError::StillSeated(id));
        }
        self.repository
            .delete_reservation(id, reservation.status())
            .await
            .inspect_err(log_conflict)?;
        tracing::info!(reservation_id = %id, "reservation deleted");
        Ok(())
    }

    /// Lists reservations for the dashboard.
    ///
    /// # Errors
    ///
    /// Returns [`ReservationServiceError::Repository`] when lookup fails.
    pub async fn list(&self, query: &ReservationQuery) -> ReservationServiceResult<Vec<Reservation>> {
        match query {
            ReservationQuery::ForDate(date) => self.list_for_date(*date).await,
            ReservationQuery::ByPhone(fragment) => self.search_by_phone(fragment).await,
        }
    }

    /// Lists active reservations on `date` ordered by time.
    ///
    /// # Errors
    ///
    /// Returns [`ReservationServiceError::Repository`] when lookup fails.
    pub async fn list_for_date(
        &self,
        date: NaiveDate,
    ) -> ReservationServiceResult<Vec<Reservation>> {
        Ok(self.repository.list_reservations_by_date(date).await?)
    }

    /// Finds reservations by a fragment of the guest's phone number.
    ///
    /// Punctuation in the fragment and in stored numbers is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ReservationServiceError::Repository`] when lookup fails.
    pub async fn search_by_phone(
        &self,
        fragment: &str,
    ) -> ReservationServiceResult<Vec<Reservation>> {
        Ok(self.repository.search_reservations_by_phone(fragment).await?)
    }

    async fn apply_status(
        &self,
        reservation: &mut Reservation,
        status: ReservationStatus,
    ) -> ReservationServiceResult<()> {
        let previous = reservation.status();
        reservation
            .change_status(status, &*self.clock)
            .inspect_err(|err| log_rejection("update_status", err))?;
        self.repository
            .update_reservation(reservation, previous)
            .await
            .inspect_err(log_conflict)?;
        tracing::info!(
            reservation_id = %reservation.id(),
            from = %previous,
            to = %status,
            "reservation status changed"
        );
        Ok(())
    }
}

fn log_conflict(err: &ReservationRepositoryError) {
    if let ReservationRepositoryError::StatusChanged {
        id,
        expected,
        actual,
    } = err
    {
        tracing::warn!(
            reservation_id = %id,
            expected = %expected,
            actual = %actual,
            "reservation changed by a concurrent seat or finish"
        );
    }
}

fn log_rejection(operation: &'static str, err: &ReservationRuleError) {
    tracing::debug!(operation, kind = %err.kind(), error = %err, "reservation rejected");
}
