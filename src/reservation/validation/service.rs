//! Validation service assembling the ordered rule lists.

use super::{
    fields::{self, MOBILE_NUMBER, PEOPLE, RESERVATION_DATE, RESERVATION_TIME, STATUS},
    rules::{self, Rule, RuleContext, ValidationIntent},
    ReservationPayload,
};
use crate::reservation::domain::{
    GuestName, MobileNumber, Reservation, ReservationDraft, ReservationPolicy,
    ReservationRuleError, ReservationStatus,
};
use chrono::{DateTime, Utc};

/// Rules for full reservation records, in evaluation order.
const RECORD_RULES: [Rule; 10] = [
    rules::require_fields,
    rules::allow_known_fields,
    rules::check_text_fields,
    rules::check_people,
    rules::check_date_time,
    rules::check_open_day,
    rules::check_future,
    rules::check_operating_hours,
    rules::check_initial_status,
    rules::check_status_value,
];

/// Rules for status-only changes, in evaluation order.
const STATUS_RULES: [Rule; 3] = [
    rules::require_status,
    rules::allow_known_fields,
    rules::check_status_value,
];

/// Validates and normalizes reservation payloads.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use maitre::reservation::domain::ReservationStatus;
/// use maitre::reservation::validation::ReservationValidator;
/// use serde_json::json;
///
/// let payload = json!({
///     "first_name": "Rick",
///     "last_name": "Sanchez",
///     "mobile_number": "202-555-0164",
///     "reservation_date": "2099-01-01",
///     "reservation_time": "19:30",
///     "people": 4
/// });
/// let payload = payload.as_object().cloned().unwrap_or_default();
/// let now = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
///
/// let draft = ReservationValidator::new()
///     .validate_create(&payload, now)
///     .expect("valid reservation");
/// assert_eq!(draft.status, ReservationStatus::Booked);
/// assert_eq!(draft.people.value(), 4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReservationValidator {
    policy: ReservationPolicy,
}

impl ReservationValidator {
    /// Creates a validator with the default policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a validator with a custom policy.
    #[must_use]
    pub const fn with_policy(policy: ReservationPolicy) -> Self {
        Self { policy }
    }

    /// Returns the active policy.
    #[must_use]
    pub const fn policy(&self) -> &ReservationPolicy {
        &self.policy
    }

    /// Validates a payload for a new reservation.
    ///
    /// An omitted status defaults to booked.
    ///
    /// # Errors
    ///
    /// Returns the first [`ReservationRuleError`] raised by the rule list.
    pub fn validate_create(
        &self,
        payload: &ReservationPayload,
        now: DateTime<Utc>,
    ) -> Result<ReservationDraft, ReservationRuleError> {
        let ctx = RuleContext {
            submitted: payload,
            candidate: payload,
            intent: ValidationIntent::Create,
            policy: &self.policy,
            now,
        };
        rules::run(&RECORD_RULES, &ctx)?;
        normalize(payload, ReservationStatus::Booked)
    }

    /// Validates a (possibly partial) edit of a stored reservation.
    ///
    /// Terminal reservations are rejected before the payload is inspected.
    /// Submitted fields are overlaid on the stored record and the merged
    /// record must satisfy every rule.
    ///
    /// # Errors
    ///
    /// Returns [`ReservationRuleError::ReservationFinalized`] for terminal
    /// reservations, otherwise the first error raised by the rule list.
    pub fn validate_update(
        &self,
        existing: &Reservation,
        payload: &ReservationPayload,
        now: DateTime<Utc>,
    ) -> Result<ReservationDraft, ReservationRuleError> {
        existing.ensure_mutable()?;
        let candidate = fields::merge(fields::payload_from_reservation(existing), payload);
        let ctx = RuleContext {
            submitted: payload,
            candidate: &candidate,
            intent: ValidationIntent::Update,
            policy: &self.policy,
            now,
        };
        rules::run(&RECORD_RULES, &ctx)?;
        normalize(&candidate, existing.status())
    }

    /// Validates a payload that only sets the status.
    ///
    /// # Errors
    ///
    /// Returns [`ReservationRuleError::ReservationFinalized`] for terminal
    /// reservations, otherwise the first error raised by the rule list.
    pub fn validate_status_change(
        &self,
        existing: &Reservation,
        payload: &ReservationPayload,
        now: DateTime<Utc>,
    ) -> Result<ReservationStatus, ReservationRuleError> {
        existing.ensure_mutable()?;
        let ctx = RuleContext {
            submitted: payload,
            candidate: payload,
            intent: ValidationIntent::Update,
            policy: &self.policy,
            now,
        };
        rules::run(&STATUS_RULES, &ctx)?;
        fields::present(payload, STATUS)
            .map_or_else(|| Err(ReservationRuleError::missing(STATUS)), rules::parse_status)
    }
}

fn normalize(
    candidate: &ReservationPayload,
    fallback_status: ReservationStatus,
) -> Result<ReservationDraft, ReservationRuleError> {
    let status = match fields::present(candidate, STATUS) {
        Some(value) => rules::parse_status(value)?,
        None => fallback_status,
    };
    Ok(ReservationDraft {
        first_name: GuestName::new(fields::FIRST_NAME, text(candidate, fields::FIRST_NAME)?)?,
        last_name: GuestName::new(fields::LAST_NAME, text(candidate, fields::LAST_NAME)?)?,
        mobile_number: MobileNumber::new(text(candidate, MOBILE_NUMBER)?)?,
        reservation_date: rules::parse_date(value_of(candidate, RESERVATION_DATE)?)?,
        reservation_time: rules::parse_time(value_of(candidate, RESERVATION_TIME)?)?,
        people: rules::parse_people(value_of(candidate, PEOPLE)?)?,
        status,
    })
}

fn value_of<'a>(
    candidate: &'a ReservationPayload,
    field: &str,
) -> Result<&'a serde_json::Value, ReservationRuleError> {
    fields::present(candidate, field).ok_or_else(|| ReservationRuleError::missing(field))
}

fn text<'a>(
    candidate: &'a ReservationPayload,
    field: &'static str,
) -> Result<&'a str, ReservationRuleError> {
    value_of(candidate, field)?
        .as_str()
        .ok_or(ReservationRuleError::InvalidFieldType { field })
}
