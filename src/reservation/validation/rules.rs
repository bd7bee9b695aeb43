//! Individual validation rule implementations.
//!
//! Each rule is a pure function that inspects one aspect of a payload.
//! Rules return `Ok(())` on success or a specific [`ReservationRuleError`]
//! on failure, and read everything they need from the [`RuleContext`].

use super::fields::{
    self, ALLOWED_FIELDS, DATE_FORMAT, PEOPLE, REQUIRED_FIELDS, RESERVATION_DATE,
    RESERVATION_TIME, ReservationPayload, STATUS, TEXT_FIELDS,
};
use crate::reservation::domain::{
    HoursViolation, PartySize, ReservationPolicy, ReservationRuleError, ReservationStatus,
};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc, Weekday};
use serde_json::Value;

/// Whether a payload creates a reservation or edits a stored one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationIntent {
    /// A new reservation.
    Create,
    /// A change to an existing reservation.
    Update,
}

/// Everything a rule may inspect.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// Keys and values exactly as the client sent them.
    pub submitted: &'a ReservationPayload,
    /// The record that would result: the submitted payload for creates, or
    /// the stored record overlaid with the submitted payload for updates.
    pub candidate: &'a ReservationPayload,
    /// Create or update.
    pub intent: ValidationIntent,
    /// Booking window and closures.
    pub policy: &'a ReservationPolicy,
    /// Instant the request arrived.
    pub now: DateTime<Utc>,
}

/// A single validation step.
pub type Rule = fn(&RuleContext<'_>) -> Result<(), ReservationRuleError>;

/// Runs `rules` in order, stopping at the first failure.
///
/// # Errors
///
/// Returns the error of the first failing rule.
pub fn run(rules: &[Rule], ctx: &RuleContext<'_>) -> Result<(), ReservationRuleError> {
    rules.iter().try_for_each(|rule| rule(ctx))
}

/// Requires every mandatory field to be present and non-blank.
///
/// # Errors
///
/// Returns [`ReservationRuleError::MissingField`] naming every missing field.
pub fn require_fields(ctx: &RuleContext<'_>) -> Result<(), ReservationRuleError> {
    let missing: Vec<String> = REQUIRED_FIELDS
        .iter()
        .filter(|field| fields::is_blank(ctx.candidate.get(**field)))
        .map(|field| (*field).to_owned())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ReservationRuleError::MissingField(missing))
    }
}

/// Rejects keys outside the reservation allow-list.
///
/// # Errors
///
/// Returns [`ReservationRuleError::UnknownField`] naming every unknown key.
pub fn allow_known_fields(ctx: &RuleContext<'_>) -> Result<(), ReservationRuleError> {
    let unknown: Vec<String> = ctx
        .submitted
        .keys()
        .filter(|key| !ALLOWED_FIELDS.contains(&key.as_str()))
        .cloned()
        .collect();
    if unknown.is_empty() {
        Ok(())
    } else {
        Err(ReservationRuleError::UnknownField(unknown))
    }
}

/// Requires names and phone number to be JSON strings.
///
/// # Errors
///
/// Returns [`ReservationRuleError::InvalidFieldType`] for the first
/// non-text field.
pub fn check_text_fields(ctx: &RuleContext<'_>) -> Result<(), ReservationRuleError> {
    TEXT_FIELDS
        .into_iter()
        .try_for_each(|field| match fields::present(ctx.candidate, field) {
            Some(value) if !value.is_string() => {
                Err(ReservationRuleError::InvalidFieldType { field })
            }
            _ => Ok(()),
        })
}

/// Requires a positive integer party size.
///
/// # Errors
///
/// Returns [`ReservationRuleError::InvalidPeopleCount`].
pub fn check_people(ctx: &RuleContext<'_>) -> Result<(), ReservationRuleError> {
    parse_people(field_or_null(ctx.candidate, PEOPLE)).map(|_| ())
}

/// Requires a real calendar date and a 24-hour time.
///
/// # Errors
///
/// Returns [`ReservationRuleError::InvalidDateTime`] naming the bad field.
pub fn check_date_time(ctx: &RuleContext<'_>) -> Result<(), ReservationRuleError> {
    parse_date(field_or_null(ctx.candidate, RESERVATION_DATE))?;
    parse_time(field_or_null(ctx.candidate, RESERVATION_TIME))?;
    Ok(())
}

/// Rejects dates on which the restaurant is closed.
///
/// # Errors
///
/// Returns [`ReservationRuleError::RestaurantClosed`].
pub fn check_open_day(ctx: &RuleContext<'_>) -> Result<(), ReservationRuleError> {
    let date = parse_date(field_or_null(ctx.candidate, RESERVATION_DATE))?;
    let weekday = date.weekday();
    if ctx.policy.is_closed_on(weekday) {
        return Err(ReservationRuleError::RestaurantClosed {
            date,
            weekday: weekday_name(weekday),
        });
    }
    Ok(())
}

/// Requires the slot to be strictly after the request instant.
///
/// The slot is read in the restaurant's local offset.
///
/// # Errors
///
/// Returns [`ReservationRuleError::ReservationInPast`].
pub fn check_future(ctx: &RuleContext<'_>) -> Result<(), ReservationRuleError> {
    let date = parse_date(field_or_null(ctx.candidate, RESERVATION_DATE))?;
    let time = parse_time(field_or_null(ctx.candidate, RESERVATION_TIME))?;
    let requested = NaiveDateTime::new(date, time);
    let now_local = ctx.now.with_timezone(&ctx.policy.utc_offset()).naive_local();
    if requested <= now_local {
        return Err(ReservationRuleError::ReservationInPast { requested });
    }
    Ok(())
}

/// Requires the time to fall within the inclusive operating window.
///
/// # Errors
///
/// Returns [`ReservationRuleError::OutsideOperatingHours`].
pub fn check_operating_hours(ctx: &RuleContext<'_>) -> Result<(), ReservationRuleError> {
    let time = parse_time(field_or_null(ctx.candidate, RESERVATION_TIME))?;
    let opens_at = ctx.policy.opens_at();
    let last_seating = ctx.policy.last_seating();
    if time < opens_at {
        return Err(ReservationRuleError::OutsideOperatingHours(
            HoursViolation::TooEarly { opens_at },
        ));
    }
    if time > last_seating {
        return Err(ReservationRuleError::OutsideOperatingHours(
            HoursViolation::TooLate { last_seating },
        ));
    }
    Ok(())
}

/// Rejects new reservations submitted in any status other than booked.
///
/// Unrecognized values are left to [`check_status_value`].
///
/// # Errors
///
/// Returns [`ReservationRuleError::InvalidInitialStatus`].
pub fn check_initial_status(ctx: &RuleContext<'_>) -> Result<(), ReservationRuleError> {
    if ctx.intent != ValidationIntent::Create {
        return Ok(());
    }
    let Some(Value::String(raw)) = fields::present(ctx.submitted, STATUS) else {
        return Ok(());
    };
    match ReservationStatus::try_from(raw.as_str()) {
        Ok(ReservationStatus::Booked) | Err(_) => Ok(()),
        Ok(status) => Err(ReservationRuleError::InvalidInitialStatus(status)),
    }
}

/// Requires an explicit status to be a known status.
///
/// # Errors
///
/// Returns [`ReservationRuleError::UnknownStatus`].
pub fn check_status_value(ctx: &RuleContext<'_>) -> Result<(), ReservationRuleError> {
    fields::present(ctx.submitted, STATUS).map_or(Ok(()), |value| parse_status(value).map(|_| ()))
}

/// Requires the payload to carry a status.
///
/// # Errors
///
/// Returns [`ReservationRuleError::MissingField`] naming `status`.
pub fn require_status(ctx: &RuleContext<'_>) -> Result<(), ReservationRuleError> {
    if fields::is_blank(ctx.submitted.get(STATUS)) {
        return Err(ReservationRuleError::missing(STATUS));
    }
    Ok(())
}

/// Parses a party size from a JSON value.
///
/// Only non-negative JSON integers are accepted; numeric strings and
/// fractional numbers are rejected rather than coerced.
///
/// # Errors
///
/// Returns [`ReservationRuleError::InvalidPeopleCount`].
pub fn parse_people(value: &Value) -> Result<PartySize, ReservationRuleError> {
    match value.as_u64() {
        Some(count) => PartySize::new(count),
        None => Err(ReservationRuleError::InvalidPeopleCount(fields::describe(
            value,
        ))),
    }
}

/// Parses a `YYYY-MM-DD` calendar date.
///
/// Surrounding whitespace and unpadded fields are rejected, not trimmed.
///
/// # Errors
///
/// Returns [`ReservationRuleError::InvalidDateTime`].
pub fn parse_date(value: &Value) -> Result<NaiveDate, ReservationRuleError> {
    value
        .as_str()
        .and_then(parse_calendar_date)
        .ok_or_else(|| invalid_date_time(RESERVATION_DATE, value))
}

/// Parses a 24-hour `HH:MM` or `HH:MM:SS` time.
///
/// # Errors
///
/// Returns [`ReservationRuleError::InvalidDateTime`].
pub fn parse_time(value: &Value) -> Result<NaiveTime, ReservationRuleError> {
    value
        .as_str()
        .and_then(parse_clock_time)
        .ok_or_else(|| invalid_date_time(RESERVATION_TIME, value))
}

/// Parses a status name.
///
/// # Errors
///
/// Returns [`ReservationRuleError::UnknownStatus`].
pub fn parse_status(value: &Value) -> Result<ReservationStatus, ReservationRuleError> {
    value
        .as_str()
        .and_then(|raw| ReservationStatus::try_from(raw).ok())
        .ok_or_else(|| ReservationRuleError::UnknownStatus(fields::describe(value)))
}

fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let well_shaped = raw.len() == 10
        && raw.char_indices().all(|(index, ch)| {
            if index == 4 || index == 7 {
                ch == '-'
            } else {
                ch.is_ascii_digit()
            }
        });
    if !well_shaped {
        return None;
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}

fn parse_clock_time(raw: &str) -> Option<NaiveTime> {
    let format = match raw.len() {
        5 => "%H:%M",
        8 => "%H:%M:%S",
        _ => return None,
    };
    let well_shaped = raw.char_indices().all(|(index, ch)| {
        if index == 2 || index == 5 {
            ch == ':'
        } else {
            ch.is_ascii_digit()
        }
    });
    if !well_shaped {
        return None;
    }
    // chrono accepts a leap second (`:60`) that a wall clock never shows.
    NaiveTime::parse_from_str(raw, format)
        .ok()
        .filter(|time| time.nanosecond() == 0)
}

fn invalid_date_time(field: &'static str, value: &Value) -> ReservationRuleError {
    ReservationRuleError::InvalidDateTime {
        field,
        value: fields::describe(value),
    }
}

static NULL: Value = Value::Null;

fn field_or_null<'a>(payload: &'a ReservationPayload, field: &str) -> &'a Value {
    payload.get(field).unwrap_or(&NULL)
}

const fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
