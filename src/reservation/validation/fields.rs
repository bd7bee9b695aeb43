//! Payload field names and helpers shared by the validation rules.

use crate::reservation::domain::Reservation;
use serde_json::{Map, Value};

/// Raw reservation payload as parsed from a request body.
pub type ReservationPayload = Map<String, Value>;

/// Guest first name field.
pub const FIRST_NAME: &str = "first_name";
/// Guest last name field.
pub const LAST_NAME: &str = "last_name";
/// Phone number field.
pub const MOBILE_NUMBER: &str = "mobile_number";
/// Calendar date field.
pub const RESERVATION_DATE: &str = "reservation_date";
/// Time of day field.
pub const RESERVATION_TIME: &str = "reservation_time";
/// Party size field.
pub const PEOPLE: &str = "people";
/// Status field.
pub const STATUS: &str = "status";

/// Fields every reservation must carry, in reporting order.
pub const REQUIRED_FIELDS: [&str; 6] = [
    FIRST_NAME,
    LAST_NAME,
    MOBILE_NUMBER,
    RESERVATION_DATE,
    RESERVATION_TIME,
    PEOPLE,
];

/// Fields holding free text.
pub const TEXT_FIELDS: [&str; 3] = [FIRST_NAME, LAST_NAME, MOBILE_NUMBER];

/// Every field a reservation payload may contain.
///
/// Storage-managed fields are tolerated so clients can send back a record
/// they previously read; their values are ignored.
pub const ALLOWED_FIELDS: [&str; 11] = [
    FIRST_NAME,
    LAST_NAME,
    MOBILE_NUMBER,
    RESERVATION_DATE,
    RESERVATION_TIME,
    PEOPLE,
    STATUS,
    "id",
    "reservation_id",
    "created_at",
    "updated_at",
];

/// Canonical date format for `reservation_date`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Returns `true` when a field is absent, `null`, or a blank string.
#[must_use]
pub fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.trim().is_empty(),
        Some(_) => false,
    }
}

/// Returns the value of `field` unless it is absent or `null`.
#[must_use]
pub fn present<'a>(payload: &'a ReservationPayload, field: &str) -> Option<&'a Value> {
    payload.get(field).filter(|value| !value.is_null())
}

/// Renders a JSON value for inclusion in an error message.
#[must_use]
pub fn describe(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Renders a persisted reservation as a payload, for merging partial
/// updates over the stored values.
#[must_use]
pub fn payload_from_reservation(reservation: &Reservation) -> ReservationPayload {
    let mut payload = ReservationPayload::new();
    payload.insert(
        FIRST_NAME.to_owned(),
        Value::from(reservation.first_name().as_str()),
    );
    payload.insert(
        LAST_NAME.to_owned(),
        Value::from(reservation.last_name().as_str()),
    );
    payload.insert(
        MOBILE_NUMBER.to_owned(),
        Value::from(reservation.mobile_number().as_str()),
    );
    payload.insert(
        RESERVATION_DATE.to_owned(),
        Value::from(reservation.reservation_date().format(DATE_FORMAT).to_string()),
    );
    payload.insert(
        RESERVATION_TIME.to_owned(),
        Value::from(reservation.reservation_time().format("%H:%M:%S").to_string()),
    );
    payload.insert(PEOPLE.to_owned(), Value::from(reservation.people().value()));
    payload.insert(STATUS.to_owned(), Value::from(reservation.status().as_str()));
    payload
}

/// Overlays `submitted` onto `base`, keeping submitted values on conflict.
#[must_use]
pub fn merge(base: ReservationPayload, submitted: &ReservationPayload) -> ReservationPayload {
    let mut merged = base;
    for (key, value) in submitted {
        merged.insert(key.clone(), value.clone());
    }
    merged
}
