//! Validation for new table payloads.
//!
//! Mirrors the reservation pipeline: an ordered list of pure rules, the
//! first failure wins.

use crate::table::domain::{NewTableDraft, TableCapacity, TableName, TableRuleError};
use serde_json::{Map, Value};

/// Raw table payload as parsed from a request body.
pub type TablePayload = Map<String, Value>;

/// Display name field.
pub const TABLE_NAME: &str = "table_name";
/// Seat count field.
pub const CAPACITY: &str = "capacity";
/// Seated reservation field.
pub const RESERVATION_ID: &str = "reservation_id";

const REQUIRED_FIELDS: [&str; 2] = [TABLE_NAME, CAPACITY];
const ALLOWED_FIELDS: [&str; 3] = [TABLE_NAME, CAPACITY, RESERVATION_ID];

type TableRule = fn(&TablePayload) -> Result<(), TableRuleError>;

const TABLE_RULES: [TableRule; 6] = [
    require_fields,
    allow_known_fields,
    check_name_type,
    check_capacity,
    check_name_length,
    require_free,
];

/// Validates a payload for a new table.
///
/// # Errors
///
/// Returns the first [`TableRuleError`] raised by the rule list.
pub fn validate_new_table(payload: &TablePayload) -> Result<NewTableDraft, TableRuleError> {
    TABLE_RULES.iter().try_for_each(|rule| rule(payload))?;
    let name = payload
        .get(TABLE_NAME)
        .and_then(Value::as_str)
        .ok_or_else(|| TableRuleError::MissingField(vec![TABLE_NAME.to_owned()]))?;
    Ok(NewTableDraft {
        table_name: TableName::new(name)?,
        capacity: parse_capacity(payload.get(CAPACITY))?,
    })
}

fn require_fields(payload: &TablePayload) -> Result<(), TableRuleError> {
    let missing: Vec<String> = REQUIRED_FIELDS
        .into_iter()
        .filter(|field| is_blank(payload.get(*field)))
        .map(str::to_owned)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(TableRuleError::MissingField(missing))
    }
}

fn allow_known_fields(payload: &TablePayload) -> Result<(), TableRuleError> {
    let unknown: Vec<String> = payload
        .keys()
        .filter(|key| !ALLOWED_FIELDS.contains(&key.as_str()))
        .cloned()
        .collect();
    if unknown.is_empty() {
        Ok(())
    } else {
        Err(TableRuleError::UnknownField(unknown))
    }
}

fn check_name_type(payload: &TablePayload) -> Result<(), TableRuleError> {
    match payload.get(TABLE_NAME) {
        Some(value) if !value.is_string() => {
            Err(TableRuleError::InvalidFieldType { field: TABLE_NAME })
        }
        _ => Ok(()),
    }
}

fn check_capacity(payload: &TablePayload) -> Result<(), TableRuleError> {
    parse_capacity(payload.get(CAPACITY)).map(|_| ())
}

fn check_name_length(payload: &TablePayload) -> Result<(), TableRuleError> {
    payload
        .get(TABLE_NAME)
        .and_then(Value::as_str)
        .map_or(Ok(()), |name| TableName::new(name).map(|_| ()))
}

fn require_free(payload: &TablePayload) -> Result<(), TableRuleError> {
    match payload.get(RESERVATION_ID) {
        None | Some(Value::Null) => Ok(()),
        Some(_) => Err(TableRuleError::TableNotFree),
    }
}

fn parse_capacity(value: Option<&Value>) -> Result<TableCapacity, TableRuleError> {
    match value.and_then(Value::as_u64) {
        Some(seats) => TableCapacity::new(seats),
        None => Err(TableRuleError::InvalidCapacity(
            value.map_or_else(|| "null".to_owned(), Value::to_string),
        )),
    }
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.trim().is_empty(),
        Some(_) => false,
    }
}
