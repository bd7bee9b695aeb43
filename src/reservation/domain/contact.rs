//! Guest contact details.

use super::ReservationRuleError;
use serde::Serialize;
use std::fmt;

/// Non-empty guest first or last name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct GuestName(String);

impl GuestName {
    /// Creates a trimmed, non-empty name for the given payload field.
    ///
    /// # Errors
    ///
    /// Returns [`ReservationRuleError::MissingField`] naming `field` when the
    /// value is blank.
    pub fn new(field: &str, value: impl Into<String>) -> Result<Self, ReservationRuleError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ReservationRuleError::missing(field));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GuestName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Guest phone number as entered by staff.
///
/// The original formatting is preserved for display. Lookups compare the
/// [`digits`](Self::digits) form so that `(555) 123-4567` and `5551234567`
/// match each other.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct MobileNumber(String);

impl MobileNumber {
    /// Payload field carrying the phone number.
    pub const FIELD: &'static str = "mobile_number";

    /// Creates a trimmed, non-empty phone number.
    ///
    /// # Errors
    ///
    /// Returns [`ReservationRuleError::MissingField`] when the value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, ReservationRuleError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ReservationRuleError::missing(Self::FIELD));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the number as entered.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns only the ASCII digits of the number.
    #[must_use]
    pub fn digits(&self) -> String {
        digits_only(&self.0)
    }

    /// Returns `true` when the digits of `fragment` occur in this number.
    ///
    /// A fragment without digits matches every number.
    #[must_use]
    pub fn matches_fragment(&self, fragment: &str) -> bool {
        self.digits().contains(&digits_only(fragment))
    }
}

impl fmt::Display for MobileNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strips everything except ASCII digits.
#[must_use]
pub fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}
