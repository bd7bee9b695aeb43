//! Identifier and validated scalar types for the table domain.

use super::{ParseTableIdError, TableRuleError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableId(Uuid);

impl TableId {
    /// Creates a new random table identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a table identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for TableId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for TableId {
    type Err = ParseTableIdError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value.trim())
            .map(Self)
            .map_err(|_| ParseTableIdError(value.to_owned()))
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display name of a table, at least two characters long.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct TableName(String);

impl TableName {
    /// Shortest accepted name, in characters.
    pub const MIN_LENGTH: usize = 2;

    /// Creates a validated table name.
    ///
    /// # Errors
    ///
    /// Returns [`TableRuleError::TableNameTooShort`] when the trimmed name
    /// has fewer than [`Self::MIN_LENGTH`] characters.
    pub fn new(value: impl Into<String>) -> Result<Self, TableRuleError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.chars().count() < Self::MIN_LENGTH {
            return Err(TableRuleError::TableNameTooShort(raw));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Number of guests a table seats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct TableCapacity(u32);

impl TableCapacity {
    /// Largest capacity representable in the current `PostgreSQL` schema.
    const MAX_PERSISTED_VALUE: u64 = i32::MAX as u64;

    /// Creates a validated capacity.
    ///
    /// # Errors
    ///
    /// Returns [`TableRuleError::InvalidCapacity`] when the value is zero or
    /// exceeds the schema-backed maximum (`i32::MAX`).
    pub fn new(value: u64) -> Result<Self, TableRuleError> {
        if value == 0 || value > Self::MAX_PERSISTED_VALUE {
            return Err(TableRuleError::InvalidCapacity(value.to_string()));
        }
        u32::try_from(value)
            .map(Self)
            .map_err(|_| TableRuleError::InvalidCapacity(value.to_string()))
    }

    /// Returns the number of seats.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TableCapacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
