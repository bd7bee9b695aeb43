//! Failure classification shared by service errors.
//!
//! Request handlers translate a [`FailureKind`] into a transport status
//! without inspecting error messages.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Broad category of a rejected operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The submitted payload broke a business or format rule.
    Validation,
    /// A referenced reservation or table does not exist.
    NotFound,
    /// The request is well-formed but conflicts with current floor state.
    Conflict,
    /// The storage backend failed.
    Persistence,
}

impl FailureKind {
    /// Returns the canonical label used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Persistence => "persistence",
        }
    }

    /// Returns `true` when the caller supplied something it can correct.
    #[must_use]
    pub const fn is_client_error(self) -> bool {
        !matches!(self, Self::Persistence)
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
