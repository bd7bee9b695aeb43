//! Business constants governing which slots can be booked.

use chrono::{FixedOffset, NaiveTime, Offset, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// Booking window and closure configuration.
///
/// The defaults describe a restaurant open from 10:30 with a last seating
/// at 21:30, closed on Tuesdays, keeping time in UTC.
///
/// # Examples
///
/// ```
/// use chrono::{NaiveTime, Weekday};
/// use maitre::reservation::domain::ReservationPolicy;
///
/// let policy = ReservationPolicy::default();
/// assert!(policy.is_closed_on(Weekday::Tue));
///
/// let late = policy.with_last_seating(NaiveTime::from_hms_opt(22, 0, 0).unwrap_or_default());
/// assert_eq!(late.last_seating().format("%H:%M").to_string(), "22:00");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReservationPolicy {
    opens_at: NaiveTime,
    last_seating: NaiveTime,
    closed_days: Vec<Weekday>,
    utc_offset_seconds: i32,
}

impl Default for ReservationPolicy {
    fn default() -> Self {
        Self {
            opens_at: NaiveTime::from_hms_opt(10, 30, 0).unwrap_or(NaiveTime::MIN),
            last_seating: NaiveTime::from_hms_opt(21, 30, 0).unwrap_or(NaiveTime::MIN),
            closed_days: vec![Weekday::Tue],
            utc_offset_seconds: 0,
        }
    }
}

impl ReservationPolicy {
    /// Sets the first bookable time of day.
    #[must_use]
    pub const fn with_opens_at(mut self, opens_at: NaiveTime) -> Self {
        self.opens_at = opens_at;
        self
    }

    /// Sets the last bookable time of day.
    #[must_use]
    pub const fn with_last_seating(mut self, last_seating: NaiveTime) -> Self {
        self.last_seating = last_seating;
        self
    }

    /// Replaces the set of weekdays the restaurant is closed.
    #[must_use]
    pub fn with_closed_days(mut self, days: impl IntoIterator<Item = Weekday>) -> Self {
        self.closed_days = days.into_iter().collect();
        self
    }

    /// Sets the restaurant's offset from UTC in seconds east.
    #[must_use]
    pub const fn with_utc_offset_seconds(mut self, seconds: i32) -> Self {
        self.utc_offset_seconds = seconds;
        self
    }

    /// Returns the first bookable time of day.
    #[must_use]
    pub const fn opens_at(&self) -> NaiveTime {
        self.opens_at
    }

    /// Returns the last bookable time of day.
    #[must_use]
    pub const fn last_seating(&self) -> NaiveTime {
        self.last_seating
    }

    /// Returns `true` when the restaurant does not open on `day`.
    #[must_use]
    pub fn is_closed_on(&self, day: Weekday) -> bool {
        self.closed_days.contains(&day)
    }

    /// Returns the restaurant's UTC offset.
    ///
    /// Out-of-range offsets fall back to UTC.
    #[must_use]
    pub fn utc_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_seconds).unwrap_or_else(|| Utc.fix())
    }
}
