//! Reservation payload validation.
//!
//! Rules are pure functions over a [`RuleContext`](rules::RuleContext) and
//! run in a fixed order; the first failing rule decides the rejection. The
//! [`ReservationValidator`] assembles the rule lists for creates, updates,
//! and status-only changes and normalizes accepted payloads into a
//! [`ReservationDraft`](crate::reservation::domain::ReservationDraft).

pub mod fields;
pub mod rules;
pub mod service;

pub use fields::{ReservationPayload, payload_from_reservation};
pub use rules::{Rule, RuleContext, ValidationIntent};
pub use service::ReservationValidator;
