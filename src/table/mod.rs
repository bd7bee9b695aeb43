//! Tables and the seat/finish assignment engine.
//!
//! A table is free or holds exactly one seated reservation. Seating and
//! finishing change the table and the reservation together through the
//! atomic operations of [`ports::TableRepository`]; the rules deciding
//! whether either may happen live in [`domain`].

pub mod domain;
pub mod ports;
pub mod services;
pub mod validation;
