//! Reservation lifecycle for Maitre.
//!
//! Staff create, edit, cancel, and delete reservations through
//! [`services::ReservationService`]. Every payload passes through the ordered
//! rule pipeline in [`validation`] before it reaches storage. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Payload validation in [`validation`]
//! - Port contracts in [`ports`]
//! - Orchestration services in [`services`]

pub mod domain;
pub mod ports;
pub mod services;
pub mod validation;
