//! Maitre: reservation and table assignment rules for restaurant floors.
//!
//! This crate provides the business core behind a reservation dashboard:
//! validating reservation payloads against the restaurant's booking rules,
//! and seating or releasing tables so that a table and its reservation
//! always change together.
//!
//! # Architecture
//!
//! Maitre follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for storage
//! - **Adapters**: Concrete storage implementations (in-memory, `PostgreSQL`)
//! - **Services**: Orchestration consumed by a request-handling layer
//!
//! # Modules
//!
//! - [`reservation`]: Reservation validation and lifecycle
//! - [`table`]: Table creation and the seat/finish assignment engine
//! - [`adapters`]: Storage backends implementing both repository ports
//! - [`error`]: Failure classification shared by every service error

pub mod adapters;
pub mod error;
pub mod reservation;
pub mod table;
