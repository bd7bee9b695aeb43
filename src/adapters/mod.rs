//! Storage adapters implementing both repository ports.
//!
//! A single store backs reservations and tables so that seat and finish can
//! update both records inside one critical section or transaction.

pub mod memory;
pub mod postgres;
