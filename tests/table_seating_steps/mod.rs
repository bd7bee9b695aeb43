//! Step definitions for table seating scenarios.

pub mod given;
pub mod world;
