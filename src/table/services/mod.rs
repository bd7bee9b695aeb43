//! Application services for tables and seating.

mod assignment;

pub use assignment::{
    SeatingOutcome, TableAssignmentService, TableServiceError, TableServiceResult,
};
