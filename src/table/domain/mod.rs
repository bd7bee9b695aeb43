//! Domain model for tables and seating.

mod assignment;
mod error;
mod ids;
mod table;

pub use assignment::{check_finish, check_seating, finish, seat};
pub use error::{ParseTableIdError, SeatingError, TableRuleError};
pub use ids::{TableCapacity, TableId, TableName};
pub use table::{DiningTable, NewTableDraft, PersistedTableData};
