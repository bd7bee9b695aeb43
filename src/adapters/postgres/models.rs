//! Diesel row models for reservations and tables.

use super::schema::{dining_tables, reservations};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use diesel::prelude::*;

/// Query result row for reservation records.
#[derive(Debug, Clone, Queryable, QueryableByName, Selectable)]
#[diesel(table_name = reservations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ReservationRow {
    /// Reservation identifier.
    #[diesel(sql_type = diesel::sql_types::Uuid)]
    pub id: uuid::Uuid,
    /// Guest first name.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub first_name: String,
    /// Guest last name.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub last_name: String,
    /// Guest phone number.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub mobile_number: String,
    /// Booked date.
    #[diesel(sql_type = diesel::sql_types::Date)]
    pub reservation_date: NaiveDate,
    /// Booked time of day.
    #[diesel(sql_type = diesel::sql_types::Time)]
    pub reservation_time: NaiveTime,
    /// Party size.
    #[diesel(sql_type = diesel::sql_types::Int4)]
    pub people: i32,
    /// Lifecycle status.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub status: String,
    /// Creation timestamp.
    #[diesel(sql_type = diesel::sql_types::Timestamptz)]
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    #[diesel(sql_type = diesel::sql_types::Timestamptz)]
    pub updated_at: DateTime<Utc>,
}

/// Insert model for reservation records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = reservations)]
pub struct NewReservationRow {
    pub id: uuid::Uuid,
    pub first_name: String,
    pub last_name: String,
    pub mobile_number: String,
    pub reservation_date: NaiveDate,
    pub reservation_time: NaiveTime,
    pub people: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset applied when a reservation is edited.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = reservations)]
pub struct ReservationChanges {
    pub first_name: String,
    pub last_name: String,
    pub mobile_number: String,
    pub reservation_date: NaiveDate,
    pub reservation_time: NaiveTime,
    pub people: i32,
    pub status: String,
    pub updated_at: DateTime<Utc>,
}

/// Query result row for table records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = dining_tables)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TableRow {
    /// Table identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub table_name: String,
    /// Seats available.
    pub capacity: i32,
    /// Seated reservation, if any.
    pub reservation_id: Option<uuid::Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for table records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = dining_tables)]
pub struct NewTableRow {
    pub id: uuid::Uuid,
    pub table_name: String,
    pub capacity: i32,
    pub reservation_id: Option<uuid::Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
