//! Diesel schema for the reservation floor.

diesel::table! {
    /// Guest reservations.
    reservations (id) {
        /// Reservation identifier.
        id -> Uuid,
        /// Guest first name.
        #[max_length = 255]
        first_name -> Varchar,
        /// Guest last name.
        #[max_length = 255]
        last_name -> Varchar,
        /// Guest phone number as entered.
        #[max_length = 64]
        mobile_number -> Varchar,
        /// Booked date.
        reservation_date -> Date,
        /// Booked time of day.
        reservation_time -> Time,
        /// Party size.
        people -> Int4,
        /// Lifecycle status.
        #[max_length = 20]
        status -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Dining tables and the reservation currently seated at each.
    dining_tables (id) {
        /// Table identifier.
        id -> Uuid,
        /// Display name.
        #[max_length = 255]
        table_name -> Varchar,
        /// Seats available.
        capacity -> Int4,
        /// Seated reservation, null while free.
        reservation_id -> Nullable<Uuid>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(dining_tables -> reservations (reservation_id));
diesel::allow_tables_to_appear_in_same_query!(dining_tables, reservations);
