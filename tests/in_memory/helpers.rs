//! Shared helpers for in-memory floor integration tests.

use std::sync::Arc;

use maitre::adapters::memory::InMemoryFloorStore;
use maitre::reservation::{services::ReservationService, validation::ReservationPayload};
use maitre::table::{services::TableAssignmentService, validation::TablePayload};
use mockable::DefaultClock;
use rstest::fixture;
use serde_json::{Value, json};

/// Reservation service over the shared in-memory store.
pub type Bookings = ReservationService<InMemoryFloorStore, DefaultClock>;

/// Table service over the shared in-memory store.
pub type Seating = TableAssignmentService<InMemoryFloorStore, DefaultClock>;

/// Both services sharing one store, as a host application wires them.
pub struct Floor {
    /// Reservation operations.
    pub bookings: Arc<Bookings>,
    /// Table operations.
    pub seating: Arc<Seating>,
}

/// Provides a fresh floor for each test.
#[fixture]
pub fn floor() -> Floor {
    let store = Arc::new(InMemoryFloorStore::new());
    let clock = Arc::new(DefaultClock);
    Floor {
        bookings: Arc::new(ReservationService::new(
            Arc::clone(&store),
            Arc::clone(&clock),
        )),
        seating: Arc::new(TableAssignmentService::new(store, clock)),
    }
}

/// Builds a reservation payload on 1 January 2099, a Thursday.
pub fn booking(time: &str, phone: &str, people: u32) -> ReservationPayload {
    object(json!({
        "first_name": "Rick",
        "last_name": "Sanchez",
        "mobile_number": phone,
        "reservation_date": "2099-01-01",
        "reservation_time": time,
        "people": people
    }))
}

/// Builds a new-table payload.
pub fn table(name: &str, capacity: u32) -> TablePayload {
    object(json!({ "table_name": name, "capacity": capacity }))
}

/// Builds a seat payload naming a reservation.
pub fn seat_request(reservation_id: impl ToString) -> TablePayload {
    object(json!({ "reservation_id": reservation_id.to_string() }))
}

/// Unwraps a JSON object literal.
pub fn object(value: Value) -> serde_json::Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => serde_json::Map::new(),
    }
}
