//! Shared world state for table seating BDD scenarios.

use std::sync::Arc;

use maitre::adapters::memory::InMemoryFloorStore;
use maitre::reservation::{domain::Reservation, services::ReservationService};
use maitre::table::{
    domain::DiningTable,
    services::{SeatingOutcome, TableAssignmentService, TableServiceResult},
};
use mockable::DefaultClock;
use rstest::fixture;
use serde_json::{Map, Value, json};

/// Reservation service used by the BDD world.
pub type TestBookings = ReservationService<InMemoryFloorStore, DefaultClock>;

/// Table service used by the BDD world.
pub type TestSeating = TableAssignmentService<InMemoryFloorStore, DefaultClock>;

/// Scenario world for seating behaviour tests.
pub struct SeatingWorld {
    pub bookings: TestBookings,
    pub seating: TestSeating,
    pub table: Option<DiningTable>,
    pub reservation: Option<Reservation>,
    pub other_reservation: Option<Reservation>,
    pub last_seat_result: Option<TableServiceResult<SeatingOutcome>>,
    pub last_finish_result: Option<TableServiceResult<SeatingOutcome>>,
}

impl SeatingWorld {
    /// Creates a world with an empty floor.
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(InMemoryFloorStore::new());
        let clock = Arc::new(DefaultClock);
        Self {
            bookings: ReservationService::new(Arc::clone(&store), Arc::clone(&clock)),
            seating: TableAssignmentService::new(store, clock),
            table: None,
            reservation: None,
            other_reservation: None,
            last_seat_result: None,
            last_finish_result: None,
        }
    }

    /// Returns the scenario table.
    ///
    /// # Errors
    ///
    /// Returns an error when no table has been created yet.
    pub fn table(&self) -> Result<&DiningTable, eyre::Report> {
        self.table
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing table in scenario world"))
    }

    /// Returns the primary scenario reservation.
    ///
    /// # Errors
    ///
    /// Returns an error when no reservation has been booked yet.
    pub fn reservation(&self) -> Result<&Reservation, eyre::Report> {
        self.reservation
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing reservation in scenario world"))
    }
}

impl Default for SeatingWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> SeatingWorld {
    SeatingWorld::default()
}

/// Builds a booking payload for a Thursday evening far in the future.
pub fn booking_for(people: u32) -> Map<String, Value> {
    let payload = json!({
        "first_name": "Beth",
        "last_name": "Smith",
        "mobile_number": "202-555-0199",
        "reservation_date": "2099-01-01",
        "reservation_time": "19:30",
        "people": people
    });
    match payload {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Builds a seat payload naming `reservation`.
pub fn seat_payload(reservation: &Reservation) -> Map<String, Value> {
    let mut payload = Map::new();
    payload.insert(
        "reservation_id".to_owned(),
        Value::String(reservation.id().to_string()),
    );
    payload
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
