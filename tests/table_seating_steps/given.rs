//! Given steps for table seating BDD scenarios.

use super::world::{SeatingWorld, booking_for, run_async, seat_payload};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use serde_json::{Map, Value};

#[given(r#"a table "{name}" seating {capacity:u32}"#)]
fn a_table(world: &mut SeatingWorld, name: String, capacity: u32) -> Result<(), eyre::Report> {
    let mut payload = Map::new();
    payload.insert("table_name".to_owned(), Value::String(name));
    payload.insert("capacity".to_owned(), Value::from(capacity));
    let table = run_async(world.seating.create_table(&payload)).wrap_err("create table")?;
    world.table = Some(table);
    Ok(())
}

#[given("a booked reservation for {people:u32} guests")]
fn a_booked_reservation(world: &mut SeatingWorld, people: u32) -> Result<(), eyre::Report> {
    let reservation =
        run_async(world.bookings.create(&booking_for(people))).wrap_err("book reservation")?;
    world.reservation = Some(reservation);
    Ok(())
}

#[given("another booked reservation for {people:u32} guests")]
fn another_booked_reservation(world: &mut SeatingWorld, people: u32) -> Result<(), eyre::Report> {
    let reservation = run_async(world.bookings.create(&booking_for(people)))
        .wrap_err("book second reservation")?;
    world.other_reservation = Some(reservation);
    Ok(())
}

#[given("the reservation has been seated at the table")]
fn reservation_already_seated(world: &mut SeatingWorld) -> Result<(), eyre::Report> {
    let table_id = world.table()?.id();
    let payload = seat_payload(world.reservation()?);
    let outcome =
        run_async(world.seating.seat(table_id, &payload)).wrap_err("seat in scenario setup")?;
    world.table = Some(outcome.table);
    world.reservation = Some(outcome.reservation);
    Ok(())
}

#[given("the reservation has been cancelled")]
fn reservation_cancelled(world: &mut SeatingWorld) -> Result<(), eyre::Report> {
    let reservation_id = world.reservation()?.id();
    let cancelled =
        run_async(world.bookings.cancel(reservation_id)).wrap_err("cancel in scenario setup")?;
    world.reservation = Some(cancelled);
    Ok(())
}
