//! Atomic seat and finish tests for the `PostgreSQL` floor store.

use crate::postgres::helpers::{
    CleanupGuard, booked_reservation, database_name, ensure_template, free_table, setup_store,
    test_runtime,
};
use chrono::Utc;
use maitre::reservation::{
    domain::{ReservationId, ReservationStatus},
    ports::ReservationRepository,
};
use maitre::table::{
    domain::{SeatingError, TableId},
    ports::{TableRepository, TableRepositoryError},
};
use pg_embedded_setup_unpriv::{TestCluster, test_support::shared_test_cluster};
use rstest::rstest;

#[rstest]
fn seat_links_table_and_reservation(shared_test_cluster: &'static TestCluster) {
    ensure_template(shared_test_cluster).expect("template setup");
    let db_name = database_name("test_seat_links");
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let store = setup_store(shared_test_cluster, &db_name, 1).expect("store setup");

    let table = free_table("Bar #1", 4);
    let reservation = booked_reservation("Sanchez", "808-555-0140", 3);
    let rt = test_runtime();
    rt.block_on(store.store_table(&table)).expect("store table");
    rt.block_on(store.store_reservation(&reservation))
        .expect("store reservation");

    let (seated_table, seated_reservation) = rt
        .block_on(store.atomic_seat(table.id(), reservation.id(), Utc::now()))
        .expect("seat should succeed");
    assert_eq!(seated_table.reservation_id(), Some(reservation.id()));
    assert_eq!(seated_reservation.status(), ReservationStatus::Seated);

    let stored_table = rt
        .block_on(store.find_table(table.id()))
        .expect("find table")
        .expect("table exists");
    let stored_reservation = rt
        .block_on(store.find_reservation(reservation.id()))
        .expect("find reservation")
        .expect("reservation exists");
    assert_eq!(stored_table.reservation_id(), Some(reservation.id()));
    assert_eq!(stored_reservation.status(), ReservationStatus::Seated);
}

#[rstest]
fn seat_over_capacity_changes_neither_row(shared_test_cluster: &'static TestCluster) {
    ensure_template(shared_test_cluster).expect("template setup");
    let db_name = database_name("test_seat_capacity");
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let store = setup_store(shared_test_cluster, &db_name, 1).expect("store setup");

    let table = free_table("#1", 2);
    let reservation = booked_reservation("Smith", "800-555-1212", 6);
    let rt = test_runtime();
    rt.block_on(store.store_table(&table)).expect("store table");
    rt.block_on(store.store_reservation(&reservation))
        .expect("store reservation");

    let result = rt.block_on(store.atomic_seat(table.id(), reservation.id(), Utc::now()));
    assert!(matches!(
        result,
        Err(TableRepositoryError::Seating(SeatingError::CapacityExceeded { .. }))
    ));

    let stored_table = rt
        .block_on(store.find_table(table.id()))
        .expect("find table")
        .expect("table exists");
    let stored_reservation = rt
        .block_on(store.find_reservation(reservation.id()))
        .expect("find reservation")
        .expect("reservation exists");
    assert!(stored_table.is_free());
    assert_eq!(stored_reservation.status(), ReservationStatus::Booked);
}

#[rstest]
fn seat_reports_missing_records(shared_test_cluster: &'static TestCluster) {
    ensure_template(shared_test_cluster).expect("template setup");
    let db_name = database_name("test_seat_missing");
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let store = setup_store(shared_test_cluster, &db_name, 1).expect("store setup");

    let table = free_table("Bar #2", 4);
    let rt = test_runtime();
    rt.block_on(store.store_table(&table)).expect("store table");

    let missing_table = TableId::new();
    let no_table = rt.block_on(store.atomic_seat(missing_table, ReservationId::new(), Utc::now()));
    assert!(matches!(
        no_table,
        Err(TableRepositoryError::TableNotFound(id)) if id == missing_table
    ));

    let missing_reservation = ReservationId::new();
    let no_reservation =
        rt.block_on(store.atomic_seat(table.id(), missing_reservation, Utc::now()));
    assert!(matches!(
        no_reservation,
        Err(TableRepositoryError::ReservationNotFound(id)) if id == missing_reservation
    ));
}

#[rstest]
fn finish_frees_table_and_finishes_reservation(shared_test_cluster: &'static TestCluster) {
    ensure_template(shared_test_cluster).expect("template setup");
    let db_name = database_name("test_finish_frees");
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let store = setup_store(shared_test_cluster, &db_name, 1).expect("store setup");

    let table = free_table("#1", 6);
    let reservation = booked_reservation("Taylor", "202-555-0153", 4);
    let rt = test_runtime();
    rt.block_on(store.store_table(&table)).expect("store table");
    rt.block_on(store.store_reservation(&reservation))
        .expect("store reservation");
    rt.block_on(store.atomic_seat(table.id(), reservation.id(), Utc::now()))
        .expect("seat should succeed");

    let (finished_table, finished_reservation) = rt
        .block_on(store.atomic_finish(table.id(), reservation.id(), Utc::now()))
        .expect("finish should succeed");
    assert!(finished_table.is_free());
    assert_eq!(finished_reservation.status(), ReservationStatus::Finished);

    let stored_table = rt
        .block_on(store.find_table(table.id()))
        .expect("find table")
        .expect("table exists");
    let stored_reservation = rt
        .block_on(store.find_reservation(reservation.id()))
        .expect("find reservation")
        .expect("reservation exists");
    assert!(stored_table.is_free());
    assert_eq!(stored_reservation.status(), ReservationStatus::Finished);
}

#[rstest]
fn finish_rejects_a_free_table(shared_test_cluster: &'static TestCluster) {
    ensure_template(shared_test_cluster).expect("template setup");
    let db_name = database_name("test_finish_free");
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let store = setup_store(shared_test_cluster, &db_name, 1).expect("store setup");

    let table = free_table("#2", 4);
    let reservation = booked_reservation("Jones", "415-555-0199", 2);
    let rt = test_runtime();
    rt.block_on(store.store_table(&table)).expect("store table");
    rt.block_on(store.store_reservation(&reservation))
        .expect("store reservation");

    let result = rt.block_on(store.atomic_finish(table.id(), reservation.id(), Utc::now()));
    assert!(matches!(
        result,
        Err(TableRepositoryError::Seating(SeatingError::TableNotOccupied(id))) if id == table.id()
    ));

    let stored_reservation = rt
        .block_on(store.find_reservation(reservation.id()))
        .expect("find reservation")
        .expect("reservation exists");
    assert_eq!(stored_reservation.status(), ReservationStatus::Booked);
}

#[rstest]
fn competing_seats_on_one_table_admit_one_party(shared_test_cluster: &'static TestCluster) {
    ensure_template(shared_test_cluster).expect("template setup");
    let db_name = database_name("test_seat_race_table");
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let store = setup_store(shared_test_cluster, &db_name, 4).expect("store setup");

    let table = free_table("Patio", 4);
    let first = booked_reservation("First", "555-0101", 2);
    let second = booked_reservation("Second", "555-0102", 2);
    let rt = test_runtime();
    rt.block_on(store.store_table(&table)).expect("store table");
    rt.block_on(store.store_reservation(&first))
        .expect("store first reservation");
    rt.block_on(store.store_reservation(&second))
        .expect("store second reservation");

    let now = Utc::now();
    let (first_result, second_result) = rt.block_on(async {
        tokio::join!(
            store.atomic_seat(table.id(), first.id(), now),
            store.atomic_seat(table.id(), second.id(), now),
        )
    });

    let (winner, loser) = match (first_result, second_result) {
        (Ok(_), Err(err)) => (first.id(), err),
        (Err(err), Ok(_)) => (second.id(), err),
        other => panic!("expected exactly one seat to succeed, got {other:?}"),
    };
    assert!(matches!(
        loser,
        TableRepositoryError::Seating(SeatingError::TableOccupied { reservation_id, .. })
            if reservation_id == winner
    ));

    let stored_table = rt
        .block_on(store.find_table(table.id()))
        .expect("find table")
        .expect("table exists");
    assert_eq!(stored_table.reservation_id(), Some(winner));
    let listed = rt
        .block_on(store.list_reservations_by_date(first.reservation_date()))
        .expect("list reservations");
    let seated_count = listed
        .iter()
        .filter(|reservation| reservation.status() == ReservationStatus::Seated)
        .count();
    assert_eq!(seated_count, 1);
}

#[rstest]
fn competing_seats_for_one_party_claim_one_table(shared_test_cluster: &'static TestCluster) {
    ensure_template(shared_test_cluster).expect("template setup");
    let db_name = database_name("test_seat_race_party");
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let store = setup_store(shared_test_cluster, &db_name, 4).expect("store setup");

    let window = free_table("Window", 4);
    let booth = free_table("Booth", 4);
    let reservation = booked_reservation("Lee", "555-0199", 3);
    let rt = test_runtime();
    rt.block_on(store.store_table(&window)).expect("store window");
    rt.block_on(store.store_table(&booth)).expect("store booth");
    rt.block_on(store.store_reservation(&reservation))
        .expect("store reservation");

    let now = Utc::now();
    let (window_result, booth_result) = rt.block_on(async {
        tokio::join!(
            store.atomic_seat(window.id(), reservation.id(), now),
            store.atomic_seat(booth.id(), reservation.id(), now),
        )
    });

    let loser = match (window_result, booth_result) {
        (Ok(_), Err(err)) | (Err(err), Ok(_)) => err,
        other => panic!("expected exactly one seat to succeed, got {other:?}"),
    };
    assert!(matches!(
        loser,
        TableRepositoryError::Seating(SeatingError::AlreadySeated(id)) if id == reservation.id()
    ));

    let tables = rt.block_on(store.list_tables()).expect("list tables");
    let holding = tables
        .iter()
        .filter(|table| table.reservation_id() == Some(reservation.id()))
        .count();
    assert_eq!(holding, 1);
}
