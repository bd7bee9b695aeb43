//! Reservation storage tests for the `PostgreSQL` floor store.

use crate::postgres::helpers::{
    CleanupGuard, booked_reservation, database_name, ensure_template, free_table, setup_store,
    test_runtime,
};
use chrono::Utc;
use maitre::reservation::{
    domain::{ReservationId, ReservationStatus},
    ports::{ReservationRepository, ReservationRepositoryError},
};
use maitre::table::ports::TableRepository;
use mockable::DefaultClock;
use pg_embedded_setup_unpriv::{TestCluster, test_support::shared_test_cluster};
use rstest::rstest;

#[rstest]
fn stored_reservation_round_trips(shared_test_cluster: &'static TestCluster) {
    ensure_template(shared_test_cluster).expect("template setup");
    let db_name = database_name("test_reservation_store");
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let store = setup_store(shared_test_cluster, &db_name, 1).expect("store setup");

    let reservation = booked_reservation("Sanchez", "808-555-0140", 3);
    let rt = test_runtime();
    rt.block_on(store.store_reservation(&reservation))
        .expect("store reservation");

    let found = rt
        .block_on(store.find_reservation(reservation.id()))
        .expect("find reservation")
        .expect("reservation exists");
    assert_eq!(found.id(), reservation.id());
    assert_eq!(found.last_name(), reservation.last_name());
    assert_eq!(found.mobile_number(), reservation.mobile_number());
    assert_eq!(found.slot(), reservation.slot());
    assert_eq!(found.people(), reservation.people());
    assert_eq!(found.status(), ReservationStatus::Booked);

    let duplicate = rt.block_on(store.store_reservation(&reservation));
    assert!(matches!(
        duplicate,
        Err(ReservationRepositoryError::DuplicateReservation(id)) if id == reservation.id()
    ));
}

#[rstest]
fn phone_search_matches_digits_across_formatting(shared_test_cluster: &'static TestCluster) {
    ensure_template(shared_test_cluster).expect("template setup");
    let db_name = database_name("test_reservation_phone");
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let store = setup_store(shared_test_cluster, &db_name, 1).expect("store setup");

    let dashed = booked_reservation("Dashed", "808-555-0140", 2);
    let spaced = booked_reservation("Spaced", "(808) 555 0199", 2);
    let other = booked_reservation("Other", "202-555-0153", 2);
    let rt = test_runtime();
    for reservation in [&dashed, &spaced, &other] {
        rt.block_on(store.store_reservation(reservation))
            .expect("store reservation");
    }

    let found = rt
        .block_on(store.search_reservations_by_phone("808555"))
        .expect("search by phone");
    let mut ids: Vec<ReservationId> = found.iter().map(|reservation| reservation.id()).collect();
    ids.sort_by_key(|id| id.into_inner());
    let mut expected = vec![dashed.id(), spaced.id()];
    expected.sort_by_key(|id| id.into_inner());
    assert_eq!(ids, expected);
}

#[rstest]
fn update_with_current_status_is_applied(shared_test_cluster: &'static TestCluster) {
    ensure_template(shared_test_cluster).expect("template setup");
    let db_name = database_name("test_reservation_update");
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let store = setup_store(shared_test_cluster, &db_name, 1).expect("store setup");

    let mut reservation = booked_reservation("Jones", "415-555-0199", 2);
    let rt = test_runtime();
    rt.block_on(store.store_reservation(&reservation))
        .expect("store reservation");

    reservation.cancel(&DefaultClock).expect("booked can be cancelled");
    rt.block_on(store.update_reservation(&reservation, ReservationStatus::Booked))
        .expect("update should succeed");

    let found = rt
        .block_on(store.find_reservation(reservation.id()))
        .expect("find reservation")
        .expect("reservation exists");
    assert_eq!(found.status(), ReservationStatus::Cancelled);

    let missing = ReservationId::new();
    let deleted = rt.block_on(store.delete_reservation(missing, ReservationStatus::Booked));
    assert!(matches!(
        deleted,
        Err(ReservationRepositoryError::NotFound(id)) if id == missing
    ));
}

#[rstest]
fn stale_update_does_not_overwrite_a_seat(shared_test_cluster: &'static TestCluster) {
    ensure_template(shared_test_cluster).expect("template setup");
    let db_name = database_name("test_reservation_stale_update");
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let store = setup_store(shared_test_cluster, &db_name, 1).expect("store setup");

    let table = free_table("Bar #1", 4);
    let reservation = booked_reservation("Taylor", "202-555-0153", 3);
    let rt = test_runtime();
    rt.block_on(store.store_table(&table)).expect("store table");
    rt.block_on(store.store_reservation(&reservation))
        .expect("store reservation");

    let mut stale = rt
        .block_on(store.find_reservation(reservation.id()))
        .expect("find reservation")
        .expect("reservation exists");
    rt.block_on(store.atomic_seat(table.id(), reservation.id(), Utc::now()))
        .expect("seat should succeed");

    stale.cancel(&DefaultClock).expect("stale copy is still booked");
    let result = rt.block_on(store.update_reservation(&stale, ReservationStatus::Booked));
    assert!(matches!(
        result,
        Err(ReservationRepositoryError::StatusChanged {
            id,
            expected: ReservationStatus::Booked,
            actual: ReservationStatus::Seated,
        }) if id == reservation.id()
    ));

    let found = rt
        .block_on(store.find_reservation(reservation.id()))
        .expect("find reservation")
        .expect("reservation exists");
    assert_eq!(found.status(), ReservationStatus::Seated);
    let stored_table = rt
        .block_on(store.find_table(table.id()))
        .expect("find table")
        .expect("table exists");
    assert_eq!(stored_table.reservation_id(), Some(reservation.id()));
}

#[rstest]
fn stale_delete_keeps_a_seated_reservation(shared_test_cluster: &'static TestCluster) {
    ensure_template(shared_test_cluster).expect("template setup");
    let db_name = database_name("test_reservation_stale_delete");
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let store = setup_store(shared_test_cluster, &db_name, 1).expect("store setup");

    let table = free_table("#3", 4);
    let reservation = booked_reservation("Lee", "555-0199", 2);
    let rt = test_runtime();
    rt.block_on(store.store_table(&table)).expect("store table");
    rt.block_on(store.store_reservation(&reservation))
        .expect("store reservation");
    rt.block_on(store.atomic_seat(table.id(), reservation.id(), Utc::now()))
        .expect("seat should succeed");

    let result = rt.block_on(store.delete_reservation(reservation.id(), ReservationStatus::Booked));
    assert!(matches!(
        result,
        Err(ReservationRepositoryError::StatusChanged {
            actual: ReservationStatus::Seated,
            ..
        })
    ));

    let found = rt
        .block_on(store.find_reservation(reservation.id()))
        .expect("find reservation");
    assert!(found.is_some_and(|stored| stored.status() == ReservationStatus::Seated));
}
