//! Seat and finish flows spanning both services.

use super::helpers::{Floor, booking, floor, seat_request, table};
use eyre::{bail, ensure};
use maitre::error::FailureKind;
use maitre::reservation::{domain::ReservationStatus, services::ReservationServiceError};
use maitre::table::{domain::SeatingError, services::TableServiceError};
use rstest::rstest;

#[rstest]
#[case::fits_exactly(5, true)]
#[case::one_too_many(4, false)]
#[tokio::test(flavor = "multi_thread")]
async fn capacity_decides_seating(
    floor: Floor,
    #[case] capacity: u32,
    #[case] seated: bool,
) -> eyre::Result<()> {
    let dining = floor.seating.create_table(&table("Window", capacity)).await?;
    let party = floor.bookings.create(&booking("19:00", "202-555-0164", 5)).await?;

    let result = floor
        .seating
        .seat(dining.id(), &seat_request(party.id()))
        .await;

    if seated {
        let outcome = result?;
        ensure!(outcome.table.reservation_id() == Some(party.id()));
        ensure!(floor.bookings.find(party.id()).await?.status() == ReservationStatus::Seated);
    } else {
        ensure!(matches!(
            result,
            Err(TableServiceError::Seating(SeatingError::CapacityExceeded { .. }))
        ));
        ensure!(floor.bookings.find(party.id()).await?.status() == ReservationStatus::Booked);
        ensure!(floor.seating.find_table(dining.id()).await?.is_free());
    }
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn full_service_lifecycle(floor: Floor) -> eyre::Result<()> {
    let dining = floor.seating.create_table(&table("Booth", 4)).await?;
    let party = floor.bookings.create(&booking("19:00", "202-555-0164", 4)).await?;

    floor.seating.seat(dining.id(), &seat_request(party.id())).await?;

    let delete = floor.bookings.destroy(party.id()).await;
    ensure!(matches!(delete, Err(ReservationServiceError::StillSeated(_))));

    let finished = floor.seating.finish(dining.id()).await?;
    ensure!(finished.table.is_free());
    ensure!(finished.reservation.status() == ReservationStatus::Finished);

    let again = floor.seating.finish(dining.id()).await;
    ensure!(matches!(
        again,
        Err(TableServiceError::Seating(SeatingError::TableNotOccupied(_)))
    ));

    let reseat = floor.seating.seat(dining.id(), &seat_request(party.id())).await;
    let Err(err) = reseat else {
        bail!("finished reservations cannot be seated again");
    };
    ensure!(err.kind() == FailureKind::Conflict);

    floor.bookings.destroy(party.id()).await?;
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cancelled_reservations_cannot_be_seated(floor: Floor) -> eyre::Result<()> {
    let dining = floor.seating.create_table(&table("Booth", 4)).await?;
    let party = floor.bookings.create(&booking("19:00", "202-555-0164", 2)).await?;
    floor.bookings.cancel(party.id()).await?;

    let result = floor.seating.seat(dining.id(), &seat_request(party.id())).await;

    ensure!(matches!(
        result,
        Err(TableServiceError::Seating(SeatingError::ReservationFinalized {
            status: ReservationStatus::Cancelled,
            ..
        }))
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn seated_reservations_cannot_be_cancelled(floor: Floor) -> eyre::Result<()> {
    let dining = floor.seating.create_table(&table("Booth", 4)).await?;
    let party = floor.bookings.create(&booking("19:00", "202-555-0164", 2)).await?;
    floor.seating.seat(dining.id(), &seat_request(party.id())).await?;

    let result = floor.bookings.cancel(party.id()).await;

    let Err(err) = result else {
        bail!("a seated party must be finished, not cancelled");
    };
    ensure!(err.kind() == FailureKind::Conflict);
    ensure!(!floor.seating.find_table(dining.id()).await?.is_free());
    Ok(())
}
