//! Application services for reservation orchestration.

mod booking;

pub use booking::{
    ReservationQuery, ReservationService, ReservationServiceError, ReservationServiceResult,
};
