//! Availability validator
//!
//! Checks a proposed booking against the restaurant directory before it is
//! persisted. Checks run in a fixed order and stop at the first failure.
//! Overlapping bookings of the same table are not checked.

use std::fmt;
use std::sync::Arc;

use shared::error::ErrorCode;
use shared::models::{Restaurant, RestaurantTable};

use crate::db::RestaurantDirectory;
use crate::error::ReservationResult;

/// Why a booking was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    RestaurantNotFound,
    RestaurantNotOperating,
    TableNotFound,
    TableRestaurantMismatch,
    TimeInPast,
    InvalidDuration,
    InvalidPartySize,
}

impl Rejection {
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::RestaurantNotFound => ErrorCode::RestaurantNotFound,
            Self::RestaurantNotOperating => ErrorCode::RestaurantNotOperating,
            Self::TableNotFound => ErrorCode::TableNotFound,
            Self::TableRestaurantMismatch => ErrorCode::TableRestaurantMismatch,
            Self::TimeInPast => ErrorCode::ReservationTimeInPast,
            Self::InvalidDuration => ErrorCode::InvalidDuration,
            Self::InvalidPartySize => ErrorCode::InvalidPartySize,
        }
    }

    pub const fn message(&self) -> &'static str {
        self.code().message()
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Booking request as seen by the validator
#[derive(Debug, Clone, Copy)]
pub struct BookingRequest {
    pub restaurant_id: i64,
    pub table_id: i64,
    pub reservation_time: i64,
    pub duration_units: i32,
    pub party_size: i32,
}

fn check_restaurant(restaurant: Option<&Restaurant>) -> Result<&Restaurant, Rejection> {
    let restaurant = restaurant.ok_or(Rejection::RestaurantNotFound)?;
    if !restaurant.status.accepts_reservations() {
        return Err(Rejection::RestaurantNotOperating);
    }
    Ok(restaurant)
}

fn check_table(table: Option<&RestaurantTable>, restaurant_id: i64) -> Result<(), Rejection> {
    let table = table.ok_or(Rejection::TableNotFound)?;
    if table.restaurant_id != restaurant_id {
        return Err(Rejection::TableRestaurantMismatch);
    }
    Ok(())
}

/// Checks that need no lookup
fn check_request(req: &BookingRequest, now: i64) -> Result<(), Rejection> {
    if req.reservation_time < now {
        return Err(Rejection::TimeInPast);
    }
    if req.duration_units <= 0 {
        return Err(Rejection::InvalidDuration);
    }
    if req.party_size <= 0 {
        return Err(Rejection::InvalidPartySize);
    }
    Ok(())
}

#[derive(Clone)]
pub struct AvailabilityValidator {
    directory: Arc<dyn RestaurantDirectory>,
}

impl AvailabilityValidator {
    pub fn new(directory: Arc<dyn RestaurantDirectory>) -> Self {
        Self { directory }
    }

    /// Read-only; fails with [`ReservationError::Unavailable`](crate::ReservationError::Unavailable)
    pub async fn validate(&self, req: &BookingRequest, now: i64) -> ReservationResult<()> {
        let restaurant = self.directory.find_restaurant(req.restaurant_id).await?;
        check_restaurant(restaurant.as_ref())?;

        let table = self.directory.find_table(req.table_id).await?;
        check_table(table.as_ref(), req.restaurant_id)?;

        check_request(req, now)?;
        Ok(())
    }
}
