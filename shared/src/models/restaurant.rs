//! Restaurant and Table Models
//!
//! Owned by the restaurant directory; the reservation engine only reads them.

use serde::{Deserialize, Serialize};

/// Restaurant operating status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[repr(i16)]
pub enum RestaurantStatus {
    PendingReview = 0,
    Approved = 1,
    Closed = 2,
    Operating = 3,
}

impl RestaurantStatus {
    /// Only operating restaurants accept bookings
    pub const fn accepts_reservations(&self) -> bool {
        matches!(self, Self::Operating)
    }
}

/// Restaurant facts consulted by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Restaurant {
    pub id: i64,
    /// Managing user (role Manager)
    pub owner_id: i64,
    pub name: String,
    pub status: RestaurantStatus,
}

/// Restaurant table (桌台)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct RestaurantTable {
    pub id: i64,
    pub restaurant_id: i64,
    /// e.g. "window", "booth", "private room"
    pub table_type: String,
}
