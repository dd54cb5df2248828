//! Shared fixture: two operating restaurants, one awaiting review, and staff.
//!
//! | id | owner | status         | tables          |
//! |----|-------|----------------|-----------------|
//! | 1  | 100   | Operating      | 10 window, 11 booth |
//! | 2  | 200   | Operating      | 20 terrace      |
//! | 3  | 100   | PendingReview  | 30 window       |
//!
//! Staff user 50 is approved by manager 100, staff user 51 is not.

#![allow(dead_code)]

use std::sync::Arc;

use reservation_server::auth::Actor;
use reservation_server::db::memory::MemoryStore;
use reservation_server::reservation::ReservationService;
use shared::models::{
    ReservationCreate, Restaurant, RestaurantStatus, RestaurantTable, StaffMember, StaffStatus,
};
use shared::util::{hours_to_millis, now_millis};

pub const DINER_A: Actor = Actor::Diner { user_id: 1 };
pub const DINER_B: Actor = Actor::Diner { user_id: 2 };
pub const MANAGER: Actor = Actor::Manager { manager_id: 100 };
pub const OTHER_MANAGER: Actor = Actor::Manager { manager_id: 200 };
pub const ADMIN: Actor = Actor::Admin { user_id: 900 };
pub const STAFF: Actor = Actor::Staff { staff_id: 50 };
pub const PENDING_STAFF: Actor = Actor::Staff { staff_id: 51 };

pub async fn seeded_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    for (id, owner_id, name, status) in [
        (1, 100, "Blue Door", RestaurantStatus::Operating),
        (2, 200, "Harbor House", RestaurantStatus::Operating),
        (3, 100, "Night Market", RestaurantStatus::PendingReview),
    ] {
        store
            .put_restaurant(Restaurant {
                id,
                owner_id,
                name: name.to_string(),
                status,
            })
            .await;
    }
    for (id, restaurant_id, table_type) in [
        (10, 1, "window"),
        (11, 1, "booth"),
        (20, 2, "terrace"),
        (30, 3, "window"),
    ] {
        store
            .put_table(RestaurantTable {
                id,
                restaurant_id,
                table_type: table_type.to_string(),
            })
            .await;
    }
    for (id, user_id, status) in [(1, 50, StaffStatus::Approved), (2, 51, StaffStatus::PendingReview)] {
        store
            .put_staff(StaffMember {
                id,
                user_id,
                manager_id: 100,
                status,
            })
            .await;
    }
    store
}

pub fn service(store: Arc<MemoryStore>) -> ReservationService {
    ReservationService::new(store.clone(), store.clone(), store, 10, 100)
}

pub async fn seeded_service() -> (Arc<MemoryStore>, ReservationService) {
    let store = seeded_store().await;
    (store.clone(), service(store))
}

/// A valid booking `hours_ahead` from now
pub fn booking(restaurant_id: i64, table_id: i64, hours_ahead: i64) -> ReservationCreate {
    ReservationCreate {
        restaurant_id,
        table_id,
        reservation_time: now_millis() + hours_to_millis(hours_ahead),
        duration_units: 2,
        party_size: 2,
        remarks: None,
    }
}
