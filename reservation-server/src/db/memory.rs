//! In-memory store and directories
//!
//! Backs tests and local tooling. One write lock per reservation map makes
//! every compare-and-set atomic, matching the single-statement updates of
//! the PostgreSQL store.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use shared::models::{
    Reservation, ReservationStatus, Restaurant, RestaurantTable, StaffMember,
};
use tokio::sync::RwLock;

use super::{
    BoxError, CasOutcome, ListFilter, NewReservation, ReservationStore, RestaurantDirectory,
    StaffDirectory, StatusUpdate,
};

pub struct MemoryStore {
    next_id: AtomicI64,
    reservations: RwLock<BTreeMap<i64, Reservation>>,
    restaurants: RwLock<BTreeMap<i64, Restaurant>>,
    tables: RwLock<BTreeMap<i64, RestaurantTable>>,
    staff: RwLock<Vec<StaffMember>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(1),
            reservations: RwLock::new(BTreeMap::new()),
            restaurants: RwLock::new(BTreeMap::new()),
            tables: RwLock::new(BTreeMap::new()),
            staff: RwLock::new(Vec::new()),
        }
    }

    pub async fn put_restaurant(&self, restaurant: Restaurant) {
        self.restaurants
            .write()
            .await
            .insert(restaurant.id, restaurant);
    }

    pub async fn remove_restaurant(&self, id: i64) -> Option<Restaurant> {
        self.restaurants.write().await.remove(&id)
    }

    pub async fn put_table(&self, table: RestaurantTable) {
        self.tables.write().await.insert(table.id, table);
    }

    /// Insert or replace the assignment with the same id
    pub async fn put_staff(&self, member: StaffMember) {
        let mut staff = self.staff.write().await;
        staff.retain(|s| s.id != member.id);
        staff.push(member);
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReservationStore for MemoryStore {
    async fn insert(&self, new: NewReservation) -> Result<Reservation, BoxError> {
        let reservation = Reservation {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            restaurant_id: new.restaurant_id,
            table_id: new.table_id,
            user_id: new.user_id,
            reservation_time: new.reservation_time,
            duration_units: new.duration_units,
            party_size: new.party_size,
            remarks: new.remarks,
            status: ReservationStatus::Pending,
            cancel_reason: None,
            review_ref: None,
            created_at: new.created_at,
            updated_at: new.created_at,
        };
        self.reservations
            .write()
            .await
            .insert(reservation.id, reservation.clone());
        Ok(reservation)
    }

    async fn find(&self, id: i64) -> Result<Option<Reservation>, BoxError> {
        Ok(self.reservations.read().await.get(&id).cloned())
    }

    async fn transition(
        &self,
        id: i64,
        expected: Option<&[ReservationStatus]>,
        update: StatusUpdate,
    ) -> Result<CasOutcome, BoxError> {
        let mut map = self.reservations.write().await;
        let Some(row) = map.get_mut(&id) else {
            return Ok(CasOutcome::Missing);
        };
        if let Some(expected) = expected
            && !expected.contains(&row.status)
        {
            return Ok(CasOutcome::Stale(row.clone()));
        }
        row.cancel_reason = update.stored_reason().map(str::to_string);
        row.status = update.status;
        row.updated_at = update.updated_at;
        Ok(CasOutcome::Applied(row.clone()))
    }

    async fn attach_review(
        &self,
        id: i64,
        review_ref: &str,
        updated_at: i64,
    ) -> Result<CasOutcome, BoxError> {
        let mut map = self.reservations.write().await;
        let Some(row) = map.get_mut(&id) else {
            return Ok(CasOutcome::Missing);
        };
        if row.status != ReservationStatus::Completed || row.review_ref.is_some() {
            return Ok(CasOutcome::Stale(row.clone()));
        }
        row.review_ref = Some(review_ref.to_string());
        row.updated_at = updated_at;
        Ok(CasOutcome::Applied(row.clone()))
    }

    async fn list(
        &self,
        filter: &ListFilter,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<Reservation>, u64), BoxError> {
        let map = self.reservations.read().await;
        let mut rows: Vec<&Reservation> = map.values().filter(|r| filter.matches(r)).collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = rows.len() as u64;
        let page = rows
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect();
        Ok((page, total))
    }

    async fn upcoming_for_table(
        &self,
        table_id: i64,
        from: i64,
    ) -> Result<Vec<Reservation>, BoxError> {
        let map = self.reservations.read().await;
        let mut rows: Vec<Reservation> = map
            .values()
            .filter(|r| {
                r.table_id == table_id
                    && r.reservation_time >= from
                    && matches!(
                        r.status,
                        ReservationStatus::Pending | ReservationStatus::Confirmed
                    )
            })
            .cloned()
            .collect();
        rows.sort_by_key(|r| (r.reservation_time, r.id));
        Ok(rows)
    }
}

#[async_trait]
impl RestaurantDirectory for MemoryStore {
    async fn find_restaurant(&self, id: i64) -> Result<Option<Restaurant>, BoxError> {
        Ok(self.restaurants.read().await.get(&id).cloned())
    }

    async fn find_table(&self, id: i64) -> Result<Option<RestaurantTable>, BoxError> {
        Ok(self.tables.read().await.get(&id).cloned())
    }

    async fn restaurant_ids_owned_by(&self, manager_id: i64) -> Result<Vec<i64>, BoxError> {
        Ok(self
            .restaurants
            .read()
            .await
            .values()
            .filter(|r| r.owner_id == manager_id)
            .map(|r| r.id)
            .collect())
    }
}

#[async_trait]
impl StaffDirectory for MemoryStore {
    async fn assignments_for(&self, staff_user_id: i64) -> Result<Vec<StaffMember>, BoxError> {
        Ok(self
            .staff
            .read()
            .await
            .iter()
            .filter(|s| s.user_id == staff_user_id)
            .cloned()
            .collect())
    }
}
