//! Persistence seams
//!
//! The engine talks to three collaborators through narrow traits:
//! - [`ReservationStore`]: reservation records, owned by this service
//! - [`RestaurantDirectory`]: restaurant and table facts (read-only)
//! - [`StaffDirectory`]: staff to manager assignments (read-only)
//!
//! [`pg`] implements them on PostgreSQL, [`memory`] on in-process maps.

pub mod memory;
pub mod pg;

use async_trait::async_trait;
use shared::models::{Reservation, ReservationStatus, Restaurant, RestaurantTable, StaffMember};

pub use crate::BoxError;

/// Row to insert; id and status are assigned by the store
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub restaurant_id: i64,
    pub table_id: i64,
    pub user_id: i64,
    pub reservation_time: i64,
    pub duration_units: i32,
    pub party_size: i32,
    pub remarks: Option<String>,
    pub created_at: i64,
}

/// Status write applied by [`ReservationStore::transition`]
///
/// `cancel_reason` is written through on every transition: it holds
/// `reason` when the target is Cancelled or Rejected and is cleared for
/// any other target, so a reopened booking never carries a stale reason.
#[derive(Debug, Clone)]
pub struct StatusUpdate {
    pub status: ReservationStatus,
    pub reason: Option<String>,
    pub updated_at: i64,
}

impl StatusUpdate {
    pub fn new(status: ReservationStatus, reason: Option<String>, updated_at: i64) -> Self {
        Self {
            status,
            reason,
            updated_at,
        }
    }

    /// Value the store writes to `cancel_reason`
    pub fn stored_reason(&self) -> Option<&str> {
        self.reason
            .as_deref()
            .filter(|_| self.status.carries_reason())
    }
}

/// Result of a compare-and-set write
#[derive(Debug, Clone, PartialEq)]
pub enum CasOutcome {
    /// Precondition held; row after the write
    Applied(Reservation),
    /// Precondition failed; row as observed
    Stale(Reservation),
    /// No such reservation
    Missing,
}

/// Listing filter, already narrowed by the caller's scope
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListFilter {
    /// Only reservations booked by this diner
    pub user_id: Option<i64>,
    /// Only these restaurants; `Some(vec![])` matches nothing
    pub restaurant_ids: Option<Vec<i64>>,
    /// Only these statuses; `None` or empty matches all
    pub statuses: Option<Vec<ReservationStatus>>,
}

impl ListFilter {
    pub fn matches(&self, r: &Reservation) -> bool {
        if self.user_id.is_some_and(|uid| uid != r.user_id) {
            return false;
        }
        if let Some(ids) = &self.restaurant_ids
            && !ids.contains(&r.restaurant_id)
        {
            return false;
        }
        match &self.statuses {
            Some(statuses) if !statuses.is_empty() => statuses.contains(&r.status),
            _ => true,
        }
    }
}

#[async_trait]
pub trait ReservationStore: Send + Sync {
    async fn insert(&self, new: NewReservation) -> Result<Reservation, BoxError>;

    async fn find(&self, id: i64) -> Result<Option<Reservation>, BoxError>;

    /// Atomically apply `update` if the current status is one of `expected`
    ///
    /// `expected = None` writes unconditionally.
    async fn transition(
        &self,
        id: i64,
        expected: Option<&[ReservationStatus]>,
        update: StatusUpdate,
    ) -> Result<CasOutcome, BoxError>;

    /// Set `review_ref` if the reservation is Completed and not yet reviewed
    async fn attach_review(
        &self,
        id: i64,
        review_ref: &str,
        updated_at: i64,
    ) -> Result<CasOutcome, BoxError>;

    /// One page ordered by `created_at DESC, id DESC`, plus the unpaged total
    async fn list(
        &self,
        filter: &ListFilter,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<Reservation>, u64), BoxError>;

    /// Pending or Confirmed reservations of a table at or after `from`,
    /// ascending by reservation time
    async fn upcoming_for_table(
        &self,
        table_id: i64,
        from: i64,
    ) -> Result<Vec<Reservation>, BoxError>;
}

#[async_trait]
pub trait RestaurantDirectory: Send + Sync {
    async fn find_restaurant(&self, id: i64) -> Result<Option<Restaurant>, BoxError>;

    async fn find_table(&self, id: i64) -> Result<Option<RestaurantTable>, BoxError>;

    /// Ids of restaurants whose `owner_id` is `manager_id`
    async fn restaurant_ids_owned_by(&self, manager_id: i64) -> Result<Vec<i64>, BoxError>;
}

#[async_trait]
pub trait StaffDirectory: Send + Sync {
    /// All assignments of a staff user, approved or not
    async fn assignments_for(&self, staff_user_id: i64) -> Result<Vec<StaffMember>, BoxError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reservation(user_id: i64, restaurant_id: i64, status: ReservationStatus) -> Reservation {
        Reservation {
            id: 1,
            restaurant_id,
            table_id: 1,
            user_id,
            reservation_time: 0,
            duration_units: 1,
            party_size: 2,
            remarks: None,
            status,
            cancel_reason: None,
            review_ref: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_default_filter_matches_everything() {
        let f = ListFilter::default();
        assert!(f.matches(&reservation(1, 1, ReservationStatus::Pending)));
        assert!(f.matches(&reservation(2, 9, ReservationStatus::Rejected)));
    }

    #[test]
    fn test_empty_restaurant_set_matches_nothing() {
        let f = ListFilter {
            restaurant_ids: Some(vec![]),
            ..Default::default()
        };
        assert!(!f.matches(&reservation(1, 1, ReservationStatus::Pending)));
    }

    #[test]
    fn test_filters_combine() {
        let f = ListFilter {
            user_id: Some(3),
            restaurant_ids: Some(vec![10, 11]),
            statuses: Some(vec![ReservationStatus::Confirmed]),
        };
        assert!(f.matches(&reservation(3, 11, ReservationStatus::Confirmed)));
        assert!(!f.matches(&reservation(4, 11, ReservationStatus::Confirmed)));
        assert!(!f.matches(&reservation(3, 12, ReservationStatus::Confirmed)));
        assert!(!f.matches(&reservation(3, 11, ReservationStatus::Pending)));
    }

    #[test]
    fn test_empty_status_list_matches_all() {
        let f = ListFilter {
            statuses: Some(vec![]),
            ..Default::default()
        };
        assert!(f.matches(&reservation(1, 1, ReservationStatus::Cancelled)));
    }

    #[test]
    fn test_stored_reason_only_for_cancel_and_reject() {
        let reason = || Some("kitchen flooded".to_string());
        assert_eq!(
            StatusUpdate::new(ReservationStatus::Rejected, reason(), 1).stored_reason(),
            Some("kitchen flooded")
        );
        assert_eq!(
            StatusUpdate::new(ReservationStatus::Cancelled, reason(), 1).stored_reason(),
            Some("kitchen flooded")
        );
        assert_eq!(
            StatusUpdate::new(ReservationStatus::Pending, reason(), 1).stored_reason(),
            None
        );
        assert_eq!(
            StatusUpdate::new(ReservationStatus::Cancelled, None, 1).stored_reason(),
            None
        );
    }
}
