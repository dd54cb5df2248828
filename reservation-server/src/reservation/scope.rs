//! Access scope resolution
//!
//! Turns a caller into the set of reservations it may see or act on:
//!
//! | Actor   | Scope                                                     |
//! |---------|-----------------------------------------------------------|
//! | Admin   | everything                                                |
//! | Manager | restaurants whose `owner_id` is the manager               |
//! | Staff   | restaurants owned by managers that approved the staff     |
//! | Diner   | the diner's own bookings                                  |
//!
//! Staff with no approved assignment get `StaffNotApproved`, never an
//! empty or borrowed scope.

use std::sync::Arc;

use shared::models::StaffMember;

use crate::auth::Actor;
use crate::db::{ListFilter, RestaurantDirectory, StaffDirectory};
use crate::error::{ReservationError, ReservationResult, Resource, StoreContext};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    All,
    /// Sorted, deduplicated restaurant ids
    Restaurants(Vec<i64>),
    OwnUser(i64),
}

impl Scope {
    /// Whether reservations of `restaurant_id` fall in this scope
    ///
    /// `OwnUser` scopes are per booking, not per restaurant, so any
    /// restaurant passes here and the user filter does the narrowing.
    pub fn permits_restaurant(&self, restaurant_id: i64) -> bool {
        match self {
            Self::All | Self::OwnUser(_) => true,
            Self::Restaurants(ids) => ids.binary_search(&restaurant_id).is_ok(),
        }
    }

    /// Build the store filter for a listing
    ///
    /// A restaurant filter outside a restaurant scope is refused, not
    /// silently narrowed to nothing.
    pub fn to_filter(&self, restaurant_id: Option<i64>) -> ReservationResult<ListFilter> {
        if let Some(rid) = restaurant_id
            && !self.permits_restaurant(rid)
        {
            return Err(ReservationError::forbidden(
                "No permission to access this restaurant",
                Resource::Restaurant,
                rid,
            ));
        }

        let filter = match self {
            Self::All => ListFilter {
                restaurant_ids: restaurant_id.map(|rid| vec![rid]),
                ..Default::default()
            },
            Self::Restaurants(ids) => ListFilter {
                restaurant_ids: Some(match restaurant_id {
                    Some(rid) => vec![rid],
                    None => ids.clone(),
                }),
                ..Default::default()
            },
            Self::OwnUser(user_id) => ListFilter {
                user_id: Some(*user_id),
                restaurant_ids: restaurant_id.map(|rid| vec![rid]),
                ..Default::default()
            },
        };
        Ok(filter)
    }
}

#[derive(Clone)]
pub struct ScopeResolver {
    restaurants: Arc<dyn RestaurantDirectory>,
    staff: Arc<dyn StaffDirectory>,
}

impl ScopeResolver {
    pub fn new(restaurants: Arc<dyn RestaurantDirectory>, staff: Arc<dyn StaffDirectory>) -> Self {
        Self { restaurants, staff }
    }

    pub async fn resolve(&self, actor: &Actor) -> ReservationResult<Scope> {
        let scope = match *actor {
            Actor::Admin { .. } => Scope::All,
            Actor::Diner { user_id } => Scope::OwnUser(user_id),
            Actor::Manager { manager_id } => {
                let ids = self
                    .restaurants
                    .restaurant_ids_owned_by(manager_id)
                    .await
                    .during("resolve scope", actor, None)?;
                Scope::Restaurants(normalize(ids))
            }
            Actor::Staff { staff_id } => {
                let assignments = self
                    .staff
                    .assignments_for(staff_id)
                    .await
                    .during("resolve scope", actor, None)?;
                let managers = approved_managers(&assignments);
                if managers.is_empty() {
                    tracing::warn!(staff_id, "Staff has no approved assignment");
                    return Err(ReservationError::StaffNotApproved);
                }
                let mut ids = Vec::new();
                for manager_id in managers {
                    let owned = self
                        .restaurants
                        .restaurant_ids_owned_by(manager_id)
                        .await
                        .during("resolve scope", actor, None)?;
                    ids.extend(owned);
                }
                Scope::Restaurants(normalize(ids))
            }
        };
        tracing::debug!(%actor, ?scope, "Resolved access scope");
        Ok(scope)
    }
}

fn approved_managers(assignments: &[StaffMember]) -> Vec<i64> {
    normalize(
        assignments
            .iter()
            .filter(|s| s.is_approved())
            .map(|s| s.manager_id)
            .collect(),
    )
}

fn normalize(mut ids: Vec<i64>) -> Vec<i64> {
    ids.sort_unstable();
    ids.dedup();
    ids
}
