//! Reservation service facade
//!
//! Composes scope resolution, the state machine and listing behind one
//! handle the HTTP layer holds in [`AppState`](crate::AppState). Mutations
//! return the enriched view of the updated row.

use std::sync::Arc;

use shared::PaginatedResponse;
use shared::error::ErrorCode;
use shared::models::{ReservationCreate, ReservationStatus, ReservationView};
use shared::util::now_millis;

use super::listing::{ListQuery, ListingService};
use super::scope::ScopeResolver;
use super::state_machine::StateMachine;
use super::validator::Rejection;
use crate::auth::Actor;
use crate::db::{CasOutcome, ReservationStore, RestaurantDirectory, StaffDirectory};
use crate::error::{ReservationError, ReservationResult, Resource, StoreContext};

#[derive(Clone)]
pub struct ReservationService {
    store: Arc<dyn ReservationStore>,
    directory: Arc<dyn RestaurantDirectory>,
    scopes: ScopeResolver,
    machine: StateMachine,
    listing: ListingService,
}

impl ReservationService {
    pub fn new(
        store: Arc<dyn ReservationStore>,
        directory: Arc<dyn RestaurantDirectory>,
        staff: Arc<dyn StaffDirectory>,
        default_page_size: u32,
        max_page_size: u32,
    ) -> Self {
        let scopes = ScopeResolver::new(directory.clone(), staff);
        Self {
            machine: StateMachine::new(store.clone(), directory.clone(), scopes.clone()),
            listing: ListingService::new(
                store.clone(),
                directory.clone(),
                default_page_size,
                max_page_size,
            ),
            scopes,
            store,
            directory,
        }
    }

    pub async fn create(
        &self,
        actor: &Actor,
        dto: ReservationCreate,
    ) -> ReservationResult<ReservationView> {
        let row = self.machine.create(actor, dto).await?;
        Ok(self.listing.enrich_one(row).await)
    }

    pub async fn cancel(
        &self,
        actor: &Actor,
        id: i64,
        reason: Option<String>,
    ) -> ReservationResult<ReservationView> {
        let row = self.machine.cancel(actor, id, reason).await?;
        Ok(self.listing.enrich_one(row).await)
    }

    pub async fn confirm(&self, actor: &Actor, id: i64) -> ReservationResult<ReservationView> {
        let row = self.machine.confirm(actor, id).await?;
        Ok(self.listing.enrich_one(row).await)
    }

    pub async fn reject(
        &self,
        actor: &Actor,
        id: i64,
        reason: &str,
    ) -> ReservationResult<ReservationView> {
        let row = self.machine.reject(actor, id, reason).await?;
        Ok(self.listing.enrich_one(row).await)
    }

    pub async fn complete(&self, actor: &Actor, id: i64) -> ReservationResult<ReservationView> {
        let row = self.machine.complete(actor, id).await?;
        Ok(self.listing.enrich_one(row).await)
    }

    pub async fn staff_update_status(
        &self,
        actor: &Actor,
        id: i64,
        status: ReservationStatus,
    ) -> ReservationResult<ReservationView> {
        let row = self.machine.staff_set_status(actor, id, status).await?;
        Ok(self.listing.enrich_one(row).await)
    }

    /// List inside the caller's scope
    pub async fn list(
        &self,
        actor: &Actor,
        query: &ListQuery,
    ) -> ReservationResult<PaginatedResponse<ReservationView>> {
        let scope = self.scopes.resolve(actor).await?;
        self.listing.list(&scope, query).await
    }

    /// Attach a review to a completed booking of the caller; set once
    pub async fn attach_review(
        &self,
        actor: &Actor,
        id: i64,
        review_ref: &str,
    ) -> ReservationResult<ReservationView> {
        let review_ref = review_ref.trim();
        if review_ref.is_empty() {
            return Err(ReservationError::validation(
                ErrorCode::RequiredField,
                "Review reference cannot be empty",
            ));
        }
        let reservation = self
            .store
            .find(id)
            .await
            .during("load", actor, Some(id))?
            .ok_or(ReservationError::NotFound(id))?;
        if !matches!(*actor, Actor::Diner { user_id } if user_id == reservation.user_id) {
            tracing::warn!(reservation_id = id, %actor, "Review attach refused: not the booking diner");
            return Err(ReservationError::forbidden(
                "Only the booking diner can review this reservation",
                Resource::Reservation,
                id,
            ));
        }

        let outcome = self
            .store
            .attach_review(id, review_ref, now_millis())
            .await
            .during("attach review", actor, Some(id))?;
        match outcome {
            CasOutcome::Applied(row) => {
                tracing::info!(reservation_id = id, %actor, review_ref, "Review attached");
                Ok(self.listing.enrich_one(row).await)
            }
            CasOutcome::Stale(row) if row.review_ref.is_some() => Err(ReservationError::validation(
                ErrorCode::ReviewAlreadyAttached,
                ErrorCode::ReviewAlreadyAttached.message(),
            )),
            CasOutcome::Stale(_) => Err(ReservationError::validation(
                ErrorCode::ReviewNotAllowed,
                ErrorCode::ReviewNotAllowed.message(),
            )),
            CasOutcome::Missing => Err(ReservationError::NotFound(id)),
        }
    }

    /// Active bookings of a table from now on, soonest first
    pub async fn upcoming_for_table(&self, table_id: i64) -> ReservationResult<Vec<ReservationView>> {
        if self.directory.find_table(table_id).await?.is_none() {
            return Err(Rejection::TableNotFound.into());
        }
        let rows = self.store.upcoming_for_table(table_id, now_millis()).await?;
        Ok(self.listing.enrich(rows).await)
    }
}
