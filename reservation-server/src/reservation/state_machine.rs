//! Reservation state machine
//!
//! ```text
//! Pending ──confirm──▶ Confirmed ──complete──▶ Completed
//!    │                     │
//!    ├──reject──▶ Rejected └──cancel──▶ Cancelled
//!    └──cancel──▶ Cancelled
//! ```
//!
//! Every transition is one compare-and-set against the store: the write
//! only lands if the row still holds a legal source status. A caller that
//! loses a race sees the winner's status in `InvalidStateTransition`.
//!
//! Staff use a separate, looser entry point ([`StateMachine::staff_set_status`])
//! that skips the transition graph but is still scoped and still
//! compare-and-set against the status it observed.

use std::sync::Arc;

use shared::error::ErrorCode;
use shared::models::{Reservation, ReservationCreate, ReservationStatus};
use shared::util::now_millis;

use super::scope::ScopeResolver;
use super::validator::{AvailabilityValidator, BookingRequest};
use crate::auth::Actor;
use crate::db::{CasOutcome, NewReservation, ReservationStore, RestaurantDirectory, StatusUpdate};
use crate::error::{ReservationError, ReservationResult, Resource, StoreContext};

/// Strict transitions available to diners, managers and admins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Confirm,
    Reject,
    Complete,
    Cancel,
}

impl Transition {
    pub const fn target(&self) -> ReservationStatus {
        match self {
            Self::Confirm => ReservationStatus::Confirmed,
            Self::Reject => ReservationStatus::Rejected,
            Self::Complete => ReservationStatus::Completed,
            Self::Cancel => ReservationStatus::Cancelled,
        }
    }

    /// Statuses this transition may start from
    pub const fn sources(&self) -> &'static [ReservationStatus] {
        match self {
            Self::Confirm | Self::Reject => &[ReservationStatus::Pending],
            Self::Complete => &[ReservationStatus::Confirmed],
            Self::Cancel => &[ReservationStatus::Pending, ReservationStatus::Confirmed],
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Confirm => "confirm",
            Self::Reject => "reject",
            Self::Complete => "complete",
            Self::Cancel => "cancel",
        }
    }
}

/// Whether `from → to` is an edge of the lifecycle graph
pub fn is_legal(from: ReservationStatus, to: ReservationStatus) -> bool {
    use ReservationStatus::*;
    matches!(
        (from, to),
        (Pending, Confirmed | Rejected | Cancelled) | (Confirmed, Completed | Cancelled)
    )
}

#[derive(Clone)]
pub struct StateMachine {
    store: Arc<dyn ReservationStore>,
    directory: Arc<dyn RestaurantDirectory>,
    validator: AvailabilityValidator,
    scopes: ScopeResolver,
}

impl StateMachine {
    pub fn new(
        store: Arc<dyn ReservationStore>,
        directory: Arc<dyn RestaurantDirectory>,
        scopes: ScopeResolver,
    ) -> Self {
        Self {
            validator: AvailabilityValidator::new(directory.clone()),
            store,
            directory,
            scopes,
        }
    }

    /// Book a table; only diners may book
    pub async fn create(
        &self,
        actor: &Actor,
        dto: ReservationCreate,
    ) -> ReservationResult<Reservation> {
        let Actor::Diner { user_id } = *actor else {
            tracing::warn!(%actor, "Non-diner attempted to create a reservation");
            return Err(ReservationError::forbidden(
                "Only diners can create reservations",
                Resource::User,
                actor.id(),
            ));
        };

        let now = now_millis();
        let request = BookingRequest {
            restaurant_id: dto.restaurant_id,
            table_id: dto.table_id,
            reservation_time: dto.reservation_time,
            duration_units: dto.duration_units,
            party_size: dto.party_size,
        };
        if let Err(e) = self.validator.validate(&request, now).await {
            tracing::info!(
                user_id,
                restaurant_id = dto.restaurant_id,
                table_id = dto.table_id,
                reason = %e,
                "Reservation refused"
            );
            return Err(e);
        }

        let reservation = self
            .store
            .insert(NewReservation {
                restaurant_id: dto.restaurant_id,
                table_id: dto.table_id,
                user_id,
                reservation_time: dto.reservation_time,
                duration_units: dto.duration_units,
                party_size: dto.party_size,
                remarks: dto.remarks.filter(|r| !r.trim().is_empty()),
                created_at: now,
            })
            .await
            .during("create", actor, None)?;

        tracing::info!(
            reservation_id = reservation.id,
            user_id,
            restaurant_id = reservation.restaurant_id,
            table_id = reservation.table_id,
            "Reservation created"
        );
        Ok(reservation)
    }

    /// Cancel a booking; only the diner who made it may cancel
    pub async fn cancel(
        &self,
        actor: &Actor,
        id: i64,
        reason: Option<String>,
    ) -> ReservationResult<Reservation> {
        let reservation = self.load(actor, id).await?;
        let owner = matches!(*actor, Actor::Diner { user_id } if user_id == reservation.user_id);
        if !owner {
            tracing::warn!(reservation_id = id, %actor, "Cancel refused: not the booking diner");
            return Err(ReservationError::forbidden(
                "Only the booking diner can cancel this reservation",
                Resource::Reservation,
                id,
            ));
        }
        let reason = reason.map(|r| r.trim().to_string()).filter(|r| !r.is_empty());
        self.apply(actor, &reservation, Transition::Cancel, reason).await
    }

    pub async fn confirm(&self, actor: &Actor, id: i64) -> ReservationResult<Reservation> {
        let reservation = self.load(actor, id).await?;
        self.ensure_manages(actor, &reservation).await?;
        self.apply(actor, &reservation, Transition::Confirm, None).await
    }

    /// Reject a pending booking; the reason is mandatory
    pub async fn reject(
        &self,
        actor: &Actor,
        id: i64,
        reason: &str,
    ) -> ReservationResult<Reservation> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(ReservationError::validation(
                ErrorCode::RejectReasonRequired,
                ErrorCode::RejectReasonRequired.message(),
            ));
        }
        let reservation = self.load(actor, id).await?;
        self.ensure_manages(actor, &reservation).await?;
        self.apply(
            actor,
            &reservation,
            Transition::Reject,
            Some(reason.to_string()),
        )
        .await
    }

    pub async fn complete(&self, actor: &Actor, id: i64) -> ReservationResult<Reservation> {
        let reservation = self.load(actor, id).await?;
        self.ensure_manages(actor, &reservation).await?;
        self.apply(actor, &reservation, Transition::Complete, None).await
    }

    /// Staff status overwrite
    ///
    /// Any target status is accepted for reservations inside the staff
    /// member's scope. The write is conditional on the status observed at
    /// load time, so a concurrent change is reported, not overwritten.
    pub async fn staff_set_status(
        &self,
        actor: &Actor,
        id: i64,
        status: ReservationStatus,
    ) -> ReservationResult<Reservation> {
        if !matches!(actor, Actor::Staff { .. }) {
            return Err(ReservationError::forbidden(
                "Only staff can use this operation",
                Resource::Reservation,
                id,
            ));
        }
        let scope = self.scopes.resolve(actor).await?;
        let reservation = self.load(actor, id).await?;
        if !scope.permits_restaurant(reservation.restaurant_id) {
            tracing::warn!(
                reservation_id = id,
                restaurant_id = reservation.restaurant_id,
                %actor,
                "Staff status update outside assigned restaurants"
            );
            return Err(ReservationError::forbidden(
                "No permission to handle reservations of this restaurant",
                Resource::Restaurant,
                reservation.restaurant_id,
            ));
        }

        let observed = reservation.status;
        let update = StatusUpdate::new(status, None, now_millis());
        let outcome = self
            .store
            .transition(id, Some(std::slice::from_ref(&observed)), update)
            .await
            .during("staff status update", actor, Some(id))?;
        match outcome {
            CasOutcome::Applied(row) => {
                tracing::info!(
                    reservation_id = id,
                    %actor,
                    from = %observed,
                    to = %status,
                    "Reservation status set by staff"
                );
                Ok(row)
            }
            CasOutcome::Stale(row) => Err(ReservationError::InvalidStateTransition {
                from: row.status,
                to: status,
            }),
            CasOutcome::Missing => Err(ReservationError::NotFound(id)),
        }
    }

    async fn load(&self, actor: &Actor, id: i64) -> ReservationResult<Reservation> {
        self.store
            .find(id)
            .await
            .during("load", actor, Some(id))?
            .ok_or(ReservationError::NotFound(id))
    }

    /// Admins manage every reservation, managers those of restaurants they own
    async fn ensure_manages(&self, actor: &Actor, reservation: &Reservation) -> ReservationResult<()> {
        let allowed = match *actor {
            Actor::Admin { .. } => true,
            Actor::Manager { manager_id } => self
                .directory
                .find_restaurant(reservation.restaurant_id)
                .await
                .during("ownership check", actor, Some(reservation.id))?
                .is_some_and(|r| r.owner_id == manager_id),
            Actor::Diner { .. } | Actor::Staff { .. } => false,
        };
        if allowed {
            return Ok(());
        }
        tracing::warn!(
            reservation_id = reservation.id,
            restaurant_id = reservation.restaurant_id,
            %actor,
            "Reservation management refused"
        );
        Err(ReservationError::forbidden(
            "No permission to handle this reservation",
            Resource::Reservation,
            reservation.id,
        ))
    }

    async fn apply(
        &self,
        actor: &Actor,
        reservation: &Reservation,
        transition: Transition,
        reason: Option<String>,
    ) -> ReservationResult<Reservation> {
        let id = reservation.id;
        let to = transition.target();
        let update = StatusUpdate::new(to, reason, now_millis());
        let outcome = self
            .store
            .transition(id, Some(transition.sources()), update)
            .await
            .during(transition.name(), actor, Some(id))?;
        match outcome {
            CasOutcome::Applied(row) => {
                tracing::info!(
                    reservation_id = id,
                    %actor,
                    action = transition.name(),
                    from = %reservation.status,
                    to = %to,
                    "Reservation status changed"
                );
                Ok(row)
            }
            CasOutcome::Stale(row) => {
                tracing::info!(
                    reservation_id = id,
                    %actor,
                    action = transition.name(),
                    current = %row.status,
                    "Reservation transition refused"
                );
                Err(ReservationError::InvalidStateTransition {
                    from: row.status,
                    to,
                })
            }
            CasOutcome::Missing => Err(ReservationError::NotFound(id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_transition_sources_agree_with_graph() {
        for t in [
            Transition::Confirm,
            Transition::Reject,
            Transition::Complete,
            Transition::Cancel,
        ] {
            for from in ReservationStatus::ALL {
                assert_eq!(
                    t.sources().contains(&from),
                    is_legal(from, t.target()),
                    "{} from {from}",
                    t.name()
                );
            }
        }
    }

    #[test]
    fn test_terminal_statuses_have_no_exits() {
        for from in ReservationStatus::ALL.into_iter().filter(|s| s.is_terminal()) {
            for to in ReservationStatus::ALL {
                assert!(!is_legal(from, to), "{from} -> {to}");
            }
        }
    }

    #[test]
    fn test_graph_edges() {
        use ReservationStatus::*;
        assert!(is_legal(Pending, Confirmed));
        assert!(is_legal(Pending, Rejected));
        assert!(is_legal(Pending, Cancelled));
        assert!(is_legal(Confirmed, Completed));
        assert!(is_legal(Confirmed, Cancelled));
        assert!(!is_legal(Pending, Completed));
        assert!(!is_legal(Confirmed, Rejected));
        assert!(!is_legal(Pending, Pending));
    }

    proptest! {
        #[test]
        fn prop_no_edge_returns_to_pending(idx in 0usize..5) {
            let from = ReservationStatus::ALL[idx];
            prop_assert!(!is_legal(from, ReservationStatus::Pending));
        }
    }
}
