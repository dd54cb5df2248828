//! Engine error type for reservation-server
//!
//! `ReservationError` is what the validator, state machine, scope resolver
//! and listing return. `From<ReservationError> for AppError` is the only
//! place engine errors become wire errors.

use std::fmt;

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};
use shared::models::ReservationStatus;
use thiserror::Error;

use crate::BoxError;
use crate::auth::Actor;
use crate::reservation::validator::Rejection;

/// What a forbidden request was refused on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// The caller acted as the wrong kind of user
    User,
    Reservation,
    /// Restaurant outside the caller's scope
    Restaurant,
}

impl Resource {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Reservation => "reservation",
            Self::Restaurant => "restaurant",
        }
    }

    const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Restaurant => ErrorCode::RestaurantOutOfScope,
            Self::User | Self::Reservation => ErrorCode::PermissionDenied,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum ReservationError {
    /// Bad input the caller can correct
    #[error("{message}")]
    Validation { code: ErrorCode, message: String },

    /// Booking refused by the availability validator
    #[error("{0}")]
    Unavailable(Rejection),

    /// Valid identity, insufficient scope
    #[error("{message}")]
    Forbidden {
        message: String,
        resource: Resource,
        id: i64,
    },

    #[error("Staff assignment has not been approved")]
    StaffNotApproved,

    #[error("Reservation {0} not found")]
    NotFound(i64),

    #[error("Cannot change reservation status from {from} to {to}")]
    InvalidStateTransition {
        from: ReservationStatus,
        to: ReservationStatus,
    },

    /// Persistence failure, with the operation it interrupted
    #[error("store error during {op}: {source}")]
    Store {
        op: &'static str,
        actor: Option<String>,
        reservation_id: Option<i64>,
        #[source]
        source: BoxError,
    },
}

impl ReservationError {
    pub fn validation(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Validation {
            code,
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>, resource: Resource, id: i64) -> Self {
        Self::Forbidden {
            message: message.into(),
            resource,
            id,
        }
    }
}

impl From<BoxError> for ReservationError {
    fn from(source: BoxError) -> Self {
        Self::Store {
            op: "store access",
            actor: None,
            reservation_id: None,
            source,
        }
    }
}

impl From<Rejection> for ReservationError {
    fn from(r: Rejection) -> Self {
        Self::Unavailable(r)
    }
}

/// Attach the interrupted operation to a store failure
pub trait StoreContext<T> {
    fn during(
        self,
        op: &'static str,
        actor: &Actor,
        reservation_id: Option<i64>,
    ) -> ReservationResult<T>;
}

impl<T> StoreContext<T> for Result<T, BoxError> {
    fn during(
        self,
        op: &'static str,
        actor: &Actor,
        reservation_id: Option<i64>,
    ) -> ReservationResult<T> {
        self.map_err(|source| ReservationError::Store {
            op,
            actor: Some(actor.to_string()),
            reservation_id,
            source,
        })
    }
}

impl From<ReservationError> for AppError {
    fn from(e: ReservationError) -> Self {
        match e {
            ReservationError::Validation { code, message } => AppError::with_message(code, message),
            ReservationError::Unavailable(rejection) => {
                AppError::with_message(rejection.code(), rejection.message())
            }
            ReservationError::Forbidden {
                message,
                resource,
                id,
            } => AppError::forbidden_resource(resource.error_code(), message, resource.as_str(), id),
            ReservationError::StaffNotApproved => AppError::new(ErrorCode::StaffNotApproved),
            ReservationError::NotFound(id) => AppError::with_message(
                ErrorCode::ReservationNotFound,
                format!("Reservation {id} not found"),
            ),
            ReservationError::InvalidStateTransition { from, to } => AppError::with_message(
                ErrorCode::InvalidStateTransition,
                format!("Cannot change reservation status from {from} to {to}"),
            )
            .with_detail("current_status", from.code())
            .with_detail("requested_status", to.code()),
            ReservationError::Store {
                op,
                actor,
                reservation_id,
                source,
            } => {
                tracing::error!(
                    op,
                    actor = actor.as_deref().unwrap_or("-"),
                    reservation_id,
                    error = %source,
                    "Reservation store error"
                );
                AppError::new(ErrorCode::InternalError)
            }
        }
    }
}

impl IntoResponse for ReservationError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

/// Convenience type alias for engine results
pub type ReservationResult<T> = Result<T, ReservationError>;

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn test_rejection_maps_to_bad_request() {
        let err: AppError = ReservationError::Unavailable(Rejection::RestaurantNotOperating).into();
        assert_eq!(err.code, ErrorCode::RestaurantNotOperating);
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "This restaurant is not available for reservations");
    }

    #[test]
    fn test_forbidden_carries_resource_id() {
        let err: AppError = ReservationError::forbidden(
            "No permission to access this restaurant",
            Resource::Restaurant,
            9,
        )
        .into();
        assert_eq!(err.code, ErrorCode::RestaurantOutOfScope);
        assert_eq!(err.http_status(), StatusCode::FORBIDDEN);
        let details = err.details.unwrap();
        assert_eq!(details["resource"], "restaurant");
        assert_eq!(details["id"], 9);
    }

    #[test]
    fn test_invalid_transition_names_both_statuses() {
        let err: AppError = ReservationError::InvalidStateTransition {
            from: ReservationStatus::Completed,
            to: ReservationStatus::Cancelled,
        }
        .into();
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);
        assert!(err.message.contains("Completed"));
        assert!(err.message.contains("Cancelled"));
    }

    #[test]
    fn test_reservation_forbidden_is_permission_denied() {
        let err: AppError = ReservationError::forbidden(
            "No permission to handle this reservation",
            Resource::Reservation,
            4,
        )
        .into();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
        assert_eq!(err.details.unwrap()["resource"], "reservation");
    }

    #[test]
    fn test_store_context_names_operation() {
        let failed: Result<(), BoxError> = Err("connection reset by peer".into());
        let err = failed
            .during("confirm", &Actor::Manager { manager_id: 100 }, Some(7))
            .unwrap_err();
        let ReservationError::Store {
            op,
            actor,
            reservation_id,
            ..
        } = &err
        else {
            panic!("expected Store, got {err:?}");
        };
        assert_eq!(*op, "confirm");
        assert_eq!(actor.as_deref(), Some("manager:100"));
        assert_eq!(*reservation_id, Some(7));
        assert!(err.to_string().contains("during confirm"));
    }

    #[test]
    fn test_store_error_hides_internals() {
        let source: BoxError = "connection reset by peer".into();
        let err: AppError = ReservationError::from(source).into();
        assert_eq!(err.code, ErrorCode::InternalError);
        assert_eq!(err.http_status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.message.contains("connection reset"));
        assert!(err.details.is_none());
    }

    #[test]
    fn test_staff_not_approved_is_distinct_forbidden() {
        let err: AppError = ReservationError::StaffNotApproved.into();
        assert_eq!(err.code, ErrorCode::StaffNotApproved);
        assert_eq!(err.http_status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_not_found() {
        let err: AppError = ReservationError::NotFound(77).into();
        assert_eq!(err.http_status(), StatusCode::NOT_FOUND);
    }
}
