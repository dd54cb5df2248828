//! API routes for reservation-server

pub mod admin;
pub mod health;
pub mod reservations;
pub mod staff;

use axum::Router;
use axum::routing::{get, post, put};
use shared::error::{ApiResponse, AppError};
use tower_http::trace::TraceLayer;

use crate::auth::Actor;
use crate::state::AppState;

pub type ApiResult<T> = Result<ApiResponse<T>, AppError>;

/// Refuse callers whose role the endpoint does not serve
pub(crate) fn require(actor: &Actor, allowed: bool, what: &str) -> Result<(), AppError> {
    if allowed {
        return Ok(());
    }
    tracing::warn!(%actor, endpoint = what, "Role not allowed");
    Err(AppError::with_message(
        shared::ErrorCode::RoleRequired,
        format!("{what} is not available for role {}", actor.role()),
    ))
}

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    let diner = Router::new()
        .route(
            "/reservations",
            post(reservations::create).get(reservations::list_own),
        )
        .route("/reservations/{id}/cancel", put(reservations::cancel))
        .route("/reservations/{id}/review", put(reservations::attach_review))
        .route(
            "/reservations/table/{table_id}/future",
            get(reservations::upcoming_for_table),
        );

    let admin = Router::new()
        .route("/admin/reservations", get(admin::list_all))
        .route("/admin/reservations/manager", get(admin::list_managed))
        .route("/admin/reservations/{id}/confirm", put(admin::confirm))
        .route("/admin/reservations/{id}/reject", put(admin::reject))
        .route("/admin/reservations/{id}/complete", put(admin::complete));

    let staff = Router::new()
        .route("/admin/staff/reservations", get(staff::list_assigned))
        .route(
            "/admin/staff/reservations/{id}/status",
            put(staff::update_status),
        );

    Router::new()
        .route("/health", get(health::health_check))
        .merge(diner)
        .merge(admin)
        .merge(staff)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
