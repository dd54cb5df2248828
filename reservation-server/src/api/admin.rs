//! Admin and manager endpoints

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use shared::PaginatedResponse;
use shared::error::ApiResponse;
use shared::models::ReservationView;

use super::{ApiResult, require};
use crate::auth::Actor;
use crate::reservation::ListQuery;
use crate::state::AppState;

/// GET /admin/reservations
pub async fn list_all(
    State(state): State<AppState>,
    actor: Actor,
    Query(query): Query<ListQuery>,
) -> ApiResult<PaginatedResponse<ReservationView>> {
    require(&actor, matches!(actor, Actor::Admin { .. }), "Reservation listing")?;
    let page = state.reservations.list(&actor, &query).await?;
    Ok(ApiResponse::success(page))
}

/// GET /admin/reservations/manager
pub async fn list_managed(
    State(state): State<AppState>,
    actor: Actor,
    Query(query): Query<ListQuery>,
) -> ApiResult<PaginatedResponse<ReservationView>> {
    require(
        &actor,
        matches!(actor, Actor::Manager { .. }),
        "Managed reservation listing",
    )?;
    let page = state.reservations.list(&actor, &query).await?;
    Ok(ApiResponse::success(page))
}

/// PUT /admin/reservations/{id}/confirm
pub async fn confirm(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<i64>,
) -> ApiResult<ReservationView> {
    let view = state.reservations.confirm(&actor, id).await?;
    Ok(ApiResponse::success(view))
}

#[derive(Debug, Deserialize)]
pub struct RejectRequest {
    #[serde(alias = "rejectReason", alias = "reason", default)]
    pub reject_reason: String,
}

/// PUT /admin/reservations/{id}/reject
pub async fn reject(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<i64>,
    Json(body): Json<RejectRequest>,
) -> ApiResult<ReservationView> {
    let view = state
        .reservations
        .reject(&actor, id, &body.reject_reason)
        .await?;
    Ok(ApiResponse::success(view))
}

/// PUT /admin/reservations/{id}/complete
pub async fn complete(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<i64>,
) -> ApiResult<ReservationView> {
    let view = state.reservations.complete(&actor, id).await?;
    Ok(ApiResponse::success(view))
}
