//! Diner endpoints

use axum::Json;
use axum::extract::{Path, Query, State};
use http::StatusCode;
use serde::Deserialize;
use shared::PaginatedResponse;
use shared::error::{ApiResponse, AppError};
use shared::models::{ReservationCreate, ReservationView};

use super::{ApiResult, require};
use crate::auth::Actor;
use crate::reservation::ListQuery;
use crate::state::AppState;

/// POST /reservations
pub async fn create(
    State(state): State<AppState>,
    actor: Actor,
    Json(dto): Json<ReservationCreate>,
) -> Result<(StatusCode, ApiResponse<ReservationView>), AppError> {
    let view = state.reservations.create(&actor, dto).await?;
    Ok((StatusCode::CREATED, ApiResponse::success(view)))
}

/// GET /reservations
pub async fn list_own(
    State(state): State<AppState>,
    actor: Actor,
    Query(query): Query<ListQuery>,
) -> ApiResult<PaginatedResponse<ReservationView>> {
    require(&actor, matches!(actor, Actor::Diner { .. }), "Own reservation listing")?;
    // restaurantId is not part of the diner listing
    let query = ListQuery {
        restaurant_id: None,
        ..query
    };
    let page = state.reservations.list(&actor, &query).await?;
    Ok(ApiResponse::success(page))
}

#[derive(Debug, Default, Deserialize)]
pub struct CancelRequest {
    #[serde(alias = "cancelReason")]
    pub cancel_reason: Option<String>,
}

/// PUT /reservations/{id}/cancel
pub async fn cancel(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<i64>,
    body: Option<Json<CancelRequest>>,
) -> ApiResult<ReservationView> {
    let reason = body.and_then(|Json(b)| b.cancel_reason);
    let view = state.reservations.cancel(&actor, id, reason).await?;
    Ok(ApiResponse::success(view))
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    #[serde(alias = "reviewId")]
    pub review_id: String,
}

/// PUT /reservations/{id}/review
pub async fn attach_review(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<i64>,
    Json(body): Json<ReviewRequest>,
) -> ApiResult<ReservationView> {
    let view = state
        .reservations
        .attach_review(&actor, id, &body.review_id)
        .await?;
    Ok(ApiResponse::success(view))
}

/// GET /reservations/table/{table_id}/future
pub async fn upcoming_for_table(
    State(state): State<AppState>,
    _actor: Actor,
    Path(table_id): Path<i64>,
) -> ApiResult<Vec<ReservationView>> {
    let views = state.reservations.upcoming_for_table(table_id).await?;
    Ok(ApiResponse::success(views))
}
