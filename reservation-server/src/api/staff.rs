//! Staff endpoints
//!
//! Scoped to the restaurants of managers that approved the staff member.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use shared::PaginatedResponse;
use shared::error::{ApiResponse, AppError};
use shared::models::{ReservationStatus, ReservationView};

use super::{ApiResult, require};
use crate::auth::Actor;
use crate::reservation::ListQuery;
use crate::state::AppState;

/// GET /admin/staff/reservations
pub async fn list_assigned(
    State(state): State<AppState>,
    actor: Actor,
    Query(query): Query<ListQuery>,
) -> ApiResult<PaginatedResponse<ReservationView>> {
    require(&actor, matches!(actor, Actor::Staff { .. }), "Staff reservation listing")?;
    let page = state.reservations.list(&actor, &query).await?;
    Ok(ApiResponse::success(page))
}

/// Target status as a code (`2`) or a name (`"confirmed"`)
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum StatusValue {
    Code(i16),
    Name(String),
}

impl TryFrom<StatusValue> for ReservationStatus {
    type Error = AppError;

    fn try_from(value: StatusValue) -> Result<Self, Self::Error> {
        match value {
            StatusValue::Code(code) => ReservationStatus::from_code(code)
                .ok_or_else(|| AppError::validation(format!("Invalid reservation status: {code}"))),
            StatusValue::Name(name) => name
                .parse()
                .map_err(|e: shared::models::InvalidStatus| AppError::validation(e.to_string())),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: StatusValue,
}

/// PUT /admin/staff/reservations/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<i64>,
    Json(body): Json<StatusRequest>,
) -> ApiResult<ReservationView> {
    let status = ReservationStatus::try_from(body.status)?;
    let view = state
        .reservations
        .staff_update_status(&actor, id, status)
        .await?;
    Ok(ApiResponse::success(view))
}
