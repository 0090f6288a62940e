//! Role dashboards

use axum::{extract::State, routing::get, Json, Router};
use std::sync::Arc;

use crate::error::ApiResult;
use crate::middleware::{CurrentSession, Permission};
use crate::services;
use crate::{models::*, ApiState};

pub fn router() -> Router<Arc<ApiState>> {
    Router::new().route("/", get(get_dashboard))
}

/// Totals per area for admins, own area and recent reports for area operators
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    responses((status = 200, body = DashboardView), (status = 401, body = ErrorResponse)),
    security(("bearer" = [])),
    tag = "dashboard"
)]
pub async fn get_dashboard(
    State(state): State<Arc<ApiState>>,
    CurrentSession(session): CurrentSession,
) -> ApiResult<Json<ApiResponse<DashboardView>>> {
    session.require(Permission::DashboardRead)?;
    let view = services::dashboard::dashboard(&state, &session.role).await?;
    Ok(Json(ApiResponse::success(view)))
}
