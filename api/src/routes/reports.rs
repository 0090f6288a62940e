//! Report triage for operators

use axum::extract::{Path, Query, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use std::sync::Arc;

use crate::error::ApiResult;
use crate::middleware::{CurrentSession, Permission};
use crate::services::submissions;
use crate::{models::*, ApiState};

pub fn router() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/", get(list_reports))
        .route("/:id", get(get_report))
        .route("/:id/status", put(update_status))
}

/// List reports, newest first
#[utoipa::path(
    get,
    path = "/api/v1/reports",
    params(ReportListParams),
    responses(
        (status = 200, description = "One page of reports", body = [SubmissionView]),
        (status = 401, body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "reports"
)]
pub async fn list_reports(
    State(state): State<Arc<ApiState>>,
    CurrentSession(session): CurrentSession,
    Query(params): Query<ReportListParams>,
) -> ApiResult<Json<ApiResponse<PaginatedResponse<SubmissionView>>>> {
    session.require(Permission::ReportsRead)?;
    let page = submissions::list(&state, &session.role, params).await?;
    Ok(Json(ApiResponse::success(page)))
}

/// Get report by ID
#[utoipa::path(
    get,
    path = "/api/v1/reports/{id}",
    params(("id" = i64, Path,)),
    responses(
        (status = 200, body = SubmissionView),
        (status = 403, description = "Report of another area", body = ErrorResponse),
        (status = 404, body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "reports"
)]
pub async fn get_report(
    State(state): State<Arc<ApiState>>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<SubmissionView>>> {
    session.require(Permission::ReportsRead)?;
    let submission = submissions::get(&state, &session.role, id).await?;
    Ok(Json(ApiResponse::success(SubmissionView::new(submission, state.config.workflow))))
}

/// Move a report to another status
#[utoipa::path(
    put,
    path = "/api/v1/reports/{id}/status",
    params(("id" = i64, Path,)),
    request_body = StatusUpdateRequest,
    responses(
        (status = 200, description = "Report as stored after the update", body = SubmissionView),
        (status = 400, description = "Unknown status", body = ErrorResponse),
        (status = 409, description = "Status not reachable from the current one", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "reports"
)]
pub async fn update_status(
    State(state): State<Arc<ApiState>>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<i64>,
    Json(input): Json<StatusUpdateRequest>,
) -> ApiResult<Json<ApiResponse<SubmissionView>>> {
    session.require(Permission::ReportsUpdate)?;
    let view = submissions::update_status(&state, &session.role, id, input).await?;
    Ok(Json(ApiResponse::success(view)))
}
