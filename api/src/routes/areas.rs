//! Areas, their forms and report intake

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use reporta_forms::FormData;
use std::sync::Arc;

use crate::error::ApiResult;
use crate::services::{self, catalog};
use crate::{models::*, ApiState};

pub fn router() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/", get(list_areas))
        .route("/:id", get(get_area))
        .route("/:id/form", get(get_form))
        .route("/:id/submissions", post(submit_report))
}

/// List areas
#[utoipa::path(
    get,
    path = "/api/v1/areas",
    responses((status = 200, description = "Areas by name", body = [AreaDto])),
    tag = "areas"
)]
pub async fn list_areas(State(state): State<Arc<ApiState>>) -> ApiResult<Json<ApiResponse<Vec<AreaDto>>>> {
    let areas = catalog::list_areas(&state).await?;
    Ok(Json(ApiResponse::success(areas.into_iter().map(AreaDto::from).collect())))
}

/// Get area by ID
#[utoipa::path(
    get,
    path = "/api/v1/areas/{id}",
    params(("id" = i64, Path,)),
    responses((status = 200, body = AreaDto), (status = 404, body = ErrorResponse)),
    tag = "areas"
)]
pub async fn get_area(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<AreaDto>>> {
    let area = catalog::get_area(&state, id).await?;
    Ok(Json(ApiResponse::success(area.into())))
}

/// Report form of an area, fields in display order with options resolved
#[utoipa::path(
    get,
    path = "/api/v1/areas/{id}/form",
    params(("id" = i64, Path,)),
    responses((status = 200, body = AreaForm), (status = 404, body = ErrorResponse)),
    tag = "areas"
)]
pub async fn get_form(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<AreaForm>>> {
    let area = catalog::get_area(&state, id).await?;
    let form = catalog::load_form(&state, id).await?;
    Ok(Json(ApiResponse::success(AreaForm {
        area: area.into(),
        fields: form.render(&FormData::new()),
    })))
}

/// File a report for an area
#[utoipa::path(
    post,
    path = "/api/v1/areas/{id}/submissions",
    params(("id" = i64, Path,)),
    request_body = SubmitRequest,
    responses(
        (status = 201, description = "Report stored as the initial status", body = SubmissionView),
        (status = 404, description = "Unknown area, student or location", body = ErrorResponse),
        (status = 422, description = "Form incomplete", body = ErrorResponse)
    ),
    tag = "areas"
)]
pub async fn submit_report(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i64>,
    Json(input): Json<SubmitRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<SubmissionView>>)> {
    let view = services::submissions::submit(&state, id, input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(view))))
}
