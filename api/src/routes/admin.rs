//! Area administration endpoints

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use std::sync::Arc;

use super::uploads::content_type;
use crate::error::ApiResult;
use crate::middleware::{CurrentSession, Permission};
use crate::services::{admin, uploads};
use crate::{models::*, ApiState};

pub fn router() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/areas", post(create_area))
        .route("/areas/:id", put(update_area).delete(delete_area))
        .route("/areas/:id/image", put(set_area_image))
        .route("/areas/:id/fields", get(list_fields).post(add_field))
        .route("/areas/:id/options", get(list_options).post(add_option))
        .route("/fields/:id", delete(delete_field))
        .route("/options/:id", delete(delete_option))
}

/// Create an area
#[utoipa::path(
    post,
    path = "/api/v1/admin/areas",
    request_body = AreaCreate,
    responses((status = 201, body = AreaDto), (status = 403, body = ErrorResponse)),
    security(("bearer" = [])),
    tag = "admin"
)]
pub async fn create_area(
    State(state): State<Arc<ApiState>>,
    CurrentSession(session): CurrentSession,
    Json(input): Json<AreaCreate>,
) -> ApiResult<(StatusCode, Json<ApiResponse<AreaDto>>)> {
    session.require(Permission::AreasWrite)?;
    let area = admin::create_area(&state, input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(area.into()))))
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/areas/{id}",
    params(("id" = i64, Path,)),
    request_body = AreaUpdate,
    responses((status = 200, body = AreaDto), (status = 404, body = ErrorResponse)),
    security(("bearer" = [])),
    tag = "admin"
)]
pub async fn update_area(
    State(state): State<Arc<ApiState>>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<i64>,
    Json(input): Json<AreaUpdate>,
) -> ApiResult<Json<ApiResponse<AreaDto>>> {
    session.require(Permission::AreasWrite)?;
    let area = admin::update_area(&state, id, input).await?;
    Ok(Json(ApiResponse::success(area.into())))
}

/// Delete an area with its fields and options; its reports are kept
#[utoipa::path(
    delete,
    path = "/api/v1/admin/areas/{id}",
    params(("id" = i64, Path,)),
    responses((status = 200, body = Deleted), (status = 404, body = ErrorResponse)),
    security(("bearer" = [])),
    tag = "admin"
)]
pub async fn delete_area(
    State(state): State<Arc<ApiState>>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<Deleted>>> {
    session.require(Permission::AreasWrite)?;
    let deleted = admin::delete_area(&state, id).await?;
    Ok(Json(ApiResponse::success(Deleted { deleted })))
}

/// Replace the area image. The body is the raw image.
#[utoipa::path(
    put,
    path = "/api/v1/admin/areas/{id}/image",
    params(("id" = i64, Path,), ImageParams),
    request_body(content = Vec<u8>, content_type = "image/png"),
    responses(
        (status = 200, body = AreaDto),
        (status = 415, description = "Not an allowed image type", body = ErrorResponse),
        (status = 502, description = "Storage failed; previous image kept", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "admin"
)]
pub async fn set_area_image(
    State(state): State<Arc<ApiState>>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<i64>,
    Query(params): Query<ImageParams>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<ApiResponse<AreaDto>>> {
    session.require(Permission::AreasWrite)?;
    let area = uploads::set_area_image(&state, id, &params.filename, content_type(&headers), body.to_vec()).await?;
    Ok(Json(ApiResponse::success(area)))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/areas/{id}/fields",
    params(("id" = i64, Path,)),
    responses((status = 200, body = [FieldDto])),
    security(("bearer" = [])),
    tag = "admin"
)]
pub async fn list_fields(
    State(state): State<Arc<ApiState>>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<Vec<FieldDto>>>> {
    session.require(Permission::FieldsWrite)?;
    Ok(Json(ApiResponse::success(admin::list_fields(&state, id).await?)))
}

/// Add a field to the area form
#[utoipa::path(
    post,
    path = "/api/v1/admin/areas/{id}/fields",
    params(("id" = i64, Path,)),
    request_body = FieldCreate,
    responses((status = 201, body = FieldDto), (status = 400, body = ErrorResponse)),
    security(("bearer" = [])),
    tag = "admin"
)]
pub async fn add_field(
    State(state): State<Arc<ApiState>>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<i64>,
    Json(input): Json<FieldCreate>,
) -> ApiResult<(StatusCode, Json<ApiResponse<FieldDto>>)> {
    session.require(Permission::FieldsWrite)?;
    let field = admin::add_field(&state, id, input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(field))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/admin/fields/{id}",
    params(("id" = i64, Path,)),
    responses((status = 200, body = Deleted), (status = 404, body = ErrorResponse)),
    security(("bearer" = [])),
    tag = "admin"
)]
pub async fn delete_field(
    State(state): State<Arc<ApiState>>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<Deleted>>> {
    session.require(Permission::FieldsWrite)?;
    let deleted = admin::delete_field(&state, id).await?;
    Ok(Json(ApiResponse::success(Deleted { deleted })))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/areas/{id}/options",
    params(("id" = i64, Path,)),
    responses((status = 200, body = [OptionDto])),
    security(("bearer" = [])),
    tag = "admin"
)]
pub async fn list_options(
    State(state): State<Arc<ApiState>>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<Vec<OptionDto>>>> {
    session.require(Permission::OptionsWrite)?;
    let options = admin::list_options(&state, id).await?;
    Ok(Json(ApiResponse::success(options.into_iter().map(OptionDto::from).collect())))
}

/// Add a selection option to a group of the area
#[utoipa::path(
    post,
    path = "/api/v1/admin/areas/{id}/options",
    params(("id" = i64, Path,)),
    request_body = OptionCreate,
    responses((status = 201, body = OptionDto), (status = 400, body = ErrorResponse)),
    security(("bearer" = [])),
    tag = "admin"
)]
pub async fn add_option(
    State(state): State<Arc<ApiState>>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<i64>,
    Json(input): Json<OptionCreate>,
) -> ApiResult<(StatusCode, Json<ApiResponse<OptionDto>>)> {
    session.require(Permission::OptionsWrite)?;
    let option = admin::add_option(&state, id, input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(option.into()))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/admin/options/{id}",
    params(("id" = i64, Path,)),
    responses((status = 200, body = Deleted), (status = 404, body = ErrorResponse)),
    security(("bearer" = [])),
    tag = "admin"
)]
pub async fn delete_option(
    State(state): State<Arc<ApiState>>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<Deleted>>> {
    session.require(Permission::OptionsWrite)?;
    let deleted = admin::delete_option(&state, id).await?;
    Ok(Json(ApiResponse::success(Deleted { deleted })))
}
