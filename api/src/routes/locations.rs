//! Pabellones and their salones

use axum::extract::{Path, State};
use axum::{routing::get, Json, Router};
use std::sync::Arc;

use crate::error::ApiResult;
use crate::services::catalog;
use crate::{models::*, ApiState};

pub fn router() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/", get(list_pabellones))
        .route("/:id/salones", get(list_salones))
}

#[utoipa::path(
    get,
    path = "/api/v1/pabellones",
    responses((status = 200, body = [PabellonDto])),
    tag = "locations"
)]
pub async fn list_pabellones(State(state): State<Arc<ApiState>>) -> ApiResult<Json<ApiResponse<Vec<PabellonDto>>>> {
    let pabellones = catalog::list_pabellones(&state).await?;
    Ok(Json(ApiResponse::success(pabellones.into_iter().map(PabellonDto::from).collect())))
}

/// Salones of one pabellón
#[utoipa::path(
    get,
    path = "/api/v1/pabellones/{id}/salones",
    params(("id" = i64, Path,)),
    responses((status = 200, body = [SalonDto])),
    tag = "locations"
)]
pub async fn list_salones(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<Vec<SalonDto>>>> {
    let salones = catalog::list_salones(&state, id).await?;
    Ok(Json(ApiResponse::success(salones.into_iter().map(SalonDto::from).collect())))
}
