//! Form field uploads

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap};
use axum::{routing::post, Json, Router};
use std::sync::Arc;

use crate::error::ApiResult;
use crate::services::uploads;
use crate::{models::*, ApiState};

pub fn router() -> Router<Arc<ApiState>> {
    Router::new().route("/", post(upload_file))
}

/// Content type of a raw upload body.
pub(crate) fn content_type(headers: &HeaderMap) -> &str {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
}

/// Upload the file of a `file` or `image` field. The body is the raw file.
#[utoipa::path(
    post,
    path = "/api/v1/uploads",
    params(UploadParams),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "Stored; keep `url` as the field value", body = UploadResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 415, description = "Type not allowed for the field", body = ErrorResponse)
    ),
    tag = "uploads"
)]
pub async fn upload_file(
    State(state): State<Arc<ApiState>>,
    Query(params): Query<UploadParams>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<ApiResponse<UploadResponse>>> {
    let response = uploads::upload_field_file(
        &state,
        params.area_id,
        &params.field,
        &params.filename,
        content_type(&headers),
        body.to_vec(),
    )
    .await?;
    Ok(Json(ApiResponse::success(response)))
}
