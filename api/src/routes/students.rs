//! Student verification

use axum::{extract::State, routing::post, Json, Router};
use std::sync::Arc;

use crate::error::ApiResult;
use crate::services;
use crate::{models::*, ApiState};

pub fn router() -> Router<Arc<ApiState>> {
    Router::new().route("/verify", post(verify_student))
}

/// Look up a student by DNI and university code
#[utoipa::path(
    post,
    path = "/api/v1/students/verify",
    request_body = VerifyStudentRequest,
    responses(
        (status = 200, description = "Student found", body = StudentDto),
        (status = 404, description = "No student matches both values", body = ErrorResponse)
    ),
    tag = "students"
)]
pub async fn verify_student(
    State(state): State<Arc<ApiState>>,
    Json(input): Json<VerifyStudentRequest>,
) -> ApiResult<Json<ApiResponse<StudentDto>>> {
    let student = services::students::verify(&state, &input.dni, &input.codigo).await?;
    Ok(Json(ApiResponse::success(student.into())))
}
