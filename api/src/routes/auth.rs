//! Operator login and logout

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;

use crate::error::ApiResult;
use crate::middleware::CurrentSession;
use crate::services;
use crate::{models::*, ApiState};

pub fn router() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
}

/// Sign in an admin or area operator
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session created", body = LoginResponse),
        (status = 401, description = "Wrong credentials", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<Arc<ApiState>>,
    Json(input): Json<LoginRequest>,
) -> ApiResult<Json<ApiResponse<LoginResponse>>> {
    let (token, session) = services::auth::login(&state, &input.username, &input.password).await?;
    Ok(Json(ApiResponse::success(LoginResponse { token, session: session.view() })))
}

/// End the current session
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses((status = 200, description = "Session cleared", body = bool)),
    security(("bearer" = [])),
    tag = "auth"
)]
pub async fn logout(
    State(state): State<Arc<ApiState>>,
    CurrentSession(session): CurrentSession,
) -> Json<ApiResponse<bool>> {
    Json(ApiResponse::success(services::auth::logout(&state, &session)))
}

/// Current session
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, body = SessionView),
        (status = 401, body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
pub async fn me(CurrentSession(session): CurrentSession) -> Json<ApiResponse<SessionView>> {
    Json(ApiResponse::success(session.view()))
}
