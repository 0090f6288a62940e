//! Operator notification permission

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;

use crate::error::ApiResult;
use crate::middleware::{CurrentSession, Permission};
use crate::{models::*, ApiState};

pub fn router() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/", get(get_status))
        .route("/request", post(request_permission))
}

fn status(state: &ApiState) -> NotificationStatus {
    NotificationStatus {
        supported: state.notifier.is_supported(),
        permission: state.notifier.permission(),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    responses((status = 200, body = NotificationStatus)),
    security(("bearer" = [])),
    tag = "notifications"
)]
pub async fn get_status(
    State(state): State<Arc<ApiState>>,
    CurrentSession(session): CurrentSession,
) -> ApiResult<Json<ApiResponse<NotificationStatus>>> {
    session.require(Permission::NotificationsManage)?;
    Ok(Json(ApiResponse::success(status(&state))))
}

/// Ask for permission to show notifications. A denied permission stays denied.
#[utoipa::path(
    post,
    path = "/api/v1/notifications/request",
    responses((status = 200, body = NotificationStatus)),
    security(("bearer" = [])),
    tag = "notifications"
)]
pub async fn request_permission(
    State(state): State<Arc<ApiState>>,
    CurrentSession(session): CurrentSession,
) -> ApiResult<Json<ApiResponse<NotificationStatus>>> {
    session.require(Permission::NotificationsManage)?;
    let granted = state.notifier.request();
    tracing::info!(user = %session.username, granted, "notification permission requested");
    Ok(Json(ApiResponse::success(status(&state))))
}
