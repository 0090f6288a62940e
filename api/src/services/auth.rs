//! Operator login against `admin_user`
//!
//! Credentials are compared as stored. This is a lookup, not a security
//! design; hashing is outside this service.

use reporta_store::{from_row, Filter, Query};
use serde::Deserialize;

use super::tables;
use crate::error::{ApiError, ApiResult};
use crate::middleware::Role;
use crate::session::Session;
use crate::ApiState;

#[derive(Debug, Deserialize)]
struct AdminUserRow {
    id: i64,
    username: String,
    #[serde(default)]
    role: String,
    #[serde(default)]
    area_id: Option<i64>,
}

pub async fn login(state: &ApiState, username: &str, password: &str) -> ApiResult<(String, Session)> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(ApiError::BadRequest("username and password are required".into()));
    }

    let query = Query::new()
        .filter(Filter::new().eq("username", username).eq("password", password))
        .page(0, 1);
    let row = state
        .store
        .select(tables::ADMIN_USER, &query)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| {
            tracing::warn!(username, "login rejected");
            ApiError::Unauthorized("invalid credentials".into())
        })?;
    let user: AdminUserRow = from_row(row)?;

    let role = Role::from_row(&user.role, user.area_id)
        .ok_or_else(|| ApiError::Forbidden(format!("user {} has no usable role", user.username)))?;
    state.sessions.load(user.id, &user.username, role)
}

pub fn logout(state: &ApiState, session: &Session) -> bool {
    state.sessions.clear(session.id)
}
