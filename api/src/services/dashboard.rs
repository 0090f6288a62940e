//! Role dashboards

use super::{catalog, submissions};
use crate::error::ApiResult;
use crate::middleware::Role;
use crate::models::{AreaDto, AreaSummary, DashboardView, ReportListParams};
use crate::ApiState;

/// Reports shown on an area dashboard.
pub const RECENT_REPORTS: u32 = 5;

pub async fn dashboard(state: &ApiState, role: &Role) -> ApiResult<DashboardView> {
    match role {
        Role::Admin => admin_dashboard(state).await,
        Role::Area { area_id } => area_dashboard(state, *area_id).await,
    }
}

async fn admin_dashboard(state: &ApiState) -> ApiResult<DashboardView> {
    let totals = submissions::counts(state, None).await?;
    let mut areas = Vec::new();
    for area in catalog::list_areas(state).await? {
        let counts = submissions::counts(state, Some(area.id)).await?;
        areas.push(AreaSummary { area: AreaDto::from(area), counts });
    }
    Ok(DashboardView::Admin { totals, areas })
}

async fn area_dashboard(state: &ApiState, area_id: i64) -> ApiResult<DashboardView> {
    let area = catalog::get_area(state, area_id).await?;
    let counts = submissions::counts(state, Some(area_id)).await?;
    let params = ReportListParams { per_page: Some(RECENT_REPORTS), ..Default::default() };
    let recent = submissions::list(state, &Role::Area { area_id }, params).await?.items;
    Ok(DashboardView::Area { area: area.into(), counts, recent })
}
