//! Report intake, listing and status updates

use reporta_forms::{build_submission, Submission, ValidationError};
use reporta_store::{from_row, from_rows, to_row, Filter, Order, Query, Row};
use reporta_workflow::{Status, StatusRequest, StatusTracker, WorkflowEvent};
use serde_json::Value;

use super::{catalog, students, tables};
use crate::error::{ApiError, ApiResult};
use crate::middleware::Role;
use crate::models::{PaginatedResponse, ReportListParams, StatusCounts, StatusUpdateRequest, SubmitRequest, SubmissionView};
use crate::notify;
use crate::ApiState;

pub const DEFAULT_PER_PAGE: u32 = 20;
pub const MAX_PER_PAGE: u32 = 100;

/// Columns the report search box matches against.
const SEARCH_COLUMNS: [&str; 3] = ["alumno_nombre", "alumno_dni", "alumno_codigo"];

/// Validate and store a student's report for `area_id`.
///
/// The student is verified again here; the identity stored on the record
/// is the one read from `alumnos`, never the one the client sent back.
pub async fn submit(state: &ApiState, area_id: i64, request: SubmitRequest) -> ApiResult<SubmissionView> {
    let area = catalog::get_area(state, area_id).await?;
    let student = students::verify(state, &request.dni, &request.codigo).await?;
    let form = catalog::load_form(state, area_id).await?;
    let location = catalog::resolve_location(state, request.pabellon_id, request.salon_id).await?;

    form.validate(&request.form_data, location.as_ref())?;
    let Some(location) = location else {
        return Err(ValidationError::MissingLocation.into());
    };

    let flavor = state.config.workflow;
    let record = build_submission(&area, &student, request.form_data, &location, flavor);
    let row = state.store.insert(tables::AREA_SUBMISSIONS, to_row(&record)?).await?;
    let submission: Submission = from_row(row)?;
    tracing::info!(submission_id = submission.id, area_id, "report submitted");

    let event = WorkflowEvent::Submitted {
        submission_id: submission.id,
        area_id,
        alumno_nombre: submission.alumno_nombre.clone(),
        at: submission.submitted_at,
    };
    notify::announce(state.notifier.as_ref(), &event);

    Ok(SubmissionView::new(submission, flavor))
}

/// Reports visible to `role`, newest first.
pub async fn list(
    state: &ApiState,
    role: &Role,
    params: ReportListParams,
) -> ApiResult<PaginatedResponse<SubmissionView>> {
    let mut filter = Filter::new();
    let area_id = match role {
        Role::Admin => params.area_id,
        Role::Area { area_id } => Some(*area_id),
    };
    if let Some(area_id) = area_id {
        filter = filter.eq("area_id", area_id);
    }
    if let Some(status) = non_blank(params.status.as_deref()) {
        let status: Status = status.parse()?;
        filter = filter.eq("status", status.as_str());
    }
    if let Some(search) = non_blank(params.search.as_deref()) {
        filter = filter.search(SEARCH_COLUMNS, search);
    }

    let page = params.page.unwrap_or(1).max(1);
    let per_page = params.per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE);

    let total = state.store.count(tables::AREA_SUBMISSIONS, &filter).await?;
    let query = Query::new()
        .filter(filter)
        .order(Order::desc("submitted_at"))
        .order(Order::desc("id"))
        .page((page - 1) as usize, per_page as usize);
    let rows = state.store.select(tables::AREA_SUBMISSIONS, &query).await?;
    let submissions: Vec<Submission> = from_rows(rows)?;

    let flavor = state.config.workflow;
    let items = submissions.into_iter().map(|s| SubmissionView::new(s, flavor)).collect();
    Ok(PaginatedResponse::new(items, total, page, per_page))
}

/// One report, if `role` may see its area.
pub async fn get(state: &ApiState, role: &Role, submission_id: i64) -> ApiResult<Submission> {
    let query = Query::new().filter(Filter::new().eq("id", submission_id)).page(0, 1);
    let row = state
        .store
        .select(tables::AREA_SUBMISSIONS, &query)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::NotFound(format!("report {submission_id}")))?;
    let submission: Submission = from_row(row)?;
    if !role.can_access_area(submission.area_id) {
        return Err(ApiError::Forbidden(format!("report {submission_id} belongs to another area")));
    }
    Ok(submission)
}

/// Move a report to a new status and return it as reloaded from the store.
///
/// The whole status state (`status` and `estimated_time`) is written in one
/// update. A failed write leaves the stored record as it was.
pub async fn update_status(
    state: &ApiState,
    role: &Role,
    submission_id: i64,
    request: StatusUpdateRequest,
) -> ApiResult<SubmissionView> {
    let current = get(state, role, submission_id).await?;
    let flavor = state.config.workflow;

    let mut status_request = StatusRequest::new(request.status.parse()?);
    if let Some(estimated_time) = request.estimated_time {
        status_request = status_request.with_estimated_time(estimated_time);
    }

    let mut tracker = StatusTracker::load(
        flavor,
        current.id,
        current.area_id,
        current.status,
        current.estimated_time.clone(),
    );
    let transition = tracker.apply(&status_request)?;

    let mut patch = Row::new();
    patch.insert("status".into(), Value::from(transition.to.as_str()));
    patch.insert(
        "estimated_time".into(),
        transition.estimated_time.clone().map(Value::from).unwrap_or(Value::Null),
    );
    let updated = state
        .store
        .update(tables::AREA_SUBMISSIONS, patch, &Filter::new().eq("id", submission_id))
        .await?;
    if updated.is_empty() {
        return Err(ApiError::NotFound(format!("report {submission_id}")));
    }
    tracing::info!(submission_id, from = %transition.from, to = %transition.to, "report status updated");

    for event in tracker.take_events() {
        notify::announce(state.notifier.as_ref(), &event);
    }

    let reloaded = get(state, role, submission_id).await?;
    Ok(SubmissionView::new(reloaded, flavor))
}

/// Report counts per status, across all areas or for one.
pub async fn counts(state: &ApiState, area_id: Option<i64>) -> ApiResult<StatusCounts> {
    let base = match area_id {
        Some(area_id) => Filter::new().eq("area_id", area_id),
        None => Filter::new(),
    };
    let mut counts = StatusCounts {
        total: state.store.count(tables::AREA_SUBMISSIONS, &base).await?,
        ..StatusCounts::default()
    };
    for status in Status::ALL {
        let n = state
            .store
            .count(tables::AREA_SUBMISSIONS, &base.clone().eq("status", status.as_str()))
            .await?;
        match status {
            Status::Pending => counts.pending = n,
            Status::InProgress => counts.in_progress = n,
            Status::Resolved => counts.resolved = n,
            Status::Approved => counts.approved = n,
            Status::Rejected => counts.rejected = n,
        }
    }
    Ok(counts)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{demo_parts, demo_state, demo_state_with};
    use reporta_forms::{FieldValue, FormData, LOCATION_KEYS};
    use reporta_workflow::WorkflowFlavor;

    fn request(form_data: FormData) -> SubmitRequest {
        SubmitRequest {
            dni: "12345678".into(),
            codigo: "U20201234".into(),
            pabellon_id: Some(1),
            salon_id: Some(101),
            form_data,
        }
    }

    fn mantenimiento_payload() -> FormData {
        [("tipo_incidencia", "electrico"), ("descripcion", "Tomacorriente suelto")]
            .into_iter()
            .collect()
    }

    #[tokio::test]
    async fn test_submit_stores_flat_form_data_and_initial_status() {
        let state = demo_state();
        let view = submit(&state, 1, request(mantenimiento_payload())).await.unwrap();
        assert_eq!(view.status, Status::Pending);
        assert_eq!(view.alumno_nombre, "Ana Torres");
        assert_eq!(view.form_data.len(), LOCATION_KEYS.len() + 2);
        assert_eq!(view.form_data.get("salon_nombre"), Some(&FieldValue::from("A-101")));
    }

    #[tokio::test]
    async fn test_submit_without_location_fails_first() {
        let state = demo_state();
        let mut req = request(FormData::new());
        req.salon_id = None;
        let err = submit(&state, 1, req).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(ValidationError::MissingLocation)));
    }

    #[tokio::test]
    async fn test_submit_rejects_salon_of_other_pabellon() {
        let state = demo_state();
        let mut req = request(mantenimiento_payload());
        req.pabellon_id = Some(2);
        let err = submit(&state, 1, req).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(ValidationError::LocationMismatch { .. })));
    }

    #[tokio::test]
    async fn test_submit_requires_other_text() {
        let state = demo_state();
        let mut payload = mantenimiento_payload();
        payload.insert("tipo_incidencia", "otros");
        let err = submit(&state, 1, request(payload.clone())).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(ValidationError::MissingOtherText(_))));

        payload.insert("tipo_incidencia_otros_text", "Goteras");
        let view = submit(&state, 1, request(payload)).await.unwrap();
        assert!(view.form_data.contains_key("tipo_incidencia"));
        assert!(view.form_data.contains_key("tipo_incidencia_otros_text"));
    }

    #[tokio::test]
    async fn test_submit_reverifies_student() {
        let state = demo_state();
        let mut req = request(mantenimiento_payload());
        req.codigo = "U99999999".into();
        assert!(matches!(submit(&state, 1, req).await, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_status_update_then_reload() {
        let state = demo_state();
        let created = submit(&state, 1, request(mantenimiento_payload())).await.unwrap();
        let role = Role::Area { area_id: 1 };

        let update = StatusUpdateRequest { status: "in_progress".into(), estimated_time: Some("2 horas".into()) };
        update_status(&state, &role, created.id, update).await.unwrap();
        let reloaded = get(&state, &role, created.id).await.unwrap();
        assert_eq!(reloaded.status, Status::InProgress);
        assert_eq!(reloaded.estimated_time.as_deref(), Some("2 horas"));

        let update = StatusUpdateRequest { status: "resolved".into(), estimated_time: None };
        let view = update_status(&state, &role, created.id, update).await.unwrap();
        assert_eq!(view.status, Status::Resolved);
        assert_eq!(view.estimated_time, None);
        let reloaded = get(&state, &role, created.id).await.unwrap();
        assert_eq!(reloaded.estimated_time, None);
    }

    #[tokio::test]
    async fn test_failed_update_keeps_prior_state() {
        let (state, store, _) = demo_parts(WorkflowFlavor::Tracking);
        let created = submit(&state, 1, request(mantenimiento_payload())).await.unwrap();

        store.set_unavailable(true);
        let update = StatusUpdateRequest { status: "resolved".into(), estimated_time: None };
        let err = update_status(&state, &Role::Admin, created.id, update).await.unwrap_err();
        assert!(matches!(err, ApiError::Persistence(_)));
        store.set_unavailable(false);

        let reloaded = get(&state, &Role::Admin, created.id).await.unwrap();
        assert_eq!(reloaded.status, Status::Pending);
    }

    #[tokio::test]
    async fn test_area_operator_cannot_touch_other_area() {
        let state = demo_state();
        let created = submit(&state, 1, request(mantenimiento_payload())).await.unwrap();
        let update = StatusUpdateRequest { status: "resolved".into(), estimated_time: None };
        let err = update_status(&state, &Role::Area { area_id: 2 }, created.id, update)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_review_flavor_terminal_states() {
        let state = demo_state_with(WorkflowFlavor::Review);
        let created = submit(&state, 1, request(mantenimiento_payload())).await.unwrap();
        assert_eq!(created.actions, vec![Status::Approved, Status::Rejected]);

        let approve = StatusUpdateRequest { status: "approved".into(), estimated_time: None };
        let view = update_status(&state, &Role::Admin, created.id, approve).await.unwrap();
        assert!(view.actions.is_empty());

        let reject = StatusUpdateRequest { status: "rejected".into(), estimated_time: None };
        let err = update_status(&state, &Role::Admin, created.id, reject).await.unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::CONFLICT);

        let in_progress = StatusUpdateRequest { status: "in_progress".into(), estimated_time: None };
        let fresh = submit(&state, 1, request(mantenimiento_payload())).await.unwrap();
        assert!(update_status(&state, &Role::Admin, fresh.id, in_progress).await.is_err());
    }

    #[tokio::test]
    async fn test_list_pins_area_operators_and_filters() {
        let state = demo_state();
        submit(&state, 1, request(mantenimiento_payload())).await.unwrap();
        let ti: FormData = [("equipo", "Proyector"), ("detalle", "No enciende")].into_iter().collect();
        let ti_report = submit(&state, 2, request(ti)).await.unwrap();

        let params = ReportListParams { area_id: Some(1), ..Default::default() };
        let page = list(&state, &Role::Area { area_id: 2 }, params).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].id, ti_report.id);

        let all = list(&state, &Role::Admin, ReportListParams::default()).await.unwrap();
        assert_eq!(all.total, 2);
        assert_eq!(all.page, 1);
        assert_eq!(all.per_page, DEFAULT_PER_PAGE);

        let params = ReportListParams { search: Some("ana".into()), status: Some("resolved".into()), ..Default::default() };
        assert_eq!(list(&state, &Role::Admin, params).await.unwrap().total, 0);

        let params = ReportListParams { status: Some("closed".into()), ..Default::default() };
        assert!(matches!(list(&state, &Role::Admin, params).await, Err(ApiError::Workflow(_))));
    }

    #[tokio::test]
    async fn test_counts() {
        let state = demo_state();
        let created = submit(&state, 1, request(mantenimiento_payload())).await.unwrap();
        submit(&state, 1, request(mantenimiento_payload())).await.unwrap();
        let update = StatusUpdateRequest { status: "in_progress".into(), estimated_time: None };
        update_status(&state, &Role::Admin, created.id, update).await.unwrap();

        let counts = counts(&state, Some(1)).await.unwrap();
        assert_eq!(counts.total, 2);
        assert_eq!(counts.pending, 1);
        assert_eq!(counts.in_progress, 1);
        assert_eq!(super::counts(&state, Some(2)).await.unwrap().total, 0);
    }
}
