//! API Models

use chrono::{DateTime, Utc};
use reporta_forms::{Area, FieldState, FormData, Pabellon, Salon, Student, Submission};
use reporta_workflow::{StatusDisplay, WorkflowFlavor};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Standard API response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ErrorResponse>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self { success: true, data: Some(data), error: None }
    }

    pub fn error(code: &str, message: &str) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ErrorResponse {
                code: code.to_string(),
                message: message.to_string(),
            }),
        }
    }
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

/// Paginated response
#[derive(Debug, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
}

impl<T> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, total: u64, page: u32, per_page: u32) -> Self {
        let total_pages = if per_page == 0 { 0 } else { total.div_ceil(per_page as u64) as u32 };
        Self { items, total, page, per_page, total_pages }
    }
}

// ============ Sessions ============

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Signed-in operator
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionView {
    pub username: String,
    /// `admin` or `area`
    pub role: String,
    pub area_id: Option<i64>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub session: SessionView,
}

// ============ Students ============

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VerifyStudentRequest {
    pub dni: String,
    pub codigo: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StudentDto {
    pub id: Option<i64>,
    pub dni: Option<String>,
    pub codigo: Option<String>,
    pub nombre: Option<String>,
}

impl From<Student> for StudentDto {
    fn from(s: Student) -> Self {
        Self { id: s.id, dni: s.dni, codigo: s.codigo, nombre: s.nombre }
    }
}

// ============ Catalog ============

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AreaDto {
    pub id: i64,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub image_url: Option<String>,
}

impl From<Area> for AreaDto {
    fn from(a: Area) -> Self {
        Self { id: a.id, nombre: a.nombre, descripcion: a.descripcion, image_url: a.image_url }
    }
}

/// Area form with options resolved and the editor of every field
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AreaForm {
    pub area: AreaDto,
    #[schema(value_type = Vec<Object>)]
    pub fields: Vec<FieldState>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PabellonDto {
    pub id: i64,
    pub nombre: String,
    pub descripcion: Option<String>,
}

impl From<Pabellon> for PabellonDto {
    fn from(p: Pabellon) -> Self {
        Self { id: p.id, nombre: p.nombre, descripcion: p.descripcion }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SalonDto {
    pub id: i64,
    pub pabellon_id: i64,
    pub nombre: String,
    pub capacidad: Option<i64>,
}

impl From<Salon> for SalonDto {
    fn from(s: Salon) -> Self {
        Self { id: s.id, pabellon_id: s.pabellon_id, nombre: s.nombre, capacidad: s.capacidad }
    }
}

// ============ Submissions ============

/// New report from a student
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmitRequest {
    pub dni: String,
    pub codigo: String,
    pub pabellon_id: Option<i64>,
    pub salon_id: Option<i64>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub form_data: FormData,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusDisplayDto {
    pub label: String,
    pub progress: u8,
    pub icon: String,
    pub color: String,
}

impl From<StatusDisplay> for StatusDisplayDto {
    fn from(d: StatusDisplay) -> Self {
        Self {
            label: d.label.to_string(),
            progress: d.progress,
            icon: d.icon.to_string(),
            color: d.color.to_string(),
        }
    }
}

/// Report as listed to operators
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubmissionView {
    pub id: i64,
    pub area_id: i64,
    pub alumno_id: i64,
    pub alumno_dni: String,
    pub alumno_codigo: String,
    pub alumno_nombre: String,
    #[schema(value_type = Object)]
    pub form_data: FormData,
    pub submitted_at: DateTime<Utc>,
    #[schema(value_type = String, example = "pending")]
    pub status: reporta_workflow::Status,
    pub estimated_time: Option<String>,
    pub display: StatusDisplayDto,
    /// Statuses an operator may move this report to
    #[schema(value_type = Vec<String>)]
    pub actions: Vec<reporta_workflow::Status>,
}

impl SubmissionView {
    pub fn new(submission: Submission, flavor: WorkflowFlavor) -> Self {
        Self {
            display: submission.status.display().into(),
            actions: flavor.actions(submission.status),
            id: submission.id,
            area_id: submission.area_id,
            alumno_id: submission.alumno_id,
            alumno_dni: submission.alumno_dni,
            alumno_codigo: submission.alumno_codigo,
            alumno_nombre: submission.alumno_nombre,
            form_data: submission.form_data,
            submitted_at: submission.submitted_at,
            status: submission.status,
            estimated_time: submission.estimated_time,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusUpdateRequest {
    /// `pending`, `in_progress`, `resolved`, `approved` or `rejected`
    pub status: String,
    #[serde(default)]
    pub estimated_time: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReportListParams {
    /// Admin only; area operators always see their own area
    pub area_id: Option<i64>,
    pub status: Option<String>,
    /// Matches student name, DNI or code
    pub search: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

// ============ Uploads ============

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UploadParams {
    pub area_id: i64,
    /// Name of a `file` or `image` field of the area
    pub field: String,
    pub filename: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub url: String,
    pub path: String,
    pub content_type: String,
    pub size: usize,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ImageParams {
    pub filename: String,
}

// ============ Administration ============

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AreaCreate {
    pub nombre: String,
    #[serde(default)]
    pub descripcion: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct AreaUpdate {
    #[serde(default)]
    pub nombre: Option<String>,
    #[serde(default)]
    pub descripcion: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FieldCreate {
    pub field_name: String,
    /// `text`, `textarea`, `file`, `image`, `date` or `select`
    pub field_type: String,
    pub field_label: String,
    #[serde(default)]
    pub is_required: bool,
    /// JSON list of choices or a selection option group name
    #[serde(default)]
    pub options: Option<String>,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub order_index: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FieldDto {
    pub id: i64,
    pub area_id: i64,
    pub field_name: String,
    pub field_type: String,
    pub field_label: String,
    pub is_required: bool,
    pub options: Option<String>,
    pub placeholder: Option<String>,
    pub order_index: i32,
}

impl From<reporta_forms::AreaFieldRow> for FieldDto {
    fn from(row: reporta_forms::AreaFieldRow) -> Self {
        Self {
            id: row.id,
            area_id: row.area_id,
            field_name: row.field_name,
            field_type: row.field_type,
            field_label: row.field_label,
            is_required: row.is_required,
            options: row.options,
            placeholder: row.placeholder,
            order_index: row.order_index,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OptionCreate {
    pub group_name: String,
    pub option_value: String,
    #[serde(default)]
    pub option_label: Option<String>,
    #[serde(default)]
    pub order_index: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OptionDto {
    pub id: i64,
    pub area_id: i64,
    pub group_name: String,
    pub option_value: String,
    pub option_label: String,
    pub order_index: i32,
}

impl From<reporta_forms::SelectionOption> for OptionDto {
    fn from(o: reporta_forms::SelectionOption) -> Self {
        Self {
            id: o.id,
            area_id: o.area_id,
            group_name: o.group_name,
            option_value: o.option_value,
            option_label: o.option_label,
            order_index: o.order_index,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Deleted {
    pub deleted: u64,
}

// ============ Dashboards ============

/// Report counts per status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StatusCounts {
    pub total: u64,
    pub pending: u64,
    pub in_progress: u64,
    pub resolved: u64,
    pub approved: u64,
    pub rejected: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AreaSummary {
    pub area: AreaDto,
    pub counts: StatusCounts,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum DashboardView {
    Admin {
        totals: StatusCounts,
        areas: Vec<AreaSummary>,
    },
    Area {
        area: AreaDto,
        counts: StatusCounts,
        recent: Vec<SubmissionView>,
    },
}

// ============ Notifications ============

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NotificationStatus {
    pub supported: bool,
    pub permission: crate::notify::NotificationPermission,
}

#[cfg(test)]
mod tests {
    use super::*;
    use reporta_workflow::Status;

    #[test]
    fn test_total_pages() {
        let page = PaginatedResponse::new(vec![1, 2, 3], 45, 1, 20);
        assert_eq!(page.total_pages, 3);
        let empty: PaginatedResponse<u8> = PaginatedResponse::new(vec![], 0, 1, 20);
        assert_eq!(empty.total_pages, 0);
    }

    #[test]
    fn test_submission_view_carries_display_and_actions() {
        let submission = Submission {
            id: 1,
            area_id: 2,
            alumno_id: 3,
            alumno_dni: "12345678".into(),
            alumno_codigo: "U2020".into(),
            alumno_nombre: "Ana".into(),
            form_data: FormData::new(),
            submitted_at: Utc::now(),
            status: Status::InProgress,
            estimated_time: Some("2 horas".into()),
        };
        let view = SubmissionView::new(submission, WorkflowFlavor::Tracking);
        assert_eq!(view.display.progress, 66);
        assert_eq!(view.actions, vec![Status::Pending, Status::Resolved]);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["status"], "in_progress");
        assert_eq!(json["display"]["label"], "En proceso");
    }

    #[test]
    fn test_error_envelope() {
        let body = ApiResponse::<()>::error("missing_location", "select a location");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["success"], false);
        assert!(json["data"].is_null());
        assert_eq!(json["error"]["code"], "missing_location");
    }
}
