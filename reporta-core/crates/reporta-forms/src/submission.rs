//! Submission records
use chrono::{DateTime, Utc};
use reporta_workflow::{Status, WorkflowFlavor};
use serde::{Deserialize, Serialize};

use crate::location::SelectedLocation;
use crate::value::FormData;

/// `areas` row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    pub id: i64,
    pub nombre: String,
    #[serde(default)]
    pub descripcion: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Verified student identity. Every column may be missing upstream.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub dni: Option<String>,
    #[serde(default)]
    pub codigo: Option<String>,
    #[serde(default)]
    pub nombre: Option<String>,
}

/// Submission ready to insert into `area_submissions`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewSubmission {
    pub area_id: i64,
    pub alumno_id: i64,
    pub alumno_dni: String,
    pub alumno_codigo: String,
    pub alumno_nombre: String,
    pub form_data: FormData,
    pub submitted_at: DateTime<Utc>,
    pub status: Status,
}

/// Persisted `area_submissions` row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: i64,
    pub area_id: i64,
    #[serde(default)]
    pub alumno_id: i64,
    #[serde(default)]
    pub alumno_dni: String,
    #[serde(default)]
    pub alumno_codigo: String,
    #[serde(default)]
    pub alumno_nombre: String,
    #[serde(default)]
    pub form_data: FormData,
    pub submitted_at: DateTime<Utc>,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub estimated_time: Option<String>,
}

/// Assemble the record for a validated payload.
///
/// Location keys are merged flat into `form_data`; identity fields never
/// end up null.
pub fn build_submission(
    area: &Area,
    student: &Student,
    payload: FormData,
    location: &SelectedLocation,
    flavor: WorkflowFlavor,
) -> NewSubmission {
    let mut form_data = payload;
    location.merge_into(&mut form_data);
    NewSubmission {
        area_id: area.id,
        alumno_id: student.id.unwrap_or(0),
        alumno_dni: student.dni.clone().unwrap_or_default(),
        alumno_codigo: student.codigo.clone().unwrap_or_default(),
        alumno_nombre: student.nombre.clone().unwrap_or_default(),
        form_data,
        submitted_at: Utc::now(),
        status: flavor.initial(),
    }
}
