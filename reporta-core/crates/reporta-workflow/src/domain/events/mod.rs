//! Workflow domain events
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::Status;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkflowEvent {
    Submitted {
        submission_id: i64,
        area_id: i64,
        alumno_nombre: String,
        at: DateTime<Utc>,
    },
    StatusChanged {
        submission_id: i64,
        area_id: i64,
        from: Status,
        to: Status,
        estimated_time: Option<String>,
        at: DateTime<Utc>,
    },
}

impl WorkflowEvent {
    pub fn area_id(&self) -> i64 {
        match self {
            WorkflowEvent::Submitted { area_id, .. } | WorkflowEvent::StatusChanged { area_id, .. } => *area_id,
        }
    }

    pub fn submission_id(&self) -> i64 {
        match self {
            WorkflowEvent::Submitted { submission_id, .. }
            | WorkflowEvent::StatusChanged { submission_id, .. } => *submission_id,
        }
    }
}
