//! Workflow value objects
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::WorkflowError;

/// Status of a submission as stored in `area_submissions.status`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Pending,
    InProgress,
    Resolved,
    Approved,
    Rejected,
}

impl Status {
    pub const ALL: [Status; 5] = [
        Status::Pending,
        Status::InProgress,
        Status::Resolved,
        Status::Approved,
        Status::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::InProgress => "in_progress",
            Status::Resolved => "resolved",
            Status::Approved => "approved",
            Status::Rejected => "rejected",
        }
    }

    /// Presentation mapping. Tracking progress is 33/66/100.
    pub fn display(&self) -> StatusDisplay {
        let (label, progress, icon, color) = match self {
            Status::Pending => ("Pendiente", 33, "clock", "amber"),
            Status::InProgress => ("En proceso", 66, "wrench", "blue"),
            Status::Resolved => ("Resuelto", 100, "check-circle", "green"),
            Status::Approved => ("Aprobado", 100, "thumbs-up", "green"),
            Status::Rejected => ("Rechazado", 100, "x-circle", "red"),
        };
        StatusDisplay { status: *self, label, progress, icon, color }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| WorkflowError::UnknownStatus(s.to_string()))
    }
}

/// Derived, display-only view of a status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct StatusDisplay {
    pub status: Status,
    pub label: &'static str,
    pub progress: u8,
    pub icon: &'static str,
    pub color: &'static str,
}

/// Operator request to move a submission into `status`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRequest {
    pub status: Status,
    #[serde(default)]
    pub estimated_time: Option<String>,
}

impl StatusRequest {
    pub fn new(status: Status) -> Self {
        Self { status, estimated_time: None }
    }

    pub fn with_estimated_time(mut self, estimated_time: impl Into<String>) -> Self {
        self.estimated_time = Some(estimated_time.into());
        self
    }
}
