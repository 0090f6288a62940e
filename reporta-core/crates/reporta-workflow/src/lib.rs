//! Reporta Submission Workflow
//!
//! Status lifecycle for student reports.
//!
//! ## Flavors
//! - **Tracking**: `pending`, `in_progress`, `resolved`. Any state can be
//!   reached from any other; `in_progress` may carry an estimated time.
//! - **Review**: `pending` then `approved` or `rejected`, both terminal.
//!
//! A deployment selects exactly one flavor. Status rows are persisted as
//! snake_case strings (`"in_progress"`), so both flavors share one
//! [`Status`] enum and the flavor decides which values are legal.

pub mod domain;
pub mod flavor;

pub use domain::aggregates::StatusTracker;
pub use domain::events::WorkflowEvent;
pub use domain::value_objects::{Status, StatusDisplay, StatusRequest};
pub use flavor::WorkflowFlavor;

use thiserror::Error;

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("unknown status: {0}")]
    UnknownStatus(String),

    #[error("status {status} is not part of the {flavor} workflow")]
    NotInFlavor { status: Status, flavor: WorkflowFlavor },

    #[error("report is already {0} and can no longer change")]
    Terminal(Status),

    #[error("unknown workflow flavor: {0}")]
    UnknownFlavor(String),
}

pub type Result<T> = std::result::Result<T, WorkflowError>;
