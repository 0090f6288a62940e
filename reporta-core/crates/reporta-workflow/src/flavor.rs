//! Workflow flavors and their transition rules.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Status, StatusRequest, WorkflowError};

/// The status workflow a deployment runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowFlavor {
    /// pending / in_progress / resolved, freely reachable.
    #[default]
    Tracking,
    /// pending, then approved or rejected.
    Review,
}

/// Outcome of a legal transition: the full status state to persist.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub from: Status,
    pub to: Status,
    pub estimated_time: Option<String>,
}

impl WorkflowFlavor {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowFlavor::Tracking => "tracking",
            WorkflowFlavor::Review => "review",
        }
    }

    pub fn initial(&self) -> Status {
        Status::Pending
    }

    pub fn states(&self) -> &'static [Status] {
        match self {
            WorkflowFlavor::Tracking => &[Status::Pending, Status::InProgress, Status::Resolved],
            WorkflowFlavor::Review => &[Status::Pending, Status::Approved, Status::Rejected],
        }
    }

    pub fn allows(&self, status: Status) -> bool {
        self.states().contains(&status)
    }

    pub fn is_terminal(&self, status: Status) -> bool {
        matches!(self, WorkflowFlavor::Review) && status != Status::Pending
    }

    /// Statuses an operator is offered while the report sits in `current`.
    pub fn actions(&self, current: Status) -> Vec<Status> {
        match self {
            WorkflowFlavor::Tracking => self
                .states()
                .iter()
                .copied()
                .filter(|s| *s != current)
                .collect(),
            WorkflowFlavor::Review if current == Status::Pending => {
                vec![Status::Approved, Status::Rejected]
            }
            WorkflowFlavor::Review => Vec::new(),
        }
    }

    /// Validate `request` against `current` and compute the state to store.
    ///
    /// Only `in_progress` keeps an estimated time; blank estimates and every
    /// other target clear it.
    pub fn transition(&self, current: Status, request: &StatusRequest) -> Result<Transition, WorkflowError> {
        if !self.allows(request.status) {
            return Err(WorkflowError::NotInFlavor { status: request.status, flavor: *self });
        }
        if self.is_terminal(current) {
            return Err(WorkflowError::Terminal(current));
        }

        let estimated_time = match request.status {
            Status::InProgress => request
                .estimated_time
                .as_deref()
                .map(str::trim)
                .filter(|eta| !eta.is_empty())
                .map(String::from),
            _ => None,
        };

        Ok(Transition { from: current, to: request.status, estimated_time })
    }
}

impl fmt::Display for WorkflowFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkflowFlavor {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tracking" | "three_state" => Ok(WorkflowFlavor::Tracking),
            "review" | "approval" => Ok(WorkflowFlavor::Review),
            other => Err(WorkflowError::UnknownFlavor(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracking_in_progress_keeps_eta() {
        let t = WorkflowFlavor::Tracking
            .transition(Status::Pending, &StatusRequest::new(Status::InProgress).with_estimated_time("2 horas"))
            .unwrap();
        assert_eq!(t.to, Status::InProgress);
        assert_eq!(t.estimated_time.as_deref(), Some("2 horas"));
    }

    #[test]
    fn test_tracking_other_targets_clear_eta() {
        let request = StatusRequest::new(Status::Resolved).with_estimated_time("mañana");
        let t = WorkflowFlavor::Tracking.transition(Status::InProgress, &request).unwrap();
        assert_eq!(t.estimated_time, None);
    }

    #[test]
    fn test_tracking_blank_eta_is_none() {
        let request = StatusRequest::new(Status::InProgress).with_estimated_time("   ");
        let t = WorkflowFlavor::Tracking.transition(Status::Pending, &request).unwrap();
        assert_eq!(t.estimated_time, None);
    }

    #[test]
    fn test_tracking_resolved_can_reopen() {
        let t = WorkflowFlavor::Tracking
            .transition(Status::Resolved, &StatusRequest::new(Status::Pending))
            .unwrap();
        assert_eq!(t.from, Status::Resolved);
        assert_eq!(t.to, Status::Pending);
    }

    #[test]
    fn test_tracking_rejects_review_states() {
        let err = WorkflowFlavor::Tracking
            .transition(Status::Pending, &StatusRequest::new(Status::Approved))
            .unwrap_err();
        assert!(matches!(err, WorkflowError::NotInFlavor { .. }));
    }

    #[test]
    fn test_review_terminal_states() {
        let review = WorkflowFlavor::Review;
        assert!(review.transition(Status::Pending, &StatusRequest::new(Status::Approved)).is_ok());
        assert_eq!(
            review.transition(Status::Rejected, &StatusRequest::new(Status::Pending)),
            Err(WorkflowError::Terminal(Status::Rejected))
        );
        assert!(review.actions(Status::Approved).is_empty());
        assert_eq!(review.actions(Status::Pending), vec![Status::Approved, Status::Rejected]);
    }

    #[test]
    fn test_tracking_actions_exclude_current() {
        assert_eq!(
            WorkflowFlavor::Tracking.actions(Status::InProgress),
            vec![Status::Pending, Status::Resolved]
        );
    }

    #[test]
    fn test_flavor_parse() {
        assert_eq!("Tracking".parse::<WorkflowFlavor>().unwrap(), WorkflowFlavor::Tracking);
        assert_eq!("review".parse::<WorkflowFlavor>().unwrap(), WorkflowFlavor::Review);
        assert!("kanban".parse::<WorkflowFlavor>().is_err());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn any_status() -> impl Strategy<Value = Status> {
            prop::sample::select(Status::ALL.to_vec())
        }

        proptest! {
            #[test]
            fn prop_tracking_eta_only_survives_in_progress(
                current in any_status(),
                target in any_status(),
                eta in proptest::option::of("[a-z0-9 ]{0,12}"),
            ) {
                let request = StatusRequest { status: target, estimated_time: eta };
                if let Ok(t) = WorkflowFlavor::Tracking.transition(current, &request) {
                    prop_assert!(t.estimated_time.is_none() || t.to == Status::InProgress);
                    prop_assert!(WorkflowFlavor::Tracking.allows(t.to));
                }
            }
        }
    }
}
