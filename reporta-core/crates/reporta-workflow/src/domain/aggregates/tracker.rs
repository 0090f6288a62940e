//! Status tracker aggregate
//!
//! Wraps the status portion of one submission record. Applying a request
//! yields the full status state to persist and records a domain event.
use chrono::Utc;

use crate::domain::events::WorkflowEvent;
use crate::flavor::Transition;
use crate::{Status, StatusRequest, WorkflowError, WorkflowFlavor};

#[derive(Clone, Debug)]
pub struct StatusTracker {
    submission_id: i64,
    area_id: i64,
    flavor: WorkflowFlavor,
    status: Status,
    estimated_time: Option<String>,
    events: Vec<WorkflowEvent>,
}

impl StatusTracker {
    pub fn load(
        flavor: WorkflowFlavor,
        submission_id: i64,
        area_id: i64,
        status: Status,
        estimated_time: Option<String>,
    ) -> Self {
        Self { submission_id, area_id, flavor, status, estimated_time, events: vec![] }
    }

    pub fn submission_id(&self) -> i64 { self.submission_id }
    pub fn status(&self) -> Status { self.status }
    pub fn estimated_time(&self) -> Option<&str> { self.estimated_time.as_deref() }
    pub fn actions(&self) -> Vec<Status> { self.flavor.actions(self.status) }

    pub fn apply(&mut self, request: &StatusRequest) -> Result<Transition, WorkflowError> {
        let transition = self.flavor.transition(self.status, request)?;
        self.status = transition.to;
        self.estimated_time = transition.estimated_time.clone();
        tracing::debug!(
            submission_id = self.submission_id,
            from = %transition.from,
            to = %transition.to,
            "status transition"
        );
        self.raise_event(WorkflowEvent::StatusChanged {
            submission_id: self.submission_id,
            area_id: self.area_id,
            from: transition.from,
            to: transition.to,
            estimated_time: transition.estimated_time.clone(),
            at: Utc::now(),
        });
        Ok(transition)
    }

    pub fn take_events(&mut self) -> Vec<WorkflowEvent> { std::mem::take(&mut self.events) }
    fn raise_event(&mut self, e: WorkflowEvent) { self.events.push(e); }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_workflow() {
        let mut t = StatusTracker::load(WorkflowFlavor::Tracking, 7, 2, Status::Pending, None);
        t.apply(&StatusRequest::new(Status::InProgress).with_estimated_time("2 horas")).unwrap();
        assert_eq!(t.status(), Status::InProgress);
        assert_eq!(t.estimated_time(), Some("2 horas"));

        t.apply(&StatusRequest::new(Status::Resolved)).unwrap();
        assert_eq!(t.estimated_time(), None);

        let events = t.take_events();
        assert_eq!(events.len(), 2);
        assert!(t.take_events().is_empty());
        assert_eq!(events[1].submission_id(), 7);
    }

    #[test]
    fn test_failed_transition_keeps_state() {
        let mut t = StatusTracker::load(WorkflowFlavor::Review, 1, 1, Status::Approved, None);
        assert!(t.apply(&StatusRequest::new(Status::Rejected)).is_err());
        assert_eq!(t.status(), Status::Approved);
        assert!(t.take_events().is_empty());
    }
}
