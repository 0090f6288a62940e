//! Operator notifications
//!
//! [`Notifier`] mirrors the browser notification permission API so the
//! service can reason about permission state the same way a client does.
//! [`LogNotifier`] is the server-side implementation: it records the
//! permission and emits shown notifications through `tracing`.

use std::fmt;
use std::str::FromStr;

use parking_lot::RwLock;
use reporta_workflow::WorkflowEvent;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NotificationPermission {
    #[default]
    Default,
    Granted,
    Denied,
}

impl NotificationPermission {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationPermission::Default => "default",
            NotificationPermission::Granted => "granted",
            NotificationPermission::Denied => "denied",
        }
    }
}

impl fmt::Display for NotificationPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationPermission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "default" => Ok(NotificationPermission::Default),
            "granted" => Ok(NotificationPermission::Granted),
            "denied" => Ok(NotificationPermission::Denied),
            other => Err(format!("unknown notification permission: {other}")),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn is_supported(&self) -> bool;

    fn permission(&self) -> NotificationPermission;

    /// Ask for permission. Returns whether it is granted afterwards.
    fn request(&self) -> bool;

    /// Show a notification. Returns false when nothing was shown.
    fn show(&self, title: &str, body: &str) -> bool;
}

/// Notification announcing `event` to its area.
pub fn announce(notifier: &dyn Notifier, event: &WorkflowEvent) -> bool {
    let (title, body) = match event {
        WorkflowEvent::Submitted { submission_id, alumno_nombre, .. } => (
            "Nuevo reporte".to_string(),
            format!("Reporte #{submission_id} enviado por {alumno_nombre}"),
        ),
        WorkflowEvent::StatusChanged { submission_id, to, .. } => (
            "Reporte actualizado".to_string(),
            format!("Reporte #{submission_id}: {}", to.display().label),
        ),
    };
    tracing::info!(area_id = event.area_id(), submission_id = event.submission_id(), %title, "workflow event");
    notifier.show(&title, &body)
}

pub struct LogNotifier {
    permission: RwLock<NotificationPermission>,
}

impl LogNotifier {
    pub fn new(permission: NotificationPermission) -> Self {
        Self { permission: RwLock::new(permission) }
    }
}

impl Default for LogNotifier {
    fn default() -> Self {
        Self::new(NotificationPermission::Default)
    }
}

impl Notifier for LogNotifier {
    fn is_supported(&self) -> bool {
        true
    }

    fn permission(&self) -> NotificationPermission {
        *self.permission.read()
    }

    /// A denied permission stays denied; a pending one is granted.
    fn request(&self) -> bool {
        let mut permission = self.permission.write();
        if *permission == NotificationPermission::Default {
            *permission = NotificationPermission::Granted;
        }
        *permission == NotificationPermission::Granted
    }

    fn show(&self, title: &str, body: &str) -> bool {
        if self.permission() != NotificationPermission::Granted {
            tracing::debug!(%title, "notification suppressed");
            return false;
        }
        tracing::info!(target: "reporta::notify", %title, %body, "notification");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use reporta_workflow::Status;

    #[test]
    fn test_show_requires_granted_permission() {
        let notifier = LogNotifier::default();
        assert!(!notifier.show("t", "b"));
        assert!(notifier.request());
        assert_eq!(notifier.permission(), NotificationPermission::Granted);
        assert!(notifier.show("t", "b"));
    }

    #[test]
    fn test_denied_stays_denied() {
        let notifier = LogNotifier::new(NotificationPermission::Denied);
        assert!(!notifier.request());
        assert!(!notifier.show("t", "b"));
    }

    #[test]
    fn test_announce_events() {
        let notifier = LogNotifier::new(NotificationPermission::Granted);
        let event = WorkflowEvent::StatusChanged {
            submission_id: 4,
            area_id: 2,
            from: Status::Pending,
            to: Status::InProgress,
            estimated_time: Some("2 horas".into()),
            at: Utc::now(),
        };
        assert!(announce(&notifier, &event));
    }

    #[test]
    fn test_parse_permission() {
        assert_eq!("denied".parse::<NotificationPermission>(), Ok(NotificationPermission::Denied));
        assert!("maybe".parse::<NotificationPermission>().is_err());
    }
}
