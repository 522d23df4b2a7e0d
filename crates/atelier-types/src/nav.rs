//! Navigation payloads: deep-link targets, notification payloads, notices.

use serde::{Deserialize, Serialize};

use crate::ids::{MeetingId, ProjectId, TaskId};

/// Tabs within the project detail view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectTab {
    Overview,
    Tasks,
    Meetings,
    Files,
    Finance,
}

impl ProjectTab {
    /// Lenient parse for query/notification strings; unknown → `None`.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "overview" => Some(Self::Overview),
            "tasks" => Some(Self::Tasks),
            "meetings" => Some(Self::Meetings),
            "files" => Some(Self::Files),
            "finance" => Some(Self::Finance),
            _ => None,
        }
    }
}

/// Top-level console views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleView {
    Projects,
    Admin,
}

/// A navigation target waiting for its referents to become resolvable.
///
/// Created once per originating event (startup URL parse or notification
/// receipt) and consumed exactly once on successful resolution. Only the
/// project reference retries; task and meeting lookups are single-shot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeepLinkTarget {
    pub project_id: ProjectId,
    pub task_id: Option<TaskId>,
    pub meeting_id: Option<MeetingId>,
    pub tab: Option<ProjectTab>,
}

impl DeepLinkTarget {
    pub fn project(project_id: impl Into<ProjectId>) -> Self {
        Self {
            project_id: project_id.into(),
            task_id: None,
            meeting_id: None,
            tab: None,
        }
    }

    pub fn with_task(mut self, task_id: impl Into<TaskId>) -> Self {
        self.task_id = Some(task_id.into());
        self
    }

    pub fn with_meeting(mut self, meeting_id: impl Into<MeetingId>) -> Self {
        self.meeting_id = Some(meeting_id.into());
        self
    }

    pub fn with_tab(mut self, tab: ProjectTab) -> Self {
        self.tab = Some(tab);
        self
    }
}

/// Push-notification payload as delivered by the notification transport.
///
/// Field names match the transport's camelCase wire format. Every field is
/// optional: a payload that cannot be mapped to a target is ignored, never
/// rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub meeting_id: Option<String>,
    #[serde(default)]
    pub target_tab: Option<String>,
    #[serde(default)]
    pub deep_link_path: Option<String>,
}

/// Severity of a non-blocking user notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeSeverity {
    Info,
    Warning,
    Error,
}

/// A non-blocking notice surfaced to the user (toast-style).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub severity: NoticeSeverity,
    pub message: String,
}

impl Notice {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: NoticeSeverity::Warning,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: NoticeSeverity::Info,
            message: message.into(),
        }
    }
}
