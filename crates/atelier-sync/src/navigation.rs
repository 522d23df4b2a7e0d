//! Navigation dispatcher.
//!
//! Two independent origins — the startup URL and runtime push notifications
//! — are translated into the one `DeepLinkTarget` shape and routed through
//! the identical resolution path. Unparseable input is silently ignored: a
//! malformed query never creates a pending target and never errors.

use std::collections::HashMap;

use atelier_types::{ConsoleView, DeepLinkTarget, NotificationPayload, ProjectTab};
use url::Url;

/// Reserved `open` value requesting the administrative view directly.
///
/// This bypasses the resolver entirely: the switch is fixed and
/// non-data-dependent, so it is applied before the first project-feed
/// emission instead of being deferred.
pub const ADMIN_VIEW_MARKER: &str = "admin";

/// Outcome of parsing the startup URL.
#[derive(Debug, Clone, PartialEq)]
pub enum StartupNav {
    /// Immediate, non-deferred view switch (`open=admin`).
    DirectView(ConsoleView),
    /// Data-dependent target handed to the resolver.
    DeepLink(DeepLinkTarget),
}

/// Parse the fixed startup query parameters once at initialization.
///
/// Recognized keys: `projectId|project`, `taskId|task`, `meetingId`, `tab`,
/// `open`. Returns `None` when nothing actionable is present.
pub fn parse_startup_url(url: &Url) -> Option<StartupNav> {
    let params: HashMap<String, String> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    if params.get("open").map(String::as_str) == Some(ADMIN_VIEW_MARKER) {
        return Some(StartupNav::DirectView(ConsoleView::Admin));
    }

    target_from_params(&params).map(StartupNav::DeepLink)
}

/// Map a notification payload to the resolver's input shape.
///
/// Falls back to parsing `deepLinkPath` when the payload carries no direct
/// project reference.
pub fn target_from_notification(payload: &NotificationPayload) -> Option<DeepLinkTarget> {
    if let Some(project_id) = &payload.project_id {
        let mut target = DeepLinkTarget::project(project_id.as_str());
        if let Some(task_id) = &payload.task_id {
            target = target.with_task(task_id.as_str());
        }
        if let Some(meeting_id) = &payload.meeting_id {
            target = target.with_meeting(meeting_id.as_str());
        }
        if let Some(tab) = payload.target_tab.as_deref().and_then(ProjectTab::from_str) {
            target = target.with_tab(tab);
        }
        return Some(target);
    }

    // Some transports only carry the in-app path they would have opened.
    let path = payload.deep_link_path.as_deref()?;
    let base = Url::parse("app://console/").ok()?;
    let url = base.join(path).ok()?;
    match parse_startup_url(&url) {
        Some(StartupNav::DeepLink(target)) => Some(target),
        _ => None,
    }
}

/// Decode a notification payload off the transport's JSON wire format.
///
/// Malformed JSON is ignored like any other malformed navigation input.
pub fn notification_from_json(raw: &str) -> Option<NotificationPayload> {
    match serde_json::from_str(raw) {
        Ok(payload) => Some(payload),
        Err(error) => {
            tracing::debug!(%error, "ignoring malformed notification payload");
            None
        }
    }
}

fn target_from_params(params: &HashMap<String, String>) -> Option<DeepLinkTarget> {
    // A target without a project reference can never resolve; treat it as
    // malformed and ignore it.
    let project_id = params.get("projectId").or_else(|| params.get("project"))?;

    let mut target = DeepLinkTarget::project(project_id.as_str());
    if let Some(task_id) = params.get("taskId").or_else(|| params.get("task")) {
        target = target.with_task(task_id.as_str());
    }
    if let Some(meeting_id) = params.get("meetingId") {
        target = target.with_meeting(meeting_id.as_str());
    }
    if let Some(tab) = params.get("tab").and_then(|t| ProjectTab::from_str(t)) {
        target = target.with_tab(tab);
    }
    Some(target)
}
