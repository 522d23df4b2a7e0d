//! Navigation effects seam.
//!
//! The synchronizer never touches UI state directly; every navigation
//! outcome goes through this trait so the core stays testable without a
//! rendering layer.

use atelier_types::{ConsoleView, Notice, ProjectId, ProjectTab, TaskId};

/// UI collaborator receiving navigation outcomes from the core.
pub trait NavigationEffects: Send {
    fn set_active_project(&mut self, id: &ProjectId);
    fn set_active_task(&mut self, id: &TaskId);
    fn set_active_tab(&mut self, tab: ProjectTab);
    /// `task_focused = true` switches the project view into its
    /// task-centric mode.
    fn set_view_mode(&mut self, task_focused: bool);
    fn set_current_view(&mut self, view: ConsoleView);
    /// Strip deep-link query parameters from the visible application
    /// location so the target is not re-parsed on refresh.
    fn clear_location_params(&mut self);
    /// Surface a non-blocking notice to the user.
    fn show_notice(&mut self, notice: Notice);
}

/// Effects implementation that only logs, for headless runs.
#[derive(Debug, Default)]
pub struct LoggingEffects;

impl NavigationEffects for LoggingEffects {
    fn set_active_project(&mut self, id: &ProjectId) {
        tracing::info!(project = %id, "active project");
    }

    fn set_active_task(&mut self, id: &TaskId) {
        tracing::info!(task = %id, "active task");
    }

    fn set_active_tab(&mut self, tab: ProjectTab) {
        tracing::info!(?tab, "active tab");
    }

    fn set_view_mode(&mut self, task_focused: bool) {
        tracing::info!(task_focused, "view mode");
    }

    fn set_current_view(&mut self, view: ConsoleView) {
        tracing::info!(?view, "current view");
    }

    fn clear_location_params(&mut self) {
        tracing::debug!("cleared location params");
    }

    fn show_notice(&mut self, notice: Notice) {
        tracing::warn!(severity = ?notice.severity, "{}", notice.message);
    }
}

/// Recording implementation used by the test suites to observe what the
/// core decided.
#[derive(Debug, Default)]
pub struct RecordingEffects {
    pub active_project: Option<ProjectId>,
    pub active_task: Option<TaskId>,
    pub active_tab: Option<ProjectTab>,
    pub task_focused: bool,
    pub current_view: Option<ConsoleView>,
    pub location_cleared: u32,
    pub notices: Vec<Notice>,
    /// Every call, in order, for assertions about effect counts.
    pub log: Vec<String>,
}

impl NavigationEffects for RecordingEffects {
    fn set_active_project(&mut self, id: &ProjectId) {
        self.active_project = Some(id.clone());
        self.log.push(format!("project:{id}"));
    }

    fn set_active_task(&mut self, id: &TaskId) {
        self.active_task = Some(id.clone());
        self.log.push(format!("task:{id}"));
    }

    fn set_active_tab(&mut self, tab: ProjectTab) {
        self.active_tab = Some(tab);
        self.log.push(format!("tab:{tab:?}"));
    }

    fn set_view_mode(&mut self, task_focused: bool) {
        self.task_focused = task_focused;
        self.log.push(format!("view_mode:{task_focused}"));
    }

    fn set_current_view(&mut self, view: ConsoleView) {
        self.current_view = Some(view);
        self.log.push(format!("view:{view:?}"));
    }

    fn clear_location_params(&mut self) {
        self.location_cleared += 1;
        self.log.push("clear_location".into());
    }

    fn show_notice(&mut self, notice: Notice) {
        self.log.push(format!("notice:{}", notice.message));
        self.notices.push(notice);
    }
}
