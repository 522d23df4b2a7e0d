//! Deferred deep-link resolution.
//!
//! At most one navigation target is held pending. Resolution is attempted
//! against the current merged view on every relevant update; the project
//! lookup retries every tick, the task lookup is single-shot, and the whole
//! target is applied at most once before the resolver self-clears.

use atelier_types::{ConsoleView, DeepLinkTarget, Notice, ProjectTab};

use crate::effects::NavigationEffects;
use crate::store::SyncState;

/// Resolver state. `Applied` is transient: it exists only between applying
/// a target and clearing it within the same tick, which is what makes the
/// at-most-once guarantee explicit rather than a boolean convention.
#[derive(Debug, Clone, PartialEq)]
enum ResolverState {
    Empty,
    Pending(DeepLinkTarget),
    Applied,
}

/// Holds at most one pending navigation target and applies it exactly once.
#[derive(Debug)]
pub struct DeepLinkResolver {
    state: ResolverState,
}

impl DeepLinkResolver {
    pub fn new() -> Self {
        Self {
            state: ResolverState::Empty,
        }
    }

    /// Stage a target. A later submission replaces an earlier unresolved
    /// one — each originating event creates exactly one target instance.
    pub fn submit(&mut self, target: DeepLinkTarget) {
        tracing::info!(project = %target.project_id, "deep-link target pending");
        self.state = ResolverState::Pending(target);
    }

    /// Discard any pending target. Always safe; the resolver holds no
    /// resources beyond the target value itself.
    pub fn clear(&mut self) {
        self.state = ResolverState::Empty;
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, ResolverState::Pending(_))
    }

    /// Attempt resolution against the current merged view.
    ///
    /// Returns `true` when the target was applied this tick. A target whose
    /// project is not yet in view stays pending with no other effect; a
    /// re-delivered view update after application is a no-op because the
    /// pending target was cleared.
    pub fn try_resolve(
        &mut self,
        state: &SyncState,
        effects: &mut dyn NavigationEffects,
    ) -> bool {
        let target = match &self.state {
            ResolverState::Pending(target) => target.clone(),
            _ => return false,
        };

        let Some(project) = state.project(&target.project_id) else {
            // Not yet resolvable; retry on the next relevant update.
            return false;
        };

        // A target always lands inside the projects view, wherever the
        // console was before.
        effects.set_current_view(ConsoleView::Projects);
        effects.set_active_project(&project.id);
        if let Some(tab) = target.tab {
            effects.set_active_tab(tab);
        }

        if let Some(task_id) = &target.task_id {
            // Live map is authoritative; the embedded fallback list only
            // covers the window before the task feed's first emission.
            let live = state.tasks_by_project().get(&project.id);
            let found = match live {
                Some(tasks) => tasks.iter().any(|t| &t.id == task_id),
                None => project.tasks.iter().any(|t| &t.id == task_id),
            };
            if found {
                effects.set_active_task(task_id);
                effects.set_view_mode(true);
            } else {
                // Single-shot: the task is left unselected and never
                // retried, unlike the project lookup.
                tracing::debug!(task = %task_id, "deep-link task not found, leaving unselected");
                effects.show_notice(Notice::info(format!(
                    "task {task_id} is no longer available"
                )));
            }
        } else if target.meeting_id.is_some() {
            effects.set_active_tab(ProjectTab::Meetings);
        }

        self.state = ResolverState::Applied;
        effects.clear_location_params();
        self.state = ResolverState::Empty;
        tracing::info!(project = %target.project_id, "deep-link target applied");
        true
    }
}

impl Default for DeepLinkResolver {
    fn default() -> Self {
        Self::new()
    }
}
