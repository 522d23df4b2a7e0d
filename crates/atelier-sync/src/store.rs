//! Single-writer merged view.
//!
//! Owned by the engine and mutated only inside its event handlers; every
//! other component reads through `&` access. There is no lock because the
//! event loop serializes all writers.

use std::collections::{HashMap, HashSet};

use atelier_types::{Project, ProjectId, Role, Task, User, UserId};

use crate::users::UserFeedMerger;
use crate::visibility::visible_projects;

/// The reconciled in-memory union of all feed outputs.
#[derive(Default)]
pub struct SyncState {
    users: UserFeedMerger,
    projects: Vec<Project>,
    tasks_by_project: HashMap<ProjectId, Vec<Task>>,
}

impl SyncState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cached project snapshot wholesale (no partial patching)
    /// and return the new ID set that drives the task fan-out.
    pub(crate) fn replace_projects(&mut self, projects: Vec<Project>) -> HashSet<ProjectId> {
        self.projects = projects;
        self.project_ids()
    }

    pub(crate) fn users_mut(&mut self) -> &mut UserFeedMerger {
        &mut self.users
    }

    pub(crate) fn tasks_by_project_mut(&mut self) -> &mut HashMap<ProjectId, Vec<Task>> {
        &mut self.tasks_by_project
    }

    pub(crate) fn project_mut(&mut self, id: &ProjectId) -> Option<&mut Project> {
        self.projects.iter_mut().find(|p| &p.id == id)
    }

    pub fn users(&self) -> &HashMap<UserId, User> {
        self.users.users()
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn project(&self, id: &ProjectId) -> Option<&Project> {
        self.projects.iter().find(|p| &p.id == id)
    }

    pub fn project_ids(&self) -> HashSet<ProjectId> {
        self.projects.iter().map(|p| p.id.clone()).collect()
    }

    pub fn tasks_by_project(&self) -> &HashMap<ProjectId, Vec<Task>> {
        &self.tasks_by_project
    }

    /// Role-scoped projection of the merged view; see [`visible_projects`].
    pub fn visible_for(&self, role: Role, identity: &UserId) -> Vec<&Project> {
        visible_projects(role, identity, &self.projects, &self.tasks_by_project)
    }
}
