//! Role-scoped visibility over the merged view.
//!
//! Pure projection — no side effects, deterministic, safe to call on every
//! tick. Vendor visibility reads the live per-project task map, never the
//! project's embedded fallback list: the fallback may be stale or empty
//! while the live map is authoritative.

use std::collections::HashMap;

use atelier_types::{Project, ProjectId, Role, Task, UserId};

/// Projects the given identity/role may observe.
///
/// Unknown roles see nothing (fail closed).
pub fn visible_projects<'a>(
    role: Role,
    identity: &UserId,
    projects: &'a [Project],
    tasks_by_project: &HashMap<ProjectId, Vec<Task>>,
) -> Vec<&'a Project> {
    projects
        .iter()
        .filter(|project| match role {
            Role::Admin => true,
            Role::Designer => {
                project.lead_designer_id.as_ref() == Some(identity)
                    || project.team_members.contains(identity)
            }
            Role::Client => {
                project.client_id.as_ref() == Some(identity)
                    || project.client_ids.contains(identity)
            }
            Role::Vendor => {
                assigned_in_live_tasks(identity, &project.id, tasks_by_project)
                    || project.vendor_ids.contains(identity)
                    || project.team_members.contains(identity)
            }
            Role::Unknown => false,
        })
        .collect()
}

fn assigned_in_live_tasks(
    identity: &UserId,
    project: &ProjectId,
    tasks_by_project: &HashMap<ProjectId, Vec<Task>>,
) -> bool {
    tasks_by_project
        .get(project)
        .map(|tasks| {
            tasks
                .iter()
                .any(|task| task.assignee_id.as_ref() == Some(identity))
        })
        .unwrap_or(false)
}
