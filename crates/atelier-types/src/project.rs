//! Project and task records.
//!
//! Both are read-only cached copies of store documents: each feed emission
//! replaces the previous snapshot wholesale, never patches it in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{ProjectId, TaskId, UserId};

/// A task document, scoped to its owning project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub project_id: ProjectId,
    #[serde(default)]
    pub assignee_id: Option<UserId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(id: impl Into<TaskId>, project_id: impl Into<ProjectId>) -> Self {
        Self {
            id: id.into(),
            project_id: project_id.into(),
            assignee_id: None,
            title: String::new(),
            due_date: None,
        }
    }

    pub fn with_assignee(mut self, assignee: impl Into<UserId>) -> Self {
        self.assignee_id = Some(assignee.into());
        self
    }
}

/// A project document as emitted by the project feed.
///
/// `tasks` is the embedded fallback snapshot written alongside the project
/// document; the live per-project task feed is authoritative once it has
/// emitted, and the embedded list may be stale or empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub lead_designer_id: Option<UserId>,
    #[serde(default)]
    pub team_members: Vec<UserId>,
    #[serde(default)]
    pub client_id: Option<UserId>,
    #[serde(default)]
    pub client_ids: Vec<UserId>,
    #[serde(default)]
    pub vendor_ids: Vec<UserId>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Project {
    pub fn new(id: impl Into<ProjectId>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            lead_designer_id: None,
            team_members: Vec::new(),
            client_id: None,
            client_ids: Vec::new(),
            vendor_ids: Vec::new(),
            tasks: Vec::new(),
            updated_at: None,
        }
    }

    pub fn with_lead(mut self, lead: impl Into<UserId>) -> Self {
        self.lead_designer_id = Some(lead.into());
        self
    }
}

/// Partial project update forwarded to the persistence collaborator.
///
/// Identity is deliberately absent — it travels separately so the patch can
/// never rename a document. `None` fields are omitted from the wire payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_designer_id: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_members: Option<Vec<UserId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_ids: Option<Vec<UserId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_ids: Option<Vec<UserId>>,
}

impl ProjectPatch {
    /// Apply the patch to a cached project copy (optimistic local update).
    pub fn apply_to(&self, project: &mut Project) {
        if let Some(name) = &self.name {
            project.name = name.clone();
        }
        if let Some(lead) = &self.lead_designer_id {
            project.lead_designer_id = Some(lead.clone());
        }
        if let Some(members) = &self.team_members {
            project.team_members = members.clone();
        }
        if let Some(client) = &self.client_id {
            project.client_id = Some(client.clone());
        }
        if let Some(clients) = &self.client_ids {
            project.client_ids = clients.clone();
        }
        if let Some(vendors) = &self.vendor_ids {
            project.vendor_ids = vendors.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_parses_store_document() {
        let json = r#"{
            "id": "p1",
            "name": "Harbor Loft",
            "leadDesignerId": "u1",
            "teamMembers": ["u2"],
            "clientIds": ["c1", "c2"],
            "tasks": [{"id": "t1", "projectId": "p1", "assigneeId": "v1"}]
        }"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert_eq!(project.lead_designer_id, Some(UserId::from("u1")));
        assert_eq!(project.client_id, None);
        assert_eq!(project.tasks.len(), 1);
        assert_eq!(project.tasks[0].assignee_id, Some(UserId::from("v1")));
    }

    #[test]
    fn patch_serializes_only_set_fields() {
        let patch = ProjectPatch {
            name: Some("Atrium Refit".into()),
            ..Default::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({"name": "Atrium Refit"}));
    }

    #[test]
    fn patch_never_touches_identity() {
        let mut project = Project::new("p1").with_lead("u1");
        let patch = ProjectPatch {
            team_members: Some(vec![UserId::from("u9")]),
            ..Default::default()
        };
        patch.apply_to(&mut project);
        assert_eq!(project.id, ProjectId::from("p1"));
        assert_eq!(project.team_members, vec![UserId::from("u9")]);
        assert_eq!(project.lead_designer_id, Some(UserId::from("u1")));
    }
}
