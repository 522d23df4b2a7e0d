//! Single-writer synchronization engine.
//!
//! All feed emissions, notifications, mutations, and failure reports enter
//! through one unbounded channel and are applied by one task, one event at
//! a time. That serialization is the whole concurrency story: no locks, no
//! partial mutation across suspension points, and every handler re-derives
//! dependent state idempotently so any interleaving across distinct feeds
//! is safe.

use std::sync::Arc;

use atelier_types::{
    Notice, NotificationPayload, Project, ProjectId, ProjectPatch, Role, Task, TenantId, User,
};
use tokio::sync::mpsc;
use url::Url;

use crate::deeplink::DeepLinkResolver;
use crate::effects::NavigationEffects;
use crate::fanout::TaskFanoutManager;
use crate::feed::{CancelHandle, FeedSource, UserScope};
use crate::navigation::{parse_startup_url, target_from_notification, StartupNav};
use crate::store::SyncState;
use crate::writeback::ProjectWriteback;

/// Role partitions the user merger subscribes to alongside the global feed.
pub const DEFAULT_ROLE_PARTITIONS: [Role; 3] = [Role::Designer, Role::Vendor, Role::Client];

/// Which upstream subscription an event or failure belongs to.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedKind {
    Users(UserScope),
    Projects,
    Tasks(ProjectId),
}

impl std::fmt::Display for FeedKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Users(scope) => write!(f, "{scope}"),
            Self::Projects => f.write_str("projects"),
            Self::Tasks(project) => write!(f, "tasks[{project}]"),
        }
    }
}

/// Everything the engine reacts to.
#[derive(Debug)]
pub enum EngineEvent {
    /// Full replacement snapshot from one user feed.
    UsersSnapshot { scope: UserScope, users: Vec<User> },
    /// Full replacement snapshot from the project feed.
    ProjectsSnapshot { projects: Vec<Project> },
    /// Full replacement snapshot from one per-project task feed.
    TasksSnapshot {
        project: ProjectId,
        tasks: Vec<Task>,
    },
    /// Upstream subscription failure; last good snapshot keeps serving.
    FeedFailed { feed: FeedKind, error: String },
    /// Runtime push notification.
    Notification(NotificationPayload),
    /// Local project mutation to apply optimistically and write through.
    MutateProject { id: ProjectId, patch: ProjectPatch },
    /// A spawned write-through call reported failure.
    WritebackFailed {
        operation: &'static str,
        error: String,
    },
    /// Stop the loop and tear down every subscription.
    Shutdown,
}

/// Cheap clonable producer handle into the engine's event loop.
#[derive(Clone)]
pub struct EngineHandle {
    tx: mpsc::UnboundedSender<EngineEvent>,
}

impl EngineHandle {
    pub fn send(&self, event: EngineEvent) {
        // A closed loop means shutdown already happened; late events are
        // dropped by design.
        let _ = self.tx.send(event);
    }

    pub fn notify(&self, payload: NotificationPayload) {
        self.send(EngineEvent::Notification(payload));
    }

    pub fn mutate_project(&self, id: ProjectId, patch: ProjectPatch) {
        self.send(EngineEvent::MutateProject { id, patch });
    }

    pub fn shutdown(&self) {
        self.send(EngineEvent::Shutdown);
    }
}

/// The reactive state synchronizer.
///
/// Owns the merged view, the task fan-out, the deep-link resolver, and the
/// navigation-effects collaborator. Construct it, dispatch the startup URL,
/// attach the primary feeds, then `run` it on the event loop.
pub struct SyncEngine<E: NavigationEffects> {
    state: SyncState,
    fanout: TaskFanoutManager,
    resolver: DeepLinkResolver,
    effects: E,
    source: Arc<dyn FeedSource>,
    writeback: Arc<dyn ProjectWriteback>,
    tenant: TenantId,
    tx: mpsc::UnboundedSender<EngineEvent>,
    rx: mpsc::UnboundedReceiver<EngineEvent>,
    primary_feeds: Vec<CancelHandle>,
}

impl<E: NavigationEffects> SyncEngine<E> {
    pub fn new(
        source: Arc<dyn FeedSource>,
        writeback: Arc<dyn ProjectWriteback>,
        tenant: TenantId,
        effects: E,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let fanout = TaskFanoutManager::new(Arc::clone(&source), tx.clone());
        Self {
            state: SyncState::new(),
            fanout,
            resolver: DeepLinkResolver::new(),
            effects,
            source,
            writeback,
            tenant,
            tx,
            rx,
            primary_feeds: Vec::new(),
        }
    }

    pub fn handle(&self) -> EngineHandle {
        EngineHandle {
            tx: self.tx.clone(),
        }
    }

    /// Process the startup URL once, before any feed emission.
    ///
    /// The admin-view marker switches views immediately; anything else that
    /// parses becomes the resolver's pending target.
    pub fn dispatch_startup(&mut self, startup_url: &Url) {
        match parse_startup_url(startup_url) {
            Some(StartupNav::DirectView(view)) => {
                tracing::info!(?view, "startup requested direct view switch");
                self.effects.set_current_view(view);
            }
            Some(StartupNav::DeepLink(target)) => self.resolver.submit(target),
            None => {}
        }
    }

    /// Open the primary subscriptions: the global user feed, one feed per
    /// role partition, and the tenant's project feed.
    pub fn attach_feeds(&mut self, roles: &[Role]) {
        let mut scopes = vec![UserScope::All];
        scopes.extend(roles.iter().map(|r| UserScope::Role(*r)));
        for scope in scopes {
            let tx = self.tx.clone();
            let handle = self.source.subscribe_users(
                scope,
                Box::new(move |users| {
                    let _ = tx.send(EngineEvent::UsersSnapshot { scope, users });
                }),
            );
            self.primary_feeds.push(handle);
        }

        let tx = self.tx.clone();
        let handle = self.source.subscribe_projects(
            &self.tenant,
            Box::new(move |projects| {
                let _ = tx.send(EngineEvent::ProjectsSnapshot { projects });
            }),
        );
        self.primary_feeds.push(handle);
    }

    /// Drain the event loop until shutdown, then tear down every
    /// subscription. Returns the engine so callers can inspect the final
    /// merged view.
    pub async fn run(mut self) -> Self {
        while let Some(event) = self.rx.recv().await {
            if matches!(event, EngineEvent::Shutdown) {
                break;
            }
            self.handle_event(event);
        }
        self.teardown();
        self
    }

    /// Apply one event synchronously. All state mutation happens here, on
    /// the loop task; handlers never yield mid-mutation.
    pub fn handle_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::UsersSnapshot { scope, users } => {
                self.state.users_mut().apply_snapshot(scope, users);
            }
            EngineEvent::ProjectsSnapshot { projects } => {
                tracing::debug!(count = projects.len(), "project feed tick");
                let ids = self.state.replace_projects(projects);
                self.fanout
                    .reconcile(&ids, self.state.tasks_by_project_mut());
            }
            EngineEvent::TasksSnapshot { project, tasks } => {
                if self.fanout.is_live(&project) {
                    self.state.tasks_by_project_mut().insert(project, tasks);
                } else {
                    // In-flight snapshot from a subscription cancelled this
                    // tick; accepting it would resurrect a pruned entry.
                    tracing::debug!(%project, "dropping task snapshot for unsubscribed project");
                }
            }
            EngineEvent::FeedFailed { feed, error } => match feed {
                FeedKind::Users(scope) => {
                    self.state.users_mut().record_feed_failure(scope, &error);
                }
                other => {
                    tracing::warn!(feed = %other, error, "feed failed, serving last snapshot");
                }
            },
            EngineEvent::Notification(payload) => match target_from_notification(&payload) {
                Some(target) => self.resolver.submit(target),
                None => tracing::debug!("notification payload carried no navigable target"),
            },
            EngineEvent::MutateProject { id, patch } => {
                self.mutate_project(id, patch);
            }
            EngineEvent::WritebackFailed { operation, error } => {
                tracing::warn!(operation, error, "write-through failed");
                self.effects
                    .show_notice(Notice::warning(format!("{operation} failed: {error}")));
            }
            // run() intercepts shutdown before dispatching here.
            EngineEvent::Shutdown => return,
        }

        // Re-evaluate the pending deep link after every mutation. The
        // resolver tolerates redundant wake-ups; only a view that actually
        // contains its project makes it fire.
        self.resolver.try_resolve(&self.state, &mut self.effects);
    }

    fn mutate_project(&mut self, id: ProjectId, patch: ProjectPatch) {
        // Optimistic local update; the next project-feed emission replaces
        // it with the store's authoritative copy either way.
        if let Some(project) = self.state.project_mut(&id) {
            patch.apply_to(project);
        }

        let writeback = Arc::clone(&self.writeback);
        let tx = self.tx.clone();
        let project = id.clone();
        let update = patch;
        tokio::spawn(async move {
            if let Err(error) = writeback.update_project(&project, update).await {
                let _ = tx.send(EngineEvent::WritebackFailed {
                    operation: "project update",
                    error: error.to_string(),
                });
            }
        });

        let writeback = Arc::clone(&self.writeback);
        let tx = self.tx.clone();
        let tenant = self.tenant.clone();
        tokio::spawn(async move {
            if let Err(error) = writeback.recompute_derived_metrics(&tenant).await {
                let _ = tx.send(EngineEvent::WritebackFailed {
                    operation: "metrics resync",
                    error: error.to_string(),
                });
            }
        });
    }

    fn teardown(&mut self) {
        self.fanout.shutdown(self.state.tasks_by_project_mut());
        for handle in self.primary_feeds.drain(..) {
            handle.cancel();
        }
        tracing::info!("sync engine torn down");
    }

    pub fn state(&self) -> &SyncState {
        &self.state
    }

    pub fn effects(&self) -> &E {
        &self.effects
    }

    /// Whether a deep-link target is still waiting for its referents.
    pub fn has_pending_deep_link(&self) -> bool {
        self.resolver.is_pending()
    }
}

#[cfg(test)]
mod tests {
    use atelier_types::{DeepLinkTarget, Role, User};

    use super::*;
    use crate::effects::RecordingEffects;
    use crate::error::WritebackError;
    use crate::feed::memory::MemoryFeedSource;
    use crate::writeback::NullWriteback;

    fn engine_with(source: &MemoryFeedSource) -> SyncEngine<RecordingEffects> {
        SyncEngine::new(
            Arc::new(source.clone()),
            Arc::new(NullWriteback),
            TenantId::from("studio"),
            RecordingEffects::default(),
        )
    }

    #[test]
    fn project_snapshot_drives_fanout() {
        let source = MemoryFeedSource::new();
        let mut engine = engine_with(&source);

        engine.handle_event(EngineEvent::ProjectsSnapshot {
            projects: vec![Project::new("p1"), Project::new("p2")],
        });
        assert_eq!(source.live_task_projects(), vec!["p1".into(), "p2".into()]);

        engine.handle_event(EngineEvent::ProjectsSnapshot {
            projects: vec![Project::new("p2"), Project::new("p3")],
        });
        assert_eq!(source.live_task_projects(), vec!["p2".into(), "p3".into()]);
        assert_eq!(source.task_opens(&"p2".into()), 1);
    }

    #[test]
    fn stale_task_snapshot_is_dropped() {
        let source = MemoryFeedSource::new();
        let mut engine = engine_with(&source);

        engine.handle_event(EngineEvent::ProjectsSnapshot {
            projects: vec![Project::new("p1")],
        });
        engine.handle_event(EngineEvent::ProjectsSnapshot { projects: vec![] });

        // This snapshot was already queued when p1's subscription died.
        engine.handle_event(EngineEvent::TasksSnapshot {
            project: "p1".into(),
            tasks: vec![Task::new("t1", "p1")],
        });
        assert!(engine.state().tasks_by_project().is_empty());
    }

    #[test]
    fn notification_resolves_once_data_is_present() {
        let source = MemoryFeedSource::new();
        let mut engine = engine_with(&source);

        engine.handle_event(EngineEvent::ProjectsSnapshot {
            projects: vec![Project::new("p1")],
        });
        engine.handle_event(EngineEvent::Notification(NotificationPayload {
            project_id: Some("p1".into()),
            ..Default::default()
        }));

        assert_eq!(engine.effects().active_project, Some("p1".into()));
        assert!(!engine.has_pending_deep_link());
    }

    #[test]
    fn deferred_target_survives_unrelated_ticks() {
        let source = MemoryFeedSource::new();
        let mut engine = engine_with(&source);
        engine.resolver.submit(DeepLinkTarget::project("p7"));

        engine.handle_event(EngineEvent::UsersSnapshot {
            scope: UserScope::All,
            users: vec![User::new("u1", Role::Admin)],
        });
        assert!(engine.has_pending_deep_link());

        engine.handle_event(EngineEvent::ProjectsSnapshot {
            projects: vec![Project::new("p7")],
        });
        assert!(!engine.has_pending_deep_link());
        assert_eq!(engine.effects().active_project, Some("p7".into()));
    }

    #[test]
    fn user_feed_failure_keeps_last_snapshot() {
        let source = MemoryFeedSource::new();
        let mut engine = engine_with(&source);

        engine.handle_event(EngineEvent::UsersSnapshot {
            scope: UserScope::Role(Role::Vendor),
            users: vec![User::new("v1", Role::Vendor)],
        });
        engine.handle_event(EngineEvent::FeedFailed {
            feed: FeedKind::Users(UserScope::Role(Role::Vendor)),
            error: "permission denied".into(),
        });

        assert_eq!(engine.state().users().len(), 1);
    }

    struct FailingWriteback;

    #[async_trait::async_trait]
    impl ProjectWriteback for FailingWriteback {
        async fn update_project(
            &self,
            _id: &ProjectId,
            _patch: ProjectPatch,
        ) -> Result<(), WritebackError> {
            Err(WritebackError::Unavailable("store offline".into()))
        }

        async fn recompute_derived_metrics(
            &self,
            _tenant: &TenantId,
        ) -> Result<(), WritebackError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn writeback_failure_surfaces_notice_without_rollback() {
        let source = MemoryFeedSource::new();
        let mut engine = SyncEngine::new(
            Arc::new(source.clone()),
            Arc::new(FailingWriteback),
            TenantId::from("studio"),
            RecordingEffects::default(),
        );

        engine.handle_event(EngineEvent::ProjectsSnapshot {
            projects: vec![Project::new("p1")],
        });
        engine.handle_event(EngineEvent::MutateProject {
            id: "p1".into(),
            patch: ProjectPatch {
                name: Some("Harbor Loft".into()),
                ..Default::default()
            },
        });

        // Optimistic update stands immediately.
        assert_eq!(engine.state().project(&"p1".into()).unwrap().name, "Harbor Loft");

        // The spawned write-through reports back through the loop channel.
        let report = engine.rx.recv().await.expect("failure report");
        assert!(matches!(&report, EngineEvent::WritebackFailed { .. }));
        engine.handle_event(report);

        let notices = &engine.effects().notices;
        assert_eq!(notices.len(), 1);
        assert!(notices[0].message.contains("project update"));
        // Still not rolled back after the failure report.
        assert_eq!(engine.state().project(&"p1".into()).unwrap().name, "Harbor Loft");
    }
}
