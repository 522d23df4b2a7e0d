//! End-to-end scenarios through the real event loop.
//!
//! Most tests stage feed emissions on a `MemoryFeedSource`, let the engine
//! drain them in order, and inspect the merged view plus the recorded
//! navigation effects afterwards. Scenarios that depend on the live task
//! map drive the loop's handler directly, because a task subscription only
//! opens once its project snapshot has been processed — its first emission
//! would otherwise queue behind a pre-staged shutdown.

use std::sync::Arc;

use atelier_sync::{
    EngineEvent, FeedKind, MemoryFeedSource, NullWriteback, RecordingEffects, SyncEngine,
    UserScope, DEFAULT_ROLE_PARTITIONS,
};
use atelier_types::{
    ConsoleView, NotificationPayload, Project, ProjectId, Role, Task, TenantId, User, UserId,
};
use url::Url;

fn tenant() -> TenantId {
    TenantId::from("studio")
}

fn new_engine(source: &MemoryFeedSource) -> SyncEngine<RecordingEffects> {
    let mut engine = SyncEngine::new(
        Arc::new(source.clone()),
        Arc::new(NullWriteback),
        tenant(),
        RecordingEffects::default(),
    );
    engine.attach_feeds(&DEFAULT_ROLE_PARTITIONS);
    engine
}

#[tokio::test]
async fn startup_deep_link_defers_until_project_arrives() {
    let source = MemoryFeedSource::new();
    let mut engine = new_engine(&source);
    let handle = engine.handle();

    let url = Url::parse("https://console.example/app?projectId=p1&taskId=t9").unwrap();
    engine.dispatch_startup(&url);
    assert!(engine.has_pending_deep_link());

    // p1 arrives later, with no matching task anywhere.
    source.emit_projects(&tenant(), vec![Project::new("p1")]);
    handle.shutdown();
    let engine = engine.run().await;

    let effects = engine.effects();
    assert_eq!(effects.current_view, Some(ConsoleView::Projects));
    assert_eq!(effects.active_project, Some("p1".into()));
    assert!(effects.active_task.is_none(), "task lookup is single-shot");
    assert_eq!(effects.location_cleared, 1);
    assert!(!engine.has_pending_deep_link());
}

#[tokio::test]
async fn admin_marker_switches_view_before_any_emission() {
    let source = MemoryFeedSource::new();
    let mut engine = new_engine(&source);

    let url = Url::parse("https://console.example/app?open=admin").unwrap();
    engine.dispatch_startup(&url);

    assert_eq!(engine.effects().current_view, Some(ConsoleView::Admin));
    assert!(!engine.has_pending_deep_link());
}

#[tokio::test]
async fn fanout_follows_project_set_across_emissions() {
    let source = MemoryFeedSource::new();
    let engine = new_engine(&source);
    let handle = engine.handle();

    source.emit_projects(&tenant(), vec![Project::new("p1"), Project::new("p2")]);
    source.emit_projects(&tenant(), vec![Project::new("p2"), Project::new("p3")]);
    handle.shutdown();
    let engine = engine.run().await;

    // p1 cancelled exactly once, p3 opened exactly once, p2 untouched
    // until the final teardown cancelled everything.
    assert_eq!(source.task_opens(&ProjectId::from("p1")), 1);
    assert_eq!(source.task_cancels(&ProjectId::from("p1")), 1);
    assert_eq!(source.task_opens(&ProjectId::from("p3")), 1);
    assert_eq!(source.task_opens(&ProjectId::from("p2")), 1);
    assert!(source.live_task_projects().is_empty(), "shutdown leaks nothing");
    assert!(engine.state().tasks_by_project().is_empty());
}

#[test]
fn merged_users_and_vendor_visibility() {
    // Drives the loop's handler directly: the visibility projection reads
    // the live task map, which the teardown would prune before a post-run
    // assertion could see it.
    let source = MemoryFeedSource::new();
    let mut engine = new_engine(&source);

    // The same user arrives on two feeds; the later emission wins.
    let mut stale = User::new("v1", Role::Vendor);
    stale.display_name = "stale".into();
    let mut fresh = User::new("v1", Role::Vendor);
    fresh.display_name = "fresh".into();
    engine.handle_event(EngineEvent::UsersSnapshot {
        scope: UserScope::All,
        users: vec![stale, User::new("d1", Role::Designer)],
    });
    engine.handle_event(EngineEvent::UsersSnapshot {
        scope: UserScope::Role(Role::Vendor),
        users: vec![fresh],
    });

    // v1 is assigned a task in p1 but is in neither vendorIds nor
    // teamMembers; assignment alone must grant visibility.
    engine.handle_event(EngineEvent::ProjectsSnapshot {
        projects: vec![Project::new("p1"), Project::new("p2")],
    });
    engine.handle_event(EngineEvent::TasksSnapshot {
        project: "p1".into(),
        tasks: vec![Task::new("t1", "p1").with_assignee("v1")],
    });

    assert_eq!(engine.state().users().len(), 2);
    assert_eq!(
        engine.state().users()[&UserId::from("v1")].display_name,
        "fresh"
    );

    let visible = engine.state().visible_for(Role::Vendor, &UserId::from("v1"));
    let ids: Vec<&ProjectId> = visible.iter().map(|p| &p.id).collect();
    assert_eq!(ids, vec![&ProjectId::from("p1")]);
}

#[tokio::test]
async fn notification_target_resolves_through_live_task_map() {
    let source = MemoryFeedSource::new();
    let mut engine = new_engine(&source);
    let handle = engine.handle();

    // Apply the project snapshot first so the task subscription is live
    // before the task emission and notification are queued.
    engine.handle_event(EngineEvent::ProjectsSnapshot {
        projects: vec![Project::new("p1")],
    });
    source.emit_tasks(&ProjectId::from("p1"), vec![Task::new("t1", "p1")]);
    handle.notify(NotificationPayload {
        project_id: Some("p1".into()),
        task_id: Some("t1".into()),
        ..Default::default()
    });

    handle.shutdown();
    let engine = engine.run().await;

    let effects = engine.effects();
    assert_eq!(effects.active_project, Some("p1".into()));
    assert_eq!(effects.active_task, Some("t1".into()));
    assert!(effects.task_focused);
}

#[tokio::test]
async fn feed_failure_keeps_serving_last_snapshot() {
    let source = MemoryFeedSource::new();
    let engine = new_engine(&source);
    let handle = engine.handle();

    source.emit_users(UserScope::All, vec![User::new("u1", Role::Designer)]);
    handle.send(EngineEvent::FeedFailed {
        feed: FeedKind::Users(UserScope::All),
        error: "listener detached".into(),
    });

    handle.shutdown();
    let engine = engine.run().await;
    assert_eq!(engine.state().users().len(), 1);
}

#[tokio::test]
async fn redundant_project_emissions_are_tolerated() {
    let source = MemoryFeedSource::new();
    let engine = new_engine(&source);
    let handle = engine.handle();

    let snapshot = vec![Project::new("p1")];
    source.emit_projects(&tenant(), snapshot.clone());
    source.emit_projects(&tenant(), snapshot.clone());
    source.emit_projects(&tenant(), snapshot);

    handle.shutdown();
    let engine = engine.run().await;

    // Identical re-emissions never cancel-and-resubscribe.
    assert_eq!(source.task_opens(&ProjectId::from("p1")), 1);
    assert_eq!(source.task_cancels(&ProjectId::from("p1")), 1); // teardown only
    assert_eq!(engine.state().projects().len(), 1);
}
