//! Demo console driver.
//!
//! Stages a scripted sequence of feed emissions through the in-memory feed
//! source and lets the synchronizer chew through them, logging every
//! navigation effect as it lands. The backing store, auth, and rendering
//! are all external collaborators; this binary only exercises the core.

use std::sync::Arc;

use anyhow::Result;
use atelier_sync::{
    notification_from_json, ConsoleConfig, LoggingEffects, MemoryFeedSource, NullWriteback,
    SyncEngine, UserScope, DEFAULT_ROLE_PARTITIONS,
};
use atelier_types::{Project, ProjectId, ProjectPatch, Role, Task, User};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = ConsoleConfig::from_env()?;
    tracing::info!(tenant = %config.tenant, identity = %config.identity, role = %config.role, "console starting");

    let source = MemoryFeedSource::new();
    let mut engine = SyncEngine::new(
        Arc::new(source.clone()),
        Arc::new(NullWriteback),
        config.tenant.clone(),
        LoggingEffects,
    );
    if let Some(url) = &config.startup_url {
        engine.dispatch_startup(url);
    }
    engine.attach_feeds(&DEFAULT_ROLE_PARTITIONS);
    let handle = engine.handle();

    stage_demo_feeds(&source, &config);

    // A runtime notification deep-links into a task that is resolvable by
    // the time the loop reaches it.
    if let Some(payload) =
        notification_from_json(r#"{"projectId":"p-harbor","taskId":"t-sofa"}"#)
    {
        handle.notify(payload);
    }

    // Optimistic rename with write-through.
    handle.mutate_project(
        ProjectId::from("p-harbor"),
        ProjectPatch {
            name: Some("Harbor Loft — phase 2".into()),
            ..Default::default()
        },
    );

    handle.shutdown();
    let engine = engine.run().await;

    let visible = engine.state().visible_for(config.role, &config.identity);
    tracing::info!(
        users = engine.state().users().len(),
        projects = engine.state().projects().len(),
        visible = visible.len(),
        "final merged view"
    );
    for project in visible {
        tracing::info!(project = %project.id, name = %project.name, "visible project");
    }

    Ok(())
}

fn stage_demo_feeds(source: &MemoryFeedSource, config: &ConsoleConfig) {
    let mut lead = User::new("u-lead", Role::Designer);
    lead.display_name = "Mara".into();
    let mut vendor = User::new("u-upholstery", Role::Vendor);
    vendor.display_name = "Form & Fabric".into();
    let mut admin = User::new(config.identity.as_str(), Role::Admin);
    admin.display_name = "Studio admin".into();

    source.emit_users(UserScope::All, vec![admin, lead.clone()]);
    source.emit_users(UserScope::Role(Role::Designer), vec![lead]);
    source.emit_users(UserScope::Role(Role::Vendor), vec![vendor]);

    let tasks = vec![
        Task::new("t-sofa", "p-harbor").with_assignee("u-upholstery"),
        Task::new("t-lighting", "p-harbor"),
    ];
    let mut harbor = Project::new("p-harbor").with_lead("u-lead");
    harbor.name = "Harbor Loft".into();
    // Embedded fallback snapshot, as the store writes it alongside the
    // project document.
    harbor.tasks = tasks.clone();
    let mut atrium = Project::new("p-atrium");
    atrium.name = "Atrium Refit".into();
    source.emit_projects(&config.tenant, vec![harbor, atrium]);

    source.emit_tasks(&ProjectId::from("p-harbor"), tasks);
}
