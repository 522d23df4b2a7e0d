//! In-memory feed source for tests and the demo console.
//!
//! Snapshots are pushed by hand with the `emit_*` methods and delivered
//! synchronously to every live sink whose key matches. A new subscriber
//! immediately receives the last retained snapshot for its key, mirroring
//! the initial-snapshot behavior of the managed store.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use atelier_types::{Project, ProjectId, Task, TenantId, User};

use super::{CancelHandle, FeedSource, SnapshotSink, UserScope};

struct Registry<K, T> {
    sinks: HashMap<u64, (K, SnapshotSink<T>)>,
    last: HashMap<K, Vec<T>>,
    opens: HashMap<K, u32>,
    cancels: HashMap<K, u32>,
}

impl<K: Eq + Hash + Clone, T: Clone> Registry<K, T> {
    fn new() -> Self {
        Self {
            sinks: HashMap::new(),
            last: HashMap::new(),
            opens: HashMap::new(),
            cancels: HashMap::new(),
        }
    }

    fn subscribe(&mut self, id: u64, key: K, sink: SnapshotSink<T>) {
        *self.opens.entry(key.clone()).or_default() += 1;
        if let Some(snapshot) = self.last.get(&key) {
            sink(snapshot.clone());
        }
        self.sinks.insert(id, (key, sink));
    }

    fn unsubscribe(&mut self, id: u64) {
        if let Some((key, _)) = self.sinks.remove(&id) {
            *self.cancels.entry(key).or_default() += 1;
        }
    }

    fn emit(&mut self, key: &K, items: Vec<T>) {
        self.last.insert(key.clone(), items.clone());
        for (sink_key, sink) in self.sinks.values() {
            if sink_key == key {
                sink(items.clone());
            }
        }
    }
}

struct Inner {
    next_id: AtomicU64,
    users: Mutex<Registry<UserScope, User>>,
    projects: Mutex<Registry<TenantId, Project>>,
    tasks: Mutex<Registry<ProjectId, Task>>,
}

/// Hand-driven [`FeedSource`] implementation.
#[derive(Clone)]
pub struct MemoryFeedSource {
    inner: Arc<Inner>,
}

impl MemoryFeedSource {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                next_id: AtomicU64::new(0),
                users: Mutex::new(Registry::new()),
                projects: Mutex::new(Registry::new()),
                tasks: Mutex::new(Registry::new()),
            }),
        }
    }

    fn next_id(&self) -> u64 {
        self.inner.next_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Emit a full user snapshot on the feed identified by `scope`.
    pub fn emit_users(&self, scope: UserScope, users: Vec<User>) {
        self.inner.users.lock().unwrap().emit(&scope, users);
    }

    /// Emit a full project snapshot for a tenant.
    pub fn emit_projects(&self, tenant: &TenantId, projects: Vec<Project>) {
        self.inner.projects.lock().unwrap().emit(tenant, projects);
    }

    /// Emit a full task snapshot for one project.
    pub fn emit_tasks(&self, project: &ProjectId, tasks: Vec<Task>) {
        self.inner.tasks.lock().unwrap().emit(project, tasks);
    }

    /// Projects with a currently-live task subscription.
    pub fn live_task_projects(&self) -> Vec<ProjectId> {
        let registry = self.inner.tasks.lock().unwrap();
        let mut projects: Vec<ProjectId> =
            registry.sinks.values().map(|(key, _)| key.clone()).collect();
        projects.sort();
        projects
    }

    /// Cumulative number of task subscriptions opened for a project.
    pub fn task_opens(&self, project: &ProjectId) -> u32 {
        *self
            .inner
            .tasks
            .lock()
            .unwrap()
            .opens
            .get(project)
            .unwrap_or(&0)
    }

    /// Cumulative number of task subscriptions cancelled for a project.
    pub fn task_cancels(&self, project: &ProjectId) -> u32 {
        *self
            .inner
            .tasks
            .lock()
            .unwrap()
            .cancels
            .get(project)
            .unwrap_or(&0)
    }
}

impl Default for MemoryFeedSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedSource for MemoryFeedSource {
    fn subscribe_users(&self, scope: UserScope, sink: SnapshotSink<User>) -> CancelHandle {
        let id = self.next_id();
        self.inner.users.lock().unwrap().subscribe(id, scope, sink);
        let inner = Arc::clone(&self.inner);
        CancelHandle::new(move || inner.users.lock().unwrap().unsubscribe(id))
    }

    fn subscribe_projects(&self, tenant: &TenantId, sink: SnapshotSink<Project>) -> CancelHandle {
        let id = self.next_id();
        self.inner
            .projects
            .lock()
            .unwrap()
            .subscribe(id, tenant.clone(), sink);
        let inner = Arc::clone(&self.inner);
        CancelHandle::new(move || inner.projects.lock().unwrap().unsubscribe(id))
    }

    fn subscribe_tasks(&self, project: &ProjectId, sink: SnapshotSink<Task>) -> CancelHandle {
        let id = self.next_id();
        self.inner
            .tasks
            .lock()
            .unwrap()
            .subscribe(id, project.clone(), sink);
        let inner = Arc::clone(&self.inner);
        CancelHandle::new(move || inner.tasks.lock().unwrap().unsubscribe(id))
    }
}
