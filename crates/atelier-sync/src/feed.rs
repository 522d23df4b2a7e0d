//! The push-feed seam.
//!
//! `FeedSource` is the sole boundary between the synchronizer and the
//! backing document store: a long-lived subscription per collection that
//! emits a full replacement snapshot whenever the collection changes
//! upstream, never a diff. The store side of that contract (query
//! execution, change detection) lives with the store; the synchronizer only
//! consumes.
//!
//! Every subscription is paired with a [`CancelHandle`]. Owners must cancel
//! before discarding a handle — dropping a live subscription without
//! cancelling leaks the upstream callback.

pub mod memory;

use std::sync::Mutex;

use atelier_types::{Project, ProjectId, Role, Task, TenantId, User};

/// Which slice of the user collection a user subscription covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserScope {
    /// The global feed carrying every user record.
    All,
    /// A role-partitioned feed.
    Role(Role),
}

impl std::fmt::Display for UserScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str("users"),
            Self::Role(role) => write!(f, "users[{role}]"),
        }
    }
}

/// Snapshot callback for a single subscription.
///
/// Invoked once per upstream emission with the full replacement snapshot.
/// Emissions for one subscription arrive in upstream order; no ordering
/// holds across distinct subscriptions.
pub type SnapshotSink<T> = Box<dyn Fn(Vec<T>) + Send + Sync>;

/// A long-lived push-based data source over the store's collections.
pub trait FeedSource: Send + Sync {
    /// Subscribe to a slice of the user collection.
    fn subscribe_users(&self, scope: UserScope, sink: SnapshotSink<User>) -> CancelHandle;

    /// Subscribe to the tenant's project collection.
    fn subscribe_projects(&self, tenant: &TenantId, sink: SnapshotSink<Project>) -> CancelHandle;

    /// Subscribe to the task collection of a single project.
    fn subscribe_tasks(&self, project: &ProjectId, sink: SnapshotSink<Task>) -> CancelHandle;
}

/// Cancel handle for one live subscription.
///
/// Cancellation is idempotent: the underlying teardown runs at most once no
/// matter how many times `cancel` is called, and calling it from any thread
/// is safe.
pub struct CancelHandle {
    inner: Mutex<Option<Box<dyn FnOnce() + Send>>>,
}

impl CancelHandle {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            inner: Mutex::new(Some(Box::new(cancel))),
        }
    }

    /// Tear down the subscription. Safe to call repeatedly.
    pub fn cancel(&self) {
        let teardown = self
            .inner
            .lock()
            .expect("cancel handle lock poisoned")
            .take();
        if let Some(teardown) = teardown {
            teardown();
        }
    }

    /// Whether `cancel` has already run.
    pub fn is_cancelled(&self) -> bool {
        self.inner
            .lock()
            .expect("cancel handle lock poisoned")
            .is_none()
    }
}

impl std::fmt::Debug for CancelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancelHandle")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
