//! Per-project task subscription fan-out.
//!
//! The project feed's emitted ID set drives a secondary task subscription
//! per project. Reconciliation is an explicit diff of old keys against new
//! keys on every emission of the driving set — never recursive or implicit
//! subscription creation, so an id can never double-fire.
//!
//! Invariant: at any instant the live subscription set is in 1:1
//! correspondence with the most recently observed project ID set. An id
//! removed and later re-added gets a fresh subscription, not a reused stale
//! one.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use atelier_types::{ProjectId, Task};
use tokio::sync::mpsc;

use crate::engine::EngineEvent;
use crate::feed::{CancelHandle, FeedSource};

/// Manages one live task subscription per currently-known project id.
pub struct TaskFanoutManager {
    source: Arc<dyn FeedSource>,
    events: mpsc::UnboundedSender<EngineEvent>,
    live: HashMap<ProjectId, CancelHandle>,
}

impl TaskFanoutManager {
    pub fn new(source: Arc<dyn FeedSource>, events: mpsc::UnboundedSender<EngineEvent>) -> Self {
        Self {
            source,
            events,
            live: HashMap::new(),
        }
    }

    /// Reconcile the live subscription set against the latest project ID
    /// set, pruning the shared task map for every subscription torn down so
    /// no ghost task list survives for a project out of view.
    pub fn reconcile(
        &mut self,
        current: &HashSet<ProjectId>,
        tasks_by_project: &mut HashMap<ProjectId, Vec<Task>>,
    ) {
        let stale: Vec<ProjectId> = self
            .live
            .keys()
            .filter(|id| !current.contains(*id))
            .cloned()
            .collect();
        for id in stale {
            if let Some(handle) = self.live.remove(&id) {
                handle.cancel();
            }
            tasks_by_project.remove(&id);
            tracing::info!(project = %id, "task subscription cancelled");
        }

        for id in current {
            if self.live.contains_key(id) {
                // Already subscribed and still present: re-subscribing is
                // forbidden.
                continue;
            }
            let handle = self.open(id);
            self.live.insert(id.clone(), handle);
            tracing::info!(project = %id, "task subscription opened");
        }
    }

    fn open(&self, id: &ProjectId) -> CancelHandle {
        let events = self.events.clone();
        let project = id.clone();
        self.source.subscribe_tasks(
            id,
            Box::new(move |tasks| {
                // The engine loop may already be gone during teardown; a
                // dropped snapshot is fine then.
                let _ = events.send(EngineEvent::TasksSnapshot {
                    project: project.clone(),
                    tasks,
                });
            }),
        )
    }

    /// Whether a project currently holds a live subscription.
    pub fn is_live(&self, id: &ProjectId) -> bool {
        self.live.contains_key(id)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Cancel every live subscription and drop the associated task lists.
    /// Guarantees zero leaked subscriptions afterwards.
    pub fn shutdown(&mut self, tasks_by_project: &mut HashMap<ProjectId, Vec<Task>>) {
        for (id, handle) in self.live.drain() {
            handle.cancel();
            tasks_by_project.remove(&id);
        }
        tracing::info!("task fan-out shut down");
    }
}

impl Drop for TaskFanoutManager {
    fn drop(&mut self) {
        // Teardown must cancel before discard; shutdown() already drained
        // the map in the orderly path.
        for handle in self.live.values() {
            handle.cancel();
        }
    }
}
