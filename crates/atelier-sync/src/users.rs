//! User feed merger.
//!
//! One global user feed plus one feed per partitioned role all land here.
//! Each feed is authoritative only for the ids its current snapshot
//! reports: an emission first evicts the merged entries sharing an id with
//! the new snapshot, then inserts the snapshot. Entries contributed by
//! other feeds under different ids are never clobbered, and the last
//! emission observed for a given id wins regardless of which feed carried
//! it.

use std::collections::{HashMap, HashSet};

use atelier_types::{User, UserId};

use crate::feed::UserScope;

/// Single-writer merged user set.
#[derive(Debug, Default)]
pub struct UserFeedMerger {
    merged: HashMap<UserId, User>,
    ticks: u64,
}

impl UserFeedMerger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one feed emission into the merged set.
    ///
    /// Publishes unconditionally: the caller re-evaluates dependents on
    /// every tick even when the net set is unchanged, and downstream
    /// consumers must tolerate the redundant notification.
    pub fn apply_snapshot(&mut self, origin: UserScope, snapshot: Vec<User>) {
        let new_ids: HashSet<UserId> = snapshot.iter().map(|u| u.id.clone()).collect();

        // This feed's authority replaces its own prior contribution; the
        // removal is scoped to the snapshot's own membership.
        self.merged.retain(|id, _| !new_ids.contains(id));
        for user in snapshot {
            self.merged.insert(user.id.clone(), user);
        }

        self.ticks += 1;
        tracing::debug!(
            feed = %origin,
            emitted = new_ids.len(),
            merged = self.merged.len(),
            "user feed tick"
        );
    }

    /// Record an upstream failure for one feed.
    ///
    /// The feed's last good contribution keeps serving — staleness over
    /// unavailability. Nothing is rolled back.
    pub fn record_feed_failure(&mut self, origin: UserScope, error: &str) {
        tracing::warn!(feed = %origin, error, "user feed failed, serving last snapshot");
    }

    /// The merged, deduplicated user set. IDs are unique; no ordering is
    /// semantically meaningful.
    pub fn users(&self) -> &HashMap<UserId, User> {
        &self.merged
    }

    pub fn get(&self, id: &UserId) -> Option<&User> {
        self.merged.get(id)
    }

    /// Number of emissions folded in so far, across all feeds.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
