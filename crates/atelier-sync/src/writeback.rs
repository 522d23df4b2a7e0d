//! Persistence write-through collaborators.
//!
//! On a project mutation the engine forwards a partial update to the store
//! and independently asks the finance service to recompute its derived
//! metrics. Both are fire-and-forget: failures come back into the event
//! loop, get logged, and surface as a non-blocking notice — the optimistic
//! local update is never rolled back.

use async_trait::async_trait;
use atelier_types::{ProjectId, ProjectPatch, TenantId};

use crate::error::WritebackError;

/// Storage-side collaborator for project mutations.
#[async_trait]
pub trait ProjectWriteback: Send + Sync {
    /// Persist a partial project update. The patch never carries identity.
    async fn update_project(
        &self,
        id: &ProjectId,
        patch: ProjectPatch,
    ) -> Result<(), WritebackError>;

    /// Recompute tenant-level derived financial metrics.
    async fn recompute_derived_metrics(&self, tenant: &TenantId) -> Result<(), WritebackError>;
}

/// No-op collaborator for demos and tests that don't exercise persistence.
#[derive(Debug, Default)]
pub struct NullWriteback;

#[async_trait]
impl ProjectWriteback for NullWriteback {
    async fn update_project(
        &self,
        id: &ProjectId,
        _patch: ProjectPatch,
    ) -> Result<(), WritebackError> {
        tracing::debug!(project = %id, "writeback no-op");
        Ok(())
    }

    async fn recompute_derived_metrics(&self, tenant: &TenantId) -> Result<(), WritebackError> {
        tracing::debug!(%tenant, "metrics resync no-op");
        Ok(())
    }
}
