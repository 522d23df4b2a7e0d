//! Error taxonomy for the synchronizer's outward-facing seams.
//!
//! The merge/filter/resolve core never errors for data-shape reasons —
//! absent fields mean "not yet resolvable", not invalid. Errors exist only
//! at the write-through boundary and in configuration loading.

use thiserror::Error;

/// Failure reported by the persistence write-through collaborator.
#[derive(Debug, Error)]
pub enum WritebackError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("unavailable: {0}")]
    Unavailable(String),

    #[error("rejected: {0}")]
    Rejected(String),

    #[error("internal: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Invalid console configuration (env parsing).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown role: {0}")]
    UnknownRole(String),

    #[error("invalid startup url: {0}")]
    InvalidStartupUrl(#[from] url::ParseError),
}
