//! atelier-sync — reactive state synchronizer for the atelier console.
//!
//! Merges several independently-arriving push feeds (users, projects,
//! per-project tasks) into one consistent in-memory view, keeps a secondary
//! task subscription alive per visible project, defers externally supplied
//! navigation targets until their referents appear, and computes
//! role-scoped visibility over the merged view.
//!
//! ## Architecture
//!
//! ```text
//! FeedSource ──► SyncEngine (single-writer event loop)
//!                  ├── UserFeedMerger      merged user set
//!                  ├── TaskFanoutManager   one task feed per project id
//!                  ├── DeepLinkResolver    at-most-once navigation targets
//!                  └── SyncState ──► visible_projects (pure projection)
//! ```
//!
//! All mutation is serialized through one unbounded channel; feeds and
//! collaborators only ever hand events to the loop. See [`engine`].

pub mod config;
pub mod deeplink;
pub mod effects;
pub mod engine;
pub mod error;
pub mod fanout;
pub mod feed;
pub mod navigation;
pub mod store;
pub mod users;
pub mod visibility;
pub mod writeback;

pub use config::ConsoleConfig;
pub use deeplink::DeepLinkResolver;
pub use effects::{LoggingEffects, NavigationEffects, RecordingEffects};
pub use engine::{
    EngineEvent, EngineHandle, FeedKind, SyncEngine, DEFAULT_ROLE_PARTITIONS,
};
pub use error::{ConfigError, WritebackError};
pub use fanout::TaskFanoutManager;
pub use feed::{memory::MemoryFeedSource, CancelHandle, FeedSource, SnapshotSink, UserScope};
pub use navigation::{
    notification_from_json, parse_startup_url, target_from_notification, StartupNav,
    ADMIN_VIEW_MARKER,
};
pub use store::SyncState;
pub use users::UserFeedMerger;
pub use visibility::visible_projects;
pub use writeback::{NullWriteback, ProjectWriteback};
