//! Shared domain types for the atelier operations console.
//!
//! This crate is the single source of truth for the value types crossing
//! component boundaries: the document-store records (projects, tasks, users)
//! and the navigation payloads (deep-link targets, notification payloads).
//!
//! ## Rules
//!
//! 1. Pure value types only — no I/O, no store dependencies.
//! 2. Wire-facing structs carry explicit serde renames matching the backing
//!    document store's camelCase field names.
//! 3. Lenient enum parsing: unknown strings map to `None` / fail-closed
//!    variants rather than deserialization errors.

// `Role::from_str` and `ProjectTab::from_str` return Option for unknown
// values instead of an error, so they deliberately shadow `FromStr`.
#![allow(clippy::should_implement_trait)]

pub mod ids;
pub mod nav;
pub mod project;
pub mod user;

pub use ids::{MeetingId, ProjectId, TaskId, TenantId, UserId};
pub use nav::{
    ConsoleView, DeepLinkTarget, Notice, NoticeSeverity, NotificationPayload, ProjectTab,
};
pub use project::{Project, ProjectPatch, Task};
pub use user::{Role, User};
