//! Newtype identifiers for document-store records.
//!
//! The backing store keys every record with an opaque string, so each id is
//! a transparent String newtype. Construction from `&str` is cheap and
//! infallible; an id carries no format guarantees beyond non-emptiness at
//! the point the store emitted it.

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id!(
    /// Identity of a project record.
    ProjectId
);
string_id!(
    /// Identity of a task record.
    TaskId
);
string_id!(
    /// Identity of a user record.
    UserId
);
string_id!(
    /// Identity of a meeting record.
    MeetingId
);
string_id!(
    /// Identity of the tenant (studio) owning the document collections.
    TenantId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transparent_serde() {
        let id = ProjectId::new("p1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"p1\"");
        let back: ProjectId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn display_is_raw() {
        assert_eq!(UserId::from("u1").to_string(), "u1");
    }
}
