//! User records and roles.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ids::UserId;

/// Role attached to a user record.
///
/// `Unknown` absorbs any role string the store emits that this build does
/// not recognize; every visibility rule treats it as "sees nothing".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Designer,
    Client,
    Vendor,
    Unknown,
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Lenient on purpose: an unrecognized role string fails closed
        // instead of failing the whole snapshot.
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_str(&raw).unwrap_or(Self::Unknown))
    }
}

impl Role {
    /// Lenient parse — unknown strings map to `None`, not an error.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Self::Admin),
            "designer" => Some(Self::Designer),
            "client" => Some(Self::Client),
            "vendor" => Some(Self::Vendor),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Designer => "designer",
            Self::Client => "client",
            Self::Vendor => "vendor",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user record as emitted by the user feeds.
///
/// The same canonical record may arrive from the global feed and from a
/// role-partitioned feed; the merger keeps whichever emission was observed
/// last for a given id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub role: Role,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl User {
    pub fn new(id: impl Into<UserId>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
            display_name: String::new(),
            email: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_role_deserializes_fail_closed() {
        let user: User =
            serde_json::from_str(r#"{"id":"u1","role":"contractor"}"#).unwrap();
        assert_eq!(user.role, Role::Unknown);
    }

    #[test]
    fn role_round_trip() {
        for role in [Role::Admin, Role::Designer, Role::Client, Role::Vendor] {
            assert_eq!(Role::from_str(role.as_str()), Some(role));
        }
        assert_eq!(Role::from_str("superuser"), None);
    }
}
