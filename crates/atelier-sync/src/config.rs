//! Console configuration from the environment.

use atelier_types::{Role, TenantId, UserId};
use url::Url;

use crate::error::ConfigError;

/// Runtime configuration for a console session.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Tenant (studio) whose collections the feeds cover.
    pub tenant: TenantId,
    /// Signed-in identity the visibility filter scopes to.
    pub identity: UserId,
    /// Role of the signed-in identity.
    pub role: Role,
    /// Location the console was opened with, if any; parsed once for a
    /// startup deep link.
    pub startup_url: Option<Url>,
}

impl ConsoleConfig {
    /// Load from `ATELIER_TENANT`, `ATELIER_IDENTITY`, `ATELIER_ROLE`, and
    /// `ATELIER_STARTUP_URL`, with demo-friendly defaults for the first
    /// three.
    pub fn from_env() -> Result<Self, ConfigError> {
        let tenant = std::env::var("ATELIER_TENANT").unwrap_or_else(|_| "studio-demo".into());
        let identity = std::env::var("ATELIER_IDENTITY").unwrap_or_else(|_| "u-admin".into());
        let role_raw = std::env::var("ATELIER_ROLE").unwrap_or_else(|_| "admin".into());
        let role = Role::from_str(&role_raw).ok_or(ConfigError::UnknownRole(role_raw))?;

        let startup_url = match std::env::var("ATELIER_STARTUP_URL") {
            Ok(raw) if !raw.is_empty() => Some(Url::parse(&raw)?),
            _ => None,
        };

        Ok(Self {
            tenant: tenant.into(),
            identity: identity.into(),
            role,
            startup_url,
        })
    }
}
