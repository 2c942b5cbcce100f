//! Gateway configuration loaded from environment variables.
//!
//! All variables live under the `ADX_` prefix and are required with no
//! defaults:
//!
//! - `ADX_CLUSTER_NAME` — cluster name; the endpoint becomes
//!   `https://{name}.kusto.windows.net`
//! - `ADX_CLIENT_ID` — AAD application (client) id
//! - `ADX_CLIENT_SECRET` — AAD application secret
//! - `ADX_TENANT_ID` — AAD tenant id

use std::env;
use std::fmt;

use crate::error::ConfigError;

pub const ENV_CLUSTER_NAME: &str = "ADX_CLUSTER_NAME";
pub const ENV_CLIENT_ID: &str = "ADX_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "ADX_CLIENT_SECRET";
pub const ENV_TENANT_ID: &str = "ADX_TENANT_ID";

/// Fixed mask rendered in place of a present secret.
pub const SECRET_MASK: &str = "********";

/// Rendering for values absent from the environment.
pub const NOT_SET: &str = "Not set";

/// The four configuration fields, as exposed through the config resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    ClusterName,
    ClientId,
    ClientSecret,
    TenantId,
}

impl ConfigField {
    pub const ALL: [ConfigField; 4] = [
        ConfigField::ClusterName,
        ConfigField::ClientId,
        ConfigField::ClientSecret,
        ConfigField::TenantId,
    ];

    /// Path-segment form used in `config://` addresses.
    pub fn as_str(self) -> &'static str {
        match self {
            ConfigField::ClusterName => "cluster-name",
            ConfigField::ClientId => "client-id",
            ConfigField::ClientSecret => "client-secret",
            ConfigField::TenantId => "tenant-id",
        }
    }

    /// Human-readable label shown alongside the value.
    pub fn label(self) -> &'static str {
        match self {
            ConfigField::ClusterName => "Cluster Name",
            ConfigField::ClientId => "Client ID",
            ConfigField::ClientSecret => "Client Secret",
            ConfigField::TenantId => "Tenant ID",
        }
    }

    /// Environment variable backing this field.
    pub fn env_var(self) -> &'static str {
        match self {
            ConfigField::ClusterName => ENV_CLUSTER_NAME,
            ConfigField::ClientId => ENV_CLIENT_ID,
            ConfigField::ClientSecret => ENV_CLIENT_SECRET,
            ConfigField::TenantId => ENV_TENANT_ID,
        }
    }

    pub fn parse(segment: &str) -> Option<ConfigField> {
        ConfigField::ALL.into_iter().find(|f| f.as_str() == segment)
    }
}

/// Validated connection configuration for the remote cluster.
///
/// Constructed once at startup from [`GatewayConfig::from_env`]. The `Debug`
/// rendering masks the secret.
#[derive(Clone)]
pub struct GatewayConfig {
    pub cluster_name: String,
    pub client_id: String,
    pub client_secret: String,
    pub tenant_id: String,
}

impl GatewayConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] naming every variable that is absent
    /// or empty, so a single log line reports the full fix.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut read = |name: &'static str| match lookup(name) {
            Some(value) if !value.trim().is_empty() => value,
            _ => {
                missing.push(name.to_string());
                String::new()
            }
        };

        let cluster_name = read(ENV_CLUSTER_NAME);
        let client_id = read(ENV_CLIENT_ID);
        let client_secret = read(ENV_CLIENT_SECRET);
        let tenant_id = read(ENV_TENANT_ID);

        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        Ok(Self {
            cluster_name,
            client_id,
            client_secret,
            tenant_id,
        })
    }

    /// Cluster endpoint used for queries and as the token scope base.
    pub fn cluster_url(&self) -> String {
        format!("https://{}.kusto.windows.net", self.cluster_name)
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("cluster_name", &self.cluster_name)
            .field("client_id", &self.client_id)
            .field("client_secret", &SECRET_MASK)
            .field("tenant_id", &self.tenant_id)
            .finish()
    }
}

/// Point-in-time view of the configuration environment.
///
/// The config resource reads the environment at request time rather than
/// reusing the startup snapshot, so edits to the environment of a live
/// process are reflected on the next read.
#[derive(Debug, Clone, Default)]
pub struct ConfigSnapshot {
    pub cluster_name: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub tenant_id: Option<String>,
}

impl ConfigSnapshot {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            cluster_name: lookup(ENV_CLUSTER_NAME),
            client_id: lookup(ENV_CLIENT_ID),
            client_secret: lookup(ENV_CLIENT_SECRET),
            tenant_id: lookup(ENV_TENANT_ID),
        }
    }

    pub fn field(&self, field: ConfigField) -> Option<&str> {
        let value = match field {
            ConfigField::ClusterName => &self.cluster_name,
            ConfigField::ClientId => &self.client_id,
            ConfigField::ClientSecret => &self.client_secret,
            ConfigField::TenantId => &self.tenant_id,
        };
        value.as_deref().filter(|v| !v.is_empty())
    }

    /// Value as rendered to callers: the secret is always masked when
    /// present, and absent values render as [`NOT_SET`].
    pub fn display_value(&self, field: ConfigField) -> String {
        match self.field(field) {
            None => NOT_SET.to_string(),
            Some(_) if field == ConfigField::ClientSecret => SECRET_MASK.to_string(),
            Some(value) => value.to_string(),
        }
    }
}
