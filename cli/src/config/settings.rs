//! Application settings derived from the config store and the environment.

use std::time::Duration;

use url::Url;

use crate::config::store::ConfigStore;
use crate::error::{GitpodError, Result};

/// Host used when the `host` key is not configured.
pub const DEFAULT_HOST: &str = "gitpod.io";

/// Upper bound for the credential verification call.
pub const VERIFY_TIMEOUT: Duration = Duration::from_secs(10);

/// Upper bound for listing workspaces.
pub const LIST_TIMEOUT: Duration = Duration::from_secs(5);

/// Well-known configuration keys.
pub mod keys {
    pub const HOST: &str = "host";
    pub const TOKEN: &str = "gitpod.token";
}

/// Environment variables that can override configuration.
pub mod env {
    pub const HOST: &str = "GITPOD_HOST";
    pub const CONFIG_PATH: &str = "GITPOD_CONFIG";
    pub const LOG_LEVEL: &str = "GITPOD_LOG";
}

/// API client configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Gitpod host as configured by the user (e.g. `gitpod.io`).
    pub host: String,
    /// Base URL of the public API (e.g. `https://api.gitpod.io/`).
    pub base_url: Url,
    /// Request timeout.
    pub timeout: Duration,
}

impl ApiConfig {
    /// Builds the API configuration from the config store, applying the
    /// `GITPOD_HOST` override.
    pub fn from_store(config: &ConfigStore, timeout: Duration) -> Result<Self> {
        let host = resolve_host(&config.get(keys::HOST), std::env::var(env::HOST).ok());
        Self::for_host(&host, timeout)
    }

    /// Builds the API configuration for an explicit host.
    pub fn for_host(host: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            host: host.to_string(),
            base_url: api_base_url(host)?,
            timeout,
        })
    }
}

/// Picks the effective host: environment override, then the configured
/// value, then [`DEFAULT_HOST`].
pub fn resolve_host(configured: &str, env_override: Option<String>) -> String {
    env_override
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
        .or_else(|| Some(configured.trim().to_string()).filter(|h| !h.is_empty()))
        .unwrap_or_else(|| DEFAULT_HOST.to_string())
}

/// Maps a host to its public API endpoint.
///
/// Accepts a bare host (`gitpod.io`), a host with port, or a full URL
/// (`https://gitpod.example.com/`). The scheme of a full URL is kept so
/// plain-HTTP test installations keep working.
pub fn api_base_url(host: &str) -> Result<Url> {
    let (scheme, authority) = if host.contains("://") {
        let url = Url::parse(host)?;
        let name = url
            .host_str()
            .ok_or_else(|| GitpodError::Config(format!("Host '{host}' has no host name")))?;
        let authority = match url.port() {
            Some(port) => format!("{name}:{port}"),
            None => name.to_string(),
        };
        (url.scheme().to_string(), authority)
    } else {
        ("https".to_string(), host.trim_end_matches('/').to_string())
    };

    if authority.is_empty() {
        return Err(GitpodError::Config("Host must not be empty".to_string()));
    }

    Ok(Url::parse(&format!("{scheme}://api.{authority}/"))?)
}
