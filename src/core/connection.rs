//! Artifactory connection store
//!
//! Reads and manages stored server connections from `servers.toml` in the
//! config directory. One entry may be marked as the default.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::ConnectionError;
use crate::infra::dirs::BakeDirs;

/// One stored Artifactory connection
#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerDetails {
    /// Name used with `--art-id`
    pub server_id: String,

    /// Base URL, e.g. `https://acme.jfrog.io/artifactory`
    pub url: String,

    /// User name for basic auth
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Password or API key for basic auth
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Access token; preferred over basic auth
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl ServerDetails {
    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}

// Keep secrets out of logs and debug output.
impl fmt::Debug for ServerDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerDetails")
            .field("server_id", &self.server_id)
            .field("url", &self.url)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("access_token", &self.access_token.as_ref().map(|_| "***"))
            .finish()
    }
}

/// All stored connections
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConnectionStore {
    /// Server id used when none is requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    /// Stored servers
    #[serde(default)]
    pub servers: Vec<ServerDetails>,
}

impl ConnectionStore {
    /// Load the store from the config directory
    ///
    /// A missing file is an empty store.
    pub fn load(dirs: &BakeDirs) -> Result<Self, ConnectionError> {
        Self::load_from_path(&dirs.servers_path())
    }

    /// Load the store from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, ConnectionError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConnectionError::Read {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConnectionError::Parse {
            path: path.display().to_string(),
            error: e.to_string(),
        })
    }

    /// Save the store to the config directory
    pub fn save(&self, dirs: &BakeDirs) -> Result<(), ConnectionError> {
        self.save_to_path(&dirs.servers_path())
    }

    /// Save the store to a specific path
    ///
    /// Creates parent directories if they don't exist.
    pub fn save_to_path(&self, path: &Path) -> Result<(), ConnectionError> {
        let write_error = |error: String| ConnectionError::Write {
            path: path.display().to_string(),
            error,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| write_error(e.to_string()))?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| write_error(e.to_string()))?;
        fs::write(path, content).map_err(|e| write_error(e.to_string()))
    }

    /// Whether any server is configured
    pub fn is_configured(&self) -> bool {
        !self.servers.is_empty()
    }

    /// Add or replace a server, optionally making it the default
    ///
    /// The first server stored becomes the default regardless.
    pub fn upsert(&mut self, server: ServerDetails, make_default: bool) {
        let server_id = server.server_id.clone();
        match self
            .servers
            .iter_mut()
            .find(|existing| existing.server_id == server_id)
        {
            Some(existing) => *existing = server,
            None => self.servers.push(server),
        }

        if make_default || self.default.is_none() {
            self.default = Some(server_id);
        }
    }

    /// Resolve a server by id, or the default when `server_id` is `None`
    ///
    /// Without an explicit default the first stored server is used.
    pub fn resolve(&self, server_id: Option<&str>) -> Result<ServerDetails, ConnectionError> {
        if !self.is_configured() {
            return Err(ConnectionError::NotConfigured);
        }

        let wanted = server_id.or(self.default.as_deref());
        let found = match wanted {
            Some(id) => self.servers.iter().find(|server| server.server_id == id),
            None => self.servers.first(),
        };

        found.cloned().ok_or_else(|| ConnectionError::ServerNotFound {
            server_id: wanted.unwrap_or_default().to_string(),
        })
    }
}
