//! Platform-specific directory management
//!
//! Provides platform-specific paths for the config and data directories.
//! Follows XDG Base Directory Specification on Linux and standard locations on macOS.
//!
//! Environment variables can override default directories:
//! - `YOCTO_BAKE_CONFIG_DIR` - Override config directory (server connections)
//! - `YOCTO_BAKE_DATA_DIR` - Override data directory (local build-info cache)

use std::env;
use std::path::{Path, PathBuf};

/// Environment variable names for directory overrides
pub const ENV_CONFIG_DIR: &str = "YOCTO_BAKE_CONFIG_DIR";
pub const ENV_DATA_DIR: &str = "YOCTO_BAKE_DATA_DIR";

/// Application name used in directory paths
const APP_NAME: &str = "yocto-bake";

/// Subdirectory and file names
const BUILDS_SUBDIR: &str = "builds";
const SERVERS_FILE: &str = "servers.toml";

/// Platform-specific directory provider for yocto-bake
#[derive(Debug, Clone)]
pub struct BakeDirs {
    config_dir: PathBuf,
    data_dir: PathBuf,
}

impl BakeDirs {
    /// Create a new `BakeDirs` instance
    ///
    /// Checks environment variables first, then falls back to platform defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config_dir: Self::resolve(ENV_CONFIG_DIR, dirs::config_dir, ".config"),
            data_dir: Self::resolve(ENV_DATA_DIR, dirs::data_dir, ".local/share"),
        }
    }

    /// Use explicit directories
    #[must_use]
    pub fn with_dirs(config_dir: &Path, data_dir: &Path) -> Self {
        Self {
            config_dir: config_dir.to_path_buf(),
            data_dir: data_dir.to_path_buf(),
        }
    }

    /// Get the config directory path
    ///
    /// - Linux: `$XDG_CONFIG_HOME/yocto-bake` or `~/.config/yocto-bake`
    /// - macOS: `~/Library/Application Support/yocto-bake`
    #[must_use]
    pub fn config_dir(&self) -> PathBuf {
        self.config_dir.clone()
    }

    /// Get the data directory path
    ///
    /// - Linux: `$XDG_DATA_HOME/yocto-bake` or `~/.local/share/yocto-bake`
    /// - macOS: `~/Library/Application Support/yocto-bake`
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone()
    }

    /// Stored server connections
    #[must_use]
    pub fn servers_path(&self) -> PathBuf {
        self.config_dir.join(SERVERS_FILE)
    }

    /// Root of the local build-info cache
    #[must_use]
    pub fn builds_dir(&self) -> PathBuf {
        self.data_dir.join(BUILDS_SUBDIR)
    }

    /// Resolve a directory from environment or platform default
    fn resolve(var: &str, platform: fn() -> Option<PathBuf>, home_fallback: &str) -> PathBuf {
        if let Ok(path) = env::var(var) {
            if !path.is_empty() {
                return PathBuf::from(path);
            }
        }

        platform()
            .map(|p| p.join(APP_NAME))
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(home_fallback)
                    .join(APP_NAME)
            })
    }
}

impl Default for BakeDirs {
    fn default() -> Self {
        Self::new()
    }
}
