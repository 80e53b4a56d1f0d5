//! Configuration loading and storage path resolution.
//!
//! Settings compose from defaults, an optional `workpad.toml` in the
//! workspace, and `WORKPAD_*` environment variables (with `__` separating
//! nested keys), highest last.

use crate::error::WorkpadError;
use crate::logging::LoggingConfig;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_store_path() -> PathBuf {
    PathBuf::from(".workpad/store")
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path to the durable store (relative to the workspace root)
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
}

impl StorageConfig {
    /// Resolve the store path to an actual filesystem location. The default
    /// lands under the platform data directory; anything else resolves
    /// against the workspace root.
    pub fn resolve_path(&self, workspace_root: &Path) -> Result<PathBuf, WorkpadError> {
        if self.store_path == default_store_path() {
            let dirs = directories::ProjectDirs::from("", "workpad", "workpad").ok_or_else(|| {
                WorkpadError::ConfigError(
                    "could not determine platform data directory".to_string(),
                )
            })?;
            Ok(dirs.data_dir().join("store"))
        } else {
            Ok(workspace_root.join(&self.store_path))
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkpadConfig {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl WorkpadConfig {
    /// Load configuration for a workspace.
    /// Precedence: defaults -> `<workspace>/workpad.toml` -> environment.
    pub fn load(workspace_root: &Path) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::from(workspace_root.join("workpad.toml")).required(false))
            .add_source(
                Environment::with_prefix("WORKPAD")
                    .separator("__")
                    .try_parsing(true),
            );
        builder.build()?.try_deserialize()
    }

    /// Load configuration from a specific file with environment overlay.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::from(path.to_path_buf()))
            .add_source(
                Environment::with_prefix("WORKPAD")
                    .separator("__")
                    .try_parsing(true),
            );
        builder.build()?.try_deserialize()
    }
}
