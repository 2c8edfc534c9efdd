//! Configuration loading and root folder resolution
//!
//! Root folder priority order:
//! 1. Command-line argument (highest priority)
//! 2. `RECORDIFY_ROOT_FOLDER` environment variable
//! 3. `root_folder` key of the TOML config file
//! 4. OS-dependent compiled default (fallback)
//!
//! A missing or unreadable TOML file is never fatal; defaults are used.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "RECORDIFY_ROOT_FOLDER";

/// Database file name inside the root folder
pub const DATABASE_FILE_NAME: &str = "recordify.db";

/// Contents of `config.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Folder holding `recordify.db`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_folder: Option<PathBuf>,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Spotify credentials; environment variables take priority
    #[serde(default)]
    pub spotify: SpotifyConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default tracing filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// `[spotify]` table of the TOML config
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpotifyConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_uri: Option<String>,
}

/// Default configuration file path for the platform
///
/// `~/.config/recordify/config.toml` on Linux, the platform config dir elsewhere.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("recordify").join("config.toml"))
}

/// Load a TOML config file
///
/// Returns `TomlConfig::default()` if the file does not exist. A file that
/// exists but cannot be read or parsed is an error.
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        debug!("Config file not found, using defaults: {}", path.display());
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Load the config file, falling back to defaults on any error
pub fn load_toml_config_or_default(path: Option<&Path>) -> TomlConfig {
    let Some(path) = path else {
        return TomlConfig::default();
    };

    match load_toml_config(path) {
        Ok(config) => config,
        Err(e) => {
            warn!("Ignoring config file {}: {}", path.display(), e);
            TomlConfig::default()
        }
    }
}

/// Write a TOML config file atomically (temp file + rename)
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize TOML failed: {}", e)))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let tmp_path = path.with_extension("toml.tmp");
    std::fs::write(&tmp_path, content)?;
    std::fs::rename(&tmp_path, path)?;

    Ok(())
}

/// Get OS-dependent default root folder path
pub fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/recordify (or /var/lib/recordify for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("recordify"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/recordify"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/recordify
        dirs::data_dir()
            .map(|d| d.join("recordify"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/recordify"))
    } else if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\recordify
        dirs::data_local_dir()
            .map(|d| d.join("recordify"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\recordify"))
    } else {
        PathBuf::from("./recordify_data")
    }
}

/// Resolves the root folder from CLI, environment, TOML and compiled default
#[derive(Debug, Clone, Default)]
pub struct RootFolderResolver {
    cli_arg: Option<PathBuf>,
    toml_root: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value passed on the command line, if any
    pub fn with_cli_arg(mut self, path: Option<PathBuf>) -> Self {
        self.cli_arg = path;
        self
    }

    /// Use `root_folder` from a loaded TOML config
    pub fn with_toml(mut self, config: &TomlConfig) -> Self {
        self.toml_root = config.root_folder.clone();
        self
    }

    pub fn resolve(&self) -> PathBuf {
        // Priority 1: Command-line argument
        if let Some(path) = &self.cli_arg {
            return path.clone();
        }

        // Priority 2: Environment variable
        if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }

        // Priority 3: TOML config file
        if let Some(path) = &self.toml_root {
            return path.clone();
        }

        // Priority 4: OS-dependent compiled default
        default_root_folder()
    }
}

/// Creates the root folder and locates files inside it
#[derive(Debug, Clone)]
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    pub fn root_folder(&self) -> &Path {
        &self.root_folder
    }

    /// Create the root folder if missing (idempotent)
    pub fn ensure_directory_exists(&self) -> Result<()> {
        if !self.root_folder.exists() {
            std::fs::create_dir_all(&self.root_folder)?;
            debug!("Created root folder: {}", self.root_folder.display());
        }
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(DATABASE_FILE_NAME)
    }
}
