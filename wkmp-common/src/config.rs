//! Configuration loading and root folder resolution
//!
//! Root folder priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`WKMP_ROOT_FOLDER`, then `WKMP_ROOT`)
//! 3. TOML config file (`root_folder` key)
//! 4. OS-dependent compiled default (fallback)
//!
//! A missing TOML file is never fatal: the module logs a warning and
//! continues with compiled defaults.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Database file name inside the root folder
pub const DATABASE_FILE_NAME: &str = "wkmp.db";

/// Logging section shared by every module TOML file
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Built-in defaults used when nothing else is configured
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl CompiledDefaults {
    /// Defaults for the platform this binary was compiled for
    pub fn for_current_platform() -> Self {
        Self {
            root_folder: default_root_folder(),
            log_level: default_log_level(),
            log_file: None,
        }
    }
}

/// OS-dependent default root folder (the user's music folder)
fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "windows") {
        dirs::home_dir()
            .map(|d| d.join("Music"))
            .unwrap_or_else(|| PathBuf::from("C:\\Users\\Public\\Music"))
    } else {
        // ~/Music on Linux and macOS
        dirs::home_dir()
            .map(|d| d.join("Music"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/wkmp"))
    }
}

/// Path of the TOML config file for a module (`~/.config/wkmp/<module>.toml`)
pub fn config_file_path(module_name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("wkmp").join(format!("{}.toml", module_name)))
}

/// Load and parse a module TOML file
///
/// Returns `Ok(None)` when the file does not exist. Parse failures are
/// reported so a typo in the config is not silently ignored.
pub fn load_toml_file<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)?;
    let parsed = toml::from_str::<T>(&content)?;
    info!("Loaded config file: {}", path.display());
    Ok(Some(parsed))
}

/// Load a module TOML config, falling back to `T::default()`
///
/// Missing or unreadable files degrade to defaults with a warning.
pub fn load_module_config<T: DeserializeOwned + Default>(module_name: &str) -> T {
    let Some(path) = config_file_path(module_name) else {
        warn!("Could not determine config directory, using built-in defaults");
        return T::default();
    };

    match load_toml_file(&path) {
        Ok(Some(config)) => config,
        Ok(None) => {
            warn!(
                "Config file {} not found, using built-in defaults",
                path.display()
            );
            T::default()
        }
        Err(e) => {
            warn!("Ignoring config file {}: {}", path.display(), e);
            T::default()
        }
    }
}

/// Resolves the root folder for a module
pub struct RootFolderResolver {
    module_name: String,
    cli_arg: Option<PathBuf>,
}

#[derive(Deserialize)]
struct RootFolderOnly {
    root_folder: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new(module_name: &str) -> Self {
        Self {
            module_name: module_name.to_string(),
            cli_arg: None,
        }
    }

    /// Set the command-line override (highest priority)
    pub fn with_cli_arg(mut self, cli_arg: Option<PathBuf>) -> Self {
        self.cli_arg = cli_arg;
        self
    }

    /// Resolve the root folder following the documented priority order
    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_arg {
            return path.clone();
        }

        if let Ok(path) = std::env::var("WKMP_ROOT_FOLDER") {
            return PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("WKMP_ROOT") {
            return PathBuf::from(path);
        }

        if let Some(config_path) = config_file_path(&self.module_name) {
            match load_toml_file::<RootFolderOnly>(&config_path) {
                Ok(Some(RootFolderOnly {
                    root_folder: Some(root),
                })) => return root,
                Ok(_) => {}
                Err(e) => warn!("Ignoring config file {}: {}", config_path.display(), e),
            }
        }

        CompiledDefaults::for_current_platform().root_folder
    }
}

/// Prepares the resolved root folder for use
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    /// Create the root folder (and parents) if missing; idempotent
    pub fn ensure_directory_exists(&self) -> Result<()> {
        if self.root_folder.is_file() {
            return Err(Error::Config(format!(
                "Root folder path is a file: {}",
                self.root_folder.display()
            )));
        }
        std::fs::create_dir_all(&self.root_folder)?;
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(DATABASE_FILE_NAME)
    }

    pub fn database_exists(&self) -> bool {
        self.database_path().exists()
    }
}
