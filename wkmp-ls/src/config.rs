//! wkmp-ls configuration
//!
//! Read from `~/.config/wkmp/wkmp-ls.toml`. Every key is optional:
//!
//! ```toml
//! root_folder = "/home/user/Music"
//! port = 5726
//!
//! [logging]
//! level = "debug"
//!
//! [search]
//! min_results = 10
//! max_results = 50
//! fuzzy_pool_size = 100
//! fuzzy_max_edit_distance = 2
//! ```

use serde::Deserialize;
use std::path::PathBuf;
use wkmp_common::config::{load_module_config, LoggingConfig};

use crate::search::SearchConfig;

/// Module name used for the config file and root folder resolution
pub const MODULE_NAME: &str = "wkmp-ls";

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 5726;

/// Largest `max_results` / `fuzzy_pool_size` a caller may request
pub const MAX_REQUEST_LIMIT: usize = 1000;

/// Contents of `wkmp-ls.toml`
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct TomlConfig {
    /// Root folder override; resolved by `RootFolderResolver`, kept here so
    /// the key is accepted when the whole file is parsed
    pub root_folder: Option<PathBuf>,
    pub port: u16,
    pub logging: LoggingConfig,
    /// Defaults for requests that do not override them
    pub search: SearchConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            root_folder: None,
            port: DEFAULT_PORT,
            logging: LoggingConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

impl TomlConfig {
    /// Load the module config file, or defaults when it is missing or invalid
    pub fn load() -> Self {
        load_module_config(MODULE_NAME)
    }
}
