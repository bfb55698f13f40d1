//! Common error type shared by WKMP library modules

use thiserror::Error;
use uuid::Uuid;

/// Result alias used throughout wkmp-common
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the catalog database and configuration layers
#[derive(Error, Debug)]
pub enum Error {
    /// SQLite failure (connection, schema or query)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Filesystem failure while preparing the root folder or reading config
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML config file exists but could not be parsed
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration could not be located or is unusable
    #[error("Configuration error: {0}")]
    Config(String),

    /// A catalog row addressed by guid does not exist
    #[error("Song not found: {0}")]
    SongNotFound(Uuid),

    /// Invalid caller-supplied value
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
