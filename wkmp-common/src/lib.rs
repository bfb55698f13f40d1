//! # WKMP Common Library
//!
//! Shared code for WKMP modules including:
//! - Catalog database initialization and song rows
//! - Configuration loading and root folder resolution
//! - Common error type

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
