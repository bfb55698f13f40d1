//! Catalog database schema and song rows

pub mod init;
pub mod songs;

pub use init::*;
pub use songs::*;
