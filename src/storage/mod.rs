//! Persistent storage
//!
//! This module provides the durable key-value layer the quote store mirrors
//! itself into, plus the session-scoped store for the last displayed quote.

pub mod keyvalue;
pub mod session;

pub use keyvalue::{FileKeyValue, KeyValue, MemoryKeyValue};
pub use session::SessionStore;

use std::path::PathBuf;
use thiserror::Error;

/// Key for the full quote collection blob
pub const QUOTES_KEY: &str = "quotes";
/// Key for the last successful sync time (unix millis, stored as a string)
pub const LAST_SYNC_KEY: &str = "last_sync_timestamp";
/// Key for the last selected category filter
pub const LAST_FILTER_KEY: &str = "last_filter";
/// Key for the cached page of server quotes
pub const SERVER_QUOTES_KEY: &str = "server_quotes";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Could not determine data directory")]
    DataDir,
}

/// Get the application data directory, creating it if needed
pub fn get_data_dir() -> Result<PathBuf, StorageError> {
    let dirs = directories::ProjectDirs::from("", "", "quoteflow").ok_or(StorageError::DataDir)?;
    let dir = dirs.data_dir().to_path_buf();
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
