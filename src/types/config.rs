//! Configuration types
//!
//! Sync agent and scheduler configuration.

use serde::{Deserialize, Serialize};

/// Sync agent configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Base URL of the remote collection endpoint
    pub base_url: String,
    /// Number of remote items fetched per cycle
    pub page_size: usize,
    /// User id attached to pushed quotes
    pub user_id: i64,
    /// Seconds between periodic sync cycles
    pub interval_secs: u64,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            base_url: "https://jsonplaceholder.typicode.com".to_string(),
            page_size: 5,
            user_id: 1,
            interval_secs: 30,
            request_timeout_secs: 30,
        }
    }
}
