//! Remote synchronization
//!
//! Reconciles the local quote collection with a remote endpoint: fetch a page
//! of server quotes, classify differences as conflicts, merge with remote
//! precedence, and push unsynced local quotes back.

pub mod agent;
pub mod remote;
pub mod scheduler;

pub use agent::{detect_conflicts, SyncAgent, SyncReport};
pub use remote::{quote_from_remote, RemoteClient, RemoteItem};
pub use scheduler::SyncScheduler;

use thiserror::Error;

use crate::storage::StorageError;
use crate::store::StoreError;

/// Sync agent errors
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Remote communication failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Where the agent is in its cycle
///
/// Returns to `Idle` after every cycle; a failed cycle never stops the next
/// one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    Idle,
    Syncing,
    Synced,
    Failed,
}
