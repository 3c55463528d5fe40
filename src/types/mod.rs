//! Core types
//!
//! Shared data structures: quotes, conflicts, notifications, configuration.

pub mod config;
pub mod conflict;
pub mod notification;
pub mod quote;

pub use config::SyncConfig;
pub use conflict::Conflict;
pub use notification::{Notification, Severity};
pub use quote::{now_millis, Quote};
