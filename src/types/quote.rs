//! Quote types
//!
//! Defines the quote record shared by the store and the sync agent.

use serde::{Deserialize, Serialize};

/// A single quote entry
///
/// `id` is only present for quotes that originated from the remote source.
/// `timestamp` is the local creation time in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// The quote text
    pub text: String,
    /// The category the quote belongs to
    pub category: String,
    /// Remote identifier, if the quote came from the server
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Local creation time (unix millis)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl Quote {
    /// Create a local quote with a fresh timestamp
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
            id: None,
            timestamp: Some(now_millis()),
        }
    }

    /// Create a quote carrying a remote id
    pub fn remote(id: i64, text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
            id: Some(id),
            timestamp: Some(now_millis()),
        }
    }

    /// Whether two quotes refer to the same entry.
    ///
    /// Same `text`, or same `id` when both sides carry one.
    pub fn matches(&self, other: &Quote) -> bool {
        if self.text == other.text {
            return true;
        }
        match (self.id, other.id) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

/// Current unix time in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
