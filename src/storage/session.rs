//! Session-scoped storage
//!
//! Holds the most recently displayed quote for the lifetime of the process,
//! so a view can be restored within the same session. Nothing here survives
//! a restart.

use crate::storage::{KeyValue, MemoryKeyValue, StorageError};
use crate::types::Quote;

const LAST_VIEWED_KEY: &str = "last_viewed_quote";

/// In-memory store for the last displayed quote
#[derive(Default)]
pub struct SessionStore {
    inner: MemoryKeyValue,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember the quote currently on display
    pub fn set_last_viewed(&self, quote: &Quote) -> Result<(), StorageError> {
        let json = serde_json::to_string(quote)?;
        self.inner.set(LAST_VIEWED_KEY, &json)
    }

    /// The quote last displayed this session, if any
    pub fn last_viewed(&self) -> Result<Option<Quote>, StorageError> {
        match self.inner.get(LAST_VIEWED_KEY)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Forget the last displayed quote
    pub fn clear(&self) -> Result<(), StorageError> {
        self.inner.remove(LAST_VIEWED_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_viewed_round_trip() {
        let session = SessionStore::new();
        assert!(session.last_viewed().unwrap().is_none());

        let quote = Quote::new("Carpe diem.", "Life");
        session.set_last_viewed(&quote).unwrap();
        assert_eq!(session.last_viewed().unwrap().unwrap(), quote);
    }

    #[test]
    fn test_clear() {
        let session = SessionStore::new();
        session
            .set_last_viewed(&Quote::new("Carpe diem.", "Life"))
            .unwrap();
        session.clear().unwrap();
        assert!(session.last_viewed().unwrap().is_none());
    }
}
