//! Quote store
//!
//! Owns the authoritative in-memory quote collection and mirrors it in full
//! to the durable key-value layer on every mutation.

use std::sync::Arc;

use thiserror::Error;

use crate::storage::{KeyValue, StorageError, LAST_FILTER_KEY, QUOTES_KEY};
use crate::types::{now_millis, Quote};

/// Sentinel category meaning "no filter"
pub const ALL_CATEGORIES: &str = "all";

/// Quote store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Invalid import data: {0}")]
    Format(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// The authoritative quote collection
pub struct QuoteStore {
    storage: Arc<dyn KeyValue>,
    quotes: Vec<Quote>,
    filter: String,
}

impl QuoteStore {
    /// Restore the collection from durable storage.
    ///
    /// An absent snapshot is not an error: the built-in default set is seeded
    /// and persisted immediately. An unreadable snapshot logs a warning and
    /// reseeds the same way.
    pub fn load(storage: Arc<dyn KeyValue>) -> Result<Self, StoreError> {
        let (quotes, seeded) = match storage.get(QUOTES_KEY)? {
            Some(json) => match serde_json::from_str::<Vec<Quote>>(&json) {
                Ok(quotes) => {
                    tracing::debug!("Loaded {} quotes from storage", quotes.len());
                    (quotes, false)
                }
                Err(e) => {
                    tracing::warn!("Stored quotes unreadable, reseeding defaults: {}", e);
                    (default_quotes(), true)
                }
            },
            None => {
                tracing::info!("No stored quotes found, seeding defaults");
                (default_quotes(), true)
            }
        };

        let filter = storage
            .get(LAST_FILTER_KEY)?
            .unwrap_or_else(|| ALL_CATEGORIES.to_string());

        let store = Self {
            storage,
            quotes,
            filter,
        };
        if seeded {
            store.persist()?;
        }
        Ok(store)
    }

    /// Add a quote.
    ///
    /// Both fields are trimmed; an empty result rejects the add with no
    /// mutation. Returns the stored quote.
    pub fn add(&mut self, text: &str, category: &str) -> Result<Quote, StoreError> {
        let text = text.trim();
        let category = category.trim();
        if text.is_empty() || category.is_empty() {
            return Err(StoreError::Validation(
                "Both quote text and category are required".to_string(),
            ));
        }

        let quote = Quote::new(text, category);
        self.quotes.push(quote.clone());
        self.persist()?;
        tracing::debug!("Added quote in category '{}'", quote.category);
        Ok(quote)
    }

    /// Append a batch of quotes, all-or-nothing.
    ///
    /// Every element must have non-empty trimmed `text` and `category`;
    /// otherwise the whole batch is rejected before any mutation. Quotes
    /// missing a timestamp get a fresh one.
    pub fn import_batch(&mut self, quotes: Vec<Quote>) -> Result<usize, StoreError> {
        for (i, quote) in quotes.iter().enumerate() {
            if quote.text.trim().is_empty() || quote.category.trim().is_empty() {
                return Err(StoreError::Format(format!(
                    "Quote at index {i} is missing text or category"
                )));
            }
        }

        let count = quotes.len();
        for mut quote in quotes {
            if quote.timestamp.is_none() {
                quote.timestamp = Some(now_millis());
            }
            self.quotes.push(quote);
        }
        self.persist()?;
        tracing::info!("Imported {} quotes", count);
        Ok(count)
    }

    /// Parse JSON text into a batch and import it.
    ///
    /// The text must parse to a sequence of quote objects; anything else
    /// rejects the whole import with a descriptive error.
    pub fn import_json(&mut self, json: &str) -> Result<usize, StoreError> {
        let quotes: Vec<Quote> = serde_json::from_str(json)
            .map_err(|e| StoreError::Format(format!("Expected a JSON array of quotes: {e}")))?;
        self.import_batch(quotes)
    }

    /// Return the quotes matching `category`, persisting it as the current
    /// filter. The `"all"` sentinel returns the full collection.
    pub fn filter_by_category(&mut self, category: &str) -> Result<Vec<Quote>, StoreError> {
        self.filter = category.to_string();
        self.storage.set(LAST_FILTER_KEY, category)?;

        if category == ALL_CATEGORIES {
            return Ok(self.quotes.clone());
        }
        Ok(self
            .quotes
            .iter()
            .filter(|q| q.category == category)
            .cloned()
            .collect())
    }

    /// Pick one quote uniformly at random from a subset.
    ///
    /// Returns `None` when the subset is empty.
    pub fn pick_random(&self, subset: &[Quote]) -> Option<Quote> {
        use rand::seq::SliceRandom;
        subset.choose(&mut rand::thread_rng()).cloned()
    }

    /// Serialize the full collection as pretty-printed JSON
    pub fn export_snapshot(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(&self.quotes).map_err(StorageError::from)?)
    }

    /// Unique category names in first-seen order
    pub fn categories(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for quote in &self.quotes {
            if !seen.contains(&quote.category) {
                seen.push(quote.category.clone());
            }
        }
        seen
    }

    /// The full collection, insertion order
    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    /// The persisted category filter
    pub fn current_filter(&self) -> &str {
        &self.filter
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Append a quote that already carries its metadata (used by conflict
    /// resolution), persisting afterwards.
    pub(crate) fn push_quote(&mut self, quote: Quote) -> Result<(), StoreError> {
        self.quotes.push(quote);
        self.persist()?;
        Ok(())
    }

    fn persist(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.quotes).map_err(StorageError::from)?;
        self.storage.set(QUOTES_KEY, &json)?;
        Ok(())
    }
}

/// The built-in default quote set, used when storage holds nothing
fn default_quotes() -> Vec<Quote> {
    vec![
        Quote::new(
            "The best way to predict the future is to create it.",
            "Inspiration",
        ),
        Quote::new(
            "Life is what happens when you're busy making other plans.",
            "Life",
        ),
        Quote::new(
            "The only way to do great work is to love what you do.",
            "Work",
        ),
        Quote::new(
            "Imagination is more important than knowledge.",
            "Creativity",
        ),
        Quote::new("An apple a day keeps the doctor away.", "Health"),
    ]
}
