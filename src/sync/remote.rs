//! Remote collection endpoint client
//!
//! Talks to a generic posts-shaped API: a read endpoint returning
//! `{id, title, body}` items and a write endpoint accepting
//! `{title, body, userId}` and echoing an assigned id. Remote items are
//! mapped into quote shape here.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::sync::SyncError;
use crate::types::{Quote, SyncConfig};

/// Category assigned to remote items with an even id
pub const CATEGORY_EVEN: &str = "Wisdom";
/// Category assigned to remote items with an odd id
pub const CATEGORY_ODD: &str = "Inspiration";

/// One item from the remote read endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteItem {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Serialize)]
struct RemotePost<'a> {
    title: &'a str,
    body: &'a str,
    #[serde(rename = "userId")]
    user_id: i64,
}

#[derive(Debug, Deserialize)]
struct RemotePostResponse {
    id: i64,
}

/// HTTP client for the remote collection endpoint
pub struct RemoteClient {
    http: reqwest::Client,
    config: SyncConfig,
}

impl RemoteClient {
    pub fn new(config: SyncConfig) -> Result<Self, SyncError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("quoteflow/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, config })
    }

    /// Fetch one fixed-size page of remote items.
    ///
    /// Any transport failure or non-success status is a communication error.
    pub async fn fetch_page(&self) -> Result<Vec<RemoteItem>, SyncError> {
        let url = format!(
            "{}/posts?_limit={}",
            self.config.base_url, self.config.page_size
        );
        let items = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<RemoteItem>>()
            .await?;
        tracing::debug!("Fetched {} remote items", items.len());
        Ok(items)
    }

    /// Submit one local quote, returning the id the server assigned
    pub async fn push(&self, quote: &Quote) -> Result<i64, SyncError> {
        let url = format!("{}/posts", self.config.base_url);
        let payload = RemotePost {
            title: &quote.text,
            body: &quote.category,
            user_id: self.config.user_id,
        };
        let response = self
            .http
            .post(&url)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?
            .json::<RemotePostResponse>()
            .await?;
        Ok(response.id)
    }
}

/// Map a remote item into quote shape.
///
/// Category is derived from the id's parity; the title is capitalized and
/// terminally punctuated. `retrieved_at` becomes the quote's timestamp.
pub fn quote_from_remote(item: &RemoteItem, retrieved_at: i64) -> Quote {
    let category = if item.id % 2 == 0 {
        CATEGORY_EVEN
    } else {
        CATEGORY_ODD
    };
    Quote {
        text: format_quote_text(&item.title),
        category: category.to_string(),
        id: Some(item.id),
        timestamp: Some(retrieved_at),
    }
}

/// Uppercase the first character and make sure the text ends with
/// terminal punctuation.
fn format_quote_text(title: &str) -> String {
    let trimmed = title.trim();
    let mut chars = trimmed.chars();
    let mut text = match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    };
    if !text.ends_with(['.', '!', '?']) {
        text.push('.');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_capitalizes_and_punctuates() {
        assert_eq!(format_quote_text("hello world"), "Hello world.");
        assert_eq!(format_quote_text("already done."), "Already done.");
        assert_eq!(format_quote_text("really?"), "Really?");
        assert_eq!(format_quote_text("  spaced  "), "Spaced.");
    }

    #[test]
    fn test_category_follows_id_parity() {
        let even = RemoteItem {
            id: 2,
            title: "even".into(),
            body: String::new(),
        };
        let odd = RemoteItem {
            id: 3,
            title: "odd".into(),
            body: String::new(),
        };
        assert_eq!(quote_from_remote(&even, 1).category, CATEGORY_EVEN);
        assert_eq!(quote_from_remote(&odd, 1).category, CATEGORY_ODD);
    }

    #[test]
    fn test_mapped_quote_keeps_id_and_timestamp() {
        let item = RemoteItem {
            id: 9,
            title: "carry the id".into(),
            body: String::new(),
        };
        let quote = quote_from_remote(&item, 1234);
        assert_eq!(quote.id, Some(9));
        assert_eq!(quote.timestamp, Some(1234));
        assert_eq!(quote.text, "Carry the id.");
    }
}
