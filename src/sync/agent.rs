//! Sync agent
//!
//! One sync cycle is fetch, detect, resolve, push: fetch a page of remote
//! quotes, classify differences against the local collection, merge
//! remote-only quotes with remote precedence, then submit unsynced local
//! quotes best-effort.

use std::sync::Arc;

use crate::storage::{KeyValue, LAST_SYNC_KEY, SERVER_QUOTES_KEY};
use crate::store::{QuoteStore, StoreError};
use crate::sync::remote::{quote_from_remote, RemoteClient};
use crate::sync::{SyncError, SyncStatus};
use crate::types::{now_millis, Conflict, Notification, Quote, SyncConfig};

/// Outcome of one sync cycle
#[derive(Debug, Clone)]
pub struct SyncReport {
    /// Terminal status of the cycle (`Synced` or `Failed`)
    pub status: SyncStatus,
    /// Quotes appended locally by conflict resolution
    pub added: usize,
    /// Local quotes submitted to the server
    pub pushed: usize,
    /// Advisory conflicts left unresolved (local unsynced work)
    pub conflicts: Vec<Conflict>,
    /// Messages for the display surface
    pub notifications: Vec<Notification>,
}

/// Reconciles the local collection with the remote endpoint
pub struct SyncAgent {
    client: RemoteClient,
    storage: Arc<dyn KeyValue>,
    status: SyncStatus,
    online: bool,
}

impl SyncAgent {
    pub fn new(config: SyncConfig, storage: Arc<dyn KeyValue>) -> Result<Self, SyncError> {
        Ok(Self {
            client: RemoteClient::new(config)?,
            storage,
            status: SyncStatus::Idle,
            online: true,
        })
    }

    pub fn status(&self) -> SyncStatus {
        self.status
    }

    /// Whether the last remote call succeeded
    pub fn is_online(&self) -> bool {
        self.online
    }

    /// Time of the last successful sync, if any
    pub fn last_sync_time(&self) -> Option<i64> {
        self.storage
            .get(LAST_SYNC_KEY)
            .ok()
            .flatten()
            .and_then(|s| s.trim().parse().ok())
    }

    /// Fetch the remote page mapped into quote shape.
    ///
    /// The mapped page is cached under the server-quotes key. A transport
    /// failure marks the agent offline and leaves local state untouched.
    pub async fn fetch_remote(&mut self) -> Result<Vec<Quote>, SyncError> {
        let items = match self.client.fetch_page().await {
            Ok(items) => items,
            Err(e) => {
                self.online = false;
                return Err(e);
            }
        };
        self.online = true;

        let retrieved_at = now_millis();
        let quotes: Vec<Quote> = items
            .iter()
            .map(|item| quote_from_remote(item, retrieved_at))
            .collect();

        match serde_json::to_string_pretty(&quotes) {
            Ok(json) => self.storage.set(SERVER_QUOTES_KEY, &json)?,
            Err(e) => tracing::warn!("Could not cache server quotes: {}", e),
        }
        Ok(quotes)
    }

    /// Submit local quotes that have never been synced, one request each.
    ///
    /// Best-effort: a failed submission is logged and skipped, the rest are
    /// still attempted. Returns the number submitted successfully. Note that
    /// a retried submission can create a duplicate remote entry; the server
    /// assigns ids and there is no client-side idempotency key.
    pub async fn push_local_unsynced(&self, store: &QuoteStore) -> usize {
        let last_sync = self.last_sync_time();
        let pending: Vec<Quote> = store
            .quotes()
            .iter()
            .filter(|q| is_unsynced(q, last_sync))
            .cloned()
            .collect();

        let mut pushed = 0;
        for quote in &pending {
            match self.client.push(quote).await {
                Ok(id) => {
                    tracing::debug!("Pushed quote, server assigned id {}", id);
                    pushed += 1;
                }
                Err(e) => {
                    tracing::warn!("Failed to push quote \"{}\": {}", quote.text, e);
                }
            }
        }
        pushed
    }

    /// Apply remote precedence to a conflict set.
    ///
    /// Each remote-only quote is appended with a fresh local timestamp unless
    /// an equality check shows it already present, so re-running on a stale
    /// conflict list is a no-op. Local-unsynced conflicts are informational
    /// and left alone. Returns the number of quotes added.
    pub fn resolve_conflicts(
        &self,
        store: &mut QuoteStore,
        conflicts: &[Conflict],
    ) -> Result<usize, StoreError> {
        let mut added = 0;
        for conflict in conflicts {
            match conflict {
                Conflict::RemoteOnly { quote } => {
                    if store.quotes().iter().any(|local| local.matches(quote)) {
                        continue;
                    }
                    let mut merged = quote.clone();
                    merged.timestamp = Some(now_millis());
                    store.push_quote(merged)?;
                    added += 1;
                }
                Conflict::LocalUnsynced { .. } => {}
            }
        }
        if added > 0 {
            tracing::info!("Merged {} quotes from server", added);
        }
        Ok(added)
    }

    /// Run one full cycle against the store.
    ///
    /// A fetch failure degrades the report to `Failed` with an error
    /// notification and touches nothing locally; storage failures propagate.
    /// The agent returns to idle either way.
    pub async fn run_cycle(&mut self, store: &mut QuoteStore) -> Result<SyncReport, SyncError> {
        self.status = SyncStatus::Syncing;

        let remote = match self.fetch_remote().await {
            Ok(remote) => remote,
            Err(e) => {
                tracing::warn!("Sync failed: {}", e);
                self.status = SyncStatus::Idle;
                return Ok(SyncReport {
                    status: SyncStatus::Failed,
                    added: 0,
                    pushed: 0,
                    conflicts: Vec::new(),
                    notifications: vec![Notification::error(format!(
                        "Could not reach the quote server: {e}"
                    ))],
                });
            }
        };

        let last_sync = self.last_sync_time();
        let conflicts = detect_conflicts(store.quotes(), &remote, last_sync);
        let added = self.resolve_conflicts(store, &conflicts)?;
        let pushed = self.push_local_unsynced(store).await;

        self.storage
            .set(LAST_SYNC_KEY, &now_millis().to_string())?;

        let advisory: Vec<Conflict> = conflicts
            .iter()
            .filter(|c| matches!(c, Conflict::LocalUnsynced { .. }))
            .cloned()
            .collect();

        let mut notifications = vec![Notification::info("Quotes synced with server")];
        if added > 0 {
            notifications.push(Notification::info(format!(
                "{added} new quote(s) added from the server"
            )));
        }
        if !advisory.is_empty() {
            notifications.push(
                Notification::warning(format!(
                    "{} local quote(s) not yet confirmed by the server",
                    advisory.len()
                ))
                .sticky(),
            );
        }

        self.status = SyncStatus::Idle;
        Ok(SyncReport {
            status: SyncStatus::Synced,
            added,
            pushed,
            conflicts: advisory,
            notifications,
        })
    }
}

/// A local quote that has never been pushed: no remote id, and created after
/// the last successful sync (or never timestamped at all).
fn is_unsynced(quote: &Quote, last_sync: Option<i64>) -> bool {
    if quote.id.is_some() {
        return false;
    }
    match (quote.timestamp, last_sync) {
        (None, _) => true,
        (Some(_), None) => true,
        (Some(ts), Some(last)) => ts > last,
    }
}

/// Classify differences between the local and remote quote sets.
///
/// Both rules run independently, so one pass can produce both kinds. An empty
/// remote set produces nothing.
pub fn detect_conflicts(local: &[Quote], remote: &[Quote], last_sync: Option<i64>) -> Vec<Conflict> {
    if remote.is_empty() {
        return Vec::new();
    }

    let mut conflicts = Vec::new();
    for quote in remote {
        if !local.iter().any(|l| l.matches(quote)) {
            conflicts.push(Conflict::RemoteOnly {
                quote: quote.clone(),
            });
        }
    }
    for quote in local {
        if is_unsynced(quote, last_sync) {
            conflicts.push(Conflict::LocalUnsynced {
                quote: quote.clone(),
            });
        }
    }
    conflicts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryKeyValue, QUOTES_KEY};

    fn empty_store() -> QuoteStore {
        let kv = Arc::new(MemoryKeyValue::new());
        kv.set(QUOTES_KEY, "[]").unwrap();
        QuoteStore::load(kv).unwrap()
    }

    fn agent() -> SyncAgent {
        SyncAgent::new(SyncConfig::default(), Arc::new(MemoryKeyValue::new())).unwrap()
    }

    #[test]
    fn test_empty_remote_means_no_conflicts() {
        let local = vec![Quote::new("A", "X"), Quote::new("B", "Y")];
        assert!(detect_conflicts(&local, &[], None).is_empty());
    }

    #[test]
    fn test_remote_only_detected() {
        let local = vec![Quote::new("A", "X")];
        let remote = vec![Quote::remote(1, "B", "Y")];
        let conflicts = detect_conflicts(&local, &remote, None);

        let remote_only: Vec<&Conflict> = conflicts
            .iter()
            .filter(|c| matches!(c, Conflict::RemoteOnly { .. }))
            .collect();
        assert_eq!(remote_only.len(), 1);
        assert_eq!(remote_only[0].quote().text, "B");
    }

    #[test]
    fn test_matching_text_is_not_a_conflict() {
        let local = vec![Quote::new("Same", "X")];
        let remote = vec![Quote::remote(1, "Same", "Y")];
        let conflicts = detect_conflicts(&local, &remote, None);
        assert!(!conflicts
            .iter()
            .any(|c| matches!(c, Conflict::RemoteOnly { .. })));
    }

    #[test]
    fn test_matching_id_is_not_a_conflict() {
        let local = vec![Quote::remote(4, "Old wording", "X")];
        let remote = vec![Quote::remote(4, "New wording", "Y")];
        let conflicts = detect_conflicts(&local, &remote, None);
        assert!(!conflicts
            .iter()
            .any(|c| matches!(c, Conflict::RemoteOnly { .. })));
    }

    #[test]
    fn test_local_unsynced_is_advisory_and_reported() {
        let local = vec![Quote::new("Mine", "X")];
        let remote = vec![Quote::remote(1, "Mine", "Y")];
        let conflicts = detect_conflicts(&local, &remote, None);
        assert_eq!(conflicts.len(), 1);
        assert!(matches!(conflicts[0], Conflict::LocalUnsynced { .. }));
    }

    #[test]
    fn test_synced_quote_not_reported_unsynced() {
        let mut old = Quote::new("Old", "X");
        old.timestamp = Some(100);
        let remote = vec![Quote::remote(1, "Old", "Y")];
        let conflicts = detect_conflicts(&[old], &remote, Some(200));
        assert!(conflicts.is_empty());
    }

    #[test]
    fn test_resolve_appends_remote_only_once() {
        let mut store = empty_store();
        store.add("A", "X").unwrap();

        let remote = vec![Quote::remote(1, "B", "Y")];
        let conflicts = detect_conflicts(store.quotes(), &remote, None);

        let agent = agent();
        let added = agent.resolve_conflicts(&mut store, &conflicts).unwrap();
        assert_eq!(added, 1);
        assert_eq!(store.len(), 2);
        assert_eq!(store.quotes()[1].text, "B");
        assert_eq!(store.quotes()[1].id, Some(1));

        // Re-running on the now-stale conflict list is a no-op
        let added = agent.resolve_conflicts(&mut store, &conflicts).unwrap();
        assert_eq!(added, 0);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_resolve_gives_merged_quote_fresh_timestamp() {
        let mut store = empty_store();
        let mut stale = Quote::remote(1, "B", "Y");
        stale.timestamp = Some(1);
        let conflicts = vec![Conflict::RemoteOnly { quote: stale }];

        agent().resolve_conflicts(&mut store, &conflicts).unwrap();
        assert!(store.quotes()[0].timestamp.unwrap() > 1);
    }

    #[test]
    fn test_resolve_leaves_local_unsynced_alone() {
        let mut store = empty_store();
        store.add("Mine", "X").unwrap();
        let conflicts = vec![Conflict::LocalUnsynced {
            quote: store.quotes()[0].clone(),
        }];
        let added = agent().resolve_conflicts(&mut store, &conflicts).unwrap();
        assert_eq!(added, 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_is_unsynced_rules() {
        let local = Quote::new("A", "X");
        assert!(is_unsynced(&local, None));
        assert!(!is_unsynced(&local, Some(i64::MAX)));

        let mut untimestamped = local.clone();
        untimestamped.timestamp = None;
        assert!(is_unsynced(&untimestamped, Some(i64::MAX)));

        let synced = Quote::remote(1, "A", "X");
        assert!(!is_unsynced(&synced, None));
    }

    #[test]
    fn test_last_sync_time_round_trip() {
        let kv = Arc::new(MemoryKeyValue::new());
        let agent = SyncAgent::new(SyncConfig::default(), kv.clone()).unwrap();
        assert!(agent.last_sync_time().is_none());

        kv.set(LAST_SYNC_KEY, "12345").unwrap();
        assert_eq!(agent.last_sync_time(), Some(12345));
    }
}
