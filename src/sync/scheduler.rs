//! Periodic sync scheduling
//!
//! A cancellable repeating task around the sync agent. Starting again cancels
//! the previous schedule, so re-initiation never doubles timers; stopping
//! aborts the task, which also drops any request still in flight so a late
//! response is never applied.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};

use crate::storage::KeyValue;
use crate::store::QuoteStore;
use crate::sync::agent::{SyncAgent, SyncReport};
use crate::sync::SyncError;
use crate::types::SyncConfig;

/// Handle to the repeating sync task
#[derive(Default)]
pub struct SyncScheduler {
    handle: Option<JoinHandle<()>>,
}

impl SyncScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the periodic schedule, replacing any existing one.
    ///
    /// Each tick runs one sync cycle against the shared store and delivers
    /// the report on `reports`. The loop ends when the receiver is dropped.
    pub fn start(
        &mut self,
        config: SyncConfig,
        storage: Arc<dyn KeyValue>,
        store: Arc<Mutex<QuoteStore>>,
        reports: mpsc::Sender<SyncReport>,
    ) -> Result<(), SyncError> {
        self.stop();

        let period = Duration::from_secs(config.interval_secs.max(1));
        let mut agent = SyncAgent::new(config, storage)?;

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            loop {
                ticker.tick().await;
                let mut store = store.lock().await;
                match agent.run_cycle(&mut store).await {
                    Ok(report) => {
                        if reports.send(report).await.is_err() {
                            tracing::debug!("Report receiver dropped, stopping sync loop");
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Sync cycle aborted: {}", e);
                    }
                }
            }
        });
        self.handle = Some(handle);
        tracing::info!("Periodic sync started, every {:?}", period);
        Ok(())
    }

    /// Cancel the schedule and discard any in-flight cycle
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            tracing::info!("Periodic sync stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for SyncScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryKeyValue, QUOTES_KEY};

    fn shared_store(kv: Arc<MemoryKeyValue>) -> Arc<Mutex<QuoteStore>> {
        kv.set(QUOTES_KEY, "[]").unwrap();
        Arc::new(Mutex::new(QuoteStore::load(kv).unwrap()))
    }

    #[tokio::test]
    async fn test_start_and_stop() {
        let kv = Arc::new(MemoryKeyValue::new());
        let store = shared_store(kv.clone());
        let (tx, _rx) = mpsc::channel(4);

        let mut scheduler = SyncScheduler::new();
        assert!(!scheduler.is_running());

        let config = SyncConfig {
            interval_secs: 3600,
            ..SyncConfig::default()
        };
        scheduler.start(config, kv, store, tx).unwrap();
        assert!(scheduler.is_running());

        scheduler.stop();
        assert!(!scheduler.is_running());
    }

    #[tokio::test]
    async fn test_restart_replaces_previous_schedule() {
        let kv = Arc::new(MemoryKeyValue::new());
        let store = shared_store(kv.clone());
        let (tx, _rx) = mpsc::channel(4);

        let config = SyncConfig {
            interval_secs: 3600,
            ..SyncConfig::default()
        };

        let mut scheduler = SyncScheduler::new();
        scheduler
            .start(config.clone(), kv.clone(), store.clone(), tx.clone())
            .unwrap();
        scheduler.start(config, kv, store, tx).unwrap();
        assert!(scheduler.is_running());

        scheduler.stop();
        assert!(!scheduler.is_running());
    }
}
