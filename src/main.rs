//! quoteflow demo binary
//!
//! Loads the quote store, shows a random quote for the current filter, runs
//! one sync cycle, then keeps the periodic scheduler alive until Ctrl-C.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};

use quoteflow::storage::{self, FileKeyValue, KeyValue, SessionStore};
use quoteflow::store::QuoteStore;
use quoteflow::sync::{SyncAgent, SyncScheduler};
use quoteflow::types::SyncConfig;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        tracing::error!("quoteflow failed: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let data_dir = storage::get_data_dir()?;
    let kv: Arc<dyn KeyValue> = Arc::new(FileKeyValue::new(&data_dir));
    let mut store = QuoteStore::load(kv.clone())?;
    let session = SessionStore::new();

    let filter = store.current_filter().to_string();
    let subset = store.filter_by_category(&filter)?;
    match store.pick_random(&subset) {
        Some(quote) => {
            println!("\"{}\" — {}", quote.text, quote.category);
            session.set_last_viewed(&quote)?;
        }
        None => println!("No quotes available for filter '{filter}'."),
    }

    let config = SyncConfig::default();

    // One immediate cycle so the first sync doesn't wait a full interval
    let mut agent = SyncAgent::new(config.clone(), kv.clone())?;
    let report = agent.run_cycle(&mut store).await?;
    for notification in &report.notifications {
        println!("[{:?}] {}", notification.severity, notification.message);
    }

    let store = Arc::new(Mutex::new(store));
    let (tx, mut rx) = mpsc::channel(16);
    let mut scheduler = SyncScheduler::new();
    scheduler.start(config, kv, store, tx)?;

    loop {
        tokio::select! {
            report = rx.recv() => {
                let Some(report) = report else { break };
                for notification in &report.notifications {
                    println!("[{:?}] {}", notification.severity, notification.message);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                scheduler.stop();
                break;
            }
        }
    }
    Ok(())
}
