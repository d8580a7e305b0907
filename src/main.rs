//! Koni Health - community health triage demo
//!
//! Feature-phone USSD menus and IVR voice calls feed a shared event store
//! that backs the CHW and payer dashboards.

mod config;
mod console;
mod db;
mod escalation;
mod runtime;
mod scenario;
mod store;
mod triage;
mod ussd;
mod voice;

use config::{KoniConfig, DEFAULT_LOG_FILTER};
use console::Console;
use db::Database;
use std::sync::Arc;
use store::EventStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so they don't interleave with console output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = KoniConfig::from_env();

    // Ensure database directory exists
    if let Some(parent) = config.db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    tracing::info!(path = %config.db_path.display(), "Opening database");
    let db = Database::open(&config.db_path)?;
    let store = Arc::new(EventStore::open(db));

    tracing::info!(
        language = %config.language,
        listen_timeout_ms = u64::try_from(config.listen_timeout.as_millis()).unwrap_or(u64::MAX),
        "Koni Health console ready"
    );
    Console::new(config, store).run().await?;

    Ok(())
}
