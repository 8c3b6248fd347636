//! StatsEdge — betting value engine service.
//!
//! Entry point. Loads configuration, initialises structured logging,
//! restores the wallet book from disk (or starts fresh), and serves the
//! analysis/settlement API until ctrl-c, then saves the book.

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use statsedge::api;
use statsedge::api::routes::ApiState;
use statsedge::config::AppConfig;
use statsedge::engine::ledger::{MemoryLedger, WalletBook};
use statsedge::storage;
use statsedge::strategy::ValueEngine;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let config_path = AppConfig::path_from_env();
    let cfg = AppConfig::load(&config_path)?;

    init_logging();

    let engine_config = cfg.engine_config();
    info!(
        config = %config_path,
        kelly_fraction = engine_config.kelly_fraction,
        elite_edge_threshold = engine_config.elite_edge_threshold,
        insurance_cap = %engine_config.insurance_cap,
        "StatsEdge starting up"
    );

    // -- Restore or create wallet book -----------------------------------

    let state_file = cfg.wallet.state_file.as_str();
    let book = match storage::load_book(Some(state_file))? {
        Some(book) => book,
        None => WalletBook::new(cfg.wallet.opening_balance),
    };

    let ledger = Arc::new(MemoryLedger::new(book));
    let engine = ValueEngine::new(engine_config);

    // -- Serve ------------------------------------------------------------

    if cfg.server.enabled {
        let state = Arc::new(ApiState::new(engine, ledger.clone()));
        api::serve(state, cfg.server.port, shutdown_signal()).await?;
    } else {
        warn!("API server disabled in config; waiting for ctrl-c");
        shutdown_signal().await;
    }

    // -- Persist ------------------------------------------------------------

    let snapshot = ledger.snapshot().await;
    storage::save_book(&snapshot, Some(state_file))?;
    info!(
        wallets = snapshot.wallets.len(),
        total_credited = %snapshot.total_credited(),
        "StatsEdge shut down cleanly"
    );

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for ctrl-c");
    }
    info!("Shutdown signal received");
}

fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("statsedge=info"));

    let json_logging = std::env::var("STATSEDGE_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt().with_env_filter(env_filter).with_target(true).init();
    }
}
