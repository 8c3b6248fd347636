//! Persistence layer.
//!
//! Saves and loads the wallet book to/from a JSON file. Balances are written
//! as decimal strings, so any scale round-trips exactly.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};

use crate::engine::ledger::WalletBook;

/// Default wallet book path.
pub const DEFAULT_BOOK_FILE: &str = "statsedge_wallets.json";

/// Save the wallet book to a JSON file.
pub fn save_book(book: &WalletBook, path: Option<&str>) -> Result<()> {
    let path = path.unwrap_or(DEFAULT_BOOK_FILE);
    let json = serde_json::to_string_pretty(book).context("Failed to serialise wallet book")?;

    std::fs::write(path, &json).with_context(|| format!("Failed to write wallet book to {path}"))?;

    debug!(path, wallets = book.wallets.len(), "Wallet book saved");
    Ok(())
}

/// Load the wallet book from a JSON file.
/// Returns None if the file doesn't exist (fresh start).
pub fn load_book(path: Option<&str>) -> Result<Option<WalletBook>> {
    let path = path.unwrap_or(DEFAULT_BOOK_FILE);

    if !Path::new(path).exists() {
        info!(path, "No wallet book found, starting fresh");
        return Ok(None);
    }

    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read wallet book from {path}"))?;

    let book: WalletBook = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse wallet book from {path}"))?;

    info!(
        path,
        wallets = book.wallets.len(),
        total_credited = %book.total_credited(),
        "Wallet book loaded from disk"
    );

    Ok(Some(book))
}

/// Delete the wallet book file (for testing or reset).
pub fn delete_book(path: Option<&str>) -> Result<()> {
    let path = path.unwrap_or(DEFAULT_BOOK_FILE);
    if Path::new(path).exists() {
        std::fs::remove_file(path).with_context(|| format!("Failed to delete wallet book {path}"))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
