//! Wallet ledger — the bankroll reader and credit writer the engine talks to.
//!
//! The engine never owns balances. It reads a bankroll before sizing and
//! asks the ledger to credit refunds after settlement. `MemoryLedger` is the
//! in-process implementation, persisted as JSON by `storage`.

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Why a wallet was credited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditReason {
    InsuranceRefund,
}

/// One credit applied to a wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditTransaction {
    pub id: Uuid,
    pub user_id: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub reason: CreditReason,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    pub user_id: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub balance: Decimal,
    #[serde(default)]
    pub credits: Vec<CreditTransaction>,
}

/// Every wallet the ledger knows about. This is what gets persisted.
///
/// Money fields are stored as decimal strings so balances survive a save and
/// reload digit for digit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletBook {
    /// Balance assumed for a user with no wallet yet.
    #[serde(with = "rust_decimal::serde::str")]
    pub opening_balance: Decimal,
    #[serde(default)]
    pub wallets: HashMap<String, Wallet>,
}

impl WalletBook {
    pub fn new(opening_balance: Decimal) -> Self {
        Self {
            opening_balance,
            wallets: HashMap::new(),
        }
    }

    pub fn balance(&self, user_id: &str) -> Decimal {
        self.wallets
            .get(user_id)
            .map(|w| w.balance)
            .unwrap_or(self.opening_balance)
    }

    /// Wallet for `user_id`, or an empty one at the opening balance.
    pub fn wallet(&self, user_id: &str) -> Wallet {
        self.wallets.get(user_id).cloned().unwrap_or_else(|| Wallet {
            user_id: user_id.to_string(),
            balance: self.opening_balance,
            credits: Vec::new(),
        })
    }

    /// Apply a credit and return the new balance.
    pub fn credit(
        &mut self,
        user_id: &str,
        amount: Decimal,
        reason: CreditReason,
        description: &str,
    ) -> Result<Decimal> {
        if amount <= Decimal::ZERO {
            bail!("Credit amount must be positive, got {amount}");
        }

        let opening = self.opening_balance;
        let wallet = self
            .wallets
            .entry(user_id.to_string())
            .or_insert_with(|| Wallet {
                user_id: user_id.to_string(),
                balance: opening,
                credits: Vec::new(),
            });

        wallet.balance += amount;
        wallet.credits.push(CreditTransaction {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            amount,
            reason,
            description: description.to_string(),
            created_at: Utc::now(),
        });

        Ok(wallet.balance)
    }

    /// Sum of all credits ever applied, across every wallet.
    pub fn total_credited(&self) -> Decimal {
        self.wallets
            .values()
            .flat_map(|w| w.credits.iter())
            .map(|c| c.amount)
            .sum()
    }
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Read balances and write credits.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WalletLedger: Send + Sync {
    /// Current balance (the bankroll used for stake sizing).
    async fn balance(&self, user_id: &str) -> Result<Decimal>;

    /// Credit the wallet and return the balance after the credit.
    async fn credit(
        &self,
        user_id: &str,
        amount: Decimal,
        reason: CreditReason,
        description: &str,
    ) -> Result<Decimal>;
}

// ---------------------------------------------------------------------------
// In-memory ledger
// ---------------------------------------------------------------------------

pub struct MemoryLedger {
    book: RwLock<WalletBook>,
}

impl MemoryLedger {
    pub fn new(book: WalletBook) -> Self {
        Self {
            book: RwLock::new(book),
        }
    }

    /// Copy of the current book, for persistence.
    pub async fn snapshot(&self) -> WalletBook {
        self.book.read().await.clone()
    }

    pub async fn wallet(&self, user_id: &str) -> Wallet {
        self.book.read().await.wallet(user_id)
    }
}

#[async_trait]
impl WalletLedger for MemoryLedger {
    async fn balance(&self, user_id: &str) -> Result<Decimal> {
        Ok(self.book.read().await.balance(user_id))
    }

    async fn credit(
        &self,
        user_id: &str,
        amount: Decimal,
        reason: CreditReason,
        description: &str,
    ) -> Result<Decimal> {
        let balance = self
            .book
            .write()
            .await
            .credit(user_id, amount, reason, description)?;

        info!(
            user_id,
            amount = %amount,
            reason = ?reason,
            balance = %balance,
            "Wallet credited"
        );

        Ok(balance)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_unknown_user_gets_opening_balance() {
        let book = WalletBook::new(dec!(100));
        assert_eq!(book.balance("nobody"), dec!(100));
        let w = book.wallet("nobody");
        assert_eq!(w.balance, dec!(100));
        assert!(w.credits.is_empty());
    }

    #[test]
    fn test_credit_creates_wallet() {
        let mut book = WalletBook::new(dec!(0));
        let balance = book
            .credit("u1", dec!(15.00), CreditReason::InsuranceRefund, "refund")
            .unwrap();
        assert_eq!(balance, dec!(15.00));
        assert_eq!(book.balance("u1"), dec!(15.00));
        assert_eq!(book.wallet("u1").credits.len(), 1);
    }

    #[test]
    fn test_credits_accumulate_exactly() {
        let mut book = WalletBook::new(dec!(0));
        for _ in 0..10 {
            book.credit("u1", dec!(0.10), CreditReason::InsuranceRefund, "dime")
                .unwrap();
        }
        assert_eq!(book.balance("u1"), dec!(1.00));
        assert_eq!(book.total_credited(), dec!(1.00));
    }

    #[test]
    fn test_non_positive_credit_rejected() {
        let mut book = WalletBook::new(dec!(50));
        assert!(book
            .credit("u1", Decimal::ZERO, CreditReason::InsuranceRefund, "zero")
            .is_err());
        assert!(book
            .credit("u1", dec!(-5), CreditReason::InsuranceRefund, "negative")
            .is_err());
        assert_eq!(book.balance("u1"), dec!(50));
        assert!(book.wallets.is_empty());
    }

    #[tokio::test]
    async fn test_memory_ledger_credit_and_read() {
        let ledger = MemoryLedger::new(WalletBook::new(dec!(200)));
        assert_eq!(ledger.balance("u1").await.unwrap(), dec!(200));

        let after = ledger
            .credit("u1", dec!(12.50), CreditReason::InsuranceRefund, "refund")
            .await
            .unwrap();
        assert_eq!(after, dec!(212.50));
        assert_eq!(ledger.balance("u1").await.unwrap(), dec!(212.50));
        assert_eq!(ledger.balance("u2").await.unwrap(), dec!(200));

        let snapshot = ledger.snapshot().await;
        assert_eq!(snapshot.total_credited(), dec!(12.50));
    }

    #[test]
    fn test_credit_reason_serialization() {
        let json = serde_json::to_string(&CreditReason::InsuranceRefund).unwrap();
        assert_eq!(json, "\"insurance_refund\"");
    }
}
