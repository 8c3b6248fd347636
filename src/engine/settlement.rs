//! Settlement — turns a settled bet into a refund decision and, when one is
//! owed, a wallet credit.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::engine::ledger::{CreditReason, WalletLedger};
use crate::strategy::ValueEngine;
use crate::types::{BetOutcome, BetStatus, RefundDecision};

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SettlementAction {
    RefundIssued,
    NoAction,
}

/// What happened when a bet was settled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementReport {
    pub user_id: String,
    pub action: SettlementAction,
    /// Refunded amount; zero when no action was taken.
    pub amount: Decimal,
    pub reason: String,
    /// Wallet balance after the credit. `None` when the ledger was not touched.
    pub balance_after: Option<Decimal>,
    pub settled_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Settler
// ---------------------------------------------------------------------------

pub struct Settler;

impl Settler {
    /// Decide the refund for `outcome` and credit the ledger if one is owed.
    ///
    /// Outcomes that refund nothing never touch the ledger. Ledger failures
    /// are returned to the caller; the decision itself cannot fail.
    pub async fn settle<L>(
        engine: &ValueEngine,
        ledger: &L,
        user_id: &str,
        outcome: &BetOutcome,
    ) -> Result<SettlementReport>
    where
        L: WalletLedger + ?Sized,
    {
        let report = match engine.refund_for(outcome) {
            RefundDecision::Refund(amount) if amount > Decimal::ZERO => {
                let description = format!(
                    "Daily Gold Pick insurance: refund of {amount} on lost stake of {}",
                    outcome.stake
                );
                let balance = ledger
                    .credit(user_id, amount, CreditReason::InsuranceRefund, &description)
                    .await
                    .with_context(|| format!("Failed to credit refund to wallet of {user_id}"))?;

                SettlementReport {
                    user_id: user_id.to_string(),
                    action: SettlementAction::RefundIssued,
                    amount,
                    reason: description,
                    balance_after: Some(balance),
                    settled_at: Utc::now(),
                }
            }
            _ => SettlementReport {
                user_id: user_id.to_string(),
                action: SettlementAction::NoAction,
                amount: Decimal::ZERO,
                reason: no_refund_reason(outcome),
                balance_after: None,
                settled_at: Utc::now(),
            },
        };

        info!(
            user_id,
            status = %outcome.status,
            insured = outcome.insured,
            stake = %outcome.stake,
            action = ?report.action,
            refund = %report.amount,
            "Bet settled"
        );

        Ok(report)
    }
}

fn no_refund_reason(outcome: &BetOutcome) -> String {
    match (&outcome.status, outcome.insured) {
        (BetStatus::Won, _) => "Bet won; nothing to refund".to_string(),
        (BetStatus::Lost, false) => "Loss not covered by pick insurance".to_string(),
        (BetStatus::Unrecognized(raw), _) => format!("Status '{raw}' is not a settled loss"),
        (BetStatus::Lost, true) => "Insured loss with nothing to refund".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
