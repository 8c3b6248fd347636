//! Insured-pick refund policy.
//!
//! A lost bet on the promotional insured pick (the Daily Gold Pick) is
//! refunded as wallet credit, up to a fixed cap per bet. Every other outcome
//! refunds nothing. All amounts are exact decimals.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use crate::types::{BetOutcome, BetStatus, RefundDecision};

/// Maximum refund per insured bet.
pub const INSURANCE_CAP: Decimal = dec!(15.00);

/// Refund owed for a settled bet, if any.
///
/// `status` is matched case-insensitively; only `"lost"` together with the
/// promotional flag pays out, and never more than [`INSURANCE_CAP`].
/// Unknown statuses are treated as "not a loss".
pub fn process_bet_result(bet_amount: Decimal, status: &str, is_promotional: bool) -> Option<Decimal> {
    InsurancePolicy::default()
        .decide(&BetOutcome::new(bet_amount, status, is_promotional))
        .amount()
}

/// Refund policy with a configurable cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsurancePolicy {
    pub cap: Decimal,
}

impl Default for InsurancePolicy {
    fn default() -> Self {
        Self { cap: INSURANCE_CAP }
    }
}

impl InsurancePolicy {
    pub fn new(cap: Decimal) -> Self {
        Self { cap }
    }

    pub fn decide(&self, outcome: &BetOutcome) -> RefundDecision {
        match (&outcome.status, outcome.insured) {
            (BetStatus::Lost, true) => {
                let refund = outcome.stake.min(self.cap);
                debug!(stake = %outcome.stake, refund = %refund, cap = %self.cap, "Insured loss refunded");
                RefundDecision::Refund(refund)
            }
            _ => RefundDecision::NoRefund,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
