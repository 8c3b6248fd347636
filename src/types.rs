//! Shared types for the StatsEdge value engine.
//!
//! Value types only: every struct here is built from caller-supplied
//! scalars, used for one computation and dropped. Probabilities stay `f64`;
//! anything that is money is a `Decimal`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Recommendation
// ---------------------------------------------------------------------------

/// Whether an opportunity is worth a stake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Recommendation {
    Bet,
    Pass,
}

impl Recommendation {
    pub fn is_bet(&self) -> bool {
        matches!(self, Recommendation::Bet)
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::Bet => write!(f, "BET"),
            Recommendation::Pass => write!(f, "PASS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Opportunity
// ---------------------------------------------------------------------------

/// Outcome of evaluating a model probability against an implied one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    /// Signed edge: `p_model - p_implied`.
    pub edge: f64,
    /// Edge strictly above the alert threshold.
    pub is_elite_alert: bool,
    pub recommendation: Recommendation,
}

impl fmt::Display for Opportunity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (edge {:+.1}%{})",
            self.recommendation,
            self.edge * 100.0,
            if self.is_elite_alert { ", ELITE" } else { "" },
        )
    }
}

/// Full analysis of a single priced selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetAnalysis {
    pub decimal_odds: f64,
    pub p_model: f64,
    pub implied_probability: f64,
    pub edge: f64,
    /// Edge expressed in percentage points (0.15 → 15.0).
    pub edge_percent: f64,
    /// Expected return per unit staked.
    pub expected_value: f64,
    /// Recommended stake in money, already fraction-adjusted.
    pub kelly_stake: Decimal,
    pub is_elite_alert: bool,
    pub recommendation: Recommendation,
}

// ---------------------------------------------------------------------------
// Settlement inputs
// ---------------------------------------------------------------------------

/// Settled status of a bet, parsed case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BetStatus {
    Won,
    Lost,
    /// Anything other than won/lost (void, pending, typos). Never refunded.
    Unrecognized(String),
}

impl BetStatus {
    pub fn is_loss(&self) -> bool {
        matches!(self, BetStatus::Lost)
    }
}

impl From<&str> for BetStatus {
    fn from(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "won" => BetStatus::Won,
            "lost" => BetStatus::Lost,
            _ => BetStatus::Unrecognized(raw.to_string()),
        }
    }
}

impl fmt::Display for BetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BetStatus::Won => write!(f, "won"),
            BetStatus::Lost => write!(f, "lost"),
            BetStatus::Unrecognized(s) => write!(f, "unrecognized({s})"),
        }
    }
}

/// A settled bet handed over by the settlement feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetOutcome {
    pub stake: Decimal,
    pub status: BetStatus,
    /// Placed on the insured promotional pick (Daily Gold Pick).
    pub insured: bool,
}

impl BetOutcome {
    pub fn new(stake: Decimal, status: &str, insured: bool) -> Self {
        Self {
            stake,
            status: BetStatus::from(status),
            insured,
        }
    }
}

/// Refund owed for a settled bet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefundDecision {
    NoRefund,
    Refund(Decimal),
}

impl RefundDecision {
    pub fn amount(&self) -> Option<Decimal> {
        match self {
            RefundDecision::NoRefund => None,
            RefundDecision::Refund(amount) => Some(*amount),
        }
    }
}

impl From<RefundDecision> for Option<Decimal> {
    fn from(decision: RefundDecision) -> Self {
        decision.amount()
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for the value engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("Invalid odds: odds must exceed 1.0 (got {0})")]
    InvalidOdds(f64),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
