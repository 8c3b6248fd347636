//! Betting value engine — implied probability, edge, Kelly sizing,
//! opportunity evaluation, and insured-pick refunds.
//!
//! The submodules expose pure free functions. [`ValueEngine`] composes them
//! behind a configuration (Kelly fraction, alert threshold, refund cap) and
//! holds no other state, so one instance can be shared freely.

pub mod edge;
pub mod insurance;
pub mod kelly;
pub mod opportunity;
pub mod probability;

use rust_decimal::Decimal;
use tracing::debug;

use crate::types::{BetAnalysis, BetOutcome, EngineError, RefundDecision};
use insurance::{InsurancePolicy, INSURANCE_CAP};
use kelly::{KellyConfig, KellySizer, DEFAULT_KELLY_FRACTION};
use opportunity::ELITE_EDGE_THRESHOLD;

pub use edge::{edge, expected_value};
pub use insurance::process_bet_result;
pub use kelly::{kelly_percentage, kelly_stake};
pub use opportunity::{evaluate, evaluate_with_threshold};
pub use probability::implied_probability;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Tunables for [`ValueEngine`]. Defaults match the module constants.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub kelly_fraction: f64,
    pub elite_edge_threshold: f64,
    pub insurance_cap: Decimal,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            kelly_fraction: DEFAULT_KELLY_FRACTION,
            elite_edge_threshold: ELITE_EDGE_THRESHOLD,
            insurance_cap: INSURANCE_CAP,
        }
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Stateless composition of the value-engine components.
pub struct ValueEngine {
    config: EngineConfig,
    kelly: KellySizer,
    insurance: InsurancePolicy,
}

impl ValueEngine {
    pub fn new(config: EngineConfig) -> Self {
        let kelly = KellySizer::new(KellyConfig {
            fraction: config.kelly_fraction,
        });
        let insurance = InsurancePolicy::new(config.insurance_cap);
        Self {
            config,
            kelly,
            insurance,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Analyse one priced selection.
    ///
    /// Odds are validated strictly here: non-finite odds or anything at or below 1.0 come back
    /// as [`EngineError::InvalidOdds`] untouched. A missing edge is not an
    /// error; it yields `PASS` and a zero stake.
    pub fn analyze(
        &self,
        bankroll: Decimal,
        p_model: f64,
        decimal_odds: f64,
    ) -> Result<BetAnalysis, EngineError> {
        let p_implied = implied_probability(decimal_odds)?;
        let opportunity =
            evaluate_with_threshold(p_model, p_implied, self.config.elite_edge_threshold);
        let ev = expected_value(p_model, decimal_odds);
        let kelly_stake = self.kelly.stake(bankroll, p_model, decimal_odds);

        debug!(
            decimal_odds,
            p_model,
            p_implied,
            ev = format!("{:.4}", ev),
            stake = %kelly_stake,
            "Selection analysed"
        );

        Ok(BetAnalysis {
            decimal_odds,
            p_model,
            implied_probability: p_implied,
            edge: opportunity.edge,
            edge_percent: opportunity.edge * 100.0,
            expected_value: ev,
            kelly_stake,
            is_elite_alert: opportunity.is_elite_alert,
            recommendation: opportunity.recommendation,
        })
    }

    /// Refund owed for a settled bet under the configured cap.
    pub fn refund_for(&self, outcome: &BetOutcome) -> RefundDecision {
        self.insurance.decide(outcome)
    }
}

impl Default for ValueEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
