//! Opportunity evaluation: pass, bet, or bet and alert.

use tracing::debug;

use super::edge::edge;
use crate::types::{Opportunity, Recommendation};

/// Edge above which a pick is surfaced as an elite alert (10 points).
pub const ELITE_EDGE_THRESHOLD: f64 = 0.10;

/// Evaluate a model probability against an implied one.
///
/// `BET` whenever the edge is strictly positive; the elite alert needs the
/// edge strictly above [`ELITE_EDGE_THRESHOLD`]. The two thresholds are
/// independent.
pub fn evaluate(p_model: f64, p_implied: f64) -> Opportunity {
    evaluate_with_threshold(p_model, p_implied, ELITE_EDGE_THRESHOLD)
}

/// Same as [`evaluate`] with a caller-chosen alert threshold.
pub fn evaluate_with_threshold(p_model: f64, p_implied: f64, alert_threshold: f64) -> Opportunity {
    let edge = edge(p_model, p_implied);
    let recommendation = if edge > 0.0 {
        Recommendation::Bet
    } else {
        Recommendation::Pass
    };
    let is_elite_alert = edge > alert_threshold;

    debug!(
        edge = format!("{:+.2}%", edge * 100.0),
        %recommendation,
        is_elite_alert,
        "Opportunity evaluated"
    );

    Opportunity {
        edge,
        is_elite_alert,
        recommendation,
    }
}
