//! Edge and expected value.
//!
//! Plain arithmetic over probabilities the caller has already validated.
//! Out-of-range inputs pass straight through; nothing here clamps.

/// Advantage over the bookmaker: `p_model - p_implied`.
///
/// Positive means the model sees value (0.15 = 15 percentage points).
pub fn edge(p_model: f64, p_implied: f64) -> f64 {
    p_model - p_implied
}

/// Expected profit per unit staked at the given decimal odds.
///
/// `p * (odds - 1) - (1 - p)`: the net win weighted by the win probability,
/// minus the lost unit weighted by the loss probability.
pub fn expected_value(p_model: f64, decimal_odds: f64) -> f64 {
    let profit_on_win = decimal_odds - 1.0;
    p_model * profit_on_win - (1.0 - p_model)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
