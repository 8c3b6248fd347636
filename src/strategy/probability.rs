//! Odds → implied probability.

use crate::types::EngineError;

/// Implied probability encoded by bookmaker decimal odds: `1 / odds`.
///
/// Odds at or below 1.0, NaN and infinite odds cannot describe a real wager
/// and are rejected before any arithmetic happens. The result is not rounded.
pub fn implied_probability(decimal_odds: f64) -> Result<f64, EngineError> {
    if !decimal_odds.is_finite() || decimal_odds <= 1.0 {
        return Err(EngineError::InvalidOdds(decimal_odds));
    }
    Ok(1.0 / decimal_odds)
}
