//! Kelly criterion stake sizing.
//!
//! Fractional Kelly over decimal odds. Probabilities are `f64`; the bankroll
//! and the resulting stake are money and stay in `Decimal`.
//!
//! Unlike `implied_probability`, nothing in here fails: degenerate odds or a
//! negative edge simply size to zero, because this is the path that moves
//! money and "no stake" is always a safe answer.

use rust_decimal::prelude::*;
use tracing::debug;

/// Quarter-Kelly.
pub const DEFAULT_KELLY_FRACTION: f64 = 0.25;

/// Decimal places kept on the bankroll fraction before multiplying.
const FRACTION_DP: u32 = 16;

/// Decimal places of the returned stake (cents).
const STAKE_DP: u32 = 2;

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Full Kelly percentage of bankroll.
///
/// Kelly formula: f* = (b*p - q) / b
/// where:
///   b = decimal_odds - 1 (net odds)
///   p = model win probability
///   q = 1 - p
///
/// Returns 0.0 for odds at or below 1.0 and for non-finite odds. May be negative when the odds do
/// not justify the probability.
pub fn kelly_percentage(p_model: f64, decimal_odds: f64) -> f64 {
    if !decimal_odds.is_finite() || decimal_odds <= 1.0 {
        return 0.0;
    }
    let b = decimal_odds - 1.0;
    let q = 1.0 - p_model;
    (b * p_model - q) / b
}

/// Money to stake: `bankroll * kelly_percentage * fraction`, rounded to cents.
///
/// Zero when the odds are degenerate, the Kelly percentage is not positive,
/// or there is no bankroll. `fraction` is applied as given.
pub fn kelly_stake(bankroll: Decimal, p_model: f64, decimal_odds: f64, fraction: f64) -> Decimal {
    if !decimal_odds.is_finite() || decimal_odds <= 1.0 || bankroll <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let kelly = kelly_percentage(p_model, decimal_odds);
    // NaN lands here too
    if !(kelly > 0.0) {
        debug!(p_model, decimal_odds, kelly, "Non-positive Kelly, no stake");
        return Decimal::ZERO;
    }

    let adjusted = kelly * fraction;
    let Some(adjusted) = Decimal::from_f64(adjusted) else {
        return Decimal::ZERO;
    };

    bankroll
        .checked_mul(adjusted.round_dp(FRACTION_DP))
        .map(|stake| stake.round_dp(STAKE_DP))
        .unwrap_or(Decimal::ZERO)
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Kelly sizing configuration.
#[derive(Debug, Clone)]
pub struct KellyConfig {
    /// Fractional Kelly multiplier (0.25 = quarter-Kelly). Lower = more conservative.
    pub fraction: f64,
}

impl Default for KellyConfig {
    fn default() -> Self {
        Self {
            fraction: DEFAULT_KELLY_FRACTION,
        }
    }
}

// ---------------------------------------------------------------------------
// Sizer
// ---------------------------------------------------------------------------

/// Sized stake recommendation.
#[derive(Debug, Clone, PartialEq)]
pub struct SizedStake {
    pub kelly_percentage: f64, // Raw Kelly
    pub bet_fraction: f64,     // After multiplier
    pub stake: Decimal,
}

/// Kelly sizer bound to a configured fraction.
pub struct KellySizer {
    config: KellyConfig,
}

impl KellySizer {
    pub fn new(config: KellyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &KellyConfig {
        &self.config
    }

    /// Stake for the configured fraction (see [`kelly_stake`]).
    pub fn stake(&self, bankroll: Decimal, p_model: f64, decimal_odds: f64) -> Decimal {
        kelly_stake(bankroll, p_model, decimal_odds, self.config.fraction)
    }

    /// Size a stake, or `None` when the proposition does not merit one.
    pub fn size(&self, bankroll: Decimal, p_model: f64, decimal_odds: f64) -> Option<SizedStake> {
        let stake = self.stake(bankroll, p_model, decimal_odds);
        if stake <= Decimal::ZERO {
            return None;
        }

        let kelly = kelly_percentage(p_model, decimal_odds);
        let bet_fraction = kelly * self.config.fraction;

        debug!(
            raw_kelly = format!("{:.2}%", kelly * 100.0),
            fractional = format!("{:.2}%", bet_fraction * 100.0),
            stake = %stake,
            "Stake sized"
        );

        Some(SizedStake {
            kelly_percentage: kelly,
            bet_fraction,
            stake,
        })
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
    fn test_negative_kelly_no_stake() {
        // b = 1, K% = 0.4 - 0.6 = -0.2
        assert_eq!(kelly_stake(dec!(1000), 0.4, 2.0, 0.25), Decimal::ZERO);
    }

    #[test]
    fn test_quarter_kelly_at_evens() {
        // b = 1, K% = 0.2, adjusted = 0.05
        assert_eq!(kelly_stake(dec!(1000), 0.6, 2.0, 0.25), dec!(50.00));
    }

    #[test]
    fn test_stake_rounds_to_nearest_cent() {
        // 0.6 - 0.4 is 0.19999999999999996 in f64; the raw stake sits just under 50
        assert_eq!(kelly_stake(dec!(1000), 0.6, 2.0, 0.25), dec!(50.00));
        assert_eq!(kelly_stake(dec!(100), 0.6, 2.0, 0.25), dec!(5.00));
    }

    #[test]
    fn test_zero_kelly_no_stake() {
        assert_eq!(kelly_stake(dec!(1000), 0.5, 2.0, 0.25), Decimal::ZERO);
    }

    #[test]
    fn test_degenerate_odds_never_fail() {
        for odds in [1.0, 0.5, 0.0, -3.0, f64::NAN, f64::INFINITY] {
            for p in [0.0, 0.5, 0.99, 1.5] {
                assert_eq!(kelly_stake(dec!(1000), p, odds, 0.25), Decimal::ZERO);
                assert_eq!(kelly_stake(dec!(1000), p, odds, 1.0), Decimal::ZERO);
            }
        }
    }

    #[test]
    fn test_kelly_percentage_degenerate_odds() {
        assert_eq!(kelly_percentage(0.9, 1.0), 0.0);
        assert_eq!(kelly_percentage(0.9, 0.3), 0.0);
        assert_eq!(kelly_percentage(0.9, f64::INFINITY), 0.0);
    }

    #[test]
    fn test_kelly_percentage_formula() {
        // b = 2, p = 0.5: (1.0 - 0.5) / 2 = 0.25
        assert!((kelly_percentage(0.5, 3.0) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_monotonic_in_probability() {
        let mut prev = Decimal::ZERO;
        for i in 0..=100 {
            let p = i as f64 / 100.0;
            let stake = kelly_stake(dec!(1000), p, 2.5, 0.25);
            assert!(stake >= prev, "p={p}: {stake} < {prev}");
            prev = stake;
        }
        assert!(prev > Decimal::ZERO);
    }

    #[test]
    fn test_fraction_scales_stake() {
        let quarter = kelly_stake(dec!(1000), 0.6, 2.0, 0.25);
        let half = kelly_stake(dec!(1000), 0.6, 2.0, 0.5);
        let full = kelly_stake(dec!(1000), 0.6, 2.0, 1.0);
        assert_eq!(half, dec!(100.00));
        assert_eq!(full, dec!(200.00));
        assert!(quarter < half && half < full);
    }

    #[test]
    fn test_zero_bankroll() {
        assert_eq!(kelly_stake(Decimal::ZERO, 0.6, 2.0, 0.25), Decimal::ZERO);
        assert_eq!(kelly_stake(dec!(-100), 0.6, 2.0, 0.25), Decimal::ZERO);
    }

    #[test]
    fn test_stake_is_cent_precision() {
        let stake = kelly_stake(dec!(777.77), 0.37, 3.1, 0.25);
        assert!(stake.scale() <= 2);
        assert!(stake > Decimal::ZERO);
    }

    #[test]
    fn test_sizer_uses_configured_fraction() {
        let sizer = KellySizer::new(KellyConfig { fraction: 0.5 });
        let sized = sizer.size(dec!(1000), 0.6, 2.0).unwrap();
        assert_eq!(sized.stake, dec!(100.00));
        assert!((sized.kelly_percentage - 0.2).abs() < 1e-12);
        assert!((sized.bet_fraction - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_sizer_none_without_edge() {
        let sizer = KellySizer::new(KellyConfig::default());
        assert!(sizer.size(dec!(1000), 0.4, 2.0).is_none());
        assert!(sizer.size(dec!(1000), 0.9, 1.0).is_none());
    }

    #[test]
    fn test_kelly_config_default() {
        assert_eq!(KellyConfig::default().fraction, 0.25);
    }
}
