//! Odds and probability helpers
//!
//! All odds are decimal odds (2.0 = even money, the stake is included in the
//! return).

/// Implied probability of decimal odds
///
/// Returns `None` when the odds cannot describe a real market (≤ 1 or not
/// finite).
///
/// # Examples
/// ```
/// use bankroll::core::odds::implied_probability;
/// let p = implied_probability(4.0).unwrap();
/// assert!((p - 0.25).abs() < 1e-12);
/// assert!(implied_probability(1.0).is_none());
/// ```
pub fn implied_probability(odds: f64) -> Option<f64> {
    if !odds.is_finite() || odds <= 1.0 {
        return None;
    }
    Some(1.0 / odds)
}

/// Edge of an observed hit rate over the rate priced into the odds
pub fn edge(actual_rate: f64, odds: f64) -> Option<f64> {
    implied_probability(odds).map(|implied| actual_rate - implied)
}

/// Expected profit per unit staked
///
/// EV = p × (odds − 1) − (1 − p)
pub fn expected_value(probability: f64, odds: f64) -> f64 {
    probability * (odds - 1.0) - (1.0 - probability)
}

/// Combined odds of an accumulator (product of the legs)
pub fn accumulator_odds<I>(legs: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    legs.into_iter().product()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_implied_probability_round_trip() {
        for odds in [1.01, 1.1, 1.5, 2.0, 3.75, 10.0, 250.0] {
            let p = implied_probability(odds).unwrap();
            assert!(p > 0.0 && p < 1.0);
            assert!((p * odds - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_implied_probability_out_of_domain() {
        assert!(implied_probability(1.0).is_none());
        assert!(implied_probability(0.5).is_none());
        assert!(implied_probability(-2.0).is_none());
        assert!(implied_probability(f64::NAN).is_none());
        assert!(implied_probability(f64::INFINITY).is_none());
    }

    #[test]
    fn test_edge() {
        // 2.0 implies 50%, hitting 60% is a +10 point edge
        let e = edge(0.60, 2.0).unwrap();
        assert!((e - 0.10).abs() < 1e-12);

        let e = edge(0.40, 2.0).unwrap();
        assert!(e < 0.0);

        assert!(edge(0.9, 1.0).is_none());
    }

    #[test]
    fn test_expected_value() {
        // Fair coin at even money is zero EV
        assert!(expected_value(0.5, 2.0).abs() < 1e-12);
        // 25% at 5.0 returns +0.25 per unit
        assert!((expected_value(0.25, 5.0) - 0.25).abs() < 1e-12);
        assert!(expected_value(0.10, 5.0) < 0.0);
    }

    #[test]
    fn test_accumulator_odds() {
        let total = accumulator_odds([1.5, 2.0, 1.1]);
        assert!((total - 3.3).abs() < 1e-9);
        assert_eq!(accumulator_odds(Vec::<f64>::new()), 1.0);
    }
}
