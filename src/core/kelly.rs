//! Kelly Criterion Bet Sizing
//!
//! Optimal bet sizing based on edge and odds using Kelly criterion.
//!
//! The Kelly criterion formula:
//!     f* = (b*p - q) / b = (p*odds - 1) / (odds - 1)
//!
//! Where:
//!     f* = fraction of bankroll to bet
//!     b = odds - 1 (net odds)
//!     p = probability of winning
//!     q = 1 - p (probability of losing)
//!     odds = decimal odds (e.g., 1.5 means 1.5x return including stake)

use serde::{Deserialize, Serialize};

use super::odds::{expected_value, implied_probability};

/// Full, half and quarter Kelly stake recommendation for one bet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KellyRecommendation {
    pub bankroll: f64,
    pub odds: f64,
    pub win_probability: f64,
    pub implied_probability: f64,
    pub edge_percentage: f64, // (p - 1/odds) * 100
    pub expected_value: f64,  // per unit staked
    pub kelly_fraction: f64,  // clamped to >= 0
    pub is_value_bet: bool,
    pub recommended_stake: f64,
    pub half_kelly_stake: f64,
    pub quarter_kelly_stake: f64,
}

impl KellyRecommendation {
    fn no_bet(bankroll: f64, odds: f64, win_probability: f64) -> Self {
        let implied = implied_probability(odds).unwrap_or(0.0);
        let in_domain = implied > 0.0 && win_probability.is_finite();
        Self {
            bankroll,
            odds,
            win_probability,
            implied_probability: implied,
            edge_percentage: if in_domain {
                (win_probability - implied) * 100.0
            } else {
                0.0
            },
            expected_value: if in_domain {
                expected_value(win_probability, odds)
            } else {
                0.0
            },
            kelly_fraction: 0.0,
            is_value_bet: false,
            recommended_stake: 0.0,
            half_kelly_stake: 0.0,
            quarter_kelly_stake: 0.0,
        }
    }
}

/// Calculate raw Kelly fraction for a single bet
///
/// # Arguments
/// * `probability` - Estimated probability of winning (0-1)
/// * `odds` - Decimal odds
///
/// # Returns
/// Kelly fraction (negative when the bet has no edge, 0 for odds ≤ 1)
///
/// # Examples
/// ```
/// use bankroll::core::kelly::calculate_kelly_fraction;
/// let kelly = calculate_kelly_fraction(0.25, 5.0);
/// assert!((kelly - 0.0625).abs() < 0.0001);
/// ```
pub fn calculate_kelly_fraction(probability: f64, odds: f64) -> f64 {
    if odds <= 1.0 {
        return 0.0;
    }

    // f* = ((odds - 1) * p - (1 - p)) / (odds - 1)
    ((odds - 1.0) * probability - (1.0 - probability)) / (odds - 1.0)
}

/// Recommend full, half and quarter Kelly stakes
///
/// Inputs outside the domain (bankroll ≤ 0, odds ≤ 1, probability outside
/// (0, 1)) produce a "not a value bet" recommendation with zero stakes.
pub fn recommend_stake(bankroll: f64, odds: f64, win_probability: f64) -> KellyRecommendation {
    let valid = bankroll.is_finite()
        && bankroll > 0.0
        && odds.is_finite()
        && odds > 1.0
        && win_probability > 0.0
        && win_probability < 1.0;

    if !valid {
        return KellyRecommendation::no_bet(bankroll, odds, win_probability);
    }

    let kelly = calculate_kelly_fraction(win_probability, odds).max(0.0);
    if kelly <= 0.0 {
        return KellyRecommendation::no_bet(bankroll, odds, win_probability);
    }

    let implied = 1.0 / odds;
    let full = kelly * bankroll;

    KellyRecommendation {
        bankroll,
        odds,
        win_probability,
        implied_probability: implied,
        edge_percentage: (win_probability - implied) * 100.0,
        expected_value: expected_value(win_probability, odds),
        kelly_fraction: kelly,
        is_value_bet: true,
        recommended_stake: full,
        half_kelly_stake: full / 2.0,
        quarter_kelly_stake: full / 4.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kelly_fraction_positive_edge() {
        let kelly = calculate_kelly_fraction(0.25, 5.0);
        assert!((kelly - 0.0625).abs() < 0.0001);
    }

    #[test]
    fn test_kelly_fraction_negative_edge() {
        let kelly = calculate_kelly_fraction(0.10, 5.0);
        assert!(kelly < 0.0);
    }

    #[test]
    fn test_kelly_fraction_no_net_odds() {
        assert_eq!(calculate_kelly_fraction(0.25, 1.0), 0.0);
    }

    #[test]
    fn test_recommend_stake_value_bet() {
        let rec = recommend_stake(1_000.0, 5.0, 0.25);

        assert!(rec.is_value_bet);
        assert!((rec.kelly_fraction - 0.0625).abs() < 1e-9);
        assert!((rec.recommended_stake - 62.5).abs() < 1e-9);
        assert!((rec.half_kelly_stake - 31.25).abs() < 1e-9);
        assert!((rec.quarter_kelly_stake - 15.625).abs() < 1e-9);
        // 25% vs implied 20%
        assert!((rec.edge_percentage - 5.0).abs() < 1e-9);
        assert!((rec.expected_value - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_recommend_stake_no_edge_is_zero() {
        for (odds, p) in [(2.0, 0.5), (2.0, 0.45), (5.0, 0.10), (1.2, 0.8)] {
            let rec = recommend_stake(1_000.0, odds, p);
            assert!(!rec.is_value_bet, "odds {} p {}", odds, p);
            assert_eq!(rec.kelly_fraction, 0.0);
            assert_eq!(rec.recommended_stake, 0.0);
            assert_eq!(rec.half_kelly_stake, 0.0);
            assert_eq!(rec.quarter_kelly_stake, 0.0);
            assert!(rec.edge_percentage <= 0.0);
        }
    }

    #[test]
    fn test_recommend_stake_out_of_domain() {
        assert!(!recommend_stake(1_000.0, 1.0, 0.6).is_value_bet);
        assert!(!recommend_stake(1_000.0, 0.5, 0.6).is_value_bet);
        assert!(!recommend_stake(1_000.0, 2.0, 0.0).is_value_bet);
        assert!(!recommend_stake(1_000.0, 2.0, 1.0).is_value_bet);
        assert!(!recommend_stake(0.0, 2.0, 0.6).is_value_bet);
        assert!(!recommend_stake(-50.0, 2.0, 0.6).is_value_bet);
        assert_eq!(recommend_stake(1_000.0, 1.0, 0.6).edge_percentage, 0.0);
    }
}
