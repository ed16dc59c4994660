//! Core betting math: odds, Kelly staking, compounding and streaks

pub mod compounding;
pub mod kelly;
pub mod odds;
pub mod streak;

// Re-export commonly used types
pub use compounding::{days_to_target, project_balance_over_time, DaysToTarget, ProjectionPoint};
pub use kelly::{calculate_kelly_fraction, recommend_stake, KellyRecommendation};
pub use odds::{accumulator_odds, edge, expected_value, implied_probability};
pub use streak::{current_streak, survival_probability, survival_table, win_rate, Streak, StreakKind};

/// Round a money amount to cents
pub fn round_money(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_money() {
        assert_eq!(round_money(50.0 * 1.1), 55.0);
        assert_eq!(round_money(10.005_1), 10.01);
        assert_eq!(round_money(-3.333), -3.33);
    }
}
