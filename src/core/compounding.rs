//! Compounding Projection
//!
//! Best-case trajectory of a stream that hits its target odds every day,
//! reinvesting a fixed share of each day's returns and cashing out the rest.

use serde::{Deserialize, Serialize};

/// Largest horizon for which `days_to_target` checks its answer against the
/// day-by-day loop
const MAX_VERIFIED_DAYS: u64 = 100_000;

/// Longest projection the API and CLI will build (ten years of days)
pub const MAX_PROJECTION_DAYS: u32 = 3_650;

/// One day of a projected stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    pub day: u32,
    pub balance: f64,
    pub total_cashed_out: f64,
    pub cumulative_profit: f64,
}

/// Outcome of `days_to_target`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "days", rename_all = "snake_case")]
pub enum DaysToTarget {
    Days(u64),
    Unreachable,
}

impl DaysToTarget {
    pub fn days(&self) -> Option<u64> {
        match self {
            DaysToTarget::Days(d) => Some(*d),
            DaysToTarget::Unreachable => None,
        }
    }
}

/// Balance carried into the next day after a winning day
#[inline]
fn next_balance(balance: f64, odds: f64, reinvestment_fraction: f64) -> f64 {
    let returns = balance * odds;
    returns * reinvestment_fraction
}

/// Project balance and cumulative cashout day by day
///
/// Returns `days + 1` points; index 0 is the starting state and index `n`
/// the state after day `n`.
///
/// # Examples
/// ```
/// use bankroll::core::compounding::project_balance_over_time;
/// let points = project_balance_over_time(100.0, 1.1, 0.8, 5);
/// assert_eq!(points.len(), 6);
/// assert!((points[5].balance - 100.0 * 0.88_f64.powi(5)).abs() < 1e-9);
/// ```
pub fn project_balance_over_time(
    initial_stake: f64,
    odds: f64,
    reinvestment_fraction: f64,
    days: u32,
) -> Vec<ProjectionPoint> {
    let mut points = Vec::with_capacity(days as usize + 1);
    let mut balance = initial_stake;
    let mut total_cashed_out = 0.0;

    points.push(ProjectionPoint {
        day: 0,
        balance,
        total_cashed_out,
        cumulative_profit: 0.0,
    });

    for day in 1..=days {
        let returns = balance * odds;
        total_cashed_out += returns * (1.0 - reinvestment_fraction);
        balance = next_balance(balance, odds, reinvestment_fraction);

        points.push(ProjectionPoint {
            day,
            balance,
            total_cashed_out,
            cumulative_profit: balance + total_cashed_out - initial_stake,
        });
    }

    points
}

/// Number of winning days needed to grow `current_balance` to
/// `target_balance`
///
/// The answer agrees with `project_balance_over_time`: the projected balance
/// on that day is at least the target and the day before it is below.
pub fn days_to_target(
    current_balance: f64,
    target_balance: f64,
    odds: f64,
    reinvestment_fraction: f64,
) -> DaysToTarget {
    if current_balance >= target_balance {
        return DaysToTarget::Days(0);
    }
    if !(current_balance > 0.0) || !target_balance.is_finite() {
        return DaysToTarget::Unreachable;
    }

    let growth = odds * reinvestment_fraction;
    if !(growth > 1.0) || !growth.is_finite() {
        return DaysToTarget::Unreachable;
    }

    let estimate = ((target_balance / current_balance).ln() / growth.ln()).ceil();
    if !estimate.is_finite() {
        return DaysToTarget::Unreachable;
    }
    let estimate = estimate.max(1.0) as u64;
    if estimate > MAX_VERIFIED_DAYS {
        return DaysToTarget::Days(estimate);
    }

    // Walk the same loop the projector uses so rounding cannot put the
    // answer one day off.
    let mut day = 0u64;
    let mut balance = current_balance;
    while balance < target_balance {
        balance = next_balance(balance, odds, reinvestment_fraction);
        day += 1;
        if day > MAX_VERIFIED_DAYS {
            return DaysToTarget::Days(estimate);
        }
    }

    DaysToTarget::Days(day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_is_geometric() {
        let points = project_balance_over_time(100.0, 1.1, 0.8, 5);

        assert_eq!(points.len(), 6);
        assert_eq!(points[0].balance, 100.0);
        assert_eq!(points[0].total_cashed_out, 0.0);

        let expected = 100.0 * 0.88_f64.powi(5);
        assert!((points[5].balance - expected).abs() < 1e-9);
        assert!((points[5].balance - 52.77).abs() < 0.01);
    }

    #[test]
    fn test_projection_cashout_accumulates() {
        let points = project_balance_over_time(100.0, 1.5, 0.5, 2);

        // Day 1: returns 150, cash 75, balance 75
        assert!((points[1].balance - 75.0).abs() < 1e-9);
        assert!((points[1].total_cashed_out - 75.0).abs() < 1e-9);
        assert!((points[1].cumulative_profit - 50.0).abs() < 1e-9);

        // Day 2: returns 112.5, cash 56.25, balance 56.25
        assert!((points[2].balance - 56.25).abs() < 1e-9);
        assert!((points[2].total_cashed_out - 131.25).abs() < 1e-9);
        assert!((points[2].cumulative_profit - 87.5).abs() < 1e-9);
    }

    #[test]
    fn test_projection_full_reinvestment() {
        let points = project_balance_over_time(50.0, 1.1, 1.0, 3);
        assert!((points[3].balance - 50.0 * 1.1_f64.powi(3)).abs() < 1e-9);
        assert_eq!(points[3].total_cashed_out, 0.0);
    }

    #[test]
    fn test_projection_zero_days() {
        let points = project_balance_over_time(100.0, 1.1, 0.8, 0);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].day, 0);
    }

    #[test]
    fn test_days_to_target_boundary() {
        let cases = [
            (100.0, 1_000.0, 1.1, 1.0),
            (50.0, 200.0, 1.25, 0.9),
            (10.0, 10_000.0, 2.0, 0.75),
            (100.0, 121.0, 1.1, 1.0),
        ];

        for (current, target, odds, reinvest) in cases {
            let days = days_to_target(current, target, odds, reinvest)
                .days()
                .expect("reachable");
            let points = project_balance_over_time(current, odds, reinvest, days as u32);

            assert!(
                points[days as usize].balance >= target,
                "day {} below target for {:?}",
                days,
                (current, target, odds, reinvest)
            );
            assert!(days >= 1);
            assert!(points[days as usize - 1].balance < target);
        }
    }

    #[test]
    fn test_days_to_target_already_reached() {
        assert_eq!(days_to_target(500.0, 400.0, 1.1, 0.8), DaysToTarget::Days(0));
        assert_eq!(days_to_target(400.0, 400.0, 1.1, 0.8), DaysToTarget::Days(0));
    }

    #[test]
    fn test_days_to_target_unreachable() {
        // 1.1 * 0.8 = 0.88 shrinks every day
        assert_eq!(
            days_to_target(100.0, 200.0, 1.1, 0.8),
            DaysToTarget::Unreachable
        );
        // Exactly break-even never grows
        assert_eq!(
            days_to_target(100.0, 200.0, 2.0, 0.5),
            DaysToTarget::Unreachable
        );
        assert_eq!(
            days_to_target(0.0, 200.0, 2.0, 1.0),
            DaysToTarget::Unreachable
        );
    }

    #[test]
    fn test_days_to_target_serialization() {
        let json = serde_json::to_string(&DaysToTarget::Days(7)).unwrap();
        assert_eq!(json, r#"{"kind":"days","days":7}"#);
        let json = serde_json::to_string(&DaysToTarget::Unreachable).unwrap();
        assert_eq!(json, r#"{"kind":"unreachable"}"#);
    }
}
