//! Performance Metrics
//!
//! Hit rate, ROI, drawdown and breakdowns over settled bets.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::odds::edge;
use crate::core::streak::{current_streak, longest_streaks, Streak, StreakRecord};
use crate::models::{Bet, BetStatus, League, MarketType};

/// Evaluation metrics over a bet history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    // Counts
    pub settled_bets: usize,
    pub winning_bets: usize,
    pub losing_bets: usize,
    pub void_bets: usize,
    pub pending_bets: usize,
    pub hit_rate: f64,

    // Money
    pub total_staked: f64,
    pub total_returns: f64,
    pub net_profit: f64,
    pub roi: f64,
    pub avg_odds: f64,

    // Risk
    pub gross_profit: f64,
    pub gross_loss: f64,
    pub profit_factor: f64,
    pub max_drawdown: f64,
    pub max_drawdown_pct: f64,

    // Streaks
    pub current_streak: Streak,
    pub longest_streaks: StreakRecord,
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self {
            settled_bets: 0,
            winning_bets: 0,
            losing_bets: 0,
            void_bets: 0,
            pending_bets: 0,
            hit_rate: 0.0,
            total_staked: 0.0,
            total_returns: 0.0,
            net_profit: 0.0,
            roi: 0.0,
            avg_odds: 0.0,
            gross_profit: 0.0,
            gross_loss: 0.0,
            profit_factor: 0.0,
            max_drawdown: 0.0,
            max_drawdown_pct: 0.0,
            current_streak: Streak::NONE,
            longest_streaks: StreakRecord::default(),
        }
    }
}

/// Settled bets in the order they were settled
fn settled_in_order<'a>(bets: &[&'a Bet]) -> Vec<&'a Bet> {
    let mut settled: Vec<&Bet> = bets
        .iter()
        .copied()
        .filter(|b| b.status.is_settled())
        .collect();
    settled.sort_by(|a, b| a.settled_at.cmp(&b.settled_at).then(a.id.cmp(&b.id)));
    settled
}

/// Calculate metrics from a bet history
pub fn calculate_metrics(bets: &[&Bet]) -> PerformanceMetrics {
    let pending_bets = bets.iter().filter(|b| b.status == BetStatus::Pending).count();
    let settled = settled_in_order(bets);

    if settled.is_empty() {
        return PerformanceMetrics {
            pending_bets,
            ..Default::default()
        };
    }

    let winning_bets = settled.iter().filter(|b| b.status == BetStatus::Won).count();
    let losing_bets = settled.iter().filter(|b| b.status == BetStatus::Lost).count();
    let void_bets = settled.len() - winning_bets - losing_bets;
    let decided = winning_bets + losing_bets;
    let hit_rate = if decided > 0 {
        winning_bets as f64 / decided as f64
    } else {
        0.0
    };

    let total_staked: f64 = settled.iter().map(|b| b.stake).sum();
    let total_returns: f64 = settled.iter().filter_map(|b| b.returns).sum();
    let avg_odds = settled.iter().map(|b| b.total_odds).sum::<f64>() / settled.len() as f64;

    // Profit/Loss calculation
    let profits: Vec<f64> = settled.iter().map(|b| b.profit_loss.unwrap_or(0.0)).collect();
    let gross_profit: f64 = profits.iter().filter(|&&p| p > 0.0).sum();
    let gross_loss: f64 = profits.iter().filter(|&&p| p < 0.0).map(|p| p.abs()).sum();
    let net_profit: f64 = profits.iter().sum();

    let profit_factor = if gross_loss > 0.0 {
        gross_profit / gross_loss
    } else if gross_profit > 0.0 {
        f64::INFINITY
    } else {
        0.0
    };

    // Drawdown of the cumulative profit curve
    let mut cumulative = 0.0;
    let mut peak = 0.0_f64;
    let mut max_drawdown = 0.0_f64;
    for &p in &profits {
        cumulative += p;
        peak = peak.max(cumulative);
        max_drawdown = max_drawdown.max(peak - cumulative);
    }

    let max_drawdown_pct = if total_staked > 0.0 {
        max_drawdown / total_staked
    } else {
        0.0
    };

    let roi = if total_staked > 0.0 {
        net_profit / total_staked
    } else {
        0.0
    };

    let statuses: Vec<BetStatus> = settled.iter().map(|b| b.status).collect();

    PerformanceMetrics {
        settled_bets: settled.len(),
        winning_bets,
        losing_bets,
        void_bets,
        pending_bets,
        hit_rate,
        total_staked,
        total_returns,
        net_profit,
        roi,
        avg_odds,
        gross_profit,
        gross_loss,
        profit_factor,
        max_drawdown,
        max_drawdown_pct,
        current_streak: current_streak(statuses.iter().copied()),
        longest_streaks: longest_streaks(statuses),
    }
}

/// Analysis results by dimension
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DimensionAnalysis {
    pub key: String,
    pub bets: usize,
    pub wins: usize,
    pub hit_rate: f64,
    pub stake: f64,
    pub profit: f64,
    pub roi: f64,
}

fn summarize(key: String, group: &[&Bet]) -> DimensionAnalysis {
    let decided: Vec<&&Bet> = group
        .iter()
        .filter(|b| matches!(b.status, BetStatus::Won | BetStatus::Lost))
        .collect();
    let wins = decided.iter().filter(|b| b.status == BetStatus::Won).count();
    let stake: f64 = group.iter().map(|b| b.stake).sum();
    let profit: f64 = group.iter().filter_map(|b| b.profit_loss).sum();

    DimensionAnalysis {
        key,
        bets: group.len(),
        wins,
        hit_rate: if decided.is_empty() {
            0.0
        } else {
            wins as f64 / decided.len() as f64
        },
        stake,
        profit,
        roi: if stake > 0.0 { profit / stake } else { 0.0 },
    }
}

/// Analyze settled bets by a grouping key
pub fn analyze_by<F>(bets: &[&Bet], key_fn: F) -> Vec<DimensionAnalysis>
where
    F: Fn(&Bet) -> String,
{
    let mut grouped: HashMap<String, Vec<&Bet>> = HashMap::new();
    for bet in bets.iter().filter(|b| b.status.is_settled()) {
        grouped.entry(key_fn(bet)).or_default().push(*bet);
    }

    let mut results: Vec<DimensionAnalysis> = grouped
        .into_iter()
        .map(|(key, group)| summarize(key, &group))
        .collect();

    results.sort_by(|a, b| a.key.cmp(&b.key));
    results
}

/// Odds bucket label used by `analyze_by_odds_range`
pub fn odds_range_label(odds: f64) -> &'static str {
    if odds < 1.2 {
        "low (<1.2)"
    } else if odds < 2.0 {
        "mid (1.2-2)"
    } else {
        "high (>=2)"
    }
}

/// Analyze settled bets by total odds range
pub fn analyze_by_odds_range(bets: &[&Bet]) -> Vec<DimensionAnalysis> {
    analyze_by(bets, |b| odds_range_label(b.total_odds).to_string())
}

/// Observed hit rate of a league or market type against its baseline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HitRateAnalysis {
    pub id: u64,
    pub name: String,
    pub baseline_probability: f64,
    pub total_selections: u32,
    pub won_selections: u32,
    pub actual_hit_rate: f64,
    pub edge_vs_baseline: f64,
}

pub fn analyze_leagues<'a, I>(leagues: I) -> Vec<HitRateAnalysis>
where
    I: IntoIterator<Item = &'a League>,
{
    leagues
        .into_iter()
        .map(|l| HitRateAnalysis {
            id: l.id,
            name: l.name.clone(),
            baseline_probability: l.baseline_probability,
            total_selections: l.hit_rate.total_selections,
            won_selections: l.hit_rate.won_selections,
            actual_hit_rate: l.hit_rate.actual_hit_rate,
            edge_vs_baseline: baseline_edge(
                l.hit_rate.total_selections,
                l.hit_rate.actual_hit_rate,
                l.baseline_probability,
            ),
        })
        .collect()
}

pub fn analyze_market_types<'a, I>(market_types: I) -> Vec<HitRateAnalysis>
where
    I: IntoIterator<Item = &'a MarketType>,
{
    market_types
        .into_iter()
        .map(|m| HitRateAnalysis {
            id: m.id,
            name: m.name.clone(),
            baseline_probability: m.baseline_probability,
            total_selections: m.hit_rate.total_selections,
            won_selections: m.hit_rate.won_selections,
            actual_hit_rate: m.hit_rate.actual_hit_rate,
            edge_vs_baseline: baseline_edge(
                m.hit_rate.total_selections,
                m.hit_rate.actual_hit_rate,
                m.baseline_probability,
            ),
        })
        .collect()
}

fn baseline_edge(total: u32, actual: f64, baseline: f64) -> f64 {
    if total == 0 {
        0.0
    } else {
        actual - baseline
    }
}

/// Mean edge of settled selections that carried a probability estimate
///
/// Edge is the estimate minus the probability implied by the leg's odds.
pub fn average_selection_edge(bets: &[&Bet]) -> Option<f64> {
    let edges: Vec<f64> = bets
        .iter()
        .filter(|b| b.status.is_settled())
        .flat_map(|b| b.selections.iter())
        .filter_map(|s| s.estimated_probability.and_then(|p| edge(p, s.odds)))
        .collect();

    if edges.is_empty() {
        None
    } else {
        Some(edges.iter().sum::<f64>() / edges.len() as f64)
    }
}
