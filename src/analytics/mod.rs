//! Performance analytics over the ledger's bet history

pub mod metrics;

use serde::{Deserialize, Serialize};

use crate::ledger::Ledger;
use crate::models::Bet;

pub use metrics::{
    analyze_by, analyze_by_odds_range, analyze_leagues, analyze_market_types,
    average_selection_edge, calculate_metrics, DimensionAnalysis, HitRateAnalysis,
    PerformanceMetrics,
};

/// Everything the stats page shows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsReport {
    pub metrics: PerformanceMetrics,
    pub by_stream: Vec<DimensionAnalysis>,
    pub by_odds_range: Vec<DimensionAnalysis>,
    pub leagues: Vec<HitRateAnalysis>,
    pub market_types: Vec<HitRateAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_selection_edge: Option<f64>,
}

pub fn build_report(ledger: &Ledger) -> StatsReport {
    let bets: Vec<&Bet> = ledger.all_bets().collect();

    StatsReport {
        metrics: calculate_metrics(&bets),
        by_stream: analyze_by(&bets, |b| {
            ledger
                .streams
                .get(&b.stream_id)
                .map(|s| s.name.clone())
                .unwrap_or_else(|| b.stream_id.to_string())
        }),
        by_odds_range: analyze_by_odds_range(&bets),
        leagues: analyze_leagues(ledger.leagues.values()),
        market_types: analyze_market_types(ledger.market_types.values()),
        average_selection_edge: average_selection_edge(&bets),
    }
}
